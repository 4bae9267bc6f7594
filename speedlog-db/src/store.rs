use async_trait::async_trait;
use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use log::{debug, error, info};
use mysql_async::prelude::Queryable;
use mysql_async::{TxOpts, Value};

use speedlog_config::DbConfig;
use speedlog_error::{StoreError, schema_err, write_err};
use speedlog_model::MeasurementRecord;

use crate::connection::ScopedConnection;
use crate::sql::speedtest_results;

/// 측정 결과 저장소
///
/// 두 메서드 모두 실패를 로그로 남기고 호출자에게 전파하지 않는다.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// 결과 테이블이 없으면 생성
    async fn ensure_schema(&self);

    /// 측정 결과 1건 저장, 저장되었으면 true
    async fn insert(&self, record: &MeasurementRecord) -> bool;
}

/// `MySQL`/`MariaDB` 결과 저장소
///
/// 호출마다 연결을 열고 닫는다.
#[derive(Debug, Clone)]
pub struct MySqlResultStore {
    config: DbConfig,
}

impl MySqlResultStore {
    pub fn new(config: &DbConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// 테이블 생성
    pub async fn try_ensure_schema(&self) -> Result<(), StoreError> {
        let mut conn = ScopedConnection::open(&self.config).await?;

        conn.query_drop(speedtest_results::CREATE_TABLE)
            .await
            .map_err(schema_err)?;
        debug!("{} 테이블 확인 완료", speedtest_results::TABLE_NAME);

        conn.close().await;
        Ok(())
    }

    /// 트랜잭션 안에서 insert 1회 후 커밋, 기록된 측정 시각 반환
    pub async fn try_insert(&self, record: &MeasurementRecord) -> Result<NaiveDateTime, StoreError> {
        let mut conn = ScopedConnection::open(&self.config).await?;

        let test_date = Local::now().naive_local();
        {
            let mut tx = conn
                .start_transaction(TxOpts::default())
                .await
                .map_err(write_err)?;

            tx.exec_drop(
                speedtest_results::INSERT,
                (
                    datetime_value(&test_date),
                    record.download_speed,
                    record.upload_speed,
                    record.ping_latency,
                    record.jitter,
                    record.server.to_json(),
                    record.client_ip.clone(),
                    record.user_agent.clone(),
                    record.test_duration,
                ),
            )
            .await
            .map_err(write_err)?;

            tx.commit().await.map_err(write_err)?;
        }

        conn.close().await;
        Ok(test_date)
    }
}

/// `DATETIME` 컬럼 값, 초 단위까지만 저장
fn datetime_value(at: &NaiveDateTime) -> Value {
    Value::Date(
        at.year() as u16,
        at.month() as u8,
        at.day() as u8,
        at.hour() as u8,
        at.minute() as u8,
        at.second() as u8,
        0,
    )
}

#[async_trait]
impl ResultStore for MySqlResultStore {
    async fn ensure_schema(&self) {
        match self.try_ensure_schema().await {
            Ok(()) => info!("DB 테이블 초기화 완료"),
            Err(e) => error!("DB 초기화 실패: {}", e),
        }
    }

    async fn insert(&self, record: &MeasurementRecord) -> bool {
        match self.try_insert(record).await {
            Ok(test_date) => {
                info!("측정 결과 저장 완료 ({})", test_date.format("%Y-%m-%d %H:%M:%S"));
                true
            }
            Err(e) => {
                error!("측정 결과 저장 실패: {}", e);
                false
            }
        }
    }
}
