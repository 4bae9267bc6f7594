use std::ops::{Deref, DerefMut};
use std::time::Duration;

use log::{debug, warn};
use mysql_async::{Conn, Opts, OptsBuilder};

use speedlog_config::DbConfig;
use speedlog_error::{StoreError, connect_err};

/// 호출 범위 안에서만 사는 db 연결
///
/// 정상 경로에서는 `close` 로 서버에 종료를 알린다. 중간에 drop 되면
/// `Conn` 이 스스로 연결 해제를 예약한다. 풀링하지 않는다.
pub struct ScopedConnection {
    conn: Conn,
}

impl ScopedConnection {
    /// 연결 열기
    pub async fn open(dbconfig: &DbConfig) -> Result<Self, StoreError> {
        let opts = create_mysql_opts(dbconfig);
        let limit = Duration::from_secs(dbconfig.connect_timeout_seconds.max(1));

        // 소켓 연결과 핸드셰이크를 함께 제한
        let conn = match tokio::time::timeout(limit, Conn::new(opts)).await {
            Ok(Ok(conn)) => conn,
            Ok(Err(e)) => return Err(connect_err(format!("{} ({})", e, dbconfig.describe()))),
            Err(_) => {
                return Err(connect_err(format!(
                    "{}초 안에 연결하지 못함 ({})",
                    limit.as_secs(),
                    dbconfig.describe()
                )));
            }
        };

        debug!("db 연결 열림: {}", dbconfig.describe());

        Ok(Self { conn })
    }

    /// 서버에 종료를 알리고 연결 닫기
    pub async fn close(self) {
        match self.conn.disconnect().await {
            Ok(()) => debug!("db 연결 닫힘"),
            Err(e) => warn!("db 연결 종료 중 오류: {}", e),
        }
    }
}

impl Deref for ScopedConnection {
    type Target = Conn;

    fn deref(&self) -> &Conn {
        &self.conn
    }
}

impl DerefMut for ScopedConnection {
    fn deref_mut(&mut self) -> &mut Conn {
        &mut self.conn
    }
}

/// `MySQL` 접속 옵션 생성
fn create_mysql_opts(dbconfig: &DbConfig) -> Opts {
    OptsBuilder::default()
        .ip_or_hostname(dbconfig.host.as_str())
        .tcp_port(dbconfig.port)
        .db_name(Some(dbconfig.database.as_str()))
        .user(Some(dbconfig.user.as_str()))
        .pass(Some(dbconfig.password.as_str()))
        .prefer_socket(false)
        .into()
}
