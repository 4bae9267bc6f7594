use std::io::Write;

use chrono::Local;
use env_logger::Builder;
use log::{LevelFilter, warn};

use speedlog_config::LogConfig;
use speedlog_error::{Result, log_err};

/// 로거 세팅
///
/// 프로세스에서 한 번만 호출한다. 레벨 이름을 알 수 없으면 INFO로 동작한다.
pub fn init_logger(config: &LogConfig) -> Result<LevelFilter> {
    let level = config.level_filter();
    let filter = level.unwrap_or(LevelFilter::Info);

    build_logger(filter).try_init().map_err(log_err)?;

    if level.is_none() {
        warn!("알 수 없는 로그 레벨 '{}', INFO 사용", config.level);
    }

    Ok(filter)
}

fn build_logger(filter: LevelFilter) -> Builder {
    let mut builder = Builder::new();
    builder.filter(None, filter);

    #[cfg(debug_assertions)]
    {
        builder.format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}:{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        });
    }

    #[cfg(not(debug_assertions))]
    {
        builder.format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        });
    }

    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_reported() {
        let config = LogConfig {
            level: "nonsense".to_string(),
        };
        // 테스트 바이너리 안에서 첫 설치만 성공한다
        let first = init_logger(&config);
        let second = init_logger(&config);
        if let Ok(filter) = first {
            assert_eq!(filter, LevelFilter::Info);
        }
        assert!(second.is_err());
    }
}
