use log::LevelFilter;
use serde::{Deserialize, Serialize};

/// 로깅 설정
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// 로그 레벨 이름 (TRACE, DEBUG, INFO, WARN, ERROR, OFF)
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
        }
    }
}

impl LogConfig {
    /// 레벨 이름을 필터로 변환, 알 수 없는 이름이면 None
    pub fn level_filter(&self) -> Option<LevelFilter> {
        match self.level.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Some(LevelFilter::Trace),
            "DEBUG" => Some(LevelFilter::Debug),
            "INFO" => Some(LevelFilter::Info),
            "WARN" | "WARNING" => Some(LevelFilter::Warn),
            "ERROR" | "CRITICAL" | "FATAL" => Some(LevelFilter::Error),
            "OFF" | "NONE" => Some(LevelFilter::Off),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(name: &str) -> Option<LevelFilter> {
        LogConfig { level: name.to_string() }.level_filter()
    }

    #[test]
    fn accepts_common_aliases() {
        assert_eq!(level("info"), Some(LevelFilter::Info));
        assert_eq!(level("WARNING"), Some(LevelFilter::Warn));
        assert_eq!(level("CRITICAL"), Some(LevelFilter::Error));
        assert_eq!(level(" debug "), Some(LevelFilter::Debug));
    }

    #[test]
    fn unknown_name_is_none() {
        assert_eq!(level("verbose"), None);
    }
}
