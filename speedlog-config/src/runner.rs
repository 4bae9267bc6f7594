use std::time::Duration;

use serde::{Deserialize, Serialize};

use speedlog_error::{Result, config_err};

/// speedtest 도구 실행 설정
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunnerConfig {
    /// 실행 파일 경로 또는 PATH 상의 이름
    pub program: String,
    /// 실행 제한 시간(초)
    pub timeout_seconds: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            program: "speedtest".to_string(),
            timeout_seconds: 300,
        }
    }
}

impl RunnerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn validate(&self) -> Result<()> {
        if self.program.trim().is_empty() {
            return Err(config_err("speedtest 실행 파일이 지정되지 않았습니다"));
        }
        if self.timeout_seconds == 0 {
            return Err(config_err("speedtest 제한 시간은 1초 이상이어야 합니다"));
        }
        Ok(())
    }
}
