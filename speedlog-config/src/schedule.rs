use std::time::Duration;

use serde::{Deserialize, Serialize};

use speedlog_error::{Result, config_err};

/// 폴링 주기 상한
pub const MAX_POLL_PERIOD: Duration = Duration::from_secs(60);

/// 측정 스케줄 설정
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScheduleConfig {
    /// 측정 간격(분)
    pub interval_minutes: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 15,
        }
    }
}

impl ScheduleConfig {
    #[must_use]
    pub fn every_minutes(interval_minutes: u64) -> Self {
        Self { interval_minutes }
    }

    /// 측정 간격
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }

    /// 예정된 측정을 확인하는 주기, 60초를 넘지 않음
    pub fn poll_period(&self) -> Duration {
        self.interval().min(MAX_POLL_PERIOD)
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval_minutes == 0 {
            return Err(config_err("측정 간격은 1분 이상이어야 합니다"));
        }
        Ok(())
    }
}
