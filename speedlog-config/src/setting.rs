use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use speedlog_error::{Result, SpeedlogError};

use crate::dbconfig::DbConfig;
use crate::env::{CONFIG_PATH, apply_overrides};
use crate::logconfig::LogConfig;
use crate::runner::RunnerConfig;
use crate::schedule::ScheduleConfig;

/// 기본 설정파일 이름
pub const DEFAULT_CONFIG_FILE: &str = "speedlog.yml";

/// 통합 세팅 인스턴스
///
/// 시작 시 한 번 만들어 각 컴포넌트 생성자에 넘긴다.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub schedule: ScheduleConfig,
    pub database: DbConfig,
    pub runner: RunnerConfig,
    pub logging: LogConfig,
    /// 설정파일을 읽었다면 그 경로
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Settings {
    /// 프로세스 환경으로 Setting 생성
    pub fn new() -> Result<Self> {
        Self::load(|key| std::env::var(key).ok())
    }

    /// 설정파일(있으면) 로드 후 환경변수 적용
    pub fn load<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match lookup(CONFIG_PATH) {
            // 명시한 파일은 반드시 있어야 함
            Some(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE)?,
            _ => Self::default(),
        };

        apply_overrides(&mut settings, lookup)?;
        settings.validate()?;

        Ok(settings)
    }

    /// 설정파일에서 설정 로드
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| {
            SpeedlogError::Config(format!("설정파일 열기 실패 ({}): {}", path.display(), e))
        })?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let mut settings: Settings = serde_yml::from_str(&contents)?;
        settings.source = Some(path.to_path_buf());

        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.schedule.validate()?;
        self.runner.validate()?;
        Ok(())
    }
}
