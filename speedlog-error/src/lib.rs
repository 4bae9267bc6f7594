use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::time::Duration;
use serde_json::Error as JsonError;
use serde_yml::Error as YmlError;

/// speedlog 프로세스 수준 에러 타입
#[derive(Debug)]
pub enum SpeedlogError {
    /// 설정 관련 에러
    Config(String),

    /// 입출력 에러
    Io(io::Error),

    /// 로깅 관련 에러
    Logging(String),

    /// 측정 에러
    Measurement(MeasurementError),

    /// 저장소 에러
    Store(StoreError),

    /// 기타 에러
    Other(String),
}

impl fmt::Display for SpeedlogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeedlogError::Config(msg) => write!(f, "설정 에러: {}", msg),
            SpeedlogError::Io(err) => write!(f, "I/O 에러: {}", err),
            SpeedlogError::Logging(msg) => write!(f, "로깅 에러: {}", msg),
            SpeedlogError::Measurement(err) => write!(f, "측정 에러: {}", err),
            SpeedlogError::Store(err) => write!(f, "저장소 에러: {}", err),
            SpeedlogError::Other(msg) => write!(f, "기타 에러: {}", msg),
        }
    }
}

impl StdError for SpeedlogError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            SpeedlogError::Io(err) => Some(err),
            SpeedlogError::Measurement(err) => Some(err),
            SpeedlogError::Store(err) => Some(err),
            _ => None,
        }
    }
}

/// Result 타입 별칭 정의
pub type Result<T> = std::result::Result<T, SpeedlogError>;

/// 측정 도구 실행 에러
#[derive(Debug, Clone, PartialEq)]
pub enum MeasurementError {
    /// 도구가 실행되지 않았거나 0이 아닌 코드로 종료됨
    ToolFailed {
        /// 종료 코드, 시그널로 종료되었거나 실행 자체가 실패하면 None
        exit_code: Option<i32>,
        /// stderr 또는 실행 실패 사유
        detail: String,
    },

    /// 제한 시간 초과
    Timeout(Duration),

    /// 출력이 JSON 객체가 아님
    ParseFailed(String),
}

impl fmt::Display for MeasurementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementError::ToolFailed { exit_code: Some(code), detail } => {
                write!(f, "speedtest 실행 실패 (종료 코드 {}): {}", code, detail)
            }
            MeasurementError::ToolFailed { exit_code: None, detail } => {
                write!(f, "speedtest 실행 실패: {}", detail)
            }
            MeasurementError::Timeout(limit) => {
                write!(f, "speedtest 제한 시간 초과 ({}초)", limit.as_secs())
            }
            MeasurementError::ParseFailed(msg) => write!(f, "speedtest 출력 파싱 실패: {}", msg),
        }
    }
}

impl StdError for MeasurementError {}

impl From<JsonError> for MeasurementError {
    fn from(err: JsonError) -> Self {
        MeasurementError::ParseFailed(format!("{}", err))
    }
}

/// 결과 저장소 에러
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// 연결 실패
    Connect(String),

    /// insert/commit 실패
    Write(String),

    /// 스키마 생성 실패
    Schema(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Connect(msg) => write!(f, "DB 연결 실패: {}", msg),
            StoreError::Write(msg) => write!(f, "DB 저장 실패: {}", msg),
            StoreError::Schema(msg) => write!(f, "DB 스키마 생성 실패: {}", msg),
        }
    }
}

impl StdError for StoreError {}

/// From 트레이트 구현으로 다양한 에러 타입을 SpeedlogError로 변환
impl From<io::Error> for SpeedlogError {
    fn from(err: io::Error) -> Self {
        SpeedlogError::Io(err)
    }
}

impl From<MeasurementError> for SpeedlogError {
    fn from(err: MeasurementError) -> Self {
        SpeedlogError::Measurement(err)
    }
}

impl From<StoreError> for SpeedlogError {
    fn from(err: StoreError) -> Self {
        SpeedlogError::Store(err)
    }
}

impl From<YmlError> for SpeedlogError {
    fn from(err: YmlError) -> Self {
        SpeedlogError::Config(format!("YAML 파싱 에러: {}", err))
    }
}

impl From<String> for SpeedlogError {
    fn from(err: String) -> Self {
        SpeedlogError::Other(err)
    }
}

impl From<&str> for SpeedlogError {
    fn from(err: &str) -> Self {
        SpeedlogError::Other(err.to_string())
    }
}

/// 에러 처리 유틸리티 함수
pub fn config_err<E: fmt::Display>(err: E) -> SpeedlogError {
    SpeedlogError::Config(format!("{}", err))
}

pub fn log_err<E: fmt::Display>(err: E) -> SpeedlogError {
    SpeedlogError::Logging(format!("{}", err))
}

pub fn connect_err<E: fmt::Display>(err: E) -> StoreError {
    StoreError::Connect(format!("{}", err))
}

pub fn write_err<E: fmt::Display>(err: E) -> StoreError {
    StoreError::Write(format!("{}", err))
}

pub fn schema_err<E: fmt::Display>(err: E) -> StoreError {
    StoreError::Schema(format!("{}", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_failure_reports_exit_code_and_stderr() {
        let err = MeasurementError::ToolFailed {
            exit_code: Some(2),
            detail: "Limit reached".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains('2'));
        assert!(text.contains("Limit reached"));
    }

    #[test]
    fn invalid_json_becomes_parse_failure() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: MeasurementError = json_err.into();
        assert!(matches!(err, MeasurementError::ParseFailed(_)));
    }

    #[test]
    fn yaml_error_becomes_config_error() {
        let yml_err = serde_yml::from_str::<Vec<u32>>("key: [").unwrap_err();
        let err: SpeedlogError = yml_err.into();
        assert!(matches!(err, SpeedlogError::Config(_)));
    }

    #[test]
    fn nested_errors_expose_source() {
        let err: SpeedlogError = StoreError::Connect("refused".into()).into();
        assert!(err.source().is_some());
        assert!(err.to_string().contains("refused"));
    }
}
