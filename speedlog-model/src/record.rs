use serde::Serialize;
use serde_json::Value;

/// 측정 출처 식별자
pub const USER_AGENT: &str = "ookla-speedtest-cli";

/// 측정 서버 정보
///
/// 도구가 보고한 값을 타입 변환 없이 그대로 보관한다. 값이 없으면 null로 직렬화된다.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServerInfo {
    pub id: Option<Value>,
    pub name: Option<Value>,
    pub location: Option<Value>,
    pub country: Option<Value>,
    pub host: Option<Value>,
    pub ip: Option<Value>,
    pub port: Option<Value>,
}

impl ServerInfo {
    /// server_info 컬럼에 저장할 JSON 문자열
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// 측정 1회 결과
///
/// 측정 시각은 저장소가 insert 직전에 기록한다.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRecord {
    /// Mbps
    pub download_speed: f64,
    /// Mbps
    pub upload_speed: f64,
    /// ms
    pub ping_latency: f64,
    /// ms
    pub jitter: f64,
    pub server: ServerInfo,
    pub client_ip: String,
    pub user_agent: String,
    /// 초
    pub test_duration: i32,
}

impl Default for MeasurementRecord {
    fn default() -> Self {
        Self {
            download_speed: 0.0,
            upload_speed: 0.0,
            ping_latency: 0.0,
            jitter: 0.0,
            server: ServerInfo::default(),
            client_ip: String::new(),
            user_agent: USER_AGENT.to_string(),
            test_duration: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_server_serializes_every_key() {
        let parsed: Value = serde_json::from_str(&ServerInfo::default().to_json()).unwrap();
        let object = parsed.as_object().unwrap();
        assert_eq!(object.len(), 7);
        assert!(object.values().all(Value::is_null));
    }
}
