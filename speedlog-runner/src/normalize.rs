//! speedtest JSON 출력 정규화
//!
//! 필드별 기본값:
//!
//! | 필드 | 경로 | 없을 때 |
//! |---|---|---|
//! | download_speed | `download.bandwidth` (bytes/s) | 0.0 |
//! | upload_speed | `upload.bandwidth` (bytes/s) | 0.0 |
//! | ping_latency | `ping.latency` (ms) | 0.0 |
//! | jitter | `ping.jitter` (ms) | 0.0 |
//! | test_duration | `download.elapsed` + `upload.elapsed` (ms) | 각 0 |
//! | server | `server.*` | 모든 키 null |
//! | client_ip | `interface.externalIp` | 빈 문자열 |
//!
//! 숫자 필드는 JSON 숫자 또는 숫자 문자열을 받고 그 외는 없는 것으로 본다.
//! 음수나 유한하지 않은 값은 0으로 맞춘다.

use serde_json::{Map, Value};

use speedlog_error::MeasurementError;
use speedlog_model::{MeasurementRecord, ServerInfo, USER_AGENT};

/// 도구 출력을 측정 결과로 변환
///
/// JSON 객체가 아니면 ParseFailed, 그 외 누락 필드는 기본값으로 채운다.
pub fn normalize(payload: &str) -> Result<MeasurementRecord, MeasurementError> {
    let data: Value = serde_json::from_str(payload.trim())?;
    let Value::Object(data) = data else {
        return Err(MeasurementError::ParseFailed(
            "최상위 값이 JSON 객체가 아닙니다".to_string(),
        ));
    };

    let download = section(&data, "download");
    let upload = section(&data, "upload");
    let ping = section(&data, "ping");

    let download_elapsed = elapsed_ms(download);
    let upload_elapsed = elapsed_ms(upload);

    Ok(MeasurementRecord {
        download_speed: bps_to_mbps(number(download, "bandwidth")),
        upload_speed: bps_to_mbps(number(upload, "bandwidth")),
        ping_latency: round2(number(ping, "latency")),
        jitter: round2(number(ping, "jitter")),
        server: server_info(section(&data, "server")),
        client_ip: text(section(&data, "interface"), "externalIp"),
        user_agent: USER_AGENT.to_string(),
        test_duration: duration_secs(download_elapsed, upload_elapsed),
    })
}

/// bytes/s -> Mb/s, 소수점 2자리
pub fn bps_to_mbps(bytes_per_second: f64) -> f64 {
    round2(bytes_per_second * 8.0 / 1_000_000.0)
}

/// download/upload 경과 시간(ms) 합을 초 단위로 반올림
///
/// 정확히 .5 인 경우 짝수 쪽으로 반올림한다 (10.5 -> 10, 11.5 -> 12).
pub fn duration_secs(download_elapsed_ms: i64, upload_elapsed_ms: i64) -> i32 {
    let total_ms = download_elapsed_ms.saturating_add(upload_elapsed_ms).max(0);
    let secs = (total_ms as f64 / 1000.0).round_ties_even();
    secs.min(i32::MAX as f64) as i32
}

/// 소수점 2자리, 정확한 .5 는 짝수 쪽
fn round2(value: f64) -> f64 {
    (non_negative(value) * 100.0).round_ties_even() / 100.0
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

/// 하위 객체, 없거나 null이거나 객체가 아니면 None
fn section<'a>(data: &'a Map<String, Value>, key: &str) -> Option<&'a Map<String, Value>> {
    data.get(key).and_then(Value::as_object)
}

fn number(section: Option<&Map<String, Value>>, key: &str) -> f64 {
    let Some(value) = section.and_then(|s| s.get(key)) else {
        return 0.0;
    };
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// 경과 시간은 정수 ms로 잘라서 사용
fn elapsed_ms(section: Option<&Map<String, Value>>) -> i64 {
    non_negative(number(section, "elapsed")).trunc() as i64
}

fn text(section: Option<&Map<String, Value>>, key: &str) -> String {
    match section.and_then(|s| s.get(key)) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn server_info(server: Option<&Map<String, Value>>) -> ServerInfo {
    let Some(server) = server else {
        return ServerInfo::default();
    };
    let field = |key: &str| server.get(key).filter(|v| !v.is_null()).cloned();

    ServerInfo {
        id: field("id"),
        name: field("name"),
        location: field("location"),
        country: field("country"),
        host: field("host"),
        ip: field("ip"),
        port: field("port"),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const SAMPLE: &str = r#"{
        "type": "result",
        "download": {"bandwidth": 12500000, "bytes": 150000000, "elapsed": 10000},
        "upload": {"bandwidth": 6250000, "bytes": 40000000, "elapsed": 5000},
        "ping": {"latency": 20.5, "jitter": 1.2},
        "server": {"id": 1, "name": "X"},
        "interface": {"externalIp": "1.2.3.4", "internalIp": "10.0.0.2"}
    }"#;

    #[test]
    fn sample_payload_normalizes() {
        let record = normalize(SAMPLE).unwrap();
        assert_eq!(record.download_speed, 100.0);
        assert_eq!(record.upload_speed, 50.0);
        assert_eq!(record.ping_latency, 20.5);
        assert_eq!(record.jitter, 1.2);
        assert_eq!(record.test_duration, 15);
        assert_eq!(record.client_ip, "1.2.3.4");
        assert_eq!(record.user_agent, USER_AGENT);
        assert_eq!(record.server.id, Some(json!(1)));
        assert_eq!(record.server.name, Some(json!("X")));
        assert_eq!(record.server.host, None);
    }

    #[test]
    fn bandwidth_conversion_rounds_to_two_places() {
        assert_eq!(bps_to_mbps(12_500_000.0), 100.0);
        assert_eq!(bps_to_mbps(1_234_567.0), 9.88);
        assert_eq!(bps_to_mbps(0.0), 0.0);
    }

    #[test]
    fn duration_rounds_to_nearest_second() {
        assert_eq!(duration_secs(10_000, 5_000), 15);
        assert_eq!(duration_secs(10_400, 0), 10);
        assert_eq!(duration_secs(10_600, 0), 11);
        assert_eq!(duration_secs(0, 0), 0);
        assert_eq!(duration_secs(10_500, 0), 10);
        assert_eq!(duration_secs(6_000, 5_500), 12);
    }

    #[test]
    fn exact_halves_round_to_even() {
        let payload = r#"{"download":{"elapsed":10500},"upload":{"elapsed":0},"ping":{"latency":20.125,"jitter":0.625}}"#;
        let record = normalize(payload).unwrap();
        assert_eq!(record.test_duration, 10);
        assert_eq!(record.ping_latency, 20.12);
        assert_eq!(record.jitter, 0.62);
    }

    #[test]
    fn missing_or_null_server_yields_empty_descriptor() {
        let missing = normalize(r#"{"download": {"bandwidth": 1000}}"#).unwrap();
        let null = normalize(r#"{"server": null}"#).unwrap();
        assert!(missing.server.is_empty());
        assert!(null.server.is_empty());

        let stored: Value = serde_json::from_str(&null.server.to_json()).unwrap();
        assert!(stored.is_object());
    }

    #[test]
    fn empty_object_is_a_zeroed_record() {
        let record = normalize("{}").unwrap();
        assert_eq!(record, MeasurementRecord::default());
    }

    #[test]
    fn malformed_fields_fall_back_to_defaults() {
        let record = normalize(
            r#"{
                "download": {"bandwidth": "12500000", "elapsed": "oops"},
                "upload": "not an object",
                "ping": {"latency": -3.0, "jitter": [1]},
                "interface": {"externalIp": null}
            }"#,
        )
        .unwrap();
        assert_eq!(record.download_speed, 100.0);
        assert_eq!(record.upload_speed, 0.0);
        assert_eq!(record.ping_latency, 0.0);
        assert_eq!(record.jitter, 0.0);
        assert_eq!(record.test_duration, 0);
        assert_eq!(record.client_ip, "");
    }

    #[test]
    fn non_json_output_is_a_parse_failure() {
        assert!(matches!(
            normalize("[error] Configuration - Could not retrieve"),
            Err(MeasurementError::ParseFailed(_))
        ));
        assert!(matches!(normalize("[1, 2]"), Err(MeasurementError::ParseFailed(_))));
        assert!(matches!(normalize(""), Err(MeasurementError::ParseFailed(_))));
    }
}
