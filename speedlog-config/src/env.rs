//! 환경변수 오버라이드
//!
//! 모든 값은 프로세스 시작 시 한 번만 읽는다. 조회 함수를 인자로 받아
//! 테스트에서 실제 프로세스 환경을 건드리지 않도록 한다.

use std::str::FromStr;

use speedlog_error::{Result, SpeedlogError};

use crate::setting::Settings;

pub const SCHEDULE_EVERY_MINUTES: &str = "SCHEDULE_EVERY_MINUTES";
pub const DB_HOST: &str = "MYSQL_HOST";
pub const DB_PORT: &str = "MYSQL_PORT";
pub const DB_NAME: &str = "OPENSPEEDTEST_DB_NAME";
pub const DB_USER: &str = "OPENSPEEDTEST_DB_USER";
pub const DB_PASSWORD: &str = "OPENSPEEDTEST_DB_PASSWORD";
pub const DB_CONNECT_TIMEOUT: &str = "DB_CONNECT_TIMEOUT_SECONDS";
pub const SPEEDTEST_BIN: &str = "SPEEDTEST_BIN";
pub const SPEEDTEST_TIMEOUT: &str = "SPEEDTEST_TIMEOUT_SECONDS";
pub const LOG_LEVEL: &str = "LOG_LEVEL";
pub const CONFIG_PATH: &str = "SPEEDLOG_CONFIG";

/// 환경변수 값을 설정에 덮어쓴다
pub fn apply_overrides<F>(settings: &mut Settings, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(minutes) = parse_var(&lookup, SCHEDULE_EVERY_MINUTES)? {
        settings.schedule.interval_minutes = minutes;
    }

    if let Some(host) = text_var(&lookup, DB_HOST) {
        settings.database.host = host;
    }
    if let Some(port) = parse_var(&lookup, DB_PORT)? {
        settings.database.port = port;
    }
    if let Some(name) = text_var(&lookup, DB_NAME) {
        settings.database.database = name;
    }
    if let Some(user) = text_var(&lookup, DB_USER) {
        settings.database.user = user;
    }
    // 비밀번호는 빈 문자열도 유효
    if let Some(password) = lookup(DB_PASSWORD) {
        settings.database.password = password;
    }
    if let Some(secs) = parse_var(&lookup, DB_CONNECT_TIMEOUT)? {
        settings.database.connect_timeout_seconds = secs;
    }

    if let Some(program) = text_var(&lookup, SPEEDTEST_BIN) {
        settings.runner.program = program;
    }
    if let Some(secs) = parse_var(&lookup, SPEEDTEST_TIMEOUT)? {
        settings.runner.timeout_seconds = secs;
    }

    if let Some(level) = text_var(&lookup, LOG_LEVEL) {
        settings.logging.level = level;
    }

    Ok(())
}

/// 비어있지 않은 문자열 값
fn text_var<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 숫자 값, 설정되어 있으나 파싱이 안 되면 에러
fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match text_var(lookup, key) {
        Some(raw) => raw.parse::<T>().map(Some).map_err(|e| {
            SpeedlogError::Config(format!("{key} 값이 올바르지 않습니다 ({raw}): {e}"))
        }),
        None => Ok(None),
    }
}
