use serde::{Deserialize, Serialize};

/// 데이터베이스 연결 설정
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    /// 연결 시도 타임아웃(초)
    pub connect_timeout_seconds: u64,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "host.docker.internal".to_string(),
            port: 3306,
            database: "openspeedtest".to_string(),
            user: "openspeedtest_user".to_string(),
            password: "OpenSpeedTest123".to_string(),
            connect_timeout_seconds: 30,
        }
    }
}

impl DbConfig {
    /// 로그 출력용 접속 대상 (비밀번호 제외)
    pub fn describe(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.database)
    }
}
