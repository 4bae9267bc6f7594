/// 테이블 이름
pub const TABLE_NAME: &str = "speedtest_results";

/// 테이블 생성 쿼리
///
/// 인덱스도 테이블 정의에 포함해 `IF NOT EXISTS` 하나로 반복 실행이 안전하다.
pub const CREATE_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS speedtest_results (
        id INT AUTO_INCREMENT PRIMARY KEY,
        test_date DATETIME NOT NULL,
        download_speed DECIMAL(10,2),
        upload_speed DECIMAL(10,2),
        ping_latency DECIMAL(10,2),
        jitter DECIMAL(10,2),
        server_info TEXT,
        client_ip VARCHAR(45),
        user_agent TEXT,
        test_duration INT,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
        INDEX idx_speedtest_results_test_date (test_date)
    )
";

/// 측정 결과 저장 쿼리
pub const INSERT: &str = "
    INSERT INTO speedtest_results
        (test_date, download_speed, upload_speed, ping_latency, jitter,
         server_info, client_ip, user_agent, test_duration)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_statement_is_repeatable() {
        let ddl = CREATE_TABLE.trim_start();
        assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS speedtest_results"));
        // 별도 CREATE INDEX 는 두 번째 실행에서 중복 에러가 난다
        assert_eq!(CREATE_TABLE.matches("CREATE").count(), 1);
    }

    #[test]
    fn insert_binds_every_column() {
        assert_eq!(INSERT.matches('?').count(), 9);
    }
}
