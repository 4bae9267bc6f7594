use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use tokio::process::Command;

use speedlog_config::RunnerConfig;
use speedlog_error::MeasurementError;
use speedlog_model::MeasurementRecord;

use crate::normalize::normalize;

/// 라이선스/GDPR 동의를 강제하고 JSON 출력을 요청하는 인자
pub const SPEEDTEST_ARGS: [&str; 3] = ["--accept-license", "--accept-gdpr", "--format=json"];

/// 진단 메시지에 담는 출력 최대 길이
const MAX_DETAIL_LEN: usize = 512;

/// 측정 1회 실행
#[async_trait]
pub trait Measure: Send + Sync {
    async fn run(&self) -> Result<MeasurementRecord, MeasurementError>;
}

/// Ookla speedtest CLI 실행기
#[derive(Debug, Clone)]
pub struct SpeedtestRunner {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl SpeedtestRunner {
    pub fn new(config: &RunnerConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: SPEEDTEST_ARGS.iter().map(|s| s.to_string()).collect(),
            timeout: config.timeout(),
        }
    }

    /// 임의 명령으로 실행기 생성
    pub fn with_command<I, S>(program: impl Into<String>, args: I, timeout: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 도구를 실행해 stdout을 반환
    ///
    /// 제한 시간을 넘기면 future가 drop되면서 자식 프로세스도 kill된다.
    async fn execute(&self) -> Result<String, MeasurementError> {
        debug!("실행: {} {}", self.program, self.args.join(" "));

        let child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| MeasurementError::ToolFailed {
                exit_code: None,
                detail: format!("{} 실행 불가: {}", self.program, e),
            })?;

        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(MeasurementError::ToolFailed {
                    exit_code: None,
                    detail: format!("프로세스 대기 실패: {}", e),
                });
            }
            Err(_) => return Err(MeasurementError::Timeout(self.timeout)),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            // Ookla CLI는 일부 에러를 stdout으로 출력함
            let detail = if stderr.trim().is_empty() { stdout } else { stderr };
            return Err(MeasurementError::ToolFailed {
                exit_code: output.status.code(),
                detail: truncate(detail.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl Measure for SpeedtestRunner {
    async fn run(&self) -> Result<MeasurementRecord, MeasurementError> {
        info!("speedtest 시작 (Ookla CLI)");

        let stdout = self.execute().await?;
        let record = normalize(&stdout)?;

        info!(
            "speedtest 완료 - 다운로드: {} Mbps, 업로드: {} Mbps, 핑: {} ms",
            record.download_speed, record.upload_speed, record.ping_latency
        );

        Ok(record)
    }
}

fn truncate(text: &str) -> String {
    match text.char_indices().nth(MAX_DETAIL_LEN) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell(script: &str, timeout: Duration) -> SpeedtestRunner {
        SpeedtestRunner::with_command("sh", ["-c", script], timeout)
    }

    #[test]
    fn default_command_forces_consent_and_json() {
        let runner = SpeedtestRunner::new(&RunnerConfig::default());
        assert_eq!(runner.program, "speedtest");
        assert_eq!(runner.args, SPEEDTEST_ARGS);
        assert_eq!(runner.timeout(), Duration::from_secs(300));
    }

    #[tokio::test]
    async fn successful_run_is_normalized() {
        let runner = shell(
            r#"echo '{"download":{"bandwidth":12500000,"elapsed":10000},"upload":{"bandwidth":6250000,"elapsed":5000},"ping":{"latency":20.5,"jitter":1.2},"server":{"id":1,"name":"X"},"interface":{"externalIp":"1.2.3.4"}}'"#,
            Duration::from_secs(10),
        );
        let record = runner.run().await.unwrap();
        assert_eq!(record.download_speed, 100.0);
        assert_eq!(record.upload_speed, 50.0);
        assert_eq!(record.test_duration, 15);
        assert_eq!(record.client_ip, "1.2.3.4");
    }

    #[tokio::test]
    async fn non_zero_exit_carries_code_and_stderr() {
        let runner = shell("echo 'license not accepted' >&2; exit 3", Duration::from_secs(10));
        match runner.run().await {
            Err(MeasurementError::ToolFailed { exit_code, detail }) => {
                assert_eq!(exit_code, Some(3));
                assert_eq!(detail, "license not accepted");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_binary_is_a_tool_failure() {
        let runner = SpeedtestRunner::with_command(
            "/nonexistent/speedtest",
            SPEEDTEST_ARGS,
            Duration::from_secs(1),
        );
        assert!(matches!(
            runner.run().await,
            Err(MeasurementError::ToolFailed { exit_code: None, .. })
        ));
    }

    #[tokio::test]
    async fn slow_tool_times_out() {
        let runner = shell("exec sleep 30", Duration::from_millis(200));
        let started = std::time::Instant::now();
        let result = runner.run().await;
        assert_eq!(result, Err(MeasurementError::Timeout(Duration::from_millis(200))));
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn garbage_output_is_a_parse_failure() {
        let runner = shell("echo 'Speedtest by Ookla'", Duration::from_secs(10));
        assert!(matches!(runner.run().await, Err(MeasurementError::ParseFailed(_))));
    }

    #[test]
    fn long_diagnostics_are_truncated() {
        let long = "x".repeat(MAX_DETAIL_LEN + 10);
        assert_eq!(truncate(&long).len(), MAX_DETAIL_LEN + 3);
        assert_eq!(truncate("short"), "short");
    }
}
