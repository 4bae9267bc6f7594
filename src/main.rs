use std::future::Future;
use std::process::ExitCode;

use log::{error, info};

use speedlog_config::{LogConfig, Settings};
use speedlog_db::MySqlResultStore;
use speedlog_error::Result;
use speedlog_logging::init_logger;
use speedlog_runner::SpeedtestRunner;
use speedlog_scheduler::SchedulerLoop;

/// 종료 시그널 등록
///
/// SIGINT(Ctrl+C), SIGTERM 중 먼저 온 것에서 완료되는 future를 반환한다.
#[cfg(unix)]
fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    Ok(async move {
        tokio::select! {
            _ = sigint.recv() => info!("SIGINT 수신"),
            _ = sigterm.recv() => info!("SIGTERM 수신"),
        }
    })
}

#[cfg(not(unix))]
fn shutdown_signal() -> Result<impl Future<Output = ()>> {
    Ok(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl+C 수신");
        }
    })
}

/// 스케줄러 실행, 시그널로 종료되면 Ok
async fn run(settings: Settings) -> Result<()> {
    match &settings.source {
        Some(path) => info!("설정파일 로드: {}", path.display()),
        None => info!("기본설정 및 환경변수 사용"),
    }
    info!("DB 대상: {}", settings.database.describe());

    let shutdown = shutdown_signal()?;

    let runner = SpeedtestRunner::new(&settings.runner);
    let store = MySqlResultStore::new(&settings.database);
    let mut scheduler = SchedulerLoop::new(runner, store, &settings.schedule);

    scheduler.run_until(shutdown).await;

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // 통합 설정 로드
    let settings = match Settings::new() {
        Ok(settings) => settings,
        Err(e) => {
            // 로그 레벨을 알 수 없으므로 기본 로거로 출력
            let _ = init_logger(&LogConfig::default());
            error!("설정 로드 실패: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // 로거 세팅
    if let Err(e) = init_logger(&settings.logging) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    info!("speedlog 시작 (Ookla CLI)");

    match run(settings).await {
        Ok(()) => {
            info!("사용자에 의해 스케줄러 중지");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("스케줄러 오류: {}", e);
            ExitCode::FAILURE
        }
    }
}
