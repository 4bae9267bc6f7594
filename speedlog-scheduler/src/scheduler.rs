use std::future::Future;

use chrono::Local;
use log::{debug, error, info, warn};
use tokio::time::{Instant, MissedTickBehavior};

use speedlog_config::ScheduleConfig;
use speedlog_db::ResultStore;
use speedlog_error::MeasurementError;
use speedlog_runner::Measure;

/// 루프 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// 다음 측정 대기
    Idle,
    /// 측정, 저장 진행 중
    Running,
}

/// 측정 1회 결과
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Saved,
    SaveFailed,
    MeasurementFailed(MeasurementError),
}

/// 종료 시점까지의 측정 집계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// 끝까지 실행된 측정 수
    pub ticks: u64,
    pub saved: u64,
    pub failed: u64,
}

/// 주기 측정 루프
///
/// 시작 즉시 1회 측정하고 이후 `interval` 마다 측정한다. 측정은 겹치지 않으며
/// 실패해도 일정은 바뀌지 않는다.
pub struct SchedulerLoop<M, S> {
    runner: M,
    store: S,
    schedule: ScheduleConfig,
    state: LoopState,
    stats: LoopStats,
}

impl<M, S> SchedulerLoop<M, S>
where
    M: Measure,
    S: ResultStore,
{
    pub fn new(runner: M, store: S, schedule: &ScheduleConfig) -> Self {
        Self {
            runner,
            store,
            schedule: schedule.clone(),
            state: LoopState::Idle,
            stats: LoopStats::default(),
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stats(&self) -> LoopStats {
        self.stats
    }

    /// 측정 후 성공하면 저장
    pub async fn tick(&mut self) -> TickOutcome {
        self.state = LoopState::Running;
        info!("예약된 speedtest 실행");

        let outcome = match self.runner.run().await {
            Ok(record) => {
                if self.store.insert(&record).await {
                    TickOutcome::Saved
                } else {
                    TickOutcome::SaveFailed
                }
            }
            Err(e) => {
                error!("speedtest 결과를 얻지 못함: {}", e);
                TickOutcome::MeasurementFailed(e)
            }
        };

        self.stats.ticks += 1;
        match outcome {
            TickOutcome::Saved => self.stats.saved += 1,
            _ => self.stats.failed += 1,
        }
        self.state = LoopState::Idle;

        outcome
    }

    /// `shutdown` 이 끝날 때까지 실행
    ///
    /// 진행 중인 측정도 중단되며 측정 도구 프로세스는 함께 종료된다.
    pub async fn run_until<F>(&mut self, shutdown: F) -> LoopStats
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let interval = self.schedule.interval();
        let poll_period = self.schedule.poll_period();
        info!("speedtest 스케줄러 시작, {}분 간격으로 측정", self.schedule.interval_minutes);

        tokio::select! {
            _ = self.store.ensure_schema() => {}
            _ = &mut shutdown => return self.stop(),
        }

        // 첫 예약 시각은 초기 측정 전에 정해진다
        let mut next_due = Instant::now() + interval;

        info!("초기 speedtest 실행");
        tokio::select! {
            _ = self.tick() => {}
            _ = &mut shutdown => return self.stop(),
        }
        log_next_due(next_due);

        let mut ticker = tokio::time::interval(poll_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = &mut shutdown => break,
            }

            if Instant::now() < next_due {
                continue;
            }

            let started = Instant::now();
            tokio::select! {
                _ = self.tick() => {}
                _ = &mut shutdown => break,
            }

            let took = started.elapsed();
            if took > interval {
                warn!(
                    "측정이 간격보다 오래 걸림 ({}초), 밀린 측정은 건너뜀",
                    took.as_secs()
                );
            }

            next_due = Instant::now() + interval;
            log_next_due(next_due);
        }

        self.stop()
    }

    fn stop(&mut self) -> LoopStats {
        if self.state == LoopState::Running {
            warn!("진행 중인 측정을 중단함");
            self.state = LoopState::Idle;
        }
        info!(
            "스케줄러 종료 (측정 {}회, 저장 {}회, 실패 {}회)",
            self.stats.ticks, self.stats.saved, self.stats.failed
        );
        self.stats
    }
}

fn log_next_due(next_due: Instant) {
    let wait = next_due.saturating_duration_since(Instant::now());
    match chrono::Duration::from_std(wait) {
        Ok(delta) => info!(
            "다음 측정 예정: {}",
            (Local::now() + delta).format("%Y-%m-%d %H:%M:%S")
        ),
        Err(_) => debug!("다음 측정까지 {}초", wait.as_secs()),
    }
}
