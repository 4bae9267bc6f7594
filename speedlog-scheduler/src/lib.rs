pub mod scheduler;

pub use scheduler::{
    LoopState,
    LoopStats,
    SchedulerLoop,
    TickOutcome,
};
