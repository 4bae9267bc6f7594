pub mod setting;
pub mod schedule;
pub mod dbconfig;
pub mod runner;
pub mod logconfig;
pub mod env;

pub use setting::Settings;
pub use schedule::ScheduleConfig;
pub use dbconfig::DbConfig;
pub use runner::RunnerConfig;
pub use logconfig::LogConfig;
