pub mod normalize;
pub mod runner;

pub use normalize::normalize;
pub use runner::{Measure, SpeedtestRunner};
