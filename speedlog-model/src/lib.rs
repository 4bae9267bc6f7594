pub mod record;

pub use record::{MeasurementRecord, ServerInfo, USER_AGENT};
