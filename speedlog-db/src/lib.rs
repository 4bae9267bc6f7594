pub mod connection;
pub mod store;
pub mod sql;

pub use connection::ScopedConnection;

pub use store::{
    MySqlResultStore,
    ResultStore,
};

pub use sql::speedtest_results;
