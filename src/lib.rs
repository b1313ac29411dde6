pub mod config;
pub mod error;
pub mod execution;
pub mod logging;
pub mod schema;
pub mod setup;
pub mod state;
pub mod store;
