//! Persistence for QoS rules and measurement logs.
//!
//! - [`ConnectionManager`]: pool lifecycle (`start` / `stop` / `restart`).
//! - [`RuleRepo`] and [`LogRepo`]: rule and log stores.
//! - [`DbConfig`]: connection settings loaded from the environment.

pub mod config;
pub mod connection;
pub mod error;
pub mod models;
pub mod repositories;

pub use config::{ConfigError, DbConfig, SynchronousCommit};
pub use connection::ConnectionManager;
pub use repositories::{LogRepo, RuleRepo};

pub type DbPool = sqlx::PgPool;
