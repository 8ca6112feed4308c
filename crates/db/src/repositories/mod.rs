//! Repository layer.
//!
//! Each repository holds an `Arc<ConnectionManager>` and fetches the pool
//! from it per operation, so a restarted manager is picked up immediately.

pub mod log_repo;
pub mod rule_repo;

pub use log_repo::LogRepo;
pub use rule_repo::RuleRepo;
