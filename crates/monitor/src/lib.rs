//! QoS monitor service.
//!
//! - [`QosMonitor`]: registers rules, ingests logs and verifies SLAs.
//! - [`ViolationLogger`]: background subscriber for violation events.
//! - [`MonitorConfig`]: service settings loaded from the environment.

pub mod config;
pub mod service;
pub mod violations;

pub use config::MonitorConfig;
pub use service::QosMonitor;
pub use violations::ViolationLogger;
