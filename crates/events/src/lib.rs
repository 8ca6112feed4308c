//! QoS monitor event bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`QosEvent`]: events emitted by the monitor, currently SLA violations.

pub mod bus;

pub use bus::{EventBus, QosEvent};
