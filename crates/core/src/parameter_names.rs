//! Well-known QoS profile identifiers and measurement parameter names.
//!
//! These are the keys used in rule thresholds, log parameters and the
//! inbound message contracts.

/// Profile identifier for the FTT-SE (Flexible Time-Triggered Switched
/// Ethernet) strategy.
pub const PROFILE_FTTSE: &str = "FTTSE";

/// Throughput; the threshold is a guaranteed minimum.
pub const PARAM_BANDWIDTH: &str = "bandwidth";

/// Request/response latency; the threshold is a guaranteed maximum.
pub const PARAM_RESPONSE_TIME: &str = "responseTime";

/// Transmission delay; the threshold is a guaranteed maximum.
pub const PARAM_DELAY: &str = "delay";
