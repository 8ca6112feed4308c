//! Domain types and pure logic for the QoS monitor.
//!
//! - [`profile`]: parameter decoding and SLA verification per profile.
//! - [`rule`] / [`report`]: rules, logs and verification output.
//! - [`messages`]: inbound message contracts.

pub mod error;
pub mod identity;
pub mod messages;
pub mod parameter_names;
pub mod profile;
pub mod report;
pub mod rule;
pub mod types;
