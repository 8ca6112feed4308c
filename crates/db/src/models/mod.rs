//! Row models for the QoS tables.
//!
//! Rows carry database bookkeeping (`id`, `created_at`) and convert into the
//! plain domain types from `qosmon_core`.

pub mod log;
pub mod rule;
