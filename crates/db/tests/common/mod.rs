#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use sqlx::PgPool;

use qosmon_core::identity::SystemIdentity;
use qosmon_core::parameter_names::{PARAM_BANDWIDTH, PARAM_DELAY, PARAM_RESPONSE_TIME, PROFILE_FTTSE};
use qosmon_core::rule::{Log, ParameterSet, Rule};
use qosmon_db::{ConnectionManager, DbConfig, LogRepo, RuleRepo, SynchronousCommit};

/// Wrap the per-test pool in a started manager.
///
/// The test database has no standbys, so the local commit level is used.
pub fn manager(pool: PgPool) -> Arc<ConnectionManager> {
    Arc::new(ConnectionManager::from_pool(pool, SynchronousCommit::Local))
}

/// Settings that reach the same database as the per-test pool.
///
/// `DATABASE_URL` names the server; the database comes from the pool.
pub fn config_for(pool: &PgPool) -> DbConfig {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let mut config = DbConfig::new(url);
    config.database_name = pool.connect_options().get_database().map(str::to_string);
    config.max_connections = 2;
    config.synchronous_commit = SynchronousCommit::Local;
    config
}

pub fn repos(pool: PgPool) -> (RuleRepo, LogRepo) {
    let manager = manager(pool);
    (RuleRepo::new(Arc::clone(&manager)), LogRepo::new(manager))
}

pub fn provider() -> SystemIdentity {
    SystemIdentity::new("switch", "ftt")
}

pub fn consumer() -> SystemIdentity {
    SystemIdentity::new("node", "ftt")
}

pub fn params(bandwidth: f64, response_time: f64, delay: f64) -> ParameterSet {
    [
        (PARAM_BANDWIDTH.to_string(), bandwidth),
        (PARAM_RESPONSE_TIME.to_string(), response_time),
        (PARAM_DELAY.to_string(), delay),
    ]
    .into()
}

pub fn rule_for(provider: SystemIdentity, consumer: SystemIdentity, sample_window: u32) -> Rule {
    Rule {
        profile_type: PROFILE_FTTSE.to_string(),
        provider,
        consumer,
        thresholds: params(100.0, 50.0, 10.0),
        soft_real_time: true,
        sample_window,
    }
}

/// A log stamped `second` seconds after a fixed base time.
///
/// Whole seconds keep timestamps exact through the TIMESTAMPTZ round-trip.
pub fn log_at(second: u32, response_time: f64) -> Log {
    Log {
        profile_type: PROFILE_FTTSE.to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, second).unwrap(),
        parameters: params(100.0, response_time, 5.0),
    }
}
