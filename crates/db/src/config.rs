use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

/// Errors raised while reading database settings from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// `synchronous_commit` level applied to every rule and log write.
///
/// With a quorum `synchronous_standby_names` (`ANY k (...)`) on the server,
/// [`RemoteApply`](Self::RemoteApply) makes a commit return only after a
/// majority of replicas has applied it, so later reads observe
/// majority-acknowledged state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SynchronousCommit {
    Local,
    On,
    RemoteWrite,
    #[default]
    RemoteApply,
}

impl SynchronousCommit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::On => "on",
            Self::RemoteWrite => "remote_write",
            Self::RemoteApply => "remote_apply",
        }
    }

    /// Whether commits at this level wait on standbys listed in
    /// `synchronous_standby_names`.
    pub fn waits_for_standbys(self) -> bool {
        matches!(self, Self::RemoteWrite | Self::RemoteApply)
    }
}

impl fmt::Display for SynchronousCommit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SynchronousCommit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "on" => Ok(Self::On),
            "remote_write" => Ok(Self::RemoteWrite),
            "remote_apply" => Ok(Self::RemoteApply),
            other => Err(other.to_string()),
        }
    }
}

/// Database connection settings.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Postgres connection string.
    pub database_url: String,
    /// Overrides the database named in the connection string.
    pub database_name: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub synchronous_commit: SynchronousCommit,
    /// How long a commit may wait for replication acknowledgement.
    pub write_ack_timeout_secs: u64,
}

/// Default for [`DbConfig::write_ack_timeout_secs`].
pub const DEFAULT_WRITE_ACK_TIMEOUT_SECS: u64 = 10;

impl DbConfig {
    /// Settings for `database_url` with all other fields at their defaults.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            database_name: None,
            max_connections: 20,
            acquire_timeout_secs: 30,
            synchronous_commit: SynchronousCommit::default(),
            write_ack_timeout_secs: DEFAULT_WRITE_ACK_TIMEOUT_SECS,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Env Var                     | Default        |
    /// |-----------------------------|----------------|
    /// | `DATABASE_URL`              | (required)     |
    /// | `DATABASE_NAME`             | from URL       |
    /// | `DB_MAX_CONNECTIONS`        | `20`           |
    /// | `DB_ACQUIRE_TIMEOUT_SECS`   | `30`           |
    /// | `DB_SYNCHRONOUS_COMMIT`     | `remote_apply` |
    /// | `DB_WRITE_ACK_TIMEOUT_SECS` | `10`           |
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let mut config = Self::new(database_url);
        config.database_name = std::env::var("DATABASE_NAME")
            .ok()
            .filter(|s| !s.trim().is_empty());

        if let Some(value) = env_parse("DB_MAX_CONNECTIONS")? {
            config.max_connections = value;
        }
        if let Some(value) = env_parse("DB_ACQUIRE_TIMEOUT_SECS")? {
            config.acquire_timeout_secs = value;
        }
        if let Some(value) = env_parse("DB_SYNCHRONOUS_COMMIT")? {
            config.synchronous_commit = value;
        }
        if let Some(value) = env_parse("DB_WRITE_ACK_TIMEOUT_SECS")? {
            config.write_ack_timeout_secs = value;
        }

        Ok(config)
    }

    pub(crate) fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        let options = PgConnectOptions::from_str(&self.database_url)?;
        Ok(match &self.database_name {
            Some(name) => options.database(name),
            None => options,
        })
    }

    pub fn write_ack_timeout(&self) -> Duration {
        Duration::from_secs(self.write_ack_timeout_secs)
    }

    pub(crate) fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
    }
}

fn env_parse<T: FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synchronous_commit_defaults_to_remote_apply() {
        assert_eq!(SynchronousCommit::default(), SynchronousCommit::RemoteApply);
        assert_eq!(DbConfig::new("postgres://x").synchronous_commit.as_str(), "remote_apply");
    }

    #[test]
    fn only_remote_levels_wait_for_standbys() {
        assert!(SynchronousCommit::RemoteApply.waits_for_standbys());
        assert!(SynchronousCommit::RemoteWrite.waits_for_standbys());
        assert!(!SynchronousCommit::On.waits_for_standbys());
        assert!(!SynchronousCommit::Local.waits_for_standbys());
    }

    #[test]
    fn write_ack_timeout_has_a_default() {
        let config = DbConfig::new("postgres://x");
        assert_eq!(config.write_ack_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn synchronous_commit_parses_case_insensitively() {
        assert_eq!(
            "REMOTE_WRITE".parse::<SynchronousCommit>(),
            Ok(SynchronousCommit::RemoteWrite)
        );
        assert_eq!(
            " local ".parse::<SynchronousCommit>(),
            Ok(SynchronousCommit::Local)
        );
        assert!("majority".parse::<SynchronousCommit>().is_err());
    }

    #[test]
    fn database_name_overrides_url() {
        let mut config = DbConfig::new("postgres://user:pw@localhost:5432/from_url");
        assert_eq!(config.connect_options().unwrap().get_database(), Some("from_url"));

        config.database_name = Some("qos".into());
        assert_eq!(config.connect_options().unwrap().get_database(), Some("qos"));
    }

    #[test]
    fn malformed_url_is_rejected() {
        assert!(DbConfig::new("not a url").connect_options().is_err());
    }
}
