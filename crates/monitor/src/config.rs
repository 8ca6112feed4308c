use qosmon_core::rule::DEFAULT_SAMPLE_WINDOW;
use qosmon_db::{ConfigError, DbConfig};
use qosmon_events::bus::DEFAULT_CAPACITY;

/// Monitor configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Database connection settings.
    pub db: DbConfig,
    /// Soft real-time window for rules registered without one.
    pub default_sample_window: u32,
    /// Capacity of the violation event channel.
    pub event_capacity: usize,
}

impl MonitorConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default |
    /// |-----------------------------|---------|
    /// | `QOS_DEFAULT_SAMPLE_WINDOW` | `10`    |
    /// | `QOS_EVENT_CAPACITY`        | `1024`  |
    ///
    /// Database variables are documented on [`DbConfig::from_env`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let db = DbConfig::from_env()?;

        let default_sample_window = match std::env::var("QOS_DEFAULT_SAMPLE_WINDOW") {
            Ok(value) => match value.trim().parse::<u32>() {
                Ok(window) if window > 0 => window,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "QOS_DEFAULT_SAMPLE_WINDOW",
                        value,
                    })
                }
            },
            Err(_) => DEFAULT_SAMPLE_WINDOW,
        };

        let event_capacity = match std::env::var("QOS_EVENT_CAPACITY") {
            Ok(value) => match value.trim().parse::<usize>() {
                Ok(capacity) if capacity > 0 => capacity,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "QOS_EVENT_CAPACITY",
                        value,
                    })
                }
            },
            Err(_) => DEFAULT_CAPACITY,
        };

        Ok(Self {
            db,
            default_sample_window,
            event_capacity,
        })
    }
}
