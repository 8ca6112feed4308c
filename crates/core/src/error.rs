use crate::identity::SystemIdentity;

#[derive(Debug, thiserror::Error)]
pub enum QosError {
    #[error("Parameter missing: {0}")]
    MissingParameter(String),

    #[error("Value of parameter {name} is not parsable: {value:?}")]
    InvalidParameter { name: String, value: String },

    #[error("Unknown QoS profile: {0}")]
    UnknownProfile(String),

    #[error("Verification requires at least one sample")]
    NoSamples,

    #[error("No rule registered for provider {provider} and consumer {consumer}")]
    RuleNotFound {
        provider: SystemIdentity,
        consumer: SystemIdentity,
    },

    #[error("Log profile {log} does not match rule profile {rule}")]
    ProfileMismatch { rule: String, log: String },

    #[error("Write conflict: {0}")]
    WriteConflict(String),

    #[error("Connection failure: {0}")]
    ConnectionFailure(String),

    #[error("Connection manager has not been started")]
    NotStarted,

    #[error("Storage error: {0}")]
    Storage(String),
}
