//! Provider / consumer system identities.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A `(name, group)` pair identifying one side of a service interaction.
///
/// Equality is exact and case-sensitive on both fields. The fields are
/// private so an identity cannot change after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemIdentity {
    #[serde(alias = "systemName")]
    name: String,
    #[serde(alias = "systemGroup")]
    group: String,
}

impl SystemIdentity {
    pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> &str {
        &self.group
    }
}

impl fmt::Display for SystemIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group, self.name)
    }
}
