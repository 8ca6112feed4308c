//! SLA verification output.

use serde::{Deserialize, Serialize};

/// How the observed values in a report were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationMode {
    /// A single sample compared as-is.
    HardRealTime,
    /// The per-parameter mean of several samples.
    SoftRealTime,
}

impl VerificationMode {
    /// Select the mode from the number of supplied samples.
    ///
    /// Returns `None` for zero samples.
    pub fn for_sample_count(count: usize) -> Option<Self> {
        match count {
            0 => None,
            1 => Some(Self::HardRealTime),
            _ => Some(Self::SoftRealTime),
        }
    }
}

/// One parameter found in violation of its agreed threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub parameter: String,
    /// The value agreed in the rule.
    pub threshold: f64,
    /// The observed value, or the mean in soft real-time mode.
    pub observed: f64,
}

/// Result of verifying samples against a rule.
///
/// Violations are ordered as the profile declares its parameters. An empty
/// report means the samples are compliant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolationReport {
    pub mode: VerificationMode,
    pub violations: Vec<Violation>,
}

impl ViolationReport {
    pub fn new(mode: VerificationMode) -> Self {
        Self {
            mode,
            violations: Vec::new(),
        }
    }

    pub fn push(&mut self, parameter: impl Into<String>, threshold: f64, observed: f64) {
        self.violations.push(Violation {
            parameter: parameter.into(),
            threshold,
            observed,
        });
    }

    pub fn is_compliant(&self) -> bool {
        self.violations.is_empty()
    }

    /// Look up the violation recorded for `parameter`, if any.
    pub fn get(&self, parameter: &str) -> Option<&Violation> {
        self.violations.iter().find(|v| v.parameter == parameter)
    }
}
