//! QoS profiles: parameter decoding and SLA verification.
//!
//! A profile is a named set of required parameters, each with a direction
//! telling whether its threshold is a guaranteed minimum or maximum. The
//! decoding and verification logic is shared by every profile through the
//! provided methods of [`QosProfile`]; adding a profile only means declaring
//! its parameter table and registering it in a [`ProfileRegistry`].
//!
//! All logic in this module is pure (no DB access).

pub mod fttse;
pub mod registry;

use std::collections::HashMap;

use crate::error::QosError;
use crate::report::{VerificationMode, ViolationReport};
use crate::rule::{ParameterSet, Rule};

pub use fttse::Fttse;
pub use registry::ProfileRegistry;

/// Which side of a threshold is compliant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Observed values below the threshold are violations.
    Minimum,
    /// Observed values above the threshold are violations.
    Maximum,
}

impl Bound {
    /// Whether `observed` breaks `threshold`. Equality never does.
    pub fn is_violated(self, threshold: f64, observed: f64) -> bool {
        match self {
            Bound::Minimum => observed < threshold,
            Bound::Maximum => observed > threshold,
        }
    }
}

/// One required parameter of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub bound: Bound,
}

/// A verification strategy for one profile type.
pub trait QosProfile: Send + Sync {
    /// Profile identifier, as carried in `profileType` fields.
    fn name(&self) -> &str;

    /// Required parameters in report order.
    fn parameters(&self) -> &[ParameterSpec];

    /// Extract the profile's parameters from an untyped measurement map.
    ///
    /// Unknown keys are ignored. Values are trimmed before parsing and must
    /// be finite.
    fn decode(&self, raw: &HashMap<String, String>) -> Result<ParameterSet, QosError> {
        self.parameters()
            .iter()
            .map(|spec| {
                let value = raw
                    .get(spec.name)
                    .ok_or_else(|| QosError::MissingParameter(spec.name.to_string()))?;
                let parsed = parse_value(spec.name, value)?;
                Ok((spec.name.to_string(), parsed))
            })
            .collect()
    }

    /// Compare samples against the rule's thresholds.
    ///
    /// One sample is checked directly (hard real-time); several are averaged
    /// per parameter first (soft real-time). Parameters the rule sets no
    /// threshold for are skipped.
    fn verify(&self, rule: &Rule, samples: &[ParameterSet]) -> Result<ViolationReport, QosError> {
        let mode = VerificationMode::for_sample_count(samples.len()).ok_or(QosError::NoSamples)?;
        let mut report = ViolationReport::new(mode);

        for spec in self.parameters() {
            let Some(&threshold) = rule.thresholds.get(spec.name) else {
                continue;
            };
            let observed = match mode {
                VerificationMode::HardRealTime => sample_value(&samples[0], spec.name)?,
                VerificationMode::SoftRealTime => mean(samples, spec.name)?,
            };
            if spec.bound.is_violated(threshold, observed) {
                report.push(spec.name, threshold, observed);
            }
        }

        Ok(report)
    }
}

fn parse_value(name: &str, value: &str) -> Result<f64, QosError> {
    let invalid = || QosError::InvalidParameter {
        name: name.to_string(),
        value: value.to_string(),
    };
    let parsed: f64 = value.trim().parse().map_err(|_| invalid())?;
    if !parsed.is_finite() {
        return Err(invalid());
    }
    Ok(parsed)
}

fn sample_value(sample: &ParameterSet, name: &str) -> Result<f64, QosError> {
    sample
        .get(name)
        .copied()
        .ok_or_else(|| QosError::MissingParameter(name.to_string()))
}

fn mean(samples: &[ParameterSet], name: &str) -> Result<f64, QosError> {
    let mut sum = 0.0;
    for sample in samples {
        sum += sample_value(sample, name)?;
    }
    Ok(sum / samples.len() as f64)
}
