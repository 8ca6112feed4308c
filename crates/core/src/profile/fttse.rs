//! The FTT-SE verification strategy.

use super::{Bound, ParameterSpec, QosProfile};
use crate::parameter_names::{PARAM_BANDWIDTH, PARAM_DELAY, PARAM_RESPONSE_TIME, PROFILE_FTTSE};

const PARAMETERS: &[ParameterSpec] = &[
    ParameterSpec {
        name: PARAM_BANDWIDTH,
        bound: Bound::Minimum,
    },
    ParameterSpec {
        name: PARAM_RESPONSE_TIME,
        bound: Bound::Maximum,
    },
    ParameterSpec {
        name: PARAM_DELAY,
        bound: Bound::Maximum,
    },
];

/// Bandwidth is a guaranteed minimum; response time and delay are
/// guaranteed maxima.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fttse;

impl QosProfile for Fttse {
    fn name(&self) -> &str {
        PROFILE_FTTSE
    }

    fn parameters(&self) -> &[ParameterSpec] {
        PARAMETERS
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;

    use super::*;
    use crate::error::QosError;
    use crate::identity::SystemIdentity;
    use crate::report::VerificationMode;
    use crate::rule::{ParameterSet, Rule};

    fn params(bandwidth: f64, response_time: f64, delay: f64) -> ParameterSet {
        [
            (PARAM_BANDWIDTH.to_string(), bandwidth),
            (PARAM_RESPONSE_TIME.to_string(), response_time),
            (PARAM_DELAY.to_string(), delay),
        ]
        .into()
    }

    fn rule(thresholds: ParameterSet) -> Rule {
        Rule {
            profile_type: PROFILE_FTTSE.into(),
            provider: SystemIdentity::new("switch", "ftt"),
            consumer: SystemIdentity::new("node", "ftt"),
            thresholds,
            soft_real_time: false,
            sample_window: 10,
        }
    }

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // -- decode ------------------------------------------------------------

    #[test]
    fn decode_keeps_only_required_parameters() {
        let set = Fttse
            .decode(&raw(&[
                ("bandwidth", "100"),
                ("responseTime", "50.5"),
                ("delay", "10"),
                ("jitter", "3"),
            ]))
            .unwrap();

        assert_eq!(set, params(100.0, 50.5, 10.0));
        assert!(!set.contains_key("jitter"));
    }

    #[test]
    fn decode_missing_delay_fails() {
        let err = Fttse
            .decode(&raw(&[("bandwidth", "100"), ("responseTime", "50")]))
            .unwrap_err();
        assert_matches!(err, QosError::MissingParameter(name) if name == "delay");
    }

    #[test]
    fn decode_non_numeric_response_time_fails() {
        let err = Fttse
            .decode(&raw(&[
                ("bandwidth", "100"),
                ("responseTime", "abc"),
                ("delay", "10"),
            ]))
            .unwrap_err();
        assert_matches!(
            err,
            QosError::InvalidParameter { name, value } if name == "responseTime" && value == "abc"
        );
    }

    // -- hard real-time ----------------------------------------------------

    #[test]
    fn hard_real_time_flags_low_bandwidth_only() {
        let rule = rule(params(100.0, 50.0, 10.0));
        let report = Fttse.verify(&rule, &[params(80.0, 50.0, 10.0)]).unwrap();

        assert_eq!(report.mode, VerificationMode::HardRealTime);
        assert_eq!(report.violations.len(), 1);
        let violation = &report.violations[0];
        assert_eq!(violation.parameter, PARAM_BANDWIDTH);
        assert_eq!(violation.threshold, 100.0);
        assert_eq!(violation.observed, 80.0);
    }

    #[test]
    fn hard_real_time_compliant_sample_yields_empty_report() {
        let rule = rule(params(100.0, 50.0, 10.0));
        let report = Fttse.verify(&rule, &[params(120.0, 20.0, 2.0)]).unwrap();
        assert!(report.is_compliant());
    }

    #[test]
    fn hard_real_time_flags_latency_and_delay_above_maximum() {
        let rule = rule(params(100.0, 50.0, 10.0));
        let report = Fttse.verify(&rule, &[params(100.0, 51.0, 12.0)]).unwrap();

        assert_eq!(report.violations.len(), 2);
        assert_eq!(report.violations[0].parameter, PARAM_RESPONSE_TIME);
        assert_eq!(report.violations[1].parameter, PARAM_DELAY);
        assert_eq!(report.violations[1].observed, 12.0);
    }

    // -- soft real-time ----------------------------------------------------

    #[test]
    fn soft_real_time_compares_mean() {
        let rule = rule([(PARAM_RESPONSE_TIME.to_string(), 50.0)].into());
        let samples = vec![
            params(100.0, 40.0, 1.0),
            params(100.0, 60.0, 1.0),
            params(100.0, 60.0, 1.0),
        ];

        let report = Fttse.verify(&rule, &samples).unwrap();

        assert_eq!(report.mode, VerificationMode::SoftRealTime);
        assert_eq!(report.violations.len(), 1);
        let violation = report.get(PARAM_RESPONSE_TIME).unwrap();
        assert_eq!(violation.threshold, 50.0);
        assert!((violation.observed - 53.333_333).abs() < 1e-3);
    }

    #[test]
    fn soft_real_time_delay_reports_its_own_mean() {
        let rule = rule(params(0.0, 1000.0, 10.0));
        let samples = vec![params(100.0, 40.0, 8.0), params(100.0, 60.0, 16.0)];

        let report = Fttse.verify(&rule, &samples).unwrap();

        assert_eq!(report.violations.len(), 1);
        let violation = report.get(PARAM_DELAY).unwrap();
        assert_eq!(violation.observed, 12.0);
    }

    #[test]
    fn soft_real_time_mean_can_hide_single_outlier() {
        let rule = rule(params(100.0, 50.0, 10.0));
        let samples = vec![params(60.0, 10.0, 1.0), params(150.0, 10.0, 1.0)];

        let report = Fttse.verify(&rule, &samples).unwrap();
        assert!(report.is_compliant());
    }

    #[test]
    fn verify_without_samples_fails() {
        let rule = rule(params(100.0, 50.0, 10.0));
        let err = Fttse.verify(&rule, &[]).unwrap_err();
        assert_matches!(err, QosError::NoSamples);
    }
}
