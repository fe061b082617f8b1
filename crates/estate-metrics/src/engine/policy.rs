use super::banding::BandError;
use super::energy::EnergyPolicy;
use super::mobility::MobilityTable;
use super::mortgage::EscrowPolicy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Every tunable constant the engine reads, in one table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricsPolicy {
    #[serde(default)]
    pub escrow: EscrowPolicy,
    #[serde(default)]
    pub energy: EnergyPolicy,
    #[serde(default)]
    pub mobility: MobilityTable,
}

#[derive(Debug)]
pub enum PolicyError {
    Parse(serde_json::Error),
    Bands(BandError),
    EscrowRate { name: &'static str, value: f64 },
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyError::Parse(err) => write!(f, "policy document is not valid JSON: {err}"),
            PolicyError::Bands(err) => write!(f, "invalid band table: {err}"),
            PolicyError::EscrowRate { name, value } => {
                write!(f, "{name} must be a fraction between 0 and 1 (got {value})")
            }
        }
    }
}

impl std::error::Error for PolicyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PolicyError::Parse(err) => Some(err),
            PolicyError::Bands(err) => Some(err),
            PolicyError::EscrowRate { .. } => None,
        }
    }
}

impl From<serde_json::Error> for PolicyError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl From<BandError> for PolicyError {
    fn from(value: BandError) -> Self {
        Self::Bands(value)
    }
}

pub(crate) fn check_rate(name: &'static str, value: f64) -> Result<f64, PolicyError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(PolicyError::EscrowRate { name, value })
    }
}

impl MetricsPolicy {
    /// Checks tables loaded from a policy file and normalizes mobility keys.
    pub fn validated(self) -> Result<Self, PolicyError> {
        check_rate("property_tax_rate", self.escrow.property_tax_rate)?;
        check_rate("insurance_rate", self.escrow.insurance_rate)?;
        self.energy.validate()?;
        let mobility = self.mobility.validate()?;

        Ok(Self {
            escrow: self.escrow,
            energy: self.energy,
            mobility,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, PolicyError> {
        let policy: Self = serde_json::from_str(raw)?;
        policy.validated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::banding::BandDirection;
    use crate::engine::energy::EnergyGrade;

    #[test]
    fn empty_document_yields_defaults() {
        let policy = MetricsPolicy::from_json("{}").expect("valid");
        assert_eq!(policy, MetricsPolicy::default());
    }

    #[test]
    fn partial_document_overrides_only_named_sections() {
        let raw = r#"{ "escrow": { "property_tax_rate": 0.02, "insurance_rate": 0.004 } }"#;
        let policy = MetricsPolicy::from_json(raw).expect("valid");
        assert_eq!(policy.escrow.property_tax_rate, 0.02);
        assert_eq!(
            policy.energy.grade_consumption(150.0),
            Ok(EnergyGrade::C)
        );
    }

    #[test]
    fn out_of_range_escrow_rate_is_rejected() {
        let raw = r#"{ "escrow": { "property_tax_rate": 1.5, "insurance_rate": 0.003 } }"#;
        let err = MetricsPolicy::from_json(raw).unwrap_err();
        assert!(matches!(
            err,
            PolicyError::EscrowRate {
                name: "property_tax_rate",
                ..
            }
        ));
    }

    #[test]
    fn overlapping_energy_bands_are_rejected() {
        let raw = r#"{
            "energy": {
                "consumption": {
                    "direction": "at_most",
                    "bands": [
                        { "threshold": 90.0, "label": "A" },
                        { "threshold": 50.0, "label": "B" }
                    ],
                    "fallback": "G"
                },
                "emissions": {
                    "direction": "at_most",
                    "bands": [{ "threshold": 5.0, "label": "A" }],
                    "fallback": "G"
                }
            }
        }"#;
        let err = MetricsPolicy::from_json(raw).unwrap_err();
        assert!(matches!(err, PolicyError::Bands(_)));
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = MetricsPolicy::from_json("{ escrow: ").unwrap_err();
        assert!(matches!(err, PolicyError::Parse(_)));
    }

    #[test]
    fn energy_labels_must_worsen_with_consumption() {
        let raw = r#"{
            "energy": {
                "consumption": {
                    "direction": "at_most",
                    "bands": [
                        { "threshold": 50.0, "label": "G" },
                        { "threshold": 90.0, "label": "A" }
                    ],
                    "fallback": "G"
                },
                "emissions": {
                    "direction": "at_most",
                    "bands": [{ "threshold": 5.0, "label": "A" }],
                    "fallback": "G"
                }
            }
        }"#;
        let err = MetricsPolicy::from_json(raw).unwrap_err();
        assert!(matches!(
            err,
            PolicyError::Bands(BandError::LabelsOutOfOrder { index: 1 })
        ));
    }

    #[test]
    fn energy_tables_must_run_at_most() {
        let raw = r#"{
            "energy": {
                "consumption": {
                    "direction": "at_most",
                    "bands": [{ "threshold": 50.0, "label": "A" }],
                    "fallback": "G"
                },
                "emissions": {
                    "direction": "at_least",
                    "bands": [
                        { "threshold": 50.0, "label": "A" },
                        { "threshold": 5.0, "label": "D" }
                    ],
                    "fallback": "G"
                }
            }
        }"#;
        let err = MetricsPolicy::from_json(raw).unwrap_err();
        assert!(matches!(
            err,
            PolicyError::Bands(BandError::WrongDirection {
                expected: BandDirection::AtMost,
                found: BandDirection::AtLeast
            })
        ));
    }

    #[test]
    fn mobility_labels_must_run_best_first() {
        let raw = r#"{
            "mobility": {
                "labels": {
                    "direction": "at_least",
                    "bands": [
                        { "threshold": 90.0, "label": "weak" },
                        { "threshold": 60.0, "label": "excellent" }
                    ],
                    "fallback": "weak"
                }
            }
        }"#;
        let err = MetricsPolicy::from_json(raw).unwrap_err();
        assert!(matches!(
            err,
            PolicyError::Bands(BandError::LabelsOutOfOrder { index: 1 })
        ));

        let raw = r#"{
            "mobility": {
                "labels": {
                    "direction": "at_most",
                    "bands": [{ "threshold": 60.0, "label": "excellent" }],
                    "fallback": "weak"
                }
            }
        }"#;
        let err = MetricsPolicy::from_json(raw).unwrap_err();
        assert!(matches!(
            err,
            PolicyError::Bands(BandError::WrongDirection { .. })
        ));
    }
}
