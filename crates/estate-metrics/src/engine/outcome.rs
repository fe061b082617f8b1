use serde::{Deserialize, Serialize};

/// Inputs outside an operation's domain. Callers render these as "N/A"
/// rather than treating them as failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "snake_case")]
pub enum InsufficientInput {
    #[error("loan principal must be greater than zero")]
    NonPositivePrincipal,
    #[error("annual rate must be between 0 and 100 percent")]
    RateOutOfRange,
    #[error("loan term must be at least one year")]
    NonPositiveTerm,
    #[error("loan term exceeds the longest supported term")]
    TermOutOfRange,
    #[error("surface area must be greater than zero")]
    NonPositiveArea,
    #[error("price must not be negative")]
    NegativePrice,
    #[error("reference price must be greater than zero")]
    NonPositiveReference,
    #[error("down payment exceeds the property price")]
    DownPaymentExceedsPrice,
    #[error("energy or emissions value must not be negative")]
    NegativeMeasurement,
    #[error("no energy or emissions measurement provided")]
    MissingMeasurement,
    #[error("price history is empty")]
    EmptySeries,
    #[error("input is not a finite number")]
    NonFinite,
}

impl InsufficientInput {
    pub const fn code(self) -> &'static str {
        match self {
            Self::NonPositivePrincipal => "non_positive_principal",
            Self::RateOutOfRange => "rate_out_of_range",
            Self::NonPositiveTerm => "non_positive_term",
            Self::TermOutOfRange => "term_out_of_range",
            Self::NonPositiveArea => "non_positive_area",
            Self::NegativePrice => "negative_price",
            Self::NonPositiveReference => "non_positive_reference",
            Self::DownPaymentExceedsPrice => "down_payment_exceeds_price",
            Self::NegativeMeasurement => "negative_measurement",
            Self::MissingMeasurement => "missing_measurement",
            Self::EmptySeries => "empty_series",
            Self::NonFinite => "non_finite",
        }
    }
}

pub type Computation<T> = Result<T, InsufficientInput>;

pub(crate) fn ensure_finite(values: &[f64]) -> Computation<()> {
    if values.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(InsufficientInput::NonFinite)
    }
}

/// Serializable form of a [`Computation`] for JSON surfaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MetricOutcome<T> {
    Computed { result: T },
    InsufficientInput { reason: InsufficientInput, detail: String },
}

impl<T> MetricOutcome<T> {
    pub fn is_computed(&self) -> bool {
        matches!(self, Self::Computed { .. })
    }

    pub fn computed(self) -> Option<T> {
        match self {
            Self::Computed { result } => Some(result),
            Self::InsufficientInput { .. } => None,
        }
    }
}

impl<T> From<Computation<T>> for MetricOutcome<T> {
    fn from(value: Computation<T>) -> Self {
        match value {
            Ok(result) => Self::Computed { result },
            Err(reason) => Self::InsufficientInput {
                reason,
                detail: reason.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insufficient_outcome_serializes_with_tag_and_detail() {
        let outcome: MetricOutcome<f64> = Err(InsufficientInput::NonPositiveArea).into();
        let value = serde_json::to_value(&outcome).expect("serializes");
        assert_eq!(
            value,
            json!({
                "outcome": "insufficient_input",
                "reason": "non_positive_area",
                "detail": "surface area must be greater than zero",
            })
        );
    }

    #[test]
    fn computed_outcome_carries_result() {
        let outcome: MetricOutcome<f64> = Ok(3000.0).into();
        assert!(outcome.is_computed());
        assert_eq!(outcome.computed(), Some(3000.0));
    }

    #[test]
    fn reason_codes_match_serde_names() {
        for reason in [
            InsufficientInput::DownPaymentExceedsPrice,
            InsufficientInput::TermOutOfRange,
        ] {
            let value = serde_json::to_value(reason).expect("serializes");
            assert_eq!(value, json!(reason.code()));
        }
    }
}
