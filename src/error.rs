//! Error taxonomy for the rating engine
//!
//! Batch-level failures (a census that cannot support the chosen sum assured
//! basis, a malformed table) are returned as `Err` before any member is rated.
//! Row-level failures are carried inside `MemberOutcome::Excluded` and never
//! abort the batch.

use serde::{Deserialize, Serialize};

/// All failure modes of the rating engine
#[derive(Debug, thiserror::Error)]
pub enum RatingError {
    /// Date of birth missing or not a recognised date
    #[error("invalid date of birth: {}", .value.as_deref().unwrap_or("<missing>"))]
    InvalidDate { value: Option<String> },

    /// Census lacks a column the sum assured basis depends on
    #[error("census has no `{column}` column, required for the {basis} sum assured basis")]
    MissingInput { column: &'static str, basis: String },

    /// Age outside the insurable range or a rate table's domain
    #[error("age {age} is outside the insurable range {min}..={max}")]
    OutOfRangeAge { age: i32, min: u8, max: u8 },

    /// File basis selected but this member carries no usable sum assured
    #[error("no usable sum assured for member")]
    MissingSumAssured,

    /// Benefit magnitude negative or above its maximum
    #[error("{benefit} magnitude {magnitude} outside 0..={max}")]
    BenefitLimit { benefit: String, magnitude: f64, max: f64 },

    /// DAC cannot be removed from a selection
    #[error("Death Any Cause is mandatory and cannot be removed")]
    MandatoryBenefit,

    /// An injected rating table violates its shape rules
    #[error("invalid {table} table: {reason}")]
    InvalidTable { table: &'static str, reason: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Serializable reason attached to an excluded member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    InvalidDate,
    OutOfRangeAge,
    MissingSumAssured,
}

impl ExclusionReason {
    /// Classify a row-level error; batch-level errors have no row reason
    pub fn from_error(err: &RatingError) -> Option<Self> {
        match err {
            RatingError::InvalidDate { .. } => Some(Self::InvalidDate),
            RatingError::OutOfRangeAge { .. } => Some(Self::OutOfRangeAge),
            RatingError::MissingSumAssured => Some(Self::MissingSumAssured),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RatingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = RatingError::InvalidDate { value: None };
        assert_eq!(err.to_string(), "invalid date of birth: <missing>");

        let err = RatingError::MissingInput { column: "salary", basis: "salary multiple".into() };
        assert!(err.to_string().contains("`salary`"));
    }

    #[test]
    fn test_row_level_classification() {
        assert_eq!(
            ExclusionReason::from_error(&RatingError::MissingSumAssured),
            Some(ExclusionReason::MissingSumAssured)
        );
        assert_eq!(ExclusionReason::from_error(&RatingError::MandatoryBenefit), None);
    }
}
