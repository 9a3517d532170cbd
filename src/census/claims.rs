//! Claims experience supplied alongside the census

use crate::rating::Benefit;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A paid claim attributed to an underwriting year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    /// Underwriting year label, e.g. "2022" or "2022/23"
    pub underwriting_year: String,
    pub amount_paid: f64,
    pub benefit_type: Benefit,
}

impl ClaimRecord {
    pub fn new(underwriting_year: &str, amount_paid: f64, benefit_type: Benefit) -> Self {
        Self {
            underwriting_year: underwriting_year.to_string(),
            amount_paid,
            benefit_type,
        }
    }
}

/// Declared status of a scheme without itemised claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemeStatus {
    /// New scheme with no history at all
    Virgin,
    /// Established scheme with no claims on record
    Clean,
}

/// Claims-experience input to the credibility engine
///
/// The caller owns the claims list and hands over a snapshot per quote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimsExperience {
    Claims(Vec<ClaimRecord>),
    Status(SchemeStatus),
    #[default]
    NotProvided,
}

impl ClaimsExperience {
    /// Number of distinct underwriting years across the claims
    pub fn distinct_years(claims: &[ClaimRecord]) -> usize {
        claims
            .iter()
            .map(|c| c.underwriting_year.trim())
            .filter(|y| !y.is_empty())
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn total_paid(&self) -> f64 {
        match self {
            ClaimsExperience::Claims(claims) => claims.iter().map(|c| c.amount_paid.max(0.0)).sum(),
            _ => 0.0,
        }
    }
}
