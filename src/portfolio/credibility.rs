//! Claims-experience credibility
//!
//! Base credibility comes from a stepped table keyed by years of claims
//! experience within a group-size bracket. Complete gender and occupation
//! data each add a bonus; the total is capped at 100%.

use super::stats::PortfolioStats;
use crate::census::{ClaimsExperience, SchemeStatus};
use crate::error::{RatingError, Result};
use serde::{Deserialize, Serialize};

/// Credibility steps for groups up to `max_members`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredibilityBracket {
    pub max_members: usize,
    /// Credibility % by years of experience (index = years); the last step caps
    pub steps: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CredibilityTableRaw")]
pub struct CredibilityTable {
    brackets: Vec<CredibilityBracket>,
    /// Years of experience assumed for a clean-record scheme
    clean_record_years: u32,
    gender_bonus: f64,
    occupation_bonus: f64,
}

#[derive(Deserialize)]
struct CredibilityTableRaw {
    brackets: Vec<CredibilityBracket>,
    clean_record_years: u32,
    gender_bonus: f64,
    occupation_bonus: f64,
}

impl TryFrom<CredibilityTableRaw> for CredibilityTable {
    type Error = RatingError;

    fn try_from(raw: CredibilityTableRaw) -> Result<Self> {
        Self::new(raw.brackets, raw.clean_record_years, raw.gender_bonus, raw.occupation_bonus)
    }
}

/// Credibility assigned to the scheme
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CredibilityResult {
    pub years_of_experience: u32,
    pub total_claims_paid: f64,
    pub base: f64,
    pub bonus: f64,
    /// Final credibility percentage, at most 100
    pub credibility: f64,
}

impl CredibilityResult {
    fn none(total_claims_paid: f64) -> Self {
        Self {
            years_of_experience: 0,
            total_claims_paid,
            base: 0.0,
            bonus: 0.0,
            credibility: 0.0,
        }
    }
}

impl CredibilityTable {
    pub fn new(
        brackets: Vec<CredibilityBracket>,
        clean_record_years: u32,
        gender_bonus: f64,
        occupation_bonus: f64,
    ) -> Result<Self> {
        let invalid = |reason: String| RatingError::InvalidTable { table: "credibility", reason };

        if brackets.is_empty() {
            return Err(invalid("no brackets".into()));
        }
        if brackets.windows(2).any(|w| w[1].max_members <= w[0].max_members) {
            return Err(invalid("brackets must have increasing group sizes".into()));
        }
        for bracket in &brackets {
            if bracket.steps.is_empty() {
                return Err(invalid(format!("bracket up to {} has no steps", bracket.max_members)));
            }
            if bracket.steps.iter().any(|s| !(0.0..=100.0).contains(s)) {
                return Err(invalid(format!("bracket up to {} has a step outside 0..=100", bracket.max_members)));
            }
            if bracket.steps.windows(2).any(|w| w[1] < w[0]) {
                return Err(invalid(format!("bracket up to {} decreases with years", bracket.max_members)));
            }
        }
        if gender_bonus < 0.0 || occupation_bonus < 0.0 {
            return Err(invalid("bonuses must be non-negative".into()));
        }

        Ok(Self {
            brackets,
            clean_record_years,
            gender_bonus,
            occupation_bonus,
        })
    }

    pub fn default_table() -> Self {
        let bracket = |max_members, steps: [f64; 6]| CredibilityBracket {
            max_members,
            steps: steps.to_vec(),
        };
        Self {
            brackets: vec![
                bracket(50, [0.0, 10.0, 20.0, 30.0, 40.0, 50.0]),
                bracket(200, [0.0, 15.0, 30.0, 45.0, 60.0, 70.0]),
                bracket(500, [0.0, 20.0, 40.0, 60.0, 75.0, 85.0]),
                bracket(1000, [0.0, 25.0, 50.0, 70.0, 85.0, 95.0]),
            ],
            clean_record_years: 3,
            gender_bonus: 2.0,
            occupation_bonus: 2.0,
        }
    }

    /// Base credibility for `years` of experience in a group of `member_count`
    pub fn base_credibility(&self, years: u32, member_count: usize) -> f64 {
        let bracket = self
            .brackets
            .iter()
            .find(|b| member_count <= b.max_members)
            .or_else(|| self.brackets.last());
        let Some(bracket) = bracket else {
            return 0.0;
        };
        let idx = (years as usize).min(bracket.steps.len() - 1);
        bracket.steps[idx]
    }

    /// Credibility for a claims snapshot against the rated portfolio
    pub fn assess(&self, claims: &ClaimsExperience, stats: &PortfolioStats) -> CredibilityResult {
        let total_paid = claims.total_paid();
        let years = match claims {
            ClaimsExperience::NotProvided | ClaimsExperience::Status(SchemeStatus::Virgin) => 0,
            ClaimsExperience::Status(SchemeStatus::Clean) => self.clean_record_years,
            ClaimsExperience::Claims(records) => ClaimsExperience::distinct_years(records) as u32,
        };
        if years == 0 {
            return CredibilityResult::none(total_paid);
        }

        let base = self.base_credibility(years, stats.member_count);
        let mut bonus = 0.0;
        if stats.missing_gender.is_complete() {
            bonus += self.gender_bonus;
        }
        if stats.missing_occupation.is_complete() {
            bonus += self.occupation_bonus;
        }

        CredibilityResult {
            years_of_experience: years,
            total_claims_paid: total_paid,
            base,
            bonus,
            credibility: (base + bonus).min(100.0),
        }
    }
}

impl Default for CredibilityTable {
    fn default() -> Self {
        Self::default_table()
    }
}
