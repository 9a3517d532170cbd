//! Free cover limit suggestion
//!
//! FCL = group-size factor x average SA, reduced by a flat penalty when
//! the group is old on either the simple or the SA-weighted average age.

use super::stats::PortfolioStats;
use crate::error::{RatingError, Result};
use crate::rating::round2;
use serde::{Deserialize, Serialize};

/// Factor applying from `min_members` upward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FclStep {
    pub min_members: usize,
    pub factor: f64,
}

/// Step function from group size to FCL multiple, plus the age penalty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FclScaleRaw")]
pub struct FclScale {
    steps: Vec<FclStep>,
    /// Average or weighted age strictly above this triggers the penalty
    age_threshold: f64,
    /// Multiplier applied when the penalty triggers
    age_penalty: f64,
}

#[derive(Deserialize)]
struct FclScaleRaw {
    steps: Vec<FclStep>,
    age_threshold: f64,
    age_penalty: f64,
}

impl TryFrom<FclScaleRaw> for FclScale {
    type Error = RatingError;

    fn try_from(raw: FclScaleRaw) -> Result<Self> {
        Self::new(raw.steps, raw.age_threshold, raw.age_penalty)
    }
}

/// Suggested FCL with its workings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FclResult {
    pub factor: f64,
    pub base_fcl: f64,
    pub age_penalty_applied: bool,
    pub fcl: f64,
}

impl FclScale {
    pub fn new(steps: Vec<FclStep>, age_threshold: f64, age_penalty: f64) -> Result<Self> {
        if steps.is_empty() {
            return Err(RatingError::InvalidTable { table: "FCL", reason: "no steps".into() });
        }
        for pair in steps.windows(2) {
            if pair[1].min_members <= pair[0].min_members || pair[1].factor < pair[0].factor {
                return Err(RatingError::InvalidTable {
                    table: "FCL",
                    reason: format!(
                        "step at {} members must follow {} with a factor at least {}",
                        pair[1].min_members, pair[0].min_members, pair[0].factor
                    ),
                });
            }
        }
        if !(0.0..=1.0).contains(&age_penalty) {
            return Err(RatingError::InvalidTable {
                table: "FCL",
                reason: format!("age penalty {} outside 0..=1", age_penalty),
            });
        }
        Ok(Self {
            steps,
            age_threshold,
            age_penalty,
        })
    }

    /// Default scale: 1.5x from 1 member up to 5x from 250
    pub fn default_scale() -> Self {
        let step = |min_members, factor| FclStep { min_members, factor };
        Self {
            steps: vec![step(1, 1.5), step(10, 2.0), step(50, 3.0), step(100, 4.0), step(250, 5.0)],
            age_threshold: 45.0,
            age_penalty: 0.75,
        }
    }

    /// Multiple of average SA for a group of `member_count`, zero below the first step
    pub fn factor_for(&self, member_count: usize) -> f64 {
        self.steps
            .iter()
            .rev()
            .find(|s| member_count >= s.min_members)
            .map_or(0.0, |s| s.factor)
    }

    pub fn suggest_fcl(
        &self,
        member_count: usize,
        average_sa: f64,
        average_age: f64,
        weighted_age: f64,
    ) -> FclResult {
        let factor = self.factor_for(member_count);
        let base_fcl = factor * average_sa;
        let age_penalty_applied = average_age > self.age_threshold || weighted_age > self.age_threshold;
        let fcl = if age_penalty_applied {
            round2(base_fcl * self.age_penalty)
        } else {
            round2(base_fcl)
        };

        FclResult {
            factor,
            base_fcl,
            age_penalty_applied,
            fcl,
        }
    }

    pub fn suggest(&self, stats: &PortfolioStats) -> FclResult {
        self.suggest_fcl(
            stats.member_count,
            stats.average_sum_assured,
            stats.average_age,
            stats.weighted_age,
        )
    }
}

impl Default for FclScale {
    fn default() -> Self {
        Self::default_scale()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_steps() {
        let scale = FclScale::default_scale();
        assert_eq!(scale.factor_for(0), 0.0);
        assert_eq!(scale.factor_for(1), 1.5);
        assert_eq!(scale.factor_for(9), 1.5);
        assert_eq!(scale.factor_for(10), 2.0);
        assert_eq!(scale.factor_for(249), 4.0);
        assert_eq!(scale.factor_for(10_000), 5.0);
    }

    #[test]
    fn test_factor_monotonic_in_group_size() {
        let scale = FclScale::default_scale();
        let mut last = 0.0;
        for n in 0..400 {
            let factor = scale.factor_for(n);
            assert!(factor >= last);
            last = factor;
        }
    }

    #[test]
    fn test_age_penalty_or_semantics() {
        let scale = FclScale::default_scale();

        let result = scale.suggest_fcl(20, 100_000.0, 46.0, 40.0);
        assert!(result.age_penalty_applied);
        assert_eq!(result.base_fcl, 200_000.0);
        assert_eq!(result.fcl, 150_000.0);

        let result = scale.suggest_fcl(20, 100_000.0, 40.0, 45.5);
        assert!(result.age_penalty_applied);
    }

    #[test]
    fn test_age_penalty_strict_threshold() {
        let scale = FclScale::default_scale();
        let result = scale.suggest_fcl(20, 100_000.0, 45.0, 45.0);
        assert!(!result.age_penalty_applied);
        assert_eq!(result.fcl, 200_000.0);
    }

    #[test]
    fn test_rounding_to_cents() {
        let scale = FclScale::default_scale();
        let result = scale.suggest_fcl(3, 33_333.333, 30.0, 30.0);
        assert_eq!(result.fcl, 50_000.0);
        let result = scale.suggest_fcl(3, 12_345.678, 50.0, 30.0);
        // 1.5 x 12345.678 x 0.75 = 13888.88775
        assert_eq!(result.fcl, 13_888.89);
    }

    #[test]
    fn test_invalid_scales() {
        let step = |min_members, factor| FclStep { min_members, factor };
        assert!(FclScale::new(vec![], 45.0, 0.75).is_err());
        assert!(FclScale::new(vec![step(1, 2.0), step(10, 1.0)], 45.0, 0.75).is_err());
        assert!(FclScale::new(vec![step(10, 1.0), step(10, 2.0)], 45.0, 0.75).is_err());
        assert!(FclScale::new(vec![step(1, 1.0)], 45.0, 1.5).is_err());
        assert!(FclScale::new(vec![step(1, 1.0), step(5, 3.0)], 50.0, 0.8).is_ok());
    }

    #[test]
    fn test_deserialize_validates_scale() {
        let json = serde_json::to_value(FclScale::default_scale()).unwrap();
        let parsed: FclScale = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(parsed, FclScale::default_scale());

        let mut decreasing = json;
        decreasing["steps"] = serde_json::json!([
            {"min_members": 1, "factor": 3.0},
            {"min_members": 10, "factor": 2.0}
        ]);
        assert!(serde_json::from_value::<FclScale>(decreasing).is_err());
    }
}
