//! Aggregate statistics over the rated members

use crate::census::CensusColumns;
use crate::rating::{round2, PremiumLine, PremiumResult};
use serde::{Deserialize, Serialize};

/// Count of members missing a field
///
/// `NotApplicable` means the census had no such column at all, which is a
/// different signal from a column with some blank cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingCount {
    NotApplicable,
    Count(usize),
}

impl MissingCount {
    /// True only when the column exists and no member is missing it
    pub fn is_complete(&self) -> bool {
        matches!(self, MissingCount::Count(0))
    }
}

/// SA-weighted average age, zero when the total SA is zero
pub fn weighted_age(ages_and_sa: &[(u8, f64)]) -> f64 {
    let total_sa: f64 = ages_and_sa.iter().map(|(_, sa)| sa).sum();
    if total_sa == 0.0 {
        return 0.0;
    }
    let weighted: f64 = ages_and_sa.iter().map(|(age, sa)| f64::from(*age) * sa).sum();
    weighted / total_sa
}

/// Snapshot of the rated portfolio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioStats {
    pub member_count: usize,
    pub excluded_count: usize,
    pub average_age: f64,
    pub weighted_age: f64,
    pub total_sum_assured: f64,
    pub average_sum_assured: f64,
    pub missing_gender: MissingCount,
    pub missing_occupation: MissingCount,
    pub total_dac_premium: f64,
    pub total_ptd_premium: f64,
    pub total_premium: f64,
}

impl PortfolioStats {
    /// Reduce rated members to portfolio statistics
    pub fn aggregate(rated: &[PremiumResult], columns: &CensusColumns, excluded_count: usize) -> Self {
        let member_count = rated.len();
        let pairs: Vec<(u8, f64)> = rated.iter().map(|r| (r.age, r.sum_assured)).collect();

        let total_sum_assured: f64 = pairs.iter().map(|(_, sa)| sa).sum();
        let (average_age, average_sum_assured) = if member_count == 0 {
            (0.0, 0.0)
        } else {
            let n = member_count as f64;
            let age_sum: f64 = pairs.iter().map(|(age, _)| f64::from(*age)).sum();
            (age_sum / n, total_sum_assured / n)
        };

        let missing_gender = if columns.gender {
            MissingCount::Count(rated.iter().filter(|r| !r.gender_supplied).count())
        } else {
            MissingCount::NotApplicable
        };
        let missing_occupation = if columns.job_title {
            MissingCount::Count(rated.iter().filter(|r| !r.job_title_supplied).count())
        } else {
            MissingCount::NotApplicable
        };

        let line_total = |line: PremiumLine| round2(rated.iter().filter_map(|r| r.premium(line)).sum());
        let total_dac_premium = line_total(PremiumLine::Dac);
        let total_ptd_premium = line_total(PremiumLine::Ptd);

        Self {
            member_count,
            excluded_count,
            average_age,
            weighted_age: weighted_age(&pairs),
            total_sum_assured,
            average_sum_assured,
            missing_gender,
            missing_occupation,
            total_dac_premium,
            total_ptd_premium,
            total_premium: round2(total_dac_premium + total_ptd_premium),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::OccupationClass;
    use crate::census::Gender;
    use approx::assert_relative_eq;
    use std::collections::BTreeMap;

    fn rated(age: u8, sa: f64, gender_supplied: bool, job_title_supplied: bool) -> PremiumResult {
        let mut premiums = BTreeMap::new();
        premiums.insert(PremiumLine::Dac, sa / 1000.0);
        PremiumResult {
            member_id: age.to_string(),
            age,
            gender: Gender::Male,
            occupation_class: OccupationClass::Class1,
            sum_assured: sa,
            premiums,
            gender_supplied,
            job_title_supplied,
        }
    }

    #[test]
    fn test_weighted_age_equal_sa_is_mean() {
        let pairs = [(30, 50_000.0), (40, 50_000.0), (56, 50_000.0)];
        assert_relative_eq!(weighted_age(&pairs), 42.0, epsilon = 1e-12);
    }

    #[test]
    fn test_weighted_age_zero_sa() {
        assert_eq!(weighted_age(&[(30, 0.0), (50, 0.0)]), 0.0);
        assert_eq!(weighted_age(&[]), 0.0);
    }

    #[test]
    fn test_aggregate() {
        let members = vec![rated(30, 120_000.0, true, true), rated(50, 180_000.0, false, true)];
        let stats = PortfolioStats::aggregate(&members, &CensusColumns::all(), 1);

        assert_eq!(stats.member_count, 2);
        assert_eq!(stats.excluded_count, 1);
        assert_relative_eq!(stats.average_age, 40.0);
        assert_relative_eq!(stats.weighted_age, (30.0 * 120_000.0 + 50.0 * 180_000.0) / 300_000.0);
        assert_relative_eq!(stats.total_sum_assured, 300_000.0);
        assert_relative_eq!(stats.average_sum_assured, 150_000.0);
        assert_eq!(stats.missing_gender, MissingCount::Count(1));
        assert_eq!(stats.missing_occupation, MissingCount::Count(0));
        assert_relative_eq!(stats.total_dac_premium, 300.0);
        assert_eq!(stats.total_ptd_premium, 0.0);
        assert_relative_eq!(stats.total_premium, 300.0);
    }

    #[test]
    fn test_absent_column_is_not_applicable() {
        let members = vec![rated(30, 100_000.0, false, false)];
        let columns = CensusColumns { gender: false, ..CensusColumns::all() };
        let stats = PortfolioStats::aggregate(&members, &columns, 0);

        assert_eq!(stats.missing_gender, MissingCount::NotApplicable);
        assert_eq!(stats.missing_occupation, MissingCount::Count(1));
        assert!(!stats.missing_gender.is_complete());
    }

    #[test]
    fn test_empty_portfolio() {
        let stats = PortfolioStats::aggregate(&[], &CensusColumns::all(), 3);
        assert_eq!(stats.member_count, 0);
        assert_eq!(stats.average_age, 0.0);
        assert_eq!(stats.weighted_age, 0.0);
        assert_eq!(stats.average_sum_assured, 0.0);
        assert_eq!(stats.missing_gender, MissingCount::Count(0));
    }
}
