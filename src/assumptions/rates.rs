//! Mortality and disability rate tables
//!
//! Rates are per mille of sum assured, indexed by integer age. Lookups
//! outside a table's age range return zero; callers decide whether that
//! age is insurable before pricing with the result.

use super::loader::LoadedRates;
use super::occupation::OccupationClass;
use crate::census::Gender;
use crate::error::{RatingError, Result};
use serde::{Deserialize, Serialize};

/// Rate per mille by age over a contiguous age range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AgeRateTableRaw")]
pub struct AgeRateTable {
    /// Age of the first entry in `rates`
    min_age: u8,
    rates: Vec<f64>,
}

/// Unchecked wire form of `AgeRateTable`
#[derive(Deserialize)]
struct AgeRateTableRaw {
    min_age: u8,
    rates: Vec<f64>,
}

impl TryFrom<AgeRateTableRaw> for AgeRateTable {
    type Error = RatingError;

    fn try_from(raw: AgeRateTableRaw) -> Result<Self> {
        Self::new("rate", raw.min_age, raw.rates)
    }
}

impl AgeRateTable {
    pub fn new(name: &'static str, min_age: u8, rates: Vec<f64>) -> Result<Self> {
        if rates.is_empty() {
            return Err(RatingError::InvalidTable { table: name, reason: "no rates".into() });
        }
        if usize::from(min_age) + rates.len() - 1 > usize::from(u8::MAX) {
            return Err(RatingError::InvalidTable { table: name, reason: "age range too wide".into() });
        }
        if let Some(bad) = rates.iter().find(|r| !r.is_finite() || **r < 0.0) {
            return Err(RatingError::InvalidTable {
                table: name,
                reason: format!("rate {} is not a non-negative number", bad),
            });
        }
        Ok(Self { min_age, rates })
    }

    pub fn min_age(&self) -> u8 {
        self.min_age
    }

    pub fn max_age(&self) -> u8 {
        self.min_age + (self.rates.len() - 1) as u8
    }

    pub fn covers(&self, age: u8) -> bool {
        age >= self.min_age() && age <= self.max_age()
    }

    /// Rate per mille at `age`, zero outside the table
    pub fn rate(&self, age: u8) -> f64 {
        if !self.covers(age) {
            return 0.0;
        }
        self.rates[usize::from(age - self.min_age)]
    }
}

/// Full set of rating tables for one country of risk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RateTablesRaw")]
pub struct RateTables {
    male_death: AgeRateTable,
    female_death: AgeRateTable,
    disability: AgeRateTable,
    /// Loading fraction by occupation class 1..=4
    occupation_loadings: [f64; 4],
}

#[derive(Deserialize)]
struct RateTablesRaw {
    male_death: AgeRateTable,
    female_death: AgeRateTable,
    disability: AgeRateTable,
    occupation_loadings: [f64; 4],
}

impl TryFrom<RateTablesRaw> for RateTables {
    type Error = RatingError;

    fn try_from(raw: RateTablesRaw) -> Result<Self> {
        Self::new(raw.male_death, raw.female_death, raw.disability, raw.occupation_loadings)
    }
}

impl RateTables {
    /// Loadings must be finite and non-negative
    pub fn new(
        male_death: AgeRateTable,
        female_death: AgeRateTable,
        disability: AgeRateTable,
        occupation_loadings: [f64; 4],
    ) -> Result<Self> {
        if let Some(bad) = occupation_loadings.iter().find(|l| !l.is_finite() || **l < 0.0) {
            return Err(RatingError::InvalidTable {
                table: "occupation loading",
                reason: format!("loading {} is not a non-negative number", bad),
            });
        }
        Ok(Self {
            male_death,
            female_death,
            disability,
            occupation_loadings,
        })
    }

    /// Default group-life schedule: death 18-69, disability 18-64
    pub fn default_schedule() -> Self {
        Self {
            male_death: AgeRateTable { min_age: 18, rates: Self::default_male_death() },
            female_death: AgeRateTable { min_age: 18, rates: Self::default_female_death() },
            disability: AgeRateTable { min_age: 18, rates: Self::default_disability() },
            occupation_loadings: Self::default_occupation_loadings(),
        }
    }

    /// Create from loaded CSV tables, keeping the default occupation loadings
    pub fn from_loaded(loaded: &LoadedRates) -> Self {
        Self {
            male_death: loaded.male_death.clone(),
            female_death: loaded.female_death.clone(),
            disability: loaded.disability.clone(),
            occupation_loadings: Self::default_occupation_loadings(),
        }
    }

    pub fn death_table(&self, gender: Gender) -> &AgeRateTable {
        match gender {
            Gender::Male => &self.male_death,
            Gender::Female => &self.female_death,
        }
    }

    pub fn disability_table(&self) -> &AgeRateTable {
        &self.disability
    }

    /// Death rate per mille
    pub fn death_rate(&self, age: u8, gender: Gender) -> f64 {
        self.death_table(gender).rate(age)
    }

    /// Disability rate per mille, before occupation loading
    pub fn disability_rate(&self, age: u8) -> f64 {
        self.disability.rate(age)
    }

    pub fn occupation_loading(&self, class: OccupationClass) -> f64 {
        self.occupation_loadings[class.index()]
    }

    pub fn default_occupation_loadings() -> [f64; 4] {
        [0.0, 0.10, 0.25, 0.40]
    }

    fn default_male_death() -> Vec<f64> {
        vec![
            0.60, 0.65, 0.70, 0.75, 0.81, 0.87, 0.94, 1.01, 1.09, 1.18, // 18-27
            1.27, 1.37, 1.48, 1.59, 1.71, 1.85, 1.99, 2.15, 2.31, 2.49, // 28-37
            2.69, 2.90, 3.12, 3.37, 3.63, 3.91, 4.22, 4.55, 4.90, 5.28, // 38-47
            5.69, 6.14, 6.61, 7.13, 7.68, 8.28, 8.93, 9.62, 10.37, 11.18, // 48-57
            12.05, 12.99, 14.00, 15.09, 16.27, 17.53, 18.90, 20.37, 21.96, 23.67, // 58-67
            25.51, 27.50, // 68-69
        ]
    }

    fn default_female_death() -> Vec<f64> {
        vec![
            0.48, 0.52, 0.56, 0.60, 0.65, 0.70, 0.75, 0.81, 0.87, 0.94, // 18-27
            1.02, 1.10, 1.18, 1.27, 1.37, 1.48, 1.59, 1.72, 1.85, 2.00, // 28-37
            2.15, 2.32, 2.50, 2.69, 2.90, 3.13, 3.37, 3.64, 3.92, 4.23, // 38-47
            4.55, 4.91, 5.29, 5.70, 6.15, 6.63, 7.14, 7.70, 8.30, 8.94, // 48-57
            9.64, 10.39, 11.20, 12.07, 13.01, 14.03, 15.12, 16.30, 17.57, 18.94, // 58-67
            20.41, 22.00, // 68-69
        ]
    }

    fn default_disability() -> Vec<f64> {
        vec![
            0.30, 0.32, 0.35, 0.37, 0.40, 0.43, 0.46, 0.49, 0.53, 0.56, // 18-27
            0.60, 0.65, 0.69, 0.75, 0.80, 0.86, 0.92, 0.99, 1.06, 1.13, // 28-37
            1.22, 1.30, 1.40, 1.50, 1.61, 1.73, 1.85, 1.99, 2.13, 2.28, // 38-47
            2.45, 2.63, 2.82, 3.02, 3.24, 3.48, 3.73, 4.00, 4.29, 4.60, // 48-57
            4.93, 5.29, 5.67, 6.09, 6.53, 7.00, 7.51, // 58-64
        ]
    }
}

impl Default for RateTables {
    fn default() -> Self {
        Self::default_schedule()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ranges() {
        let tables = RateTables::default_schedule();

        assert_eq!(tables.death_table(Gender::Male).min_age(), 18);
        assert_eq!(tables.death_table(Gender::Male).max_age(), 69);
        assert_eq!(tables.death_table(Gender::Female).max_age(), 69);
        assert_eq!(tables.disability_table().max_age(), 64);
    }

    #[test]
    fn test_table_exact_lookups() {
        let tables = RateTables::default_schedule();

        assert_eq!(tables.death_rate(18, Gender::Male), 0.60);
        assert_eq!(tables.death_rate(30, Gender::Male), 1.48);
        assert_eq!(tables.death_rate(30, Gender::Female), 1.18);
        assert_eq!(tables.death_rate(69, Gender::Male), 27.50);
        assert_eq!(tables.disability_rate(40), 1.40);
        assert_eq!(tables.disability_rate(64), 7.51);
    }

    #[test]
    fn test_rates_deterministic_and_increasing() {
        let tables = RateTables::default_schedule();
        for gender in [Gender::Male, Gender::Female] {
            for age in 19..=69u8 {
                let rate = tables.death_rate(age, gender);
                assert_eq!(rate, tables.death_rate(age, gender));
                assert!(rate > tables.death_rate(age - 1, gender));
            }
        }
    }

    #[test]
    fn test_out_of_range_is_zero() {
        let tables = RateTables::default_schedule();

        assert_eq!(tables.death_rate(17, Gender::Male), 0.0);
        assert_eq!(tables.death_rate(70, Gender::Female), 0.0);
        assert_eq!(tables.disability_rate(65), 0.0);
    }

    #[test]
    fn test_occupation_loadings() {
        let tables = RateTables::default_schedule();
        assert_eq!(tables.occupation_loading(OccupationClass::Class1), 0.0);
        assert_eq!(tables.occupation_loading(OccupationClass::Class4), 0.40);
    }

    #[test]
    fn test_invalid_loadings_rejected() {
        let base = RateTables::default_schedule();
        let build = |loadings| {
            RateTables::new(
                base.death_table(Gender::Male).clone(),
                base.death_table(Gender::Female).clone(),
                base.disability_table().clone(),
                loadings,
            )
        };

        assert!(build([0.0, 0.1, -0.2, 0.4]).is_err());
        assert!(build([0.0, f64::NAN, 0.25, 0.4]).is_err());
        assert!(build([0.0, 0.1, 0.25, f64::INFINITY]).is_err());
        assert_eq!(build(RateTables::default_occupation_loadings()).unwrap(), base);
    }

    #[test]
    fn test_deserialize_validates_tables() {
        let json = serde_json::to_value(RateTables::default_schedule()).unwrap();
        let round_trip: RateTables = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(round_trip, RateTables::default_schedule());

        let mut empty = json.clone();
        empty["male_death"]["rates"] = serde_json::json!([]);
        assert!(serde_json::from_value::<RateTables>(empty).is_err());

        let mut negative = json.clone();
        negative["disability"]["rates"][3] = serde_json::json!(-1.0);
        assert!(serde_json::from_value::<RateTables>(negative).is_err());

        let mut loading = json;
        loading["occupation_loadings"][2] = serde_json::json!(-0.25);
        assert!(serde_json::from_value::<RateTables>(loading).is_err());
    }

    #[test]
    fn test_invalid_table() {
        assert!(AgeRateTable::new("death", 18, vec![]).is_err());
        assert!(AgeRateTable::new("death", 18, vec![1.0, -0.5]).is_err());
        assert!(AgeRateTable::new("death", 250, vec![1.0; 10]).is_err());
    }
}
