//! CSV-based rate table loader
//!
//! Loads mortality and disability rates from CSV files in data/rates/

use super::rates::AgeRateTable;
use crate::error::{RatingError, Result};
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

/// Default path to the rate table directory
pub const DEFAULT_RATES_PATH: &str = "data/rates";

/// Turn age-keyed rows into a contiguous table
fn contiguous(name: &'static str, rows: BTreeMap<u8, f64>) -> Result<AgeRateTable> {
    let Some((&min_age, _)) = rows.first_key_value() else {
        return Err(RatingError::InvalidTable { table: name, reason: "file has no rows".into() });
    };
    for (offset, &age) in rows.keys().enumerate() {
        if usize::from(age) != usize::from(min_age) + offset {
            return Err(RatingError::InvalidTable {
                table: name,
                reason: format!("age {} breaks the contiguous range from {}", age, min_age),
            });
        }
    }
    AgeRateTable::new(name, min_age, rows.into_values().collect())
}

fn parse_field<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| RatingError::InvalidTable {
        table: name,
        reason: format!("unparsable value {:?}", raw),
    })
}

/// Load death rates from `death_rates.csv` (age,male,female)
/// Returns (male, female) tables
pub fn load_death_rates(path: &Path) -> Result<(AgeRateTable, AgeRateTable)> {
    let file = File::open(path.join("death_rates.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut male = BTreeMap::new();
    let mut female = BTreeMap::new();

    for result in reader.records() {
        let record = result?;
        if record.len() < 3 {
            return Err(RatingError::InvalidTable { table: "death", reason: "expected age,male,female".into() });
        }
        let age: u8 = parse_field("death", &record[0])?;
        male.insert(age, parse_field("death", &record[1])?);
        female.insert(age, parse_field("death", &record[2])?);
    }

    Ok((contiguous("male death", male)?, contiguous("female death", female)?))
}

/// Load disability rates from `disability_rates.csv` (age,rate)
pub fn load_disability_rates(path: &Path) -> Result<AgeRateTable> {
    let file = File::open(path.join("disability_rates.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut rates = BTreeMap::new();

    for result in reader.records() {
        let record = result?;
        if record.len() < 2 {
            return Err(RatingError::InvalidTable { table: "disability", reason: "expected age,rate".into() });
        }
        let age: u8 = parse_field("disability", &record[0])?;
        rates.insert(age, parse_field("disability", &record[1])?);
    }

    contiguous("disability", rates)
}

/// All rate tables loaded from one directory
pub struct LoadedRates {
    pub male_death: AgeRateTable,
    pub female_death: AgeRateTable,
    pub disability: AgeRateTable,
}

impl LoadedRates {
    /// Load all tables from the default path
    pub fn load_default() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_RATES_PATH))
    }

    /// Load all tables from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let (male_death, female_death) = load_death_rates(path)?;
        Ok(Self {
            male_death,
            female_death,
            disability: load_disability_rates(path)?,
        })
    }
}
