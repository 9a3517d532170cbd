//! Age nearest birthday from a date of birth

use crate::error::{RatingError, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Date layouts accepted for census dates, tried in order
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d", "%d.%m.%Y"];

/// Parse a census date cell, ignoring any trailing time component
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    let date_part = raw.split_whitespace().next()?;
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Age on the nearest-birthday convention
///
/// Completed years, less one if this year's birthday is still ahead, then
/// plus one when the calendar months of `reference` and `dob` are six or
/// more apart. The two adjustments are independent: a December birthday
/// rated in January takes both, landing one above completed age.
pub fn nearest_age(dob: NaiveDate, reference: NaiveDate) -> i32 {
    let mut age = reference.year() - dob.year();
    if (reference.month(), reference.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    if (reference.month() as i32 - dob.month() as i32).abs() >= 6 {
        age += 1;
    }
    age
}

/// Insurable age limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeBasis {
    /// Youngest age accepted for cover
    pub min_entry_age: u8,
    /// Ages above this are rated at this age
    pub max_rating_age: u8,
    /// Members older than this are excluded outright
    pub max_entry_age: u8,
}

impl Default for AgeBasis {
    fn default() -> Self {
        Self {
            min_entry_age: 18,
            max_rating_age: 65,
            max_entry_age: 70,
        }
    }
}

impl AgeBasis {
    /// Age used for rating, capped at `max_rating_age`
    pub fn rating_age(&self, dob: Option<&str>, reference: NaiveDate) -> Result<u8> {
        let parsed = dob.and_then(parse_date);
        let Some(dob_date) = parsed.filter(|d| *d <= reference) else {
            return Err(RatingError::InvalidDate { value: dob.map(str::to_string) });
        };

        let age = nearest_age(dob_date, reference);
        if age < i32::from(self.min_entry_age) || age > i32::from(self.max_entry_age) {
            return Err(RatingError::OutOfRangeAge {
                age,
                min: self.min_entry_age,
                max: self.max_entry_age,
            });
        }

        Ok(age.min(i32::from(self.max_rating_age)) as u8)
    }
}
