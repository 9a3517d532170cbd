//! Member records as supplied by a parsed census

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Job title assumed when the census leaves it blank
pub const DEFAULT_JOB_TITLE: &str = "Clerk";

/// Gender of the insured member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "male" => Ok(Gender::Male),
            "f" | "female" => Ok(Gender::Female),
            other => Err(format!("Unknown Gender: {}", other)),
        }
    }
}

/// A single insured life from the census
///
/// Optional fields stay `None` when the cell was blank so that data
/// completeness can be measured; the `*_or_default` accessors apply the
/// rating defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemberRecord {
    /// Member identifier (assigned 1..N by `Census::new` when absent)
    #[serde(default)]
    pub member_id: Option<String>,

    /// Raw date of birth as supplied
    #[serde(default)]
    pub dob: Option<String>,

    #[serde(default)]
    pub gender: Option<Gender>,

    #[serde(default)]
    pub job_title: Option<String>,

    #[serde(default)]
    pub salary: Option<f64>,

    /// Sum assured carried in the file, used by the file basis
    #[serde(default)]
    pub sum_assured: Option<f64>,
}

impl MemberRecord {
    /// Create a member with just a date of birth
    pub fn new(dob: &str) -> Self {
        Self {
            dob: Some(dob.to_string()),
            ..Default::default()
        }
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_job_title(mut self, title: &str) -> Self {
        self.job_title = Some(title.to_string());
        self
    }

    pub fn with_salary(mut self, salary: f64) -> Self {
        self.salary = Some(salary);
        self
    }

    pub fn with_sum_assured(mut self, sum_assured: f64) -> Self {
        self.sum_assured = Some(sum_assured);
        self
    }

    pub fn gender_or_default(&self) -> Gender {
        self.gender.unwrap_or_default()
    }

    pub fn job_title_or_default(&self) -> &str {
        match self.job_title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title,
            _ => DEFAULT_JOB_TITLE,
        }
    }

    /// Salary, with blank, negative or non-finite values read as 0
    pub fn salary_or_default(&self) -> f64 {
        match self.salary {
            Some(s) if s.is_finite() && s > 0.0 => s,
            _ => 0.0,
        }
    }

    pub fn has_job_title(&self) -> bool {
        self.job_title.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// Identifier, empty only if the record never went through `Census::new`
    pub fn id(&self) -> &str {
        self.member_id.as_deref().unwrap_or("")
    }
}

/// Which optional columns the census carried
///
/// A column that is absent altogether is a different signal from a column
/// whose cells are blank for some members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CensusColumns {
    pub gender: bool,
    pub job_title: bool,
    pub salary: bool,
    pub sum_assured: bool,
}

impl CensusColumns {
    pub fn all() -> Self {
        Self {
            gender: true,
            job_title: true,
            salary: true,
            sum_assured: true,
        }
    }
}

/// The full set of members submitted for rating
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Census {
    pub members: Vec<MemberRecord>,
    pub columns: CensusColumns,
}

impl Census {
    /// Build a census, numbering members without an id sequentially from 1
    pub fn new(mut members: Vec<MemberRecord>, columns: CensusColumns) -> Self {
        for (idx, member) in members.iter_mut().enumerate() {
            let missing = member.member_id.as_deref().map_or(true, |id| id.trim().is_empty());
            if missing {
                member.member_id = Some((idx + 1).to_string());
            }
        }
        Self { members, columns }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let mut named = MemberRecord::new("1990-01-01");
        named.member_id = Some("EMP-7".to_string());
        let census = Census::new(
            vec![MemberRecord::new("1980-01-01"), named, MemberRecord::new("1970-01-01")],
            CensusColumns::all(),
        );

        assert_eq!(census.members[0].id(), "1");
        assert_eq!(census.members[1].id(), "EMP-7");
        assert_eq!(census.members[2].id(), "3");
    }

    #[test]
    fn test_member_defaults() {
        let member = MemberRecord::new("1985-05-05").with_job_title("   ");
        assert_eq!(member.gender_or_default(), Gender::Male);
        assert_eq!(member.job_title_or_default(), DEFAULT_JOB_TITLE);
        assert!(!member.has_job_title());
        assert_eq!(member.salary_or_default(), 0.0);
        assert_eq!(member.clone().with_salary(-50.0).salary_or_default(), 0.0);
    }

    #[test]
    fn test_gender_parsing() {
        assert_eq!("F".parse::<Gender>(), Ok(Gender::Female));
        assert_eq!(" male ".parse::<Gender>(), Ok(Gender::Male));
        assert!("x".parse::<Gender>().is_err());
    }
}
