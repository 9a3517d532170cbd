//! Sum assured resolution under the scheme's configured basis

use crate::census::{CensusColumns, MemberRecord};
use crate::error::{RatingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Salary multiples offered on the salary basis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum SalaryMultiple {
    Twelve,
    TwentyFour,
}

impl SalaryMultiple {
    pub fn factor(&self) -> f64 {
        match self {
            SalaryMultiple::Twelve => 12.0,
            SalaryMultiple::TwentyFour => 24.0,
        }
    }
}

impl TryFrom<u32> for SalaryMultiple {
    type Error = String;

    fn try_from(value: u32) -> std::result::Result<Self, Self::Error> {
        match value {
            12 => Ok(SalaryMultiple::Twelve),
            24 => Ok(SalaryMultiple::TwentyFour),
            other => Err(format!("salary multiple must be 12 or 24, got {}", other)),
        }
    }
}

impl From<SalaryMultiple> for u32 {
    fn from(value: SalaryMultiple) -> Self {
        value.factor() as u32
    }
}

/// How each member's sum assured is determined
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SaBasis {
    /// Use the sum assured carried in the census
    File,
    /// Salary times a fixed multiple
    SalaryMultiple { multiple: SalaryMultiple },
    /// Same amount for every member
    Flat { flat_amount: f64 },
}

impl fmt::Display for SaBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaBasis::File => write!(f, "file-supplied"),
            SaBasis::SalaryMultiple { multiple } => write!(f, "salary x {}", multiple.factor()),
            SaBasis::Flat { flat_amount } => write!(f, "flat {:.2}", flat_amount),
        }
    }
}

/// Resolves sum assured per member
#[derive(Debug, Clone, Copy)]
pub struct SumAssuredResolver {
    basis: SaBasis,
}

impl SumAssuredResolver {
    pub fn new(basis: SaBasis) -> Self {
        Self { basis }
    }

    pub fn basis(&self) -> SaBasis {
        self.basis
    }

    /// Check the census can support this basis at all
    pub fn validate(&self, columns: &CensusColumns) -> Result<()> {
        match self.basis {
            SaBasis::File if !columns.sum_assured => Err(RatingError::MissingInput {
                column: "sum_assured",
                basis: self.basis.to_string(),
            }),
            SaBasis::SalaryMultiple { .. } if !columns.salary => Err(RatingError::MissingInput {
                column: "salary",
                basis: self.basis.to_string(),
            }),
            SaBasis::Flat { flat_amount } if !flat_amount.is_finite() || flat_amount < 0.0 => {
                Err(RatingError::MissingInput {
                    column: "flat_amount",
                    basis: self.basis.to_string(),
                })
            }
            _ => Ok(()),
        }
    }

    /// Sum assured for one member
    ///
    /// Only the file basis can fail per row, when that member's cell is blank
    /// or negative. Blank salaries count as zero.
    pub fn resolve(&self, member: &MemberRecord) -> Result<f64> {
        match self.basis {
            SaBasis::File => member
                .sum_assured
                .filter(|sa| sa.is_finite() && *sa >= 0.0)
                .ok_or(RatingError::MissingSumAssured),
            SaBasis::SalaryMultiple { multiple } => Ok(member.salary_or_default() * multiple.factor()),
            SaBasis::Flat { flat_amount } => Ok(flat_amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(salary: bool, sum_assured: bool) -> CensusColumns {
        CensusColumns { salary, sum_assured, ..CensusColumns::all() }
    }

    #[test]
    fn test_salary_multiple() {
        let resolver = SumAssuredResolver::new(SaBasis::SalaryMultiple { multiple: SalaryMultiple::TwentyFour });
        let member = MemberRecord::new("1990-01-01").with_salary(10_000.0);
        assert_eq!(resolver.resolve(&member).unwrap(), 240_000.0);

        // blank salary defaults to zero rather than failing
        assert_eq!(resolver.resolve(&MemberRecord::new("1990-01-01")).unwrap(), 0.0);
    }

    #[test]
    fn test_file_and_flat() {
        let file = SumAssuredResolver::new(SaBasis::File);
        let member = MemberRecord::new("1990-01-01").with_sum_assured(50_000.0);
        assert_eq!(file.resolve(&member).unwrap(), 50_000.0);
        assert!(matches!(
            file.resolve(&MemberRecord::new("1990-01-01")),
            Err(RatingError::MissingSumAssured)
        ));

        let flat = SumAssuredResolver::new(SaBasis::Flat { flat_amount: 25_000.0 });
        assert_eq!(flat.resolve(&member).unwrap(), 25_000.0);
    }

    #[test]
    fn test_missing_column_fails_batch() {
        let file = SumAssuredResolver::new(SaBasis::File);
        assert!(matches!(
            file.validate(&columns(true, false)),
            Err(RatingError::MissingInput { column: "sum_assured", .. })
        ));

        let salary = SumAssuredResolver::new(SaBasis::SalaryMultiple { multiple: SalaryMultiple::Twelve });
        assert!(matches!(
            salary.validate(&columns(false, true)),
            Err(RatingError::MissingInput { column: "salary", .. })
        ));
        assert!(salary.validate(&columns(true, false)).is_ok());

        let flat = SumAssuredResolver::new(SaBasis::Flat { flat_amount: 10_000.0 });
        assert!(flat.validate(&columns(false, false)).is_ok());
    }

    #[test]
    fn test_basis_json() {
        let basis: SaBasis = serde_json::from_str(r#"{"mode":"salary_multiple","multiple":24}"#).unwrap();
        assert_eq!(basis, SaBasis::SalaryMultiple { multiple: SalaryMultiple::TwentyFour });

        let basis: SaBasis = serde_json::from_str(r#"{"mode":"flat","flat_amount":30000}"#).unwrap();
        assert_eq!(basis, SaBasis::Flat { flat_amount: 30_000.0 });

        assert!(serde_json::from_str::<SaBasis>(r#"{"mode":"salary_multiple","multiple":18}"#).is_err());
    }
}
