//! Member-level rating: age, sum assured, benefits, and premiums

mod age;
mod sum_assured;
mod benefits;
mod premium;

pub use age::{nearest_age, parse_date, AgeBasis};
pub use sum_assured::{SaBasis, SalaryMultiple, SumAssuredResolver};
pub use benefits::{Benefit, BenefitSelection, MagnitudeKind};
pub use premium::{premium_lines, ExcludedMember, MemberOutcome, PremiumCalculator, PremiumLine, PremiumResult};

/// Round half away from zero to cents
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
