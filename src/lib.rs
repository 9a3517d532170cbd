//! Group Life Rating - pricing engine for group-life reinsurance schemes
//!
//! This library provides:
//! - Age nearest birthday, occupational class, and sum assured per member
//! - Per-member DAC and PTD premiums from injected rate tables
//! - Portfolio statistics (average and SA-weighted age, totals, data completeness)
//! - Free Cover Limit suggestion and claims-experience credibility

pub mod error;
pub mod census;
pub mod assumptions;
pub mod rating;
pub mod portfolio;
pub mod scheme;

// Re-export commonly used types
pub use error::{RatingError, Result};
pub use census::{Census, CensusColumns, ClaimRecord, ClaimsExperience, Gender, MemberRecord, SchemeStatus};
pub use assumptions::{OccupationClass, RateTables, RatingAssumptions};
pub use rating::{Benefit, BenefitSelection, MemberOutcome, PremiumResult, SaBasis, SalaryMultiple};
pub use portfolio::{CredibilityResult, FclResult, PortfolioStats};
pub use scheme::{QuoteRequest, SchemeQuote, SchemeRater};
