//! Census data: insured members, claims experience, and CSV loading

mod member;
mod claims;
pub mod loader;

pub use member::{Census, CensusColumns, Gender, MemberRecord, DEFAULT_JOB_TITLE};
pub use claims::{ClaimRecord, ClaimsExperience, SchemeStatus};
pub use loader::{load_census, load_census_from_reader, load_claims, load_claims_from_reader};
