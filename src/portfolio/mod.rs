//! Portfolio-level results: statistics, free cover limit, credibility

mod stats;
mod fcl;
mod credibility;

pub use stats::{weighted_age, MissingCount, PortfolioStats};
pub use fcl::{FclResult, FclScale, FclStep};
pub use credibility::{CredibilityBracket, CredibilityResult, CredibilityTable};
