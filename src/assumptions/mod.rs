//! Rating assumptions: rate tables, occupation classes, and portfolio scales
//!
//! Every table is injected configuration. `default_schedule` carries the
//! documented defaults; recalibrated tables are swapped in at construction.

mod rates;
mod occupation;
pub mod loader;

pub use rates::{AgeRateTable, RateTables};
pub use occupation::{OccupationClass, OccupationScheme};
pub use loader::LoadedRates;

use crate::error::Result;
use crate::portfolio::{CredibilityTable, FclScale};
use crate::rating::AgeBasis;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Container for all rating assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingAssumptions {
    pub rates: RateTables,
    pub occupations: OccupationScheme,
    pub ages: AgeBasis,
    pub fcl: FclScale,
    pub credibility: CredibilityTable,
}

impl RatingAssumptions {
    /// Create assumptions with the default group-life schedule
    pub fn default_schedule() -> Self {
        Self {
            rates: RateTables::default_schedule(),
            occupations: OccupationScheme::default_keywords(),
            ages: AgeBasis::default(),
            fcl: FclScale::default_scale(),
            credibility: CredibilityTable::default_table(),
        }
    }

    /// Load rate tables from CSV files in the default location (data/rates/)
    pub fn from_csv() -> Result<Self> {
        Self::from_csv_path(Path::new(loader::DEFAULT_RATES_PATH))
    }

    /// Load rate tables from a specific directory; other tables keep their defaults
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let loaded = LoadedRates::load_from(path)?;

        Ok(Self {
            rates: RateTables::from_loaded(&loaded),
            ..Self::default_schedule()
        })
    }
}

impl Default for RatingAssumptions {
    fn default() -> Self {
        Self::default_schedule()
    }
}
