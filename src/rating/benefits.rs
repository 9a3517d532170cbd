//! Benefit catalogue and the scheme's benefit selection

use crate::error::{RatingError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// How a benefit's magnitude is expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MagnitudeKind {
    /// Percentage of the DAC sum assured
    PercentOfDac,
    /// Absolute currency limit per member
    CurrencyCap,
}

/// Benefits a scheme can include
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Benefit {
    #[serde(rename = "DAC")]
    Dac,
    #[serde(rename = "AccDeath")]
    AccidentalDeath,
    #[serde(rename = "PTD-Accident")]
    PtdAccident,
    #[serde(rename = "PTD-Sickness")]
    PtdSickness,
    #[serde(rename = "PPD")]
    Ppd,
    #[serde(rename = "TTD")]
    Ttd,
    #[serde(rename = "MedEx")]
    MedicalExpenses,
    #[serde(rename = "Repatriation")]
    Repatriation,
}

impl Benefit {
    pub const ALL: [Benefit; 8] = [
        Benefit::Dac,
        Benefit::AccidentalDeath,
        Benefit::PtdAccident,
        Benefit::PtdSickness,
        Benefit::Ppd,
        Benefit::Ttd,
        Benefit::MedicalExpenses,
        Benefit::Repatriation,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Benefit::Dac => "DAC",
            Benefit::AccidentalDeath => "AccDeath",
            Benefit::PtdAccident => "PTD-Accident",
            Benefit::PtdSickness => "PTD-Sickness",
            Benefit::Ppd => "PPD",
            Benefit::Ttd => "TTD",
            Benefit::MedicalExpenses => "MedEx",
            Benefit::Repatriation => "Repatriation",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Benefit::Dac => "Death Any Cause (DAC)",
            Benefit::AccidentalDeath => "Accidental Death (AccDeath)",
            Benefit::PtdAccident => "PTD – Accident",
            Benefit::PtdSickness => "PTD – Sickness",
            Benefit::Ppd => "PPD – Acc/Sick",
            Benefit::Ttd => "TTD – Acc/Sick",
            Benefit::MedicalExpenses => "Medical Expenses",
            Benefit::Repatriation => "Repatriation",
        }
    }

    pub fn kind(&self) -> MagnitudeKind {
        match self {
            Benefit::MedicalExpenses | Benefit::Repatriation => MagnitudeKind::CurrencyCap,
            _ => MagnitudeKind::PercentOfDac,
        }
    }

    /// Largest magnitude the benefit may be selected at
    pub fn max_magnitude(&self) -> f64 {
        match self {
            Benefit::Dac | Benefit::AccidentalDeath | Benefit::Ttd => 100.0,
            Benefit::PtdAccident | Benefit::PtdSickness | Benefit::Ppd => 200.0,
            Benefit::MedicalExpenses => 10_000.0,
            Benefit::Repatriation => 5_000.0,
        }
    }

    pub fn is_ptd(&self) -> bool {
        matches!(self, Benefit::PtdAccident | Benefit::PtdSickness)
    }

    /// Whether a rate table exists to price this benefit
    pub fn is_rated(&self) -> bool {
        matches!(self, Benefit::Dac) || self.is_ptd()
    }
}

impl fmt::Display for Benefit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Benefit {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim();
        Benefit::ALL
            .into_iter()
            .find(|b| b.code().eq_ignore_ascii_case(wanted) || b.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown benefit: {}", wanted))
    }
}

/// Benefits selected for a scheme with their magnitudes
///
/// DAC is always present at 100%. A zero percentage means the benefit is
/// not selected; a zero currency cap keeps the benefit with a nil limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<Benefit, f64>", into = "BTreeMap<Benefit, f64>")]
pub struct BenefitSelection {
    selected: BTreeMap<Benefit, f64>,
}

impl BenefitSelection {
    /// DAC only
    pub fn new() -> Self {
        let mut selected = BTreeMap::new();
        selected.insert(Benefit::Dac, 100.0);
        Self { selected }
    }

    /// Builder form of `select`
    pub fn with(mut self, benefit: Benefit, magnitude: f64) -> Result<Self> {
        self.select(benefit, magnitude)?;
        Ok(self)
    }

    pub fn select(&mut self, benefit: Benefit, magnitude: f64) -> Result<()> {
        let max = benefit.max_magnitude();
        let out_of_bounds = !magnitude.is_finite() || magnitude < 0.0 || magnitude > max;
        let bad_dac = benefit == Benefit::Dac && magnitude != 100.0;
        if out_of_bounds || bad_dac {
            return Err(RatingError::BenefitLimit {
                benefit: benefit.code().to_string(),
                magnitude,
                max,
            });
        }

        if magnitude == 0.0 && benefit.kind() == MagnitudeKind::PercentOfDac {
            self.selected.remove(&benefit);
        } else {
            self.selected.insert(benefit, magnitude);
        }
        Ok(())
    }

    pub fn remove(&mut self, benefit: Benefit) -> Result<()> {
        if benefit == Benefit::Dac {
            return Err(RatingError::MandatoryBenefit);
        }
        self.selected.remove(&benefit);
        Ok(())
    }

    pub fn magnitude(&self, benefit: Benefit) -> Option<f64> {
        self.selected.get(&benefit).copied()
    }

    pub fn contains(&self, benefit: Benefit) -> bool {
        self.selected.contains_key(&benefit)
    }

    /// PTD percentage to rate, the larger of the two variants when both are selected
    pub fn ptd_percentage(&self) -> Option<f64> {
        [Benefit::PtdAccident, Benefit::PtdSickness]
            .into_iter()
            .filter_map(|b| self.magnitude(b))
            .reduce(f64::max)
    }

    /// Selected benefits that no rate table prices
    pub fn unrated(&self) -> Vec<Benefit> {
        self.selected.keys().copied().filter(|b| !b.is_rated()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Benefit, f64)> + '_ {
        self.selected.iter().map(|(b, m)| (*b, *m))
    }

    /// One display line per selected benefit
    pub fn summary(&self) -> Vec<String> {
        self.iter()
            .map(|(benefit, magnitude)| match benefit.kind() {
                MagnitudeKind::CurrencyCap => format!("{}: ${}", benefit.code(), magnitude),
                MagnitudeKind::PercentOfDac if benefit == Benefit::Dac => {
                    format!("{}: {}% of DAC", benefit.code(), magnitude)
                }
                MagnitudeKind::PercentOfDac => format!("{}: {}% of DAC", benefit.label(), magnitude),
            })
            .collect()
    }
}

impl Default for BenefitSelection {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<BTreeMap<Benefit, f64>> for BenefitSelection {
    type Error = RatingError;

    fn try_from(map: BTreeMap<Benefit, f64>) -> Result<Self> {
        map.into_iter()
            .try_fold(Self::new(), |selection, (benefit, magnitude)| selection.with(benefit, magnitude))
    }
}

impl From<BenefitSelection> for BTreeMap<Benefit, f64> {
    fn from(selection: BenefitSelection) -> Self {
        selection.selected
    }
}
