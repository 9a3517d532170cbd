//! Scheme rater: runs a census through the full pricing pipeline
//!
//! Pre-loads assumptions once, then rates any number of census/benefit
//! combinations against them. Members are rated independently in parallel
//! and combined only through the portfolio reduction.

use crate::assumptions::RatingAssumptions;
use crate::census::{Census, ClaimsExperience};
use crate::error::Result;
use crate::portfolio::{CredibilityResult, FclResult, PortfolioStats};
use crate::rating::{Benefit, BenefitSelection, MemberOutcome, PremiumCalculator, PremiumResult, SaBasis, SumAssuredResolver};
use chrono::{Local, NaiveDate};
use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything a quote needs besides the census
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub sa_basis: SaBasis,

    #[serde(default)]
    pub benefits: BenefitSelection,

    /// Snapshot of the caller's claims list or a scheme status
    #[serde(default)]
    pub claims: ClaimsExperience,

    /// "As of" date for ages (default: today)
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}

impl QuoteRequest {
    /// DAC-only request with no claims information
    pub fn new(sa_basis: SaBasis) -> Self {
        Self {
            sa_basis,
            benefits: BenefitSelection::new(),
            claims: ClaimsExperience::NotProvided,
            reference_date: None,
        }
    }
}

/// Full pricing output for one scheme
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemeQuote {
    pub reference_date: NaiveDate,
    pub sa_basis: SaBasis,
    pub benefits: BenefitSelection,
    /// Selected benefits with no rate table, priced at nothing
    pub unrated_benefits: Vec<Benefit>,
    /// One outcome per census member, in census order
    pub members: Vec<MemberOutcome>,
    pub stats: PortfolioStats,
    pub fcl: FclResult,
    pub credibility: CredibilityResult,
}

impl SchemeQuote {
    pub fn rated(&self) -> impl Iterator<Item = &PremiumResult> {
        self.members.iter().filter_map(MemberOutcome::as_rated)
    }
}

/// Pre-loaded rater for pricing schemes
#[derive(Debug, Clone)]
pub struct SchemeRater {
    assumptions: RatingAssumptions,
}

impl SchemeRater {
    /// Create rater with the default schedule
    pub fn new() -> Self {
        Self {
            assumptions: RatingAssumptions::default_schedule(),
        }
    }

    /// Create rater by loading rate tables from CSV files
    pub fn from_csv() -> Result<Self> {
        Ok(Self {
            assumptions: RatingAssumptions::from_csv()?,
        })
    }

    /// Create rater from a specific rate table directory
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        Ok(Self {
            assumptions: RatingAssumptions::from_csv_path(path)?,
        })
    }

    pub fn with_assumptions(assumptions: RatingAssumptions) -> Self {
        Self { assumptions }
    }

    pub fn assumptions(&self) -> &RatingAssumptions {
        &self.assumptions
    }

    /// Rate every member; fails only if the census cannot support the SA basis
    pub fn rate_members(
        &self,
        census: &Census,
        sa_basis: SaBasis,
        benefits: &BenefitSelection,
        reference_date: NaiveDate,
    ) -> Result<Vec<MemberOutcome>> {
        let resolver = SumAssuredResolver::new(sa_basis);
        resolver.validate(&census.columns)?;

        let calculator = PremiumCalculator::new(
            &self.assumptions.rates,
            &self.assumptions.occupations,
            self.assumptions.ages,
            resolver,
            benefits,
            reference_date,
        );

        let outcomes: Vec<MemberOutcome> = census
            .members
            .par_iter()
            .map(|member| calculator.rate_member(member))
            .collect::<Result<_>>()?;

        for outcome in &outcomes {
            if let MemberOutcome::Excluded(excluded) = outcome {
                warn!("member {} excluded: {}", excluded.member_id, excluded.detail);
            }
        }

        Ok(outcomes)
    }

    /// Price a scheme end to end
    pub fn quote(&self, census: &Census, request: &QuoteRequest) -> Result<SchemeQuote> {
        let reference_date = request
            .reference_date
            .unwrap_or_else(|| Local::now().date_naive());

        let members = self.rate_members(census, request.sa_basis, &request.benefits, reference_date)?;

        let rated: Vec<PremiumResult> = members.iter().filter_map(MemberOutcome::as_rated).cloned().collect();
        let excluded = members.len() - rated.len();
        let stats = PortfolioStats::aggregate(&rated, &census.columns, excluded);
        let fcl = self.assumptions.fcl.suggest(&stats);
        let credibility = self.assumptions.credibility.assess(&request.claims, &stats);

        info!(
            "rated {} of {} members as of {}: premium {:.2}, FCL {:.2}, credibility {:.0}%",
            stats.member_count,
            census.len(),
            reference_date,
            stats.total_premium,
            fcl.fcl,
            credibility.credibility
        );

        Ok(SchemeQuote {
            reference_date,
            sa_basis: request.sa_basis,
            benefits: request.benefits.clone(),
            unrated_benefits: request.benefits.unrated(),
            members,
            stats,
            fcl,
            credibility,
        })
    }
}

impl Default for SchemeRater {
    fn default() -> Self {
        Self::new()
    }
}
