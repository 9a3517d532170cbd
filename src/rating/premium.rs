//! Per-member premium calculation
//!
//! DAC premium = death rate x SA / 1000.
//! PTD premium = disability rate x (1 + occupation loading) x PTD% x SA / 1000,
//! only when a PTD variant is selected and the age lies inside the
//! disability table. Other benefits have no rate table yet and add no line.

use super::age::AgeBasis;
use super::benefits::BenefitSelection;
use super::round2;
use super::sum_assured::SumAssuredResolver;
use crate::assumptions::{OccupationClass, OccupationScheme, RateTables};
use crate::census::{Gender, MemberRecord};
use crate::error::{ExclusionReason, RatingError, Result};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Premium categories that carry a rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PremiumLine {
    Dac,
    Ptd,
}

/// Rated output for one member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumResult {
    pub member_id: String,
    pub age: u8,
    pub gender: Gender,
    pub occupation_class: OccupationClass,
    pub sum_assured: f64,
    pub premiums: BTreeMap<PremiumLine, f64>,

    /// Gender cell present in the census
    pub gender_supplied: bool,
    /// Job title cell present in the census
    pub job_title_supplied: bool,
}

impl PremiumResult {
    pub fn premium(&self, line: PremiumLine) -> Option<f64> {
        self.premiums.get(&line).copied()
    }

    pub fn total_premium(&self) -> f64 {
        round2(self.premiums.values().sum())
    }
}

/// A member left out of rating, with the reason
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedMember {
    pub member_id: String,
    pub reason: ExclusionReason,
    pub detail: String,
}

/// Outcome of rating one member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MemberOutcome {
    Rated(PremiumResult),
    Excluded(ExcludedMember),
}

impl MemberOutcome {
    pub fn member_id(&self) -> &str {
        match self {
            MemberOutcome::Rated(r) => &r.member_id,
            MemberOutcome::Excluded(e) => &e.member_id,
        }
    }

    pub fn as_rated(&self) -> Option<&PremiumResult> {
        match self {
            MemberOutcome::Rated(r) => Some(r),
            MemberOutcome::Excluded(_) => None,
        }
    }
}

/// Premium lines for a member whose age, class and SA are already known
pub fn premium_lines(
    rates: &RateTables,
    age: u8,
    gender: Gender,
    class: OccupationClass,
    sum_assured: f64,
    benefits: &BenefitSelection,
) -> BTreeMap<PremiumLine, f64> {
    let mut lines = BTreeMap::new();

    let dac = rates.death_rate(age, gender) * sum_assured / 1000.0;
    lines.insert(PremiumLine::Dac, round2(dac));

    if let Some(ptd_pct) = benefits.ptd_percentage() {
        if rates.disability_table().covers(age) {
            let loading = 1.0 + rates.occupation_loading(class);
            let ptd = rates.disability_rate(age) * loading * (ptd_pct / 100.0) * sum_assured / 1000.0;
            lines.insert(PremiumLine::Ptd, round2(ptd));
        }
    }

    lines
}

/// Rates members one at a time against fixed tables and benefits
pub struct PremiumCalculator<'a> {
    rates: &'a RateTables,
    occupations: &'a OccupationScheme,
    ages: AgeBasis,
    resolver: SumAssuredResolver,
    benefits: &'a BenefitSelection,
    reference_date: NaiveDate,
}

impl<'a> PremiumCalculator<'a> {
    pub fn new(
        rates: &'a RateTables,
        occupations: &'a OccupationScheme,
        ages: AgeBasis,
        resolver: SumAssuredResolver,
        benefits: &'a BenefitSelection,
        reference_date: NaiveDate,
    ) -> Self {
        Self {
            rates,
            occupations,
            ages,
            resolver,
            benefits,
            reference_date,
        }
    }

    /// Rate one member; row-level problems become an `Excluded` outcome
    ///
    /// Any other error aborts the batch and is returned as-is.
    pub fn rate_member(&self, member: &MemberRecord) -> Result<MemberOutcome> {
        let err = match self.try_rate(member) {
            Ok(result) => {
                debug!(
                    "member {}: age {} class {} SA {:.2} premium {:.2}",
                    result.member_id,
                    result.age,
                    result.occupation_class.number(),
                    result.sum_assured,
                    result.total_premium()
                );
                return Ok(MemberOutcome::Rated(result));
            }
            Err(err) => err,
        };
        let Some(reason) = ExclusionReason::from_error(&err) else {
            return Err(err);
        };
        Ok(MemberOutcome::Excluded(ExcludedMember {
            member_id: member.id().to_string(),
            reason,
            detail: err.to_string(),
        }))
    }

    fn try_rate(&self, member: &MemberRecord) -> Result<PremiumResult> {
        let age = self.ages.rating_age(member.dob.as_deref(), self.reference_date)?;
        let gender = member.gender_or_default();

        let death_table = self.rates.death_table(gender);
        if !death_table.covers(age) {
            return Err(RatingError::OutOfRangeAge {
                age: i32::from(age),
                min: death_table.min_age(),
                max: death_table.max_age(),
            });
        }

        let sum_assured = self.resolver.resolve(member)?;
        let occupation_class = self.occupations.classify(member.job_title_or_default());

        Ok(PremiumResult {
            member_id: member.id().to_string(),
            age,
            gender,
            occupation_class,
            sum_assured,
            premiums: premium_lines(self.rates, age, gender, occupation_class, sum_assured, self.benefits),
            gender_supplied: member.gender.is_some(),
            job_title_supplied: member.has_job_title(),
        })
    }
}
