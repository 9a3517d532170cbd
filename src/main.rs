//! Group Life Rating CLI
//!
//! Command-line interface for pricing a scheme from a census CSV

use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use group_life_rating::census::{load_census, load_claims};
use group_life_rating::rating::PremiumLine;
use group_life_rating::{
    Benefit, BenefitSelection, ClaimsExperience, MemberOutcome, QuoteRequest, SaBasis, SalaryMultiple,
    SchemeRater, SchemeStatus,
};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BasisArg {
    File,
    Salary,
    Flat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StatusArg {
    Virgin,
    Clean,
}

/// Price a group-life scheme from a member census
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Census CSV (dob, and salary or sa depending on the basis)
    #[arg(long)]
    census: PathBuf,

    /// Sum assured basis
    #[arg(long, value_enum, default_value_t = BasisArg::Salary)]
    sa_basis: BasisArg,

    /// Salary multiple for the salary basis (12 or 24)
    #[arg(long, default_value_t = 12)]
    multiple: u32,

    /// Sum assured for every member on the flat basis
    #[arg(long)]
    flat_amount: Option<f64>,

    /// Optional benefit as CODE=MAGNITUDE, e.g. PTD-Sickness=150 or MedEx=10000
    #[arg(long = "benefit")]
    benefits: Vec<String>,

    /// Claims CSV (underwriting_year, amount, benefit_type)
    #[arg(long, conflicts_with = "scheme_status")]
    claims: Option<PathBuf>,

    /// Scheme status when no claims listing is available
    #[arg(long, value_enum)]
    scheme_status: Option<StatusArg>,

    /// Reference date for ages (YYYY-MM-DD, default today)
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Directory holding death_rates.csv and disability_rates.csv
    #[arg(long)]
    tables: Option<PathBuf>,

    /// Print the full quote as JSON
    #[arg(long)]
    json: bool,
}

fn parse_benefits(specs: &[String]) -> anyhow::Result<BenefitSelection> {
    let mut selection = BenefitSelection::new();
    for spec in specs {
        let Some((code, magnitude)) = spec.split_once('=') else {
            bail!("benefit {:?} must look like CODE=MAGNITUDE", spec);
        };
        let benefit: Benefit = code.parse().map_err(anyhow::Error::msg)?;
        let magnitude: f64 = magnitude
            .trim()
            .parse()
            .with_context(|| format!("magnitude for {}", benefit))?;
        selection.select(benefit, magnitude)?;
    }
    Ok(selection)
}

fn build_request(args: &Args) -> anyhow::Result<QuoteRequest> {
    let sa_basis = match args.sa_basis {
        BasisArg::File => SaBasis::File,
        BasisArg::Salary => SaBasis::SalaryMultiple {
            multiple: SalaryMultiple::try_from(args.multiple).map_err(anyhow::Error::msg)?,
        },
        BasisArg::Flat => match args.flat_amount {
            Some(flat_amount) => SaBasis::Flat { flat_amount },
            None => bail!("--flat-amount is required with --sa-basis flat"),
        },
    };

    let claims = match (&args.claims, args.scheme_status) {
        (Some(path), _) => ClaimsExperience::Claims(
            load_claims(path).with_context(|| format!("loading claims from {}", path.display()))?,
        ),
        (None, Some(StatusArg::Virgin)) => ClaimsExperience::Status(SchemeStatus::Virgin),
        (None, Some(StatusArg::Clean)) => ClaimsExperience::Status(SchemeStatus::Clean),
        (None, None) => ClaimsExperience::NotProvided,
    };

    Ok(QuoteRequest {
        sa_basis,
        benefits: parse_benefits(&args.benefits)?,
        claims,
        reference_date: args.as_of,
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let rater = match &args.tables {
        Some(dir) => SchemeRater::from_csv_path(dir)
            .with_context(|| format!("loading rate tables from {}", dir.display()))?,
        None => SchemeRater::new(),
    };

    let census = load_census(&args.census)
        .with_context(|| format!("loading census from {}", args.census.display()))?;
    let request = build_request(&args)?;
    let quote = rater.quote(&census, &request)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&quote)?);
        return Ok(());
    }

    println!("Group Life Rating v{}", env!("CARGO_PKG_VERSION"));
    println!("========================\n");
    println!("Reference date: {}", quote.reference_date);
    println!("SA basis:       {}", quote.sa_basis);
    println!("\nSelected benefits:");
    for line in quote.benefits.summary() {
        println!("  {}", line);
    }
    if !quote.unrated_benefits.is_empty() {
        let codes: Vec<_> = quote.unrated_benefits.iter().map(Benefit::code).collect();
        println!("  (no rate table yet: {})", codes.join(", "));
    }
    println!();

    println!("{:>8} {:>4} {:>6} {:>5} {:>14} {:>12} {:>12}", "Member", "Age", "Gender", "Class", "SA", "DAC", "PTD");
    println!("{}", "-".repeat(70));
    for outcome in &quote.members {
        match outcome {
            MemberOutcome::Rated(r) => println!(
                "{:>8} {:>4} {:>6} {:>5} {:>14.2} {:>12.2} {:>12}",
                r.member_id,
                r.age,
                format!("{:?}", r.gender),
                r.occupation_class.number(),
                r.sum_assured,
                r.premium(PremiumLine::Dac).unwrap_or(0.0),
                r.premium(PremiumLine::Ptd).map_or("-".to_string(), |p| format!("{:.2}", p)),
            ),
            MemberOutcome::Excluded(e) => println!("{:>8} excluded: {}", e.member_id, e.detail),
        }
    }

    let stats = &quote.stats;
    println!("\nPortfolio:");
    println!("  Members rated:     {} ({} excluded)", stats.member_count, stats.excluded_count);
    println!("  Average age:       {:.2}", stats.average_age);
    println!("  Weighted age:      {:.2}", stats.weighted_age);
    println!("  Total SA:          ${:.2}", stats.total_sum_assured);
    println!("  Average SA:        ${:.2}", stats.average_sum_assured);
    println!("  Missing gender:    {:?}", stats.missing_gender);
    println!("  Missing job title: {:?}", stats.missing_occupation);
    println!("  Total premium:     ${:.2} (DAC {:.2}, PTD {:.2})", stats.total_premium, stats.total_dac_premium, stats.total_ptd_premium);

    println!("\nFree Cover Limit:");
    println!("  Factor:            {:.2}x average SA", quote.fcl.factor);
    println!("  Age penalty:       {}", if quote.fcl.age_penalty_applied { "applied" } else { "none" });
    println!("  Suggested FCL:     ${:.2}", quote.fcl.fcl);

    let cred = &quote.credibility;
    println!("\nCredibility:");
    println!("  Years of claims:   {}", cred.years_of_experience);
    println!("  Claims paid:       ${:.2}", cred.total_claims_paid);
    println!("  Base + bonus:      {:.0}% + {:.0}%", cred.base, cred.bonus);
    println!("  Credibility:       {:.0}%", cred.credibility);

    Ok(())
}
