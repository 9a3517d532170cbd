//! Load a census and a claims list from CSV
//!
//! Headers are matched case-insensitively against a small set of aliases.
//! Blank cells become `None`; cells that fail to parse are logged and also
//! treated as blank so that a single bad cell never rejects the file.

use super::{Census, CensusColumns, ClaimRecord, Gender, MemberRecord};
use crate::error::Result;
use crate::rating::Benefit;
use csv::{Reader, StringRecord};
use log::warn;
use std::path::Path;

const ID_HEADERS: &[&str] = &["id", "member_id", "member id", "employee_id"];
const DOB_HEADERS: &[&str] = &["dob", "date_of_birth", "date of birth", "birth_date"];
const GENDER_HEADERS: &[&str] = &["gender", "sex"];
const JOB_HEADERS: &[&str] = &["job_title", "job title", "occupation", "job"];
const SALARY_HEADERS: &[&str] = &["salary", "monthly_salary", "monthly salary"];
const SA_HEADERS: &[&str] = &["sa", "sum_assured", "sum assured"];

const UWY_HEADERS: &[&str] = &["underwriting_year", "uwy", "underwriting year", "year"];
const AMOUNT_HEADERS: &[&str] = &["amount", "amount_paid", "amount paid", "claim_amount"];
const BENEFIT_HEADERS: &[&str] = &["benefit_type", "benefit", "benefit type"];

fn find_column(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| aliases.contains(&h.trim().to_ascii_lowercase().as_str()))
}

fn cell<'a>(record: &'a StringRecord, idx: Option<usize>) -> Option<&'a str> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn parse_amount(raw: Option<&str>, row: usize, field: &str) -> Option<f64> {
    let raw = raw?;
    match raw.replace(',', "").parse::<f64>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("row {}: unparsable {} {:?}, treated as blank", row, field, raw);
            None
        }
    }
}

/// Load a census from a CSV file
pub fn load_census<P: AsRef<Path>>(path: P) -> Result<Census> {
    let reader = Reader::from_path(path)?;
    read_census(reader)
}

/// Load a census from any reader (e.g., string buffer, upload stream)
pub fn load_census_from_reader<R: std::io::Read>(reader: R) -> Result<Census> {
    read_census(Reader::from_reader(reader))
}

fn read_census<R: std::io::Read>(mut reader: Reader<R>) -> Result<Census> {
    let headers = reader.headers()?.clone();

    let id_col = find_column(&headers, ID_HEADERS);
    let dob_col = find_column(&headers, DOB_HEADERS);
    let gender_col = find_column(&headers, GENDER_HEADERS);
    let job_col = find_column(&headers, JOB_HEADERS);
    let salary_col = find_column(&headers, SALARY_HEADERS);
    let sa_col = find_column(&headers, SA_HEADERS);

    let columns = CensusColumns {
        gender: gender_col.is_some(),
        job_title: job_col.is_some(),
        salary: salary_col.is_some(),
        sum_assured: sa_col.is_some(),
    };

    let mut members = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let row = idx + 1;

        let gender = cell(&record, gender_col).and_then(|g| match g.parse::<Gender>() {
            Ok(gender) => Some(gender),
            Err(e) => {
                warn!("row {}: {}, treated as blank", row, e);
                None
            }
        });

        members.push(MemberRecord {
            member_id: cell(&record, id_col).map(str::to_string),
            dob: cell(&record, dob_col).map(str::to_string),
            gender,
            job_title: cell(&record, job_col).map(str::to_string),
            salary: parse_amount(cell(&record, salary_col), row, "salary"),
            sum_assured: parse_amount(cell(&record, sa_col), row, "sum assured"),
        });
    }

    Ok(Census::new(members, columns))
}

/// Load a claims list from a CSV file
pub fn load_claims<P: AsRef<Path>>(path: P) -> Result<Vec<ClaimRecord>> {
    read_claims(Reader::from_path(path)?)
}

pub fn load_claims_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<ClaimRecord>> {
    read_claims(Reader::from_reader(reader))
}

fn read_claims<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<ClaimRecord>> {
    let headers = reader.headers()?.clone();
    let uwy_col = find_column(&headers, UWY_HEADERS);
    let amount_col = find_column(&headers, AMOUNT_HEADERS);
    let benefit_col = find_column(&headers, BENEFIT_HEADERS);

    let mut claims = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let row = idx + 1;

        let Some(year) = cell(&record, uwy_col) else {
            warn!("claims row {}: no underwriting year, skipped", row);
            continue;
        };
        let benefit_type = match cell(&record, benefit_col).map(str::parse::<Benefit>) {
            Some(Ok(benefit)) => benefit,
            Some(Err(e)) => {
                warn!("claims row {}: {}, recorded as DAC", row, e);
                Benefit::Dac
            }
            None => Benefit::Dac,
        };

        claims.push(ClaimRecord {
            underwriting_year: year.to_string(),
            amount_paid: parse_amount(cell(&record, amount_col), row, "amount").unwrap_or(0.0).max(0.0),
            benefit_type,
        });
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_census_from_reader() {
        let data = "\
Member_ID,DOB,Gender,Job Title,Salary
,1990-03-01,M,Senior Mechanic,\"12,000\"
A2,1985-07-15,,Clerk,9000
,bad-date,Female,,abc
";
        let census = load_census_from_reader(data.as_bytes()).unwrap();

        assert_eq!(census.len(), 3);
        assert!(census.columns.gender);
        assert!(census.columns.job_title);
        assert!(census.columns.salary);
        assert!(!census.columns.sum_assured);

        let m1 = &census.members[0];
        assert_eq!(m1.id(), "1");
        assert_eq!(m1.salary, Some(12_000.0));
        assert_eq!(m1.gender, Some(Gender::Male));

        assert_eq!(census.members[1].id(), "A2");
        assert_eq!(census.members[1].gender, None);

        let m3 = &census.members[2];
        assert_eq!(m3.dob.as_deref(), Some("bad-date"));
        assert_eq!(m3.salary, None);
        assert_eq!(m3.job_title, None);
    }

    #[test]
    fn test_load_claims_from_reader() {
        let data = "\
UWY,Amount,Benefit
2021,15000,DAC
2022,4000,PTD-Sickness
,100,DAC
2022,-5,unknown
";
        let claims = load_claims_from_reader(data.as_bytes()).unwrap();

        assert_eq!(claims.len(), 3);
        assert_eq!(claims[1].benefit_type, Benefit::PtdSickness);
        assert_eq!(claims[2].benefit_type, Benefit::Dac);
        assert_eq!(claims[2].amount_paid, 0.0);
    }
}
