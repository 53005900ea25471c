use crate::book::validate_name;
use crate::iban::{check_iban, expected_check_digits};
use crate::info::{country_prefix, get_bank_name, get_iban_info};
use crate::models::IbanRecord;
use crate::reference::{is_known_country, UNKNOWN_BANK};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueLevel {
    Error,
    Warning,
}

#[derive(Debug, Clone)]
pub struct PreflightIssue {
    pub level: IssueLevel,
    /// 1-based data row.
    pub row: usize,
    /// `None` when the row could not be read as a record.
    pub record_id: Option<Uuid>,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct PreflightReport {
    pub total_records: usize,
    pub valid_records: usize,
    pub countries: Vec<String>,
    pub issues: Vec<PreflightIssue>,
}

impl PreflightReport {
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.level == IssueLevel::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.level == IssueLevel::Warning)
            .count()
    }
}

/// Audits a CSV book without dropping the rows `IbanBook::load_csv` would skip.
/// Rows that cannot be read as records are reported as errors.
pub fn preflight_csv(path: &Path) -> Result<PreflightReport, String> {
    let mut reader = csv::Reader::from_path(path).map_err(|err| err.to_string())?;
    let headers = reader.headers().map_err(|err| err.to_string())?.clone();
    let mut rows = Vec::new();
    let mut issues = Vec::new();
    let mut total_records = 0usize;

    for (idx, result) in reader.records().enumerate() {
        let raw = result.map_err(|err| err.to_string())?;
        total_records += 1;
        match raw.deserialize::<IbanRecord>(Some(&headers)) {
            Ok(record) => rows.push((idx + 1, record)),
            Err(err) => issues.push(PreflightIssue {
                level: IssueLevel::Error,
                row: idx + 1,
                record_id: None,
                message: format!("unreadable row: {}", err),
            }),
        }
    }

    let mut report = audit(rows.iter().map(|(row, record)| (*row, record)), total_records);
    issues.append(&mut report.issues);
    issues.sort_by_key(|issue| issue.row);
    report.issues = issues;
    Ok(report)
}

pub fn preflight_records(records: &[IbanRecord]) -> PreflightReport {
    audit(
        records.iter().enumerate().map(|(idx, record)| (idx + 1, record)),
        records.len(),
    )
}

fn audit<'a>(
    rows: impl Iterator<Item = (usize, &'a IbanRecord)>,
    total_records: usize,
) -> PreflightReport {
    let mut issues = Vec::new();
    let mut seen_ibans: HashMap<String, Uuid> = HashMap::new();
    let mut seen_ids: HashMap<Uuid, usize> = HashMap::new();
    let mut countries: BTreeSet<String> = BTreeSet::new();
    let mut valid_records = 0usize;

    for (row, record) in rows {
        let mut checker = RowChecker {
            row,
            record_id: record.id,
            issues: &mut issues,
            errors: 0,
        };
        validate_record(record, &mut checker);

        if let Some(first_row) = seen_ids.get(&record.id) {
            log::debug!("row {} reuses id {} from row {}", row, record.id, first_row);
            checker.push(IssueLevel::Error, "duplicate id");
        } else {
            seen_ids.insert(record.id, row);
        }

        if let Some(first) = seen_ibans.get(&record.iban) {
            log::debug!("{} duplicates {} ({})", record.id, first, record.iban);
            checker.push(IssueLevel::Error, "duplicate IBAN");
        } else {
            seen_ibans.insert(record.iban.clone(), record.id);
        }

        if checker.errors == 0 {
            valid_records += 1;
        }

        let country = country_prefix(&record.iban);
        if !country.is_empty() {
            countries.insert(country);
        }
    }

    PreflightReport {
        total_records,
        valid_records,
        countries: countries.into_iter().collect(),
        issues,
    }
}

struct RowChecker<'a> {
    row: usize,
    record_id: Uuid,
    issues: &'a mut Vec<PreflightIssue>,
    errors: usize,
}

impl RowChecker<'_> {
    fn push(&mut self, level: IssueLevel, message: impl Into<String>) {
        if level == IssueLevel::Error {
            self.errors += 1;
        }
        self.issues.push(PreflightIssue {
            level,
            row: self.row,
            record_id: Some(self.record_id),
            message: message.into(),
        });
    }
}

fn validate_record(record: &IbanRecord, checker: &mut RowChecker<'_>) {
    if record.created_at > record.updated_at {
        checker.push(IssueLevel::Error, "created_at is after updated_at");
    }

    if record.iban.trim().is_empty() {
        checker.push(IssueLevel::Error, "IBAN is required");
    } else {
        validate_iban_field(&record.iban, checker);
    }

    if let Err(reason) = validate_name(&record.name) {
        checker.push(IssueLevel::Error, reason);
    }
}

fn validate_iban_field(iban: &str, checker: &mut RowChecker<'_>) {
    match check_iban(iban) {
        Ok(canonical) => validate_bank(&canonical, checker),
        Err(reason) => {
            let message = match expected_check_digits(iban) {
                Some(expected) => format!("{} (expected check digits {})", reason, expected),
                None => reason,
            };
            checker.push(IssueLevel::Error, message);
        }
    }
}

fn validate_bank(canonical: &str, checker: &mut RowChecker<'_>) {
    let country = country_prefix(canonical);
    if !is_known_country(&country) {
        checker.push(
            IssueLevel::Warning,
            format!("no bank metadata for country {}", country),
        );
        return;
    }
    if country == "TR" && get_bank_name(canonical) == UNKNOWN_BANK {
        checker.push(
            IssueLevel::Warning,
            format!("unknown Turkish bank code {}", get_iban_info(canonical).bank_code),
        );
    }
}
