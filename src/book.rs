use crate::iban::{check_iban, normalize};
use crate::info::country_prefix;
use crate::models::{Category, IbanRecord, CSV_HEADERS};
use chrono::Utc;
use csv::StringRecord;
use std::collections::BTreeSet;
use std::fs::create_dir_all;
use std::path::Path;
use uuid::Uuid;

/// Checks the user-editable fields of a record and returns the canonical IBAN.
pub fn validate_record_fields(iban: &str, name: &str) -> Result<String, String> {
    if iban.trim().is_empty() {
        return Err("IBAN is required".to_string());
    }
    let canonical = check_iban(iban)?;
    validate_name(name)?;
    Ok(canonical)
}

pub fn validate_name(name: &str) -> Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("name is required".to_string());
    }
    if name.chars().count() < 2 {
        return Err("name must be at least 2 characters".to_string());
    }
    Ok(())
}

/// Reorders a raw CSV row into `CSV_HEADERS` order; missing columns become empty.
pub(crate) fn align_row(headers: &StringRecord, raw: &StringRecord) -> Vec<String> {
    CSV_HEADERS
        .iter()
        .map(|column| {
            headers
                .iter()
                .position(|header| header.trim() == *column)
                .and_then(|idx| raw.get(idx))
                .unwrap_or("")
                .to_string()
        })
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct IbanBook {
    records: Vec<IbanRecord>,
    // Rows from the loaded file that were not accepted; written back untouched.
    skipped: Vec<Vec<String>>,
}

impl IbanBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<IbanRecord>) -> Self {
        Self {
            records,
            skipped: Vec::new(),
        }
    }

    pub fn records(&self) -> &[IbanRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows kept from the last load that failed to parse or validate.
    pub fn skipped_rows(&self) -> usize {
        self.skipped.len()
    }

    pub fn get(&self, id: Uuid) -> Option<&IbanRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn add(&mut self, mut record: IbanRecord) -> Result<Uuid, String> {
        record.iban = validate_record_fields(&record.iban, &record.name)?;
        if self.get(record.id).is_some() {
            return Err(format!("id already used: {}", record.id));
        }
        if self.contains_iban(&record.iban, None) {
            return Err("IBAN already saved".to_string());
        }
        let id = record.id;
        log::debug!("adding {} ({})", record.iban, id);
        self.records.push(record);
        Ok(id)
    }

    pub fn update(
        &mut self,
        id: Uuid,
        iban: &str,
        name: &str,
        description: &str,
        category: Category,
    ) -> Result<&IbanRecord, String> {
        let idx = self
            .records
            .iter()
            .position(|record| record.id == id)
            .ok_or_else(|| format!("no IBAN with id {id}"))?;
        let canonical = validate_record_fields(iban, name)?;
        if self.contains_iban(&canonical, Some(id)) {
            return Err("IBAN already saved".to_string());
        }

        let record = &mut self.records[idx];
        record.iban = canonical;
        record.name = name.trim().to_string();
        record.description = description.trim().to_string();
        record.category = category;
        record.updated_at = Utc::now();
        log::debug!("updated {} ({})", record.iban, id);
        Ok(&self.records[idx])
    }

    pub fn remove(&mut self, id: Uuid) -> Result<IbanRecord, String> {
        let idx = self
            .records
            .iter()
            .position(|record| record.id == id)
            .ok_or_else(|| format!("no IBAN with id {id}"))?;
        let removed = self.records.remove(idx);
        log::debug!("removed {} ({})", removed.iban, id);
        Ok(removed)
    }

    /// Records whose name, IBAN or description contain `query` (case-insensitive),
    /// optionally restricted to IBANs starting with `country`.
    pub fn search(&self, query: &str, country: Option<&str>) -> Vec<&IbanRecord> {
        let query = query.trim().to_lowercase();
        let country = country.map(normalize).filter(|code| !code.is_empty());
        self.records
            .iter()
            .filter(|record| {
                query.is_empty()
                    || record.name.to_lowercase().contains(&query)
                    || record.iban.to_lowercase().contains(&query)
                    || record.description.to_lowercase().contains(&query)
            })
            .filter(|record| match country.as_deref() {
                Some(code) => record.iban.starts_with(code),
                None => true,
            })
            .collect()
    }

    pub fn countries(&self) -> Vec<String> {
        let codes: BTreeSet<String> = self
            .records
            .iter()
            .map(|record| country_prefix(&record.iban))
            .filter(|code| !code.is_empty())
            .collect();
        codes.into_iter().collect()
    }

    /// Loads a book from CSV. A missing file is an empty book. Rows that do not
    /// parse, fail validation or repeat a saved IBAN or id are skipped with a
    /// warning and kept for `save_csv`.
    pub fn load_csv(path: &Path) -> Result<IbanBook, String> {
        if !path.exists() {
            log::debug!("book {} does not exist yet", path.display());
            return Ok(IbanBook::new());
        }
        let mut reader = csv::Reader::from_path(path).map_err(|err| err.to_string())?;
        let headers = reader.headers().map_err(|err| err.to_string())?.clone();
        let mut book = IbanBook::new();
        for (row, result) in reader.records().enumerate() {
            let raw = result.map_err(|err| err.to_string())?;
            let outcome = raw
                .deserialize::<IbanRecord>(Some(&headers))
                .map_err(|err| err.to_string())
                .and_then(|record| book.add(record));
            if let Err(err) = outcome {
                log::warn!("skipping row {}: {}", row + 1, err);
                book.skipped.push(align_row(&headers, &raw));
            }
        }
        log::debug!(
            "loaded {} IBAN(s) from {} ({} skipped)",
            book.len(),
            path.display(),
            book.skipped_rows()
        );
        Ok(book)
    }

    pub fn save_csv(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent).map_err(|err| err.to_string())?;
            }
        }
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .map_err(|err| err.to_string())?;
        writer
            .write_record(CSV_HEADERS)
            .map_err(|err| err.to_string())?;
        for record in &self.records {
            writer.serialize(record).map_err(|err| err.to_string())?;
        }
        for row in &self.skipped {
            writer.write_record(row).map_err(|err| err.to_string())?;
        }
        writer.flush().map_err(|err| err.to_string())
    }

    fn contains_iban(&self, canonical: &str, except: Option<Uuid>) -> bool {
        self.records
            .iter()
            .any(|record| record.iban == canonical && Some(record.id) != except)
    }
}
