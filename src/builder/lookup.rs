//! Acronym → full-name lookup parsed from the spreadsheet CSV export.

use std::collections::HashMap;

use csv::{ReaderBuilder, StringRecord};

use crate::error::BuildError;

pub type Lookup = HashMap<String, String>;

fn malformed(err: csv::Error) -> BuildError {
    BuildError::MalformedLookup {
        row: err.position().map(|p| p.line() as usize).unwrap_or(0),
        reason: err.to_string(),
    }
}

fn line_of(record: &StringRecord) -> usize {
    record.position().map(|p| p.line() as usize).unwrap_or(0)
}

/// Parses the sheet export. Row 0 is a header and is discarded; rows missing
/// either column are skipped; a later duplicate acronym overwrites an earlier one.
pub fn parse_lookup(text: &str) -> Result<Lookup, BuildError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut records = reader.records();

    let header = records
        .next()
        .transpose()
        .map_err(malformed)?
        .ok_or_else(|| BuildError::MalformedLookup {
            row: 1,
            reason: "response is empty".to_string(),
        })?;
    if header.len() < 2 {
        return Err(BuildError::MalformedLookup {
            row: line_of(&header),
            reason: format!("expected two columns, found {}", header.len()),
        });
    }

    let mut lookup = Lookup::new();
    for record in records {
        let record = record.map_err(malformed)?;
        let acronym = record.get(0).map(str::trim).unwrap_or_default();
        let full_name = record.get(1).map(str::trim).unwrap_or_default();
        if acronym.is_empty() || full_name.is_empty() {
            log::debug!("skipping incomplete lookup row {}", line_of(&record));
            continue;
        }
        lookup.insert(acronym.to_string(), full_name.to_string());
    }
    Ok(lookup)
}
