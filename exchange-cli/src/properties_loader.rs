//! CSV loader for identified replacement properties.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter. Header
//! names are case-sensitive.
//!
//! | Column    | Required | Notes |
//! |-----------|----------|-------|
//! | `address` | yes      | Free text; quote it if it contains commas |
//! | `value`   | yes      | Raw amount text such as `450000` or `$450,000`; validated by the checker |
//! | `acquire` | no       | `true`/`false`, `yes`/`no`, `y`/`n` or `1`/`0`; empty or missing means `false` |
//!
//! ### Example
//!
//! ```csv
//! address,value,acquire
//! 12 Oak St,450000,yes
//! "40 Elm Ave, Unit 2",390000,
//! ```
use std::path::{Path, PathBuf};

use exchange_core::calculations::calculators::IdentifiedPropertyForm;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct PropertyRow {
    address: String,
    value: String,
    #[serde(default)]
    acquire: Option<String>,
}

/// Errors that can occur while loading identified properties.
#[derive(Debug, thiserror::Error)]
pub enum PropertiesLoadError {
    #[error("cannot read properties file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Bad structure, a missing required column or a ragged row.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// `row` is 1-based, counting data rows only.
    #[error("unrecognised acquire flag '{value}' on row {row}")]
    InvalidAcquireFlag { value: String, row: usize },
}

fn parse_acquire_flag(
    raw: Option<&str>,
    row_number: usize,
) -> Result<bool, PropertiesLoadError> {
    let flag = raw.unwrap_or_default().to_ascii_lowercase();
    match flag.as_str() {
        "" | "false" | "no" | "n" | "0" => Ok(false),
        "true" | "yes" | "y" | "1" => Ok(true),
        _ => Err(PropertiesLoadError::InvalidAcquireFlag {
            value: flag,
            row: row_number,
        }),
    }
}

fn convert_row(
    row: PropertyRow,
    row_number: usize,
) -> Result<IdentifiedPropertyForm, PropertiesLoadError> {
    let intend_to_acquire = parse_acquire_flag(row.acquire.as_deref(), row_number)?;
    Ok(IdentifiedPropertyForm {
        address: row.address,
        value: row.value,
        intend_to_acquire,
    })
}

/// Parses CSV text into property forms, in file order.
///
/// Values are kept as raw text; range checks happen in the identification
/// checker so every problem is reported together.
pub fn load_from_str(input: &str) -> Result<Vec<IdentifiedPropertyForm>, PropertiesLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<PropertyRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// Reads `path` from disk and delegates to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<IdentifiedPropertyForm>, PropertiesLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| PropertiesLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let properties = load_from_str(&contents)?;
    debug!(count = properties.len(), path = %path.display(), "properties loaded");
    Ok(properties)
}
