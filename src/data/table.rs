//! The static country table: loaded and validated once, then shared read-only.
//! Pass it by reference to the view and estimate functions; there is no global instance.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::data::country::CountryRecord;
use crate::data::validate::{validate_records, ValidationReport};

pub const BUILTIN_COUNTRIES: &str = include_str!("countries.json");

/// On-disk layout of a country table (JSON or YAML).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableFile {
    #[serde(default)]
    pub data_version: Option<String>,
    #[serde(default)]
    pub source_note: Option<String>,
    pub countries: Vec<CountryRecord>,
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read country table {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse country table json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse country table yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("country table failed validation with {} error(s)", .0.error_count())]
    Invalid(ValidationReport),
}

#[derive(Debug, Clone)]
pub struct CountryTable {
    data_version: Option<String>,
    source_note: Option<String>,
    /// Authoring order. Ranking ties fall back to this order.
    records: Vec<CountryRecord>,
    index: HashMap<String, usize>,
}

impl CountryTable {
    /// The table embedded in the binary.
    pub fn builtin() -> Result<Self, TableError> {
        Self::from_json_str(BUILTIN_COUNTRIES)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, TableError> {
        let file: TableFile = serde_json::from_str(raw)?;
        Self::from_table_file(file)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, TableError> {
        let file: TableFile = serde_yaml::from_str(raw)?;
        Self::from_table_file(file)
    }

    /// Loads `.yaml`/`.yml` files as YAML and everything else as JSON.
    pub fn from_file(path: &Path) -> Result<Self, TableError> {
        let raw = read_table_source(path)?;
        let table = if is_yaml_path(path) {
            Self::from_yaml_str(&raw)?
        } else {
            Self::from_json_str(&raw)?
        };
        info!(
            path = %path.display(),
            countries = table.len(),
            "loaded country table"
        );
        Ok(table)
    }

    pub fn from_table_file(file: TableFile) -> Result<Self, TableError> {
        let mut table = Self::from_records(file.countries)?;
        table.data_version = file.data_version;
        table.source_note = file.source_note;
        Ok(table)
    }

    /// Validates `records` and indexes them by name. Warnings are logged, errors reject the table.
    pub fn from_records(records: Vec<CountryRecord>) -> Result<Self, TableError> {
        let report = validate_records(&records);
        if report.has_errors() {
            return Err(TableError::Invalid(report));
        }
        for diag in report.warnings() {
            warn!(context = %diag.context, "{}", diag.message);
        }

        let index = records
            .iter()
            .enumerate()
            .map(|(position, record)| (record.name.clone(), position))
            .collect();
        Ok(Self {
            data_version: None,
            source_note: None,
            records,
            index,
        })
    }

    pub fn get(&self, name: &str) -> Option<&CountryRecord> {
        self.index.get(name).map(|&position| &self.records[position])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|record| record.name.as_str())
    }

    pub fn records(&self) -> &[CountryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn data_version(&self) -> Option<&str> {
        self.data_version.as_deref()
    }

    pub fn source_note(&self) -> Option<&str> {
        self.source_note.as_deref()
    }
}

/// Parses a table file and runs validation without rejecting it, for the `validate` command.
pub fn validate_table_file(path: &Path) -> Result<ValidationReport, TableError> {
    let raw = read_table_source(path)?;
    let file: TableFile = if is_yaml_path(path) {
        serde_yaml::from_str(&raw)?
    } else {
        serde_json::from_str(&raw)?
    };
    Ok(validate_records(&file.countries))
}

fn read_table_source(path: &Path) -> Result<String, TableError> {
    fs::read_to_string(path).map_err(|source| TableError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn is_yaml_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}
