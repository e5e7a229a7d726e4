//! Derived views: project the country table, filtered to a caller's selection, into the rows a
//! given chart needs. Every view is a pure function of `(table, selection)`.

pub mod projection;
pub mod radar;
pub mod tabular;
pub mod wide;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::data::{CountryRecord, CountryTable};

pub use projection::{projection_rows, MAJOR_POWERS, PROJECTION_YEARS};
pub use radar::{radar_rows, RadarRow, RADAR_MAX_COUNTRIES};
pub use tabular::{
    budget_rows, equipment_rows, nuclear_rows, personnel_rows, BudgetRow, EquipmentRow,
    NuclearRow, PersonnelRow,
};
pub use wide::{historical_rows, HistoricalSeries, WideCell, WideField, WideRow, YearOrder};

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("unknown country '{0}'")]
    UnknownCountry(String),
    #[error("country '{0}' is selected more than once")]
    DuplicateCountry(String),
    #[error("unknown statistic category '{0}'")]
    UnknownCategory(String),
    #[error("failed to serialize view rows: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OmissionReason {
    NotInTable,
    NoProjections,
    MissingYear,
}

/// A policy a view applied silently in the dashboard; returned so callers can assert on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "policy", rename_all = "camelCase")]
pub enum PolicyNote {
    #[serde(rename_all = "camelCase")]
    Truncated { limit: usize, dropped: Vec<String> },
    #[serde(rename_all = "camelCase")]
    Omitted {
        country: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        year: Option<i32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        field: Option<WideField>,
        reason: OmissionReason,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewResult<T> {
    pub rows: Vec<T>,
    pub notes: Vec<PolicyNote>,
}

impl<T> ViewResult<T> {
    pub fn new(rows: Vec<T>) -> Self {
        Self {
            rows,
            notes: Vec::new(),
        }
    }

    pub fn with_notes(rows: Vec<T>, notes: Vec<PolicyNote>) -> Self {
        Self { rows, notes }
    }
}

impl<T: Serialize> ViewResult<T> {
    fn into_json(self) -> Result<ViewResult<Value>, ViewError> {
        let rows = self
            .rows
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ViewResult {
            rows,
            notes: self.notes,
        })
    }
}

/// Looks up every selected name, in order. Unknown and repeated names are rejected.
pub fn resolve_selection<'t, S: AsRef<str>>(
    table: &'t CountryTable,
    selection: &[S],
) -> Result<Vec<&'t CountryRecord>, ViewError> {
    let mut seen = HashSet::new();
    selection
        .iter()
        .map(|name| {
            let name = name.as_ref();
            if !seen.insert(name) {
                return Err(ViewError::DuplicateCountry(name.to_string()));
            }
            table
                .get(name)
                .ok_or_else(|| ViewError::UnknownCountry(name.to_string()))
        })
        .collect()
}

/// The dashboard's active statistic tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatCategory {
    Overview,
    Budget,
    Personnel,
    Equipment,
    Nuclear,
    HistoryBudget,
    HistoryNukes,
}

impl StatCategory {
    pub const ALL: [StatCategory; 7] = [
        Self::Overview,
        Self::Budget,
        Self::Personnel,
        Self::Equipment,
        Self::Nuclear,
        Self::HistoryBudget,
        Self::HistoryNukes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Overview => "overview",
            Self::Budget => "budget",
            Self::Personnel => "personnel",
            Self::Equipment => "equipment",
            Self::Nuclear => "nuclear",
            Self::HistoryBudget => "history-budget",
            Self::HistoryNukes => "history-nukes",
        }
    }
}

impl fmt::Display for StatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatCategory {
    type Err = ViewError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "overview" | "radar" => Ok(Self::Overview),
            "budget" => Ok(Self::Budget),
            "personnel" => Ok(Self::Personnel),
            "equipment" => Ok(Self::Equipment),
            "nuclear" | "nukes" => Ok(Self::Nuclear),
            "history-budget" => Ok(Self::HistoryBudget),
            "history-nukes" => Ok(Self::HistoryNukes),
            _ => Err(ViewError::UnknownCategory(raw.to_string())),
        }
    }
}

/// Runs the view behind `category` and flattens its rows to JSON objects.
/// `order` only affects the historical views.
pub fn project_category<S: AsRef<str>>(
    table: &CountryTable,
    category: StatCategory,
    selection: &[S],
    order: YearOrder,
) -> Result<ViewResult<Value>, ViewError> {
    debug!(
        category = %category,
        countries = selection.len(),
        "projecting view"
    );
    match category {
        StatCategory::Overview => radar_rows(table, selection)?.into_json(),
        StatCategory::Budget => budget_rows(table, selection)?.into_json(),
        StatCategory::Personnel => personnel_rows(table, selection)?.into_json(),
        StatCategory::Equipment => equipment_rows(table, selection)?.into_json(),
        StatCategory::Nuclear => nuclear_rows(table, selection)?.into_json(),
        StatCategory::HistoryBudget => {
            historical_rows(table, selection, HistoricalSeries::Budget, order)?.into_json()
        }
        StatCategory::HistoryNukes => {
            historical_rows(table, selection, HistoricalSeries::Nukes, order)?.into_json()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CountryTable {
        CountryTable::builtin().expect("builtin table should load")
    }

    #[test]
    fn resolve_selection_keeps_input_order() {
        let table = table();
        let records = resolve_selection(&table, &["Russia", "China"]).expect("known names");
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Russia", "China"]);
    }

    #[test]
    fn resolve_selection_rejects_unknown_and_duplicate_names() {
        let table = table();
        assert!(matches!(
            resolve_selection(&table, &["China", "Atlantis"]),
            Err(ViewError::UnknownCountry(name)) if name == "Atlantis"
        ));
        assert!(matches!(
            resolve_selection(&table, &["China", "China"]),
            Err(ViewError::DuplicateCountry(name)) if name == "China"
        ));
    }

    #[test]
    fn category_parsing_accepts_aliases() {
        assert_eq!("radar".parse::<StatCategory>().ok(), Some(StatCategory::Overview));
        assert_eq!(
            "History_Budget".parse::<StatCategory>().ok(),
            Some(StatCategory::HistoryBudget)
        );
        assert!("logistics".parse::<StatCategory>().is_err());
        for category in StatCategory::ALL {
            assert_eq!(category.as_str().parse::<StatCategory>().ok(), Some(category));
        }
    }

    #[test]
    fn project_category_emits_json_rows() {
        let table = table();
        let result = project_category(
            &table,
            StatCategory::Nuclear,
            &["Japan", "France"],
            YearOrder::FirstSeen,
        )
        .expect("nuclear view");
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0]["hasMissiles"], false);
        assert_eq!(result.rows[1]["hasMissiles"], true);
    }
}
