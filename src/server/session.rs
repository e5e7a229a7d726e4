//! Dashboard session state held by the server: the "last refreshed" stamp, and the JSON export
//! of the current selection. Refreshing never touches the table itself.

use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::data::CountryTable;
use crate::views::{project_category, StatCategory, ViewError, ViewResult, YearOrder};

static LAST_REFRESH: Mutex<Option<DateTime<Utc>>> = Mutex::new(None);

fn format_timestamp(stamp: DateTime<Utc>) -> String {
    stamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Records a refresh and returns its timestamp.
pub fn mark_refreshed() -> String {
    let now = Utc::now();
    let mut guard = LAST_REFRESH.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = Some(now);
    format_timestamp(now)
}

pub fn last_refreshed() -> Option<String> {
    let guard = LAST_REFRESH.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.map(format_timestamp)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub view_mode: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub export_id: String,
    pub exported_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_refreshed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_version: Option<String>,
    pub countries: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_mode: Option<String>,
    pub category: StatCategory,
    pub view: ViewResult<Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("invalid year order: {0}")]
    Order(String),
    #[error(transparent)]
    View(#[from] ViewError),
}

/// Builds the export document for `request`. The category defaults to the overview radar.
pub fn build_export(
    table: &CountryTable,
    request: ExportRequest,
) -> Result<ExportDocument, ExportError> {
    let category = match request.category.as_deref() {
        Some(raw) => raw.parse::<StatCategory>()?,
        None => StatCategory::Overview,
    };
    let order = match request.order.as_deref() {
        Some(raw) => raw.parse::<YearOrder>().map_err(ExportError::Order)?,
        None => YearOrder::default(),
    };
    let view = project_category(table, category, &request.countries, order)?;

    Ok(ExportDocument {
        export_id: Uuid::new_v4().to_string(),
        exported_at: format_timestamp(Utc::now()),
        last_refreshed: last_refreshed(),
        data_version: table.data_version().map(str::to_string),
        countries: request.countries,
        view_mode: request.view_mode,
        category,
        view,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_stamp_is_visible_afterwards() {
        let stamp = mark_refreshed();
        assert!(stamp.ends_with('Z'));
        assert!(last_refreshed().is_some());
    }

    #[test]
    fn export_defaults_to_overview() {
        let table = CountryTable::builtin().expect("builtin table");
        let document = build_export(
            &table,
            ExportRequest {
                countries: vec!["China".to_string(), "India".to_string()],
                view_mode: Some("compare".to_string()),
                category: None,
                order: None,
            },
        )
        .expect("export");
        assert_eq!(document.category, StatCategory::Overview);
        assert_eq!(document.view.rows.len(), 2);
        assert_eq!(document.export_id.len(), 36);
    }

    #[test]
    fn export_rejects_unknown_country() {
        let table = CountryTable::builtin().expect("builtin table");
        let result = build_export(
            &table,
            ExportRequest {
                countries: vec!["Atlantis".to_string()],
                view_mode: None,
                category: Some("budget".to_string()),
                order: None,
            },
        );
        assert!(matches!(
            result,
            Err(ExportError::View(ViewError::UnknownCountry(_)))
        ));
    }
}
