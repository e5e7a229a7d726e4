use serde::Serialize;
use thiserror::Error;
use url::form_urlencoded;

use crate::data::CountryTable;
use crate::estimate::{
    equipment_history_for, estimate_equipment, global_ranking, EquipmentCategory,
    EstimateError, EstimateSource, Rng,
};
use crate::server::session::{self, ExportError, ExportRequest};
use crate::views::{project_category, projection_rows, StatCategory, ViewError, YearOrder};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
    #[error("failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> (u16, &'static str) {
        match self {
            Self::BadRequest(_) => (400, "Bad Request"),
            Self::NotFound(_) => (404, "Not Found"),
            Self::Internal(_) | Self::Serialize(_) => (500, "Internal Server Error"),
        }
    }
}

impl From<ViewError> for ApiError {
    fn from(err: ViewError) -> Self {
        match err {
            ViewError::UnknownCountry(_) => Self::NotFound(err.to_string()),
            ViewError::Serialize(inner) => Self::Serialize(inner),
            ViewError::DuplicateCountry(_) | ViewError::UnknownCategory(_) => {
                Self::BadRequest(err.to_string())
            }
        }
    }
}

impl From<EstimateError> for ApiError {
    fn from(err: EstimateError) -> Self {
        match err {
            EstimateError::Selection(inner) => inner.into(),
            EstimateError::UnknownCategory(_) => Self::BadRequest(err.to_string()),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::View(inner) => inner.into(),
            ExportError::Order(_) => Self::BadRequest(err.to_string()),
        }
    }
}

/// Decoded query string. `countries` may repeat and/or hold comma-separated names.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn parse(raw: &str) -> Self {
        Self {
            pairs: form_urlencoded::parse(raw.as_bytes()).into_owned().collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn countries(&self) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|(name, _)| name == "countries" || name == "country")
            .flat_map(|(_, value)| value.split(','))
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn year_order(&self) -> Result<YearOrder, ApiError> {
        match self.get("order") {
            Some(raw) => raw.parse().map_err(ApiError::BadRequest),
            None => Ok(YearOrder::default()),
        }
    }

    fn category(&self) -> Result<EquipmentCategory, ApiError> {
        let raw = self
            .get("category")
            .ok_or_else(|| ApiError::BadRequest("query parameter 'category' is required".to_string()))?;
        Ok(raw.parse::<EquipmentCategory>()?)
    }
}

fn to_json<T: Serialize>(payload: &T) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(payload)?)
}

pub fn health_payload(table: &CountryTable) -> Result<String, ApiError> {
    to_json(&serde_json::json!({
        "status": "ok",
        "service": "milstat-api",
        "version": env!("CARGO_PKG_VERSION"),
        "countries": table.len(),
        "dataVersion": table.data_version(),
    }))
}

#[derive(Debug, Clone, Serialize)]
pub struct CountryListItem<'a> {
    pub name: &'a str,
    pub flag: &'a str,
    pub color: &'a str,
}

pub fn countries_payload(table: &CountryTable) -> Result<String, ApiError> {
    let list: Vec<CountryListItem<'_>> = table
        .records()
        .iter()
        .map(|record| CountryListItem {
            name: &record.name,
            flag: &record.flag,
            color: &record.color,
        })
        .collect();
    to_json(&serde_json::json!({
        "dataVersion": table.data_version(),
        "sourceNote": table.source_note(),
        "countries": list,
    }))
}

pub fn country_payload(table: &CountryTable, encoded_name: &str) -> Result<String, ApiError> {
    let name = urlencoding::decode(encoded_name)
        .map_err(|err| ApiError::BadRequest(format!("invalid country name encoding: {err}")))?;
    let record = table
        .get(&name)
        .ok_or_else(|| ViewError::UnknownCountry(name.to_string()))?;
    to_json(record)
}

pub fn view_payload(table: &CountryTable, category: &str, query: &Query) -> Result<String, ApiError> {
    let category: StatCategory = category.parse()?;
    let order = query.year_order()?;
    let countries = query.countries();
    let view = project_category(table, category, &countries, order)?;
    to_json(&serde_json::json!({
        "category": category,
        "order": order.as_str(),
        "countries": countries,
        "rows": view.rows,
        "notes": view.notes,
    }))
}

pub fn projections_payload(table: &CountryTable) -> Result<String, ApiError> {
    to_json(&projection_rows(table))
}

pub fn equipment_payload(table: &CountryTable, query: &Query) -> Result<String, ApiError> {
    let countries = query.countries();
    let mode = query.get("mode").unwrap_or("deterministic");
    match mode {
        "deterministic" => {
            let estimates = estimate_equipment(table, &countries, EstimateSource::Deterministic)?;
            to_json(&serde_json::json!({
                "mode": mode,
                "estimates": estimates,
            }))
        }
        "randomized" => {
            let seed = match query.get("seed") {
                Some(raw) => raw
                    .parse::<u64>()
                    .map_err(|err| ApiError::BadRequest(format!("invalid seed '{raw}': {err}")))?,
                None => Rng::from_entropy()
                    .map_err(|err| ApiError::Internal(format!("entropy unavailable: {err}")))?
                    .next_u64(),
            };
            let mut rng = Rng::new(seed);
            let estimates =
                estimate_equipment(table, &countries, EstimateSource::Randomized(&mut rng))?;
            to_json(&serde_json::json!({
                "mode": mode,
                "seed": seed,
                "estimates": estimates,
            }))
        }
        other => Err(ApiError::BadRequest(format!(
            "unknown mode '{other}', expected 'deterministic' or 'randomized'"
        ))),
    }
}

pub fn equipment_history_payload(table: &CountryTable, query: &Query) -> Result<String, ApiError> {
    let country = query
        .get("country")
        .ok_or_else(|| ApiError::BadRequest("query parameter 'country' is required".to_string()))?;
    let category = query.category()?;
    let series = equipment_history_for(table, country, category)?;
    to_json(&serde_json::json!({
        "country": country,
        "category": category,
        "series": series,
    }))
}

pub fn rankings_payload(table: &CountryTable, query: &Query) -> Result<String, ApiError> {
    let category = query.category()?;
    to_json(&serde_json::json!({
        "category": category,
        "ranking": global_ranking(table, category),
    }))
}

pub fn refresh_payload() -> Result<String, ApiError> {
    let stamp = session::mark_refreshed();
    to_json(&serde_json::json!({
        "status": "ok",
        "lastUpdated": stamp,
    }))
}

pub fn export_payload(table: &CountryTable, body: &str) -> Result<String, ApiError> {
    let request: ExportRequest = serde_json::from_str(body)
        .map_err(|err| ApiError::BadRequest(format!("Invalid request body: {err}")))?;
    let document = session::build_export(table, request)?;
    to_json(&document)
}
