//! Radar (overview) rows. Raw magnitudes span hundreds to millions, so every axis is
//! log10-compressed; the multipliers only put the axes on a comparable visual scale.

use serde::Serialize;

use crate::data::{CountryRecord, CountryTable};
use crate::views::{resolve_selection, PolicyNote, ViewError, ViewResult};

pub const RADAR_MAX_COUNTRIES: usize = 3;

const PERSONNEL_SCALE: f64 = 10.0;
const BUDGET_SCALE: f64 = 20.0;
const AIRCRAFT_SCALE: f64 = 15.0;
const TANKS_SCALE: f64 = 15.0;
const NAVAL_SCALE: f64 = 20.0;
const NUKES_SCALE: f64 = 20.0;
const TECH_SCALE: f64 = 10.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarRow {
    pub country: String,
    /// Flag glyph plus name.
    pub name: String,
    pub personnel: f64,
    pub budget: f64,
    pub aircraft: f64,
    pub tanks: f64,
    pub naval: f64,
    pub nukes: f64,
    pub tech: f64,
}

impl RadarRow {
    pub fn from_record(record: &CountryRecord) -> Self {
        Self {
            country: record.name.clone(),
            name: record.display_name(),
            personnel: log_scaled(record.active_personnel as f64, PERSONNEL_SCALE),
            budget: log_scaled(record.budget, BUDGET_SCALE),
            aircraft: log_scaled(record.aircraft as f64, AIRCRAFT_SCALE),
            tanks: log_scaled(record.tanks as f64, TANKS_SCALE),
            naval: log_scaled(record.naval as f64, NAVAL_SCALE),
            nukes: log_scaled(record.nukes as f64, NUKES_SCALE),
            tech: record.tech_index * TECH_SCALE,
        }
    }
}

/// Zero stays zero instead of becoming `-inf`.
fn log_scaled(value: f64, scale: f64) -> f64 {
    if value > 0.0 {
        value.log10() * scale
    } else {
        0.0
    }
}

/// Radar rows for at most the first [`RADAR_MAX_COUNTRIES`] selected countries.
/// The whole selection is validated; dropped names are reported as a `Truncated` note.
pub fn radar_rows<S: AsRef<str>>(
    table: &CountryTable,
    selection: &[S],
) -> Result<ViewResult<RadarRow>, ViewError> {
    let records = resolve_selection(table, selection)?;
    let rows = records
        .iter()
        .take(RADAR_MAX_COUNTRIES)
        .map(|record| RadarRow::from_record(record))
        .collect();

    let dropped: Vec<String> = records
        .iter()
        .skip(RADAR_MAX_COUNTRIES)
        .map(|record| record.name.clone())
        .collect();
    let notes = if dropped.is_empty() {
        Vec::new()
    } else {
        vec![PolicyNote::Truncated {
            limit: RADAR_MAX_COUNTRIES,
            dropped,
        }]
    };
    Ok(ViewResult::with_notes(rows, notes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {b}, got {a}");
    }

    #[test]
    fn log_scaling_uses_axis_multipliers() {
        let table = CountryTable::builtin().expect("builtin table");
        let result = radar_rows(&table, &["France"]).expect("radar");
        let row = &result.rows[0];
        approx_eq(row.personnel, (203_000f64).log10() * 10.0);
        approx_eq(row.budget, 53.6f64.log10() * 20.0);
        approx_eq(row.nukes, 290f64.log10() * 20.0);
        approx_eq(row.tech, 85.0);
        assert_eq!(row.name, "🇫🇷 France");
        assert!(result.notes.is_empty());
    }

    #[test]
    fn zero_counts_map_to_zero() {
        assert_eq!(log_scaled(0.0, 20.0), 0.0);
        approx_eq(log_scaled(1000.0, 20.0), 60.0);
    }

    #[test]
    fn selections_beyond_three_are_truncated_with_a_note() {
        let table = CountryTable::builtin().expect("builtin table");
        let result = radar_rows(&table, &["China", "Russia", "India", "Japan"]).expect("radar");
        assert_eq!(result.rows.len(), 3);
        assert_eq!(result.rows[2].country, "India");
        assert_eq!(
            result.notes,
            vec![PolicyNote::Truncated {
                limit: 3,
                dropped: vec!["Japan".to_string()],
            }]
        );
    }
}
