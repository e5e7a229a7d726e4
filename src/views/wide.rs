//! Wide (dynamic-key) rows for multi-country time charts.
//!
//! Rows are kept as a typed `(country, field) -> cell` mapping and only flattened to
//! `${country}${suffix}` keys when serialized. The suffixes are the contract with the charting
//! layer and must match exactly, capitalization included.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::data::{CountryTable, YearValue};
use crate::views::{resolve_selection, ViewError, ViewResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WideField {
    /// The bare country name holds the series value.
    Value,
    Budget,
    Personnel,
    Nukes,
    Color,
}

impl WideField {
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Value => "",
            Self::Budget => "Budget",
            Self::Personnel => "Personnel",
            Self::Nukes => "Nukes",
            Self::Color => "Color",
        }
    }

    pub fn key_for(&self, country: &str) -> String {
        format!("{country}{}", self.suffix())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WideCell {
    Number(f64),
    Text(String),
}

impl WideCell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(text) => Some(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub year: i32,
    cells: Vec<(String, WideField, WideCell)>,
}

impl WideRow {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            cells: Vec::new(),
        }
    }

    /// Sets a cell, replacing any earlier value for the same `(country, field)`.
    pub fn insert(&mut self, country: &str, field: WideField, cell: WideCell) {
        if let Some(existing) = self
            .cells
            .iter_mut()
            .find(|(name, existing_field, _)| name == country && *existing_field == field)
        {
            existing.2 = cell;
        } else {
            self.cells.push((country.to_string(), field, cell));
        }
    }

    pub fn get(&self, country: &str, field: WideField) -> Option<&WideCell> {
        self.cells
            .iter()
            .find(|(name, existing_field, _)| name == country && *existing_field == field)
            .map(|(_, _, cell)| cell)
    }

    pub fn number(&self, country: &str, field: WideField) -> Option<f64> {
        self.get(country, field).and_then(WideCell::as_f64)
    }

    pub fn countries(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for (name, _, _) in &self.cells {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flattens to the chart library's shape: `year` plus `${country}${suffix}` keys.
    pub fn to_json(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("year".to_string(), Value::from(self.year));
        for (country, field, cell) in &self.cells {
            let value = match cell {
                WideCell::Number(number) => Value::from(*number),
                WideCell::Text(text) => Value::from(text.as_str()),
            };
            map.insert(field.key_for(country), value);
        }
        map
    }
}

impl Serialize for WideRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len() + 1))?;
        map.serialize_entry("year", &self.year)?;
        for (country, field, cell) in &self.cells {
            map.serialize_entry(&field.key_for(country), cell)?;
        }
        map.end()
    }
}

/// Row ordering for historical wide tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearOrder {
    /// Years in the order first encountered, walking countries in selection order and each
    /// series in series order. Matches the dashboard; not necessarily ascending.
    #[default]
    FirstSeen,
    Ascending,
}

impl YearOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstSeen => "first-seen",
            Self::Ascending => "ascending",
        }
    }
}

impl fmt::Display for YearOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for YearOrder {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "first-seen" | "first_seen" | "firstseen" => Ok(Self::FirstSeen),
            "ascending" | "asc" => Ok(Self::Ascending),
            other => Err(format!("unknown year order '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoricalSeries {
    Budget,
    Nukes,
}

impl HistoricalSeries {
    fn series<'r>(&self, record: &'r crate::data::CountryRecord) -> &'r [YearValue] {
        match self {
            Self::Budget => &record.historical_budget,
            Self::Nukes => &record.historical_nukes,
        }
    }
}

/// Groups the selected countries' historical series by year: one row per distinct year, with
/// `${country}` holding that country's value (absent when it has none for the year) and
/// `${country}Color` alongside it.
pub fn historical_rows<S: AsRef<str>>(
    table: &CountryTable,
    selection: &[S],
    series: HistoricalSeries,
    order: YearOrder,
) -> Result<ViewResult<WideRow>, ViewError> {
    let records = resolve_selection(table, selection)?;
    let mut rows: Vec<WideRow> = Vec::new();
    let mut row_for_year: HashMap<i32, usize> = HashMap::new();

    for record in records {
        for point in series.series(record) {
            let position = *row_for_year.entry(point.year).or_insert_with(|| {
                rows.push(WideRow::new(point.year));
                rows.len() - 1
            });
            let row = &mut rows[position];
            row.insert(&record.name, WideField::Value, WideCell::Number(point.value));
            row.insert(
                &record.name,
                WideField::Color,
                WideCell::Text(record.color.clone()),
            );
        }
    }

    if order == YearOrder::Ascending {
        rows.sort_by_key(|row| row.year);
    }
    Ok(ViewResult::new(rows))
}
