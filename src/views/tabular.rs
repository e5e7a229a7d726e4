//! Single-series chart rows: one row per selected country, mostly straight pass-through.

use serde::Serialize;

use crate::data::{CountryRecord, CountryTable};
use crate::views::{resolve_selection, ViewError, ViewResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRow {
    pub name: String,
    pub budget: f64,
    pub gdp_percent: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonnelRow {
    pub name: String,
    pub active: u64,
    pub reserve: u64,
    /// Active personnel per million inhabitants, two decimals.
    pub per_capita: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentRow {
    pub name: String,
    pub aircraft: u64,
    pub tanks: u64,
    pub naval: u64,
    pub submarines: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NuclearRow {
    pub name: String,
    pub nukes: u64,
    /// Drives conditional styling only.
    pub has_missiles: bool,
    pub color: String,
}

/// Population is validated positive at table load, so the ratio is always finite.
pub fn per_capita(record: &CountryRecord) -> String {
    format!(
        "{:.2}",
        record.active_personnel as f64 / record.population
    )
}

fn map_selection<S, T, F>(
    table: &CountryTable,
    selection: &[S],
    row: F,
) -> Result<ViewResult<T>, ViewError>
where
    S: AsRef<str>,
    F: Fn(&CountryRecord) -> T,
{
    let records = resolve_selection(table, selection)?;
    Ok(ViewResult::new(records.into_iter().map(row).collect()))
}

pub fn budget_rows<S: AsRef<str>>(
    table: &CountryTable,
    selection: &[S],
) -> Result<ViewResult<BudgetRow>, ViewError> {
    map_selection(table, selection, |record| BudgetRow {
        name: record.name.clone(),
        budget: record.budget,
        gdp_percent: record.gdp_percent,
        color: record.color.clone(),
    })
}

pub fn personnel_rows<S: AsRef<str>>(
    table: &CountryTable,
    selection: &[S],
) -> Result<ViewResult<PersonnelRow>, ViewError> {
    map_selection(table, selection, |record| PersonnelRow {
        name: record.name.clone(),
        active: record.active_personnel,
        reserve: record.reserve_personnel,
        per_capita: per_capita(record),
    })
}

pub fn equipment_rows<S: AsRef<str>>(
    table: &CountryTable,
    selection: &[S],
) -> Result<ViewResult<EquipmentRow>, ViewError> {
    map_selection(table, selection, |record| EquipmentRow {
        name: record.name.clone(),
        aircraft: record.aircraft,
        tanks: record.tanks,
        naval: record.naval,
        submarines: record.submarines_or_zero(),
    })
}

pub fn nuclear_rows<S: AsRef<str>>(
    table: &CountryTable,
    selection: &[S],
) -> Result<ViewResult<NuclearRow>, ViewError> {
    map_selection(table, selection, |record| NuclearRow {
        name: record.name.clone(),
        nukes: record.nukes,
        has_missiles: record.nukes > 0,
        color: record.color.clone(),
    })
}
