use crate::data::{CountryRecord, CountryTable, YearValue};
use crate::estimate::{EquipmentCategory, EstimateError};
use crate::views::ViewError;

/// Back-projects today's inventory through the budget history: each year's count is the current
/// quantity scaled by that year's budget relative to the latest one, times the category damping.
/// A zero latest budget yields zeros.
pub fn equipment_history(record: &CountryRecord, category: EquipmentCategory) -> Vec<YearValue> {
    let quantity = category.quantity(record) as f64;
    let damping = category.profile().history_damping;
    let latest = record.latest_budget().map_or(0.0, |point| point.value);

    record
        .historical_budget
        .iter()
        .map(|point| {
            let value = if latest > 0.0 {
                (quantity * (point.value / latest) * damping).round()
            } else {
                0.0
            };
            YearValue {
                year: point.year,
                value,
            }
        })
        .collect()
}

pub fn equipment_history_for(
    table: &CountryTable,
    country: &str,
    category: EquipmentCategory,
) -> Result<Vec<YearValue>, EstimateError> {
    let record = table
        .get(country)
        .ok_or_else(|| ViewError::UnknownCountry(country.to_string()))?;
    Ok(equipment_history(record, category))
}
