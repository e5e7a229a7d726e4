//! Scenario projections for the major powers at fixed target years.

use crate::data::{value_for_year, CountryTable};
use crate::views::wide::{WideCell, WideField, WideRow};
use crate::views::{OmissionReason, PolicyNote, ViewResult};

/// Always projected, whatever the caller has selected.
pub const MAJOR_POWERS: [&str; 4] = ["United States", "China", "Russia", "India"];
pub const PROJECTION_YEARS: [i32; 4] = [2023, 2025, 2030, 2035];

/// One row per target year with `${country}Budget`, `${country}Personnel`, `${country}Nukes` and
/// `${country}Color`. A country with no projection entry for a field and year contributes no key
/// for it; every such omission is listed in the notes.
pub fn projection_rows(table: &CountryTable) -> ViewResult<WideRow> {
    let mut notes = Vec::new();
    let mut projected = Vec::new();

    for name in MAJOR_POWERS {
        match table.get(name) {
            None => notes.push(omitted(name, None, None, OmissionReason::NotInTable)),
            Some(record) => match &record.projections {
                None => notes.push(omitted(name, None, None, OmissionReason::NoProjections)),
                Some(projections) => projected.push((record, projections)),
            },
        }
    }

    let rows = PROJECTION_YEARS
        .iter()
        .map(|&year| {
            let mut row = WideRow::new(year);
            for (record, projections) in &projected {
                let mut contributed = false;
                for (field, series) in [
                    (WideField::Budget, &projections.budget),
                    (WideField::Personnel, &projections.personnel),
                    (WideField::Nukes, &projections.nukes),
                ] {
                    match value_for_year(series, year) {
                        Some(value) => {
                            row.insert(&record.name, field, WideCell::Number(value));
                            contributed = true;
                        }
                        None => notes.push(omitted(
                            &record.name,
                            Some(year),
                            Some(field),
                            OmissionReason::MissingYear,
                        )),
                    }
                }
                if contributed {
                    row.insert(
                        &record.name,
                        WideField::Color,
                        WideCell::Text(record.color.clone()),
                    );
                }
            }
            row
        })
        .collect();

    ViewResult::with_notes(rows, notes)
}

fn omitted(
    country: &str,
    year: Option<i32>,
    field: Option<WideField>,
    reason: OmissionReason,
) -> PolicyNote {
    PolicyNote::Omitted {
        country: country.to_string(),
        year,
        field,
        reason,
    }
}
