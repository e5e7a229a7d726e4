//! Synthetic equipment estimates for the equipment visualization.
//!
//! None of these numbers exist in the source table: they are derived from it by fixed formulas
//! (deterministic mode) or drawn from an injected random source (randomized mode).

pub mod formulas;
pub mod history;
pub mod ranking;
pub mod rng;

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::debug;

use crate::data::{CountryRecord, CountryTable};
use crate::views::{resolve_selection, ViewError};

pub use formulas::{deterministic_estimate, power_rating, randomized_estimate};
pub use history::{equipment_history, equipment_history_for};
pub use ranking::{global_ranking, RankEntry, RankLookup};
pub use rng::{RandomSource, Rng};

#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("unknown equipment category '{0}'")]
    UnknownCategory(String),
    #[error(transparent)]
    Selection(#[from] ViewError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EquipmentCategory {
    Tanks,
    Aircraft,
    Ships,
    AirDefense,
    Missiles,
    Helicopters,
}

/// Per-category constants behind the synthetic formulas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryProfile {
    /// Scales budget growth into category growth.
    pub growth_weight: f64,
    pub operational_base: u32,
    /// Operational-rate points per percent of GDP.
    pub operational_coefficient: f64,
    /// Share of the yearly budget allocated to the category.
    pub budget_fraction: f64,
    /// Damping applied when projecting counts back through budget history.
    pub history_damping: f64,
}

impl EquipmentCategory {
    pub const ALL: [EquipmentCategory; 6] = [
        Self::Tanks,
        Self::Aircraft,
        Self::Ships,
        Self::AirDefense,
        Self::Missiles,
        Self::Helicopters,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tanks => "tanks",
            Self::Aircraft => "aircraft",
            Self::Ships => "ships",
            Self::AirDefense => "airDefense",
            Self::Missiles => "missiles",
            Self::Helicopters => "helicopters",
        }
    }

    pub fn profile(&self) -> CategoryProfile {
        let (growth_weight, operational_base, operational_coefficient, budget_fraction, history_damping) =
            match self {
                Self::Tanks => (0.6, 60, 5.0, 0.08, 0.95),
                Self::Aircraft => (0.8, 65, 4.0, 0.22, 0.93),
                Self::Ships => (0.5, 55, 6.0, 0.18, 0.97),
                Self::AirDefense => (0.9, 70, 3.0, 0.07, 0.92),
                Self::Missiles => (0.7, 68, 3.0, 0.10, 0.90),
                Self::Helicopters => (0.6, 50, 6.0, 0.05, 0.94),
            };
        CategoryProfile {
            growth_weight,
            operational_base,
            operational_coefficient,
            budget_fraction,
            history_damping,
        }
    }

    /// Inventory count for the category. Categories the table does not track directly are
    /// derived from the closest tracked field.
    pub fn quantity(&self, record: &CountryRecord) -> u64 {
        match self {
            Self::Tanks => record.tanks,
            Self::Aircraft => record.aircraft,
            Self::Ships => record.naval,
            Self::Helicopters => (record.aircraft as f64 * 0.3).round() as u64,
            Self::AirDefense => (record.tanks as f64 * 0.15).round() as u64,
            Self::Missiles => (record.budget * 1.5).round() as u64,
        }
    }
}

impl fmt::Display for EquipmentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EquipmentCategory {
    type Err = EstimateError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .flat_map(|ch| ch.to_lowercase())
            .collect();
        match normalized.as_str() {
            "tanks" => Ok(Self::Tanks),
            "aircraft" => Ok(Self::Aircraft),
            "ships" | "naval" => Ok(Self::Ships),
            "airdefense" => Ok(Self::AirDefense),
            "missiles" => Ok(Self::Missiles),
            "helicopters" => Ok(Self::Helicopters),
            _ => Err(EstimateError::UnknownCategory(raw.to_string())),
        }
    }
}

/// 1-based position in a category's global ranking; countries with none of the equipment
/// have no rank and display as "N/A".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlobalRank(pub Option<usize>);

impl fmt::Display for GlobalRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(rank) => write!(f, "{rank}"),
            None => f.write_str("N/A"),
        }
    }
}

impl Serialize for GlobalRank {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(rank) => serializer.serialize_u64(rank as u64),
            None => serializer.serialize_str("N/A"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentEstimate {
    pub country: String,
    pub category: EquipmentCategory,
    pub quantity: u64,
    pub quality_rating: u32,
    pub modernization_percent: u32,
    pub operational_rate: u32,
    /// Percent.
    pub growth_rate: f64,
    /// Billions of USD.
    pub yearly_budget: u64,
    pub global_rank: GlobalRank,
    pub power_rating: f64,
}

/// Which estimator fills in the synthetic fields.
pub enum EstimateSource<'a> {
    Deterministic,
    Randomized(&'a mut dyn RandomSource),
}

impl fmt::Debug for EstimateSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deterministic => f.write_str("Deterministic"),
            Self::Randomized(_) => f.write_str("Randomized"),
        }
    }
}

/// Estimates for every category of every selected country: selection order, then category
/// order. Ranks are computed over the whole table, not just the selection.
pub fn estimate_equipment<S: AsRef<str>>(
    table: &CountryTable,
    selection: &[S],
    mut source: EstimateSource<'_>,
) -> Result<Vec<EquipmentEstimate>, EstimateError> {
    let records = resolve_selection(table, selection)?;
    let ranks = RankLookup::build(table);
    debug!(
        countries = records.len(),
        source = ?source,
        "estimating equipment"
    );

    let mut estimates = Vec::with_capacity(records.len() * EquipmentCategory::ALL.len());
    for record in records {
        for category in EquipmentCategory::ALL {
            let rank = ranks.rank(category, &record.name);
            let estimate = match &mut source {
                EstimateSource::Deterministic => deterministic_estimate(record, category, rank),
                EstimateSource::Randomized(rng) => {
                    randomized_estimate(record, category, rank, &mut **rng)
                }
            };
            estimates.push(estimate);
        }
    }
    Ok(estimates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_names_round_trip_and_accept_variants() {
        for category in EquipmentCategory::ALL {
            assert_eq!(category.as_str().parse::<EquipmentCategory>().ok(), Some(category));
        }
        assert_eq!(
            "air-defense".parse::<EquipmentCategory>().ok(),
            Some(EquipmentCategory::AirDefense)
        );
        assert!(matches!(
            "lasers".parse::<EquipmentCategory>(),
            Err(EstimateError::UnknownCategory(_))
        ));
    }

    #[test]
    fn derived_quantities_follow_tracked_fields() {
        let table = CountryTable::builtin().expect("builtin table");
        let france = table.get("France").expect("France");
        assert_eq!(EquipmentCategory::Ships.quantity(france), 128);
        // 972 * 0.3 = 291.6
        assert_eq!(EquipmentCategory::Helicopters.quantity(france), 292);
        // 222 * 0.15 = 33.3
        assert_eq!(EquipmentCategory::AirDefense.quantity(france), 33);
        // 53.6 * 1.5 = 80.4
        assert_eq!(EquipmentCategory::Missiles.quantity(france), 80);
    }

    #[test]
    fn missing_rank_displays_as_not_available() {
        assert_eq!(GlobalRank(None).to_string(), "N/A");
        assert_eq!(GlobalRank(Some(3)).to_string(), "3");
        assert_eq!(
            serde_json::to_value(GlobalRank(None)).expect("json"),
            serde_json::json!("N/A")
        );
    }

    #[test]
    fn estimates_cover_every_category_in_selection_order() {
        let table = CountryTable::builtin().expect("builtin table");
        let estimates =
            estimate_equipment(&table, &["Japan", "China"], EstimateSource::Deterministic)
                .expect("estimates");
        assert_eq!(estimates.len(), 12);
        assert!(estimates[..6].iter().all(|e| e.country == "Japan"));
        assert!(estimates[6..].iter().all(|e| e.country == "China"));
        assert_eq!(estimates[0].category, EquipmentCategory::Tanks);
    }
}
