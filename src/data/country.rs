//! Country records: the per-country attributes behind every chart.
//! Field names on the wire are camelCase to match the dashboard's chart inputs.

use serde::{Deserialize, Serialize};

/// One `(year, value)` point of a historical or projected series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

/// Future-year estimates, present for a subset of countries only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Projections {
    #[serde(default)]
    pub budget: Vec<YearValue>,
    #[serde(default)]
    pub personnel: Vec<YearValue>,
    #[serde(default)]
    pub nukes: Vec<YearValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRecord {
    pub name: String,
    pub flag: String,
    pub color: String,
    pub active_personnel: u64,
    pub reserve_personnel: u64,
    /// Millions of people.
    pub population: f64,
    /// Billions of USD per year.
    pub budget: f64,
    pub gdp_percent: f64,
    pub aircraft: u64,
    pub tanks: u64,
    pub naval: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submarines: Option<u64>,
    pub nukes: u64,
    pub bases: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub international_bases: Option<u64>,
    /// Composite technology score, observed range 0-10.
    pub tech_index: f64,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub historical_budget: Vec<YearValue>,
    #[serde(default)]
    pub historical_nukes: Vec<YearValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projections: Option<Projections>,
}

impl CountryRecord {
    /// Flag glyph followed by the country name, as shown on chart axes.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.flag, self.name)
    }

    pub fn submarines_or_zero(&self) -> u64 {
        self.submarines.unwrap_or(0)
    }

    pub fn international_bases_or_zero(&self) -> u64 {
        self.international_bases.unwrap_or(0)
    }

    /// Most recent historical budget entry, if any.
    pub fn latest_budget(&self) -> Option<YearValue> {
        self.historical_budget.last().copied()
    }
}

/// Returns the value recorded for exactly `year`, if any.
pub fn value_for_year(series: &[YearValue], year: i32) -> Option<f64> {
    series.iter().find(|point| point.year == year).map(|point| point.value)
}
