use crate::data::CountryRecord;
use crate::estimate::rng::RandomSource;
use crate::estimate::{EquipmentCategory, EquipmentEstimate, GlobalRank};

/// Budget growth is measured over at most this many trailing history entries.
pub const GROWTH_WINDOW: usize = 5;

/// Halves round toward positive infinity, so -0.25 becomes -0.2, not -0.3.
fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

/// Percent change from the oldest to the latest entry of the trailing budget window.
/// Zero when there are fewer than two entries or the base year is zero.
pub fn budget_growth_percent(record: &CountryRecord) -> f64 {
    let history = &record.historical_budget;
    if history.len() < 2 {
        return 0.0;
    }
    let window = &history[history.len().saturating_sub(GROWTH_WINDOW)..];
    let oldest = window[0].value;
    let latest = window[window.len() - 1].value;
    if oldest <= 0.0 {
        return 0.0;
    }
    (latest / oldest - 1.0) * 100.0
}

pub fn growth_rate(record: &CountryRecord, category: EquipmentCategory) -> f64 {
    round_to_tenth(budget_growth_percent(record) * category.profile().growth_weight)
}

pub fn quality_rating(tech_index: f64) -> u32 {
    (tech_index.round() as i64).clamp(1, 10) as u32
}

pub fn modernization_percent(tech_index: f64) -> u32 {
    ((tech_index * 10.0).round() as i64).clamp(0, 100) as u32
}

fn gdp_bonus(record: &CountryRecord, category: EquipmentCategory) -> u32 {
    (record.gdp_percent * category.profile().operational_coefficient)
        .round()
        .max(0.0) as u32
}

pub fn operational_rate(record: &CountryRecord, category: EquipmentCategory) -> u32 {
    category.profile().operational_base + gdp_bonus(record, category)
}

pub fn yearly_budget(record: &CountryRecord, category: EquipmentCategory) -> u64 {
    (record.budget * category.profile().budget_fraction).round() as u64
}

/// Quantity weighted by quality; not normalized across categories.
pub fn power_rating(quantity: u64, quality_rating: u32) -> f64 {
    quantity as f64 * f64::from(quality_rating) / 10.0
}

pub fn deterministic_estimate(
    record: &CountryRecord,
    category: EquipmentCategory,
    global_rank: GlobalRank,
) -> EquipmentEstimate {
    let quantity = category.quantity(record);
    let quality = quality_rating(record.tech_index);
    EquipmentEstimate {
        country: record.name.clone(),
        category,
        quantity,
        quality_rating: quality,
        modernization_percent: modernization_percent(record.tech_index),
        operational_rate: operational_rate(record, category),
        growth_rate: growth_rate(record, category),
        yearly_budget: yearly_budget(record, category),
        global_rank,
        power_rating: power_rating(quantity, quality),
    }
}

/// Filler figures for the alternate equipment view. Draws four values from `rng`, in the order
/// quality, growth, modernization, operational rate. The operational rate is not clamped.
pub fn randomized_estimate<R: RandomSource + ?Sized>(
    record: &CountryRecord,
    category: EquipmentCategory,
    global_rank: GlobalRank,
    rng: &mut R,
) -> EquipmentEstimate {
    let quantity = category.quantity(record);
    let quality = 5 + (rng.next_f64() * 5.0).floor() as u32;
    let growth = round_to_tenth(rng.next_f64() * 20.0 - 5.0);
    let modernization = 40 + (rng.next_f64() * 60.0).floor() as u32;
    let operational = 55 + (rng.next_f64() * 30.0).floor() as u32 + gdp_bonus(record, category);
    EquipmentEstimate {
        country: record.name.clone(),
        category,
        quantity,
        quality_rating: quality,
        modernization_percent: modernization,
        operational_rate: operational,
        growth_rate: growth,
        yearly_budget: yearly_budget(record, category),
        global_rank,
        power_rating: power_rating(quantity, quality),
    }
}
