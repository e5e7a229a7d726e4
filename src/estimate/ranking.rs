use std::collections::HashMap;

use serde::Serialize;

use crate::data::CountryTable;
use crate::estimate::formulas::{power_rating, quality_rating};
use crate::estimate::{EquipmentCategory, GlobalRank};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankEntry {
    pub country: String,
    pub quantity: u64,
    pub rank: GlobalRank,
    pub power_rating: f64,
}

/// Every country in the table ranked by `category` quantity, largest first. Ties keep table
/// order (the sort is stable). Countries with a zero quantity come last, unranked.
pub fn global_ranking(table: &CountryTable, category: EquipmentCategory) -> Vec<RankEntry> {
    let mut ranked: Vec<RankEntry> = table
        .records()
        .iter()
        .map(|record| {
            let quantity = category.quantity(record);
            RankEntry {
                country: record.name.clone(),
                quantity,
                rank: GlobalRank(None),
                power_rating: power_rating(quantity, quality_rating(record.tech_index)),
            }
        })
        .collect();

    ranked.sort_by(|left, right| right.quantity.cmp(&left.quantity));

    let mut next_rank = 1;
    for entry in ranked.iter_mut().filter(|entry| entry.quantity > 0) {
        entry.rank = GlobalRank(Some(next_rank));
        next_rank += 1;
    }
    ranked
}

/// Ranks for all categories, computed once per table.
#[derive(Debug, Clone, Default)]
pub struct RankLookup {
    ranks: HashMap<(EquipmentCategory, String), usize>,
}

impl RankLookup {
    pub fn build(table: &CountryTable) -> Self {
        let mut ranks = HashMap::new();
        for category in EquipmentCategory::ALL {
            for entry in global_ranking(table, category) {
                if let GlobalRank(Some(rank)) = entry.rank {
                    ranks.insert((category, entry.country), rank);
                }
            }
        }
        Self { ranks }
    }

    pub fn rank(&self, category: EquipmentCategory, country: &str) -> GlobalRank {
        GlobalRank(self.ranks.get(&(category, country.to_string())).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn largest_tank_fleet_ranks_first() {
        let table = CountryTable::builtin().expect("builtin table");
        let ranking = global_ranking(&table, EquipmentCategory::Tanks);
        assert_eq!(ranking[0].country, "Russia");
        assert_eq!(ranking[0].rank, GlobalRank(Some(1)));
        let ranks: Vec<usize> = ranking.iter().filter_map(|entry| entry.rank.0).collect();
        assert_eq!(ranks, (1..=table.len()).collect::<Vec<_>>());
    }

    #[test]
    fn lookup_matches_ranking() {
        let table = CountryTable::builtin().expect("builtin table");
        let lookup = RankLookup::build(&table);
        assert_eq!(
            lookup.rank(EquipmentCategory::Aircraft, "United States"),
            GlobalRank(Some(1))
        );
        assert_eq!(lookup.rank(EquipmentCategory::Aircraft, "Atlantis"), GlobalRank(None));
    }
}
