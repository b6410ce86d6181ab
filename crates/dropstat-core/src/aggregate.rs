//! Drop aggregation: itemized client lists → canonical drops + times
use crate::data_model::{Drop, StageInfo, TypedDrop};
use std::collections::BTreeMap;

/// Canonical drops and the derived attempt count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub drops: Vec<Drop>,
    pub times: u32,
}

impl Aggregation {
    pub fn total_quantity(&self) -> u32 {
        self.drops
            .iter()
            .fold(0u32, |acc, drop| acc.saturating_add(drop.quantity))
    }
}

/// Sum of every line's quantity, `None` when it does not fit in `u32`.
///
/// Every per-item sum and the gacha `times` are bounded by this total, so a
/// list that passes here aggregates without clamping.
pub fn checked_total(typed: &[TypedDrop]) -> Option<u32> {
    typed
        .iter()
        .try_fold(0u32, |acc, drop| acc.checked_add(drop.quantity))
}

/// Sum quantities per item id. Output order is not part of the contract.
/// Sums clamp at `u32::MAX`; callers reject lists that fail [`checked_total`].
pub fn combine_drops(typed: &[TypedDrop]) -> Vec<Drop> {
    let mut quantities: BTreeMap<&str, u32> = BTreeMap::new();
    for drop in typed {
        let entry = quantities.entry(drop.item_id.as_str()).or_insert(0);
        *entry = entry.saturating_add(drop.quantity);
    }
    quantities
        .into_iter()
        .map(|(item_id, quantity)| Drop::new(item_id, quantity))
        .collect()
}

/// Combine the list and derive `times`.
///
/// On a gacha stage `times` becomes the total number of items drawn (zero
/// when nothing dropped); otherwise the supplied play count is kept.
pub fn aggregate(typed: &[TypedDrop], times: u32, stage: Option<&StageInfo>) -> Aggregation {
    let drops = combine_drops(typed);
    let mut aggregation = Aggregation { drops, times };
    if stage.is_some_and(|stage| stage.is_gacha) {
        aggregation.times = aggregation.total_quantity();
    }
    aggregation
}
