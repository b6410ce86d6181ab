//! Property tests for aggregation and recall tokens.

use dropstat_core::{aggregate, checked_total, combine_drops, DropType, ReportHasher, ReportId, StageInfo, TypedDrop};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

fn typed_drops() -> impl Strategy<Value = Vec<TypedDrop>> {
    prop::collection::vec(
        (
            prop::sample::select(vec!["30011", "30012", "30013", "A", "B", "furni_1"]),
            0u32..50,
            prop::sample::select(vec![
                DropType::NormalDrop,
                DropType::SpecialDrop,
                DropType::ExtraDrop,
                DropType::Furniture,
            ]),
        )
            .prop_map(|(item, quantity, drop_type)| TypedDrop::new(item, quantity, drop_type)),
        0..24,
    )
}

fn expected_sums(input: &[TypedDrop]) -> HashMap<String, u32> {
    let mut sums = HashMap::new();
    for drop in input {
        *sums.entry(drop.item_id.clone()).or_insert(0) += drop.quantity;
    }
    sums
}

proptest! {
    #[test]
    fn combined_drops_are_unique_and_summed(input in typed_drops()) {
        let combined = combine_drops(&input);

        let ids: HashSet<_> = combined.iter().map(|d| d.item_id.clone()).collect();
        prop_assert_eq!(ids.len(), combined.len());

        let actual: HashMap<_, _> = combined.into_iter().map(|d| (d.item_id, d.quantity)).collect();
        prop_assert_eq!(actual, expected_sums(&input));
    }

    #[test]
    fn combination_ignores_input_order(input in typed_drops()) {
        let mut reversed = input.clone();
        reversed.reverse();

        let mut forward = combine_drops(&input);
        let mut backward = combine_drops(&reversed);
        forward.sort_by(|a, b| a.item_id.cmp(&b.item_id));
        backward.sort_by(|a, b| a.item_id.cmp(&b.item_id));
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn gacha_times_equals_total(input in typed_drops(), times in 0u32..10) {
        let stage = StageInfo::new("gacha_1").gacha();
        let aggregation = aggregate(&input, times, Some(&stage));
        let total: u32 = aggregation.drops.iter().map(|d| d.quantity).sum();
        prop_assert_eq!(aggregation.times, total);
    }

    #[test]
    fn large_quantities_are_exact_or_refused(
        quantities in prop::collection::vec(any::<u32>(), 0..4),
    ) {
        let input: Vec<TypedDrop> = quantities
            .iter()
            .enumerate()
            .map(|(i, &q)| TypedDrop::new(if i % 2 == 0 { "A" } else { "B" }, q, DropType::NormalDrop))
            .collect();
        let wide: u64 = quantities.iter().map(|&q| u64::from(q)).sum();

        match checked_total(&input) {
            Some(total) => {
                prop_assert_eq!(u64::from(total), wide);
                let stage = StageInfo::new("gacha_1").gacha();
                let aggregation = aggregate(&input, 1, Some(&stage));
                prop_assert_eq!(aggregation.times, total);
                let combined: u64 = aggregation.drops.iter().map(|d| u64::from(d.quantity)).sum();
                prop_assert_eq!(combined, wide);
            }
            None => prop_assert!(wide > u64::from(u32::MAX)),
        }
    }

    #[test]
    fn regular_times_ignores_content(input in typed_drops(), times in 1u32..10) {
        let stage = StageInfo::new("main_01-07");
        prop_assert_eq!(aggregate(&input, times, Some(&stage)).times, times);
    }

    #[test]
    fn token_is_deterministic(raw in "[0-9a-f]{32}") {
        let id = ReportId::from(raw.clone());
        prop_assert_eq!(ReportHasher::hash(&id), ReportHasher::hash(&ReportId::from(raw)));
    }
}

#[test]
fn tokens_do_not_collide() {
    let mut seen = HashSet::new();
    for _ in 0..20_000 {
        let token = ReportHasher::hash(&ReportId::generate());
        assert!(seen.insert(token), "token collision");
    }
}
