//! DROPS: submitted items and quantities are plausible for the stage
use crate::policy::ValidationPolicy;
use dropstat_core::{combine_drops, ValidatorContext};

pub fn check(ctx: &ValidatorContext, policy: &ValidationPolicy) -> bool {
    let combined = combine_drops(&ctx.drops);
    if combined.len() > policy.max_item_kinds {
        return false;
    }

    let drop_infos = ctx
        .stage
        .as_ref()
        .map(|stage| stage.drop_infos.as_slice())
        .unwrap_or_default();

    if drop_infos.is_empty() {
        return combined
            .iter()
            .all(|drop| drop.quantity <= policy.max_quantity_per_item);
    }

    // Every submitted item must be in the drop table...
    let all_listed = combined
        .iter()
        .all(|drop| drop_infos.iter().any(|info| info.item_id == drop.item_id));
    if !all_listed {
        tracing::debug!(stage = %ctx.stage_id, "report contains items outside the drop table");
        return false;
    }

    // ...and every listed item must be within bounds, absent ones counting as 0.
    drop_infos.iter().all(|info| {
        let quantity = combined
            .iter()
            .find(|drop| drop.item_id == info.item_id)
            .map_or(0, |drop| drop.quantity);
        info.bounds.contains(quantity)
    })
}
