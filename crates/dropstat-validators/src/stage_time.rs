//! STAGE_TIME: the stage exists on the server and is open at submission time
use crate::policy::ValidationPolicy;
use dropstat_core::ValidatorContext;

pub fn check(ctx: &ValidatorContext, policy: &ValidationPolicy) -> bool {
    let Some(stage) = ctx.stage.as_ref() else {
        tracing::debug!(stage = %ctx.stage_id, "unknown stage");
        return false;
    };
    // No existence table means no per-server restriction.
    if stage.existence.is_empty() {
        return true;
    }
    let Some(existence) = stage.existence.get(&ctx.server) else {
        tracing::debug!(stage = %ctx.stage_id, server = %ctx.server, "stage not listed for server");
        return false;
    };
    if !existence.exist {
        return false;
    }

    let tolerance = policy.stage_time_tolerance_ms;
    if let Some(open) = existence.open_time {
        if ctx.timestamp < open.saturating_sub(tolerance) {
            return false;
        }
    }
    if let Some(close) = existence.close_time {
        if ctx.timestamp >= close.saturating_add(tolerance) {
            return false;
        }
    }
    true
}
