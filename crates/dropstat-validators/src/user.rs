//! USER: identity standing and submission rate
use crate::policy::ValidationPolicy;
use dropstat_core::ValidatorContext;

pub fn check(ctx: &ValidatorContext, policy: &ValidationPolicy) -> bool {
    if ctx.user_id.is_empty() {
        return false;
    }
    if policy.blocked_users.iter().any(|u| u == &ctx.user_id) {
        tracing::debug!(uid = %ctx.user_id, "user is blocked");
        return false;
    }
    if ctx.activity.user_reports >= policy.max_reports_per_user {
        tracing::debug!(
            uid = %ctx.user_id,
            recent = ctx.activity.user_reports,
            window_ms = ctx.activity.window_ms,
            "user over rate"
        );
        return false;
    }
    true
}
