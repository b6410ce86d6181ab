//! IP: network standing and submission rate
use crate::policy::ValidationPolicy;
use dropstat_core::ValidatorContext;

pub fn check(ctx: &ValidatorContext, policy: &ValidationPolicy) -> bool {
    if policy.blocked_ips.iter().any(|ip| ip == &ctx.ip) {
        tracing::debug!(ip = %ctx.ip, "ip is blocked");
        return false;
    }
    ctx.activity.ip_reports < policy.max_reports_per_ip
}
