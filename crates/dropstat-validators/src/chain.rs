//! Validator Chain: runs the configured kinds in order, stops at the first failure
use crate::policy::ValidationPolicy;
use crate::{drops, ip, stage_time, user};
use dropstat_core::{ReliabilityCheck, ValidatorContext, ValidatorKind};

/// What a chain run saw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainOutcome {
    /// Every kind that was executed, in execution order
    pub checked: Vec<ValidatorKind>,
    /// The kind that returned false, if any
    pub failed: Option<ValidatorKind>,
}

impl ChainOutcome {
    pub fn is_reliable(&self) -> bool {
        self.failed.is_none()
    }
}

/// Dispatch one kind to its rule body
pub fn validate(kind: ValidatorKind, ctx: &ValidatorContext, policy: &ValidationPolicy) -> bool {
    match kind {
        ValidatorKind::StageTime => stage_time::check(ctx, policy),
        ValidatorKind::User => user::check(ctx, policy),
        ValidatorKind::Ip => ip::check(ctx, policy),
        ValidatorKind::Drops => drops::check(ctx, policy),
    }
}

/// Fold `order` through `check`, stopping at the first `false`.
/// An empty order is reliable.
pub fn run_ordered<F>(order: &[ValidatorKind], mut check: F) -> ChainOutcome
where
    F: FnMut(ValidatorKind) -> bool,
{
    let mut checked = Vec::with_capacity(order.len());
    for &kind in order {
        checked.push(kind);
        if !check(kind) {
            tracing::warn!("Failed to pass {} check.", kind);
            return ChainOutcome {
                checked,
                failed: Some(kind),
            };
        }
        tracing::debug!("Pass {} check.", kind);
    }
    ChainOutcome {
        checked,
        failed: None,
    }
}

pub struct ValidatorChain {
    policy: ValidationPolicy,
}

impl ValidatorChain {
    pub fn new(policy: ValidationPolicy) -> Self {
        Self { policy }
    }

    pub fn order(&self) -> &[ValidatorKind] {
        &self.policy.order
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    pub fn run(&self, ctx: &ValidatorContext) -> ChainOutcome {
        run_ordered(&self.policy.order, |kind| validate(kind, ctx, &self.policy))
    }
}

impl Default for ValidatorChain {
    fn default() -> Self {
        Self::new(ValidationPolicy::standard())
    }
}

impl ReliabilityCheck for ValidatorChain {
    fn is_reliable(&self, ctx: &ValidatorContext) -> bool {
        self.run(ctx).is_reliable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::context;

    #[test]
    fn test_empty_chain_is_reliable() {
        let outcome = run_ordered(&[], |_| false);
        assert!(outcome.is_reliable());
        assert!(outcome.checked.is_empty());
    }

    #[test]
    fn test_runs_in_configured_order() {
        let order = [ValidatorKind::Drops, ValidatorKind::StageTime, ValidatorKind::Ip];
        let mut seen = Vec::new();
        let outcome = run_ordered(&order, |kind| {
            seen.push(kind);
            true
        });
        assert!(outcome.is_reliable());
        assert_eq!(seen, order);
        assert_eq!(outcome.checked, order);
    }

    #[test]
    fn test_short_circuits_on_first_failure() {
        let outcome = run_ordered(&ValidatorKind::CANONICAL, |kind| kind != ValidatorKind::User);
        assert!(!outcome.is_reliable());
        assert_eq!(outcome.failed, Some(ValidatorKind::User));
        assert_eq!(
            outcome.checked,
            vec![ValidatorKind::StageTime, ValidatorKind::User]
        );
    }

    #[test]
    fn test_any_single_failure_is_unreliable() {
        for failing in ValidatorKind::CANONICAL {
            let outcome = run_ordered(&ValidatorKind::CANONICAL, |kind| kind != failing);
            assert_eq!(outcome.failed, Some(failing));
        }
    }

    #[test]
    fn test_standard_chain_on_clean_context() {
        let chain = ValidatorChain::default();
        let outcome = chain.run(&context());
        assert!(outcome.is_reliable());
        assert_eq!(outcome.checked, ValidatorKind::CANONICAL.to_vec());
        assert!(chain.is_reliable(&context()));
    }

    #[test]
    fn test_unknown_stage_fails_first() {
        let mut ctx = context();
        ctx.stage = None;
        ctx.activity.ip_reports = usize::MAX;
        let outcome = ValidatorChain::default().run(&ctx);
        assert_eq!(outcome.failed, Some(ValidatorKind::StageTime));
        assert_eq!(outcome.checked.len(), 1);
    }

    #[test]
    fn test_reordered_policy_reports_other_failure_first() {
        let mut ctx = context();
        ctx.stage = None;
        ctx.activity.ip_reports = usize::MAX;
        let chain = ValidatorChain::new(ValidationPolicy {
            order: vec![ValidatorKind::Ip, ValidatorKind::StageTime],
            ..ValidationPolicy::standard()
        });
        let outcome = chain.run(&ctx);
        assert_eq!(outcome.failed, Some(ValidatorKind::Ip));
        assert!(!chain.is_reliable(&ctx));
    }
}
