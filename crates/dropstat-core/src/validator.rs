//! Validator kinds and the reliability seam
use crate::context::ValidatorContext;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One trust check. The chain runs them in a configured order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidatorKind {
    /// Stage exists on the server and is open at submission time
    StageTime,
    /// Per-identity rate and standing
    User,
    /// Per-network rate and standing
    Ip,
    /// Item/quantity plausibility for the stage
    Drops,
}

impl ValidatorKind {
    /// Canonical execution order
    pub const CANONICAL: [ValidatorKind; 4] = [
        ValidatorKind::StageTime,
        ValidatorKind::User,
        ValidatorKind::Ip,
        ValidatorKind::Drops,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ValidatorKind::StageTime => "STAGE_TIME",
            ValidatorKind::User => "USER",
            ValidatorKind::Ip => "IP",
            ValidatorKind::Drops => "DROPS",
        }
    }
}

impl fmt::Display for ValidatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides the reliability flag of a submission.
///
/// Implementations must not touch persisted state; a `false` only marks the
/// report unreliable, it never blocks creation.
pub trait ReliabilityCheck: Send + Sync {
    fn is_reliable(&self, ctx: &ValidatorContext) -> bool;
}

impl<F> ReliabilityCheck for F
where
    F: Fn(&ValidatorContext) -> bool + Send + Sync,
{
    fn is_reliable(&self, ctx: &ValidatorContext) -> bool {
        self(ctx)
    }
}
