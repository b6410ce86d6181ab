//! Collaborator contracts: report storage, stage metadata, accounts
use crate::data_model::{Report, ReportId, StageInfo, User};
use crate::error::DropError;

/// Persistence for reports.
///
/// `mark_deleted` must be an atomic compare-and-set on the deleted flag: it
/// returns `true` only for the call that actually flipped it.
pub trait ReportStore: Send + Sync {
    fn save(&self, report: Report) -> Result<ReportId, DropError>;

    fn get(&self, id: &ReportId) -> Result<Option<Report>, DropError>;

    /// Most recently created report of `user_id`, deleted ones included.
    /// Ties on timestamp go to the later insertion.
    fn find_latest_by_user(&self, user_id: &str) -> Result<Option<Report>, DropError>;

    fn mark_deleted(&self, id: &ReportId) -> Result<bool, DropError>;

    /// Reports by `user_id` created at or after `since` (Unix ms)
    fn count_by_user_since(&self, user_id: &str, since: i64) -> Result<usize, DropError>;

    /// Reports from `ip` created at or after `since` (Unix ms)
    fn count_by_ip_since(&self, ip: &str, since: i64) -> Result<usize, DropError>;
}

pub trait StageCatalog: Send + Sync {
    fn get_stage(&self, stage_id: &str) -> Result<Option<StageInfo>, DropError>;
}

pub trait UserDirectory: Send + Sync {
    /// Create an account with a fresh id bound to `ip`; returns the id
    fn create_user(&self, ip: &str) -> Result<String, DropError>;

    /// Create an account with a caller-chosen id; fails if it is taken
    fn create_user_with_id(&self, user_id: &str, ip: &str) -> Result<String, DropError>;

    fn find_user(&self, user_id: &str) -> Result<Option<User>, DropError>;

    fn add_tag(&self, user_id: &str, tag: &str) -> Result<(), DropError>;
}
