//! Validator Context: the snapshot every trust check reads
use crate::data_model::{Server, StageInfo, TypedDrop};

/// Prior activity of the submitter, counted before the current report is stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivitySnapshot {
    pub window_ms: i64,
    /// Reports already stored for this identity inside the window
    pub user_reports: usize,
    /// Reports already stored from this IP inside the window
    pub ip_reports: usize,
}

/// Built once per submission and only ever shared by reference, so no
/// validator can observe another's effects.
#[derive(Debug, Clone)]
pub struct ValidatorContext {
    pub stage_id: String,
    pub server: Server,
    pub times: u32,
    pub drops: Vec<TypedDrop>,
    /// Submission time (Unix ms)
    pub timestamp: i64,
    pub ip: String,
    pub user_id: String,
    /// Stage metadata, if the catalog knows the stage
    pub stage: Option<StageInfo>,
    pub activity: ActivitySnapshot,
}
