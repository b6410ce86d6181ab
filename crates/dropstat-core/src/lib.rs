//! Dropstat Core: report model, aggregation, recall tokens and services
//!
//! Everything a drop report goes through between the HTTP boundary and the
//! store lives here. Rule bodies for the trust checks are plugged in through
//! [`ReliabilityCheck`]; storage, stage metadata and accounts through the
//! collaborator traits in [`store`].
//!
//! ```text
//! Submission → ValidatorContext → ReliabilityCheck → DropAggregator → Report → ReportStore
//!                                                                         ↓
//!                                                                   ReportHasher → token
//!
//! (userID, token) → RecallService → latest report → hash compare → age check → soft delete
//! ```

pub mod aggregate;
pub mod clock;
pub mod context;
pub mod data_model;
pub mod error;
pub mod hash;
pub mod ingest;
pub mod memory;
pub mod recall;
pub mod store;
pub mod validator;

pub use aggregate::{aggregate, checked_total, combine_drops, Aggregation};
pub use clock::{Clock, ManualClock, SystemClock};
pub use context::{ActivitySnapshot, ValidatorContext};
pub use data_model::{
    Bounds, Drop, DropInfo, DropType, Report, ReportId, Server, StageExistence, StageInfo,
    TypedDrop, User,
};
pub use error::{DropError, ErrorCode};
pub use hash::ReportHasher;
pub use ingest::{Submission, SubmissionService, SubmitReceipt};
pub use memory::{InMemoryReportStore, InMemoryStageCatalog, InMemoryUserDirectory};
pub use recall::RecallService;
pub use store::{ReportStore, StageCatalog, UserDirectory};
pub use validator::{ReliabilityCheck, ValidatorKind};

/// Play count recorded for a report before the gacha rule applies.
pub const DEFAULT_TIMES: u32 = 1;

/// How long after creation a report can still be recalled (24 hours).
pub const RECALL_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;
