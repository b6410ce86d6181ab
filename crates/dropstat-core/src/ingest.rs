//! Submission pipeline: context → reliability → aggregation → store → token
use crate::aggregate::{aggregate, checked_total};
use crate::clock::Clock;
use crate::context::{ActivitySnapshot, ValidatorContext};
use crate::data_model::{Report, ReportId, Server, TypedDrop};
use crate::error::DropError;
use crate::hash::ReportHasher;
use crate::store::{ReportStore, StageCatalog};
use crate::validator::ReliabilityCheck;
use crate::DEFAULT_TIMES;
use std::sync::Arc;

/// One inbound report with the caller's identity already resolved
#[derive(Debug, Clone)]
pub struct Submission {
    pub stage_id: String,
    pub server: Server,
    pub source: String,
    pub version: String,
    pub drops: Vec<TypedDrop>,
    pub user_id: String,
    pub ip: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub report_id: ReportId,
    /// Token the submitter presents to recall this report
    pub report_hash: String,
    pub is_reliable: bool,
    pub times: u32,
}

pub struct SubmissionService {
    reports: Arc<dyn ReportStore>,
    stages: Arc<dyn StageCatalog>,
    checks: Arc<dyn ReliabilityCheck>,
    clock: Arc<dyn Clock>,
    activity_window_ms: i64,
}

impl SubmissionService {
    pub fn new(
        reports: Arc<dyn ReportStore>,
        stages: Arc<dyn StageCatalog>,
        checks: Arc<dyn ReliabilityCheck>,
        clock: Arc<dyn Clock>,
        activity_window_ms: i64,
    ) -> Self {
        Self {
            reports,
            stages,
            checks,
            clock,
            activity_window_ms,
        }
    }

    /// Store one report. Failing trust checks only clear the reliability
    /// flag; the report is stored either way. Not idempotent.
    pub fn submit(&self, submission: Submission) -> Result<SubmitReceipt, DropError> {
        if checked_total(&submission.drops).is_none() {
            return Err(DropError::Validation(
                "drops: total quantity out of range".to_string(),
            ));
        }

        let timestamp = self.clock.now_millis();
        let stage = self.stages.get_stage(&submission.stage_id)?;

        let since = timestamp - self.activity_window_ms;
        let activity = ActivitySnapshot {
            window_ms: self.activity_window_ms,
            user_reports: self.reports.count_by_user_since(&submission.user_id, since)?,
            ip_reports: self.reports.count_by_ip_since(&submission.ip, since)?,
        };

        let context = ValidatorContext {
            stage_id: submission.stage_id,
            server: submission.server,
            times: DEFAULT_TIMES,
            drops: submission.drops,
            timestamp,
            ip: submission.ip,
            user_id: submission.user_id,
            stage,
            activity,
        };

        let is_reliable = self.checks.is_reliable(&context);
        let aggregation = aggregate(&context.drops, context.times, context.stage.as_ref());
        let times = aggregation.times;

        let report = Report::from_context(
            ReportId::generate(),
            context,
            aggregation.drops,
            times,
            is_reliable,
            submission.source,
            submission.version,
        );
        tracing::debug!(report = ?report, "saving report");

        let report_id = self.reports.save(report)?;
        let report_hash = ReportHasher::hash(&report_id);

        tracing::info!(
            report_id = %report_id,
            reliable = is_reliable,
            times,
            "report stored"
        );

        Ok(SubmitReceipt {
            report_id,
            report_hash,
            is_reliable,
            times,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::data_model::{Drop, DropType, StageInfo};
    use crate::memory::{InMemoryReportStore, InMemoryStageCatalog};
    use parking_lot::Mutex;

    fn service(
        reports: Arc<InMemoryReportStore>,
        checks: Arc<dyn ReliabilityCheck>,
    ) -> SubmissionService {
        let stages = InMemoryStageCatalog::new(vec![
            StageInfo::new("main_01-07"),
            StageInfo::new("gacha_1").gacha(),
        ]);
        SubmissionService::new(
            reports,
            Arc::new(stages),
            checks,
            Arc::new(ManualClock::new(1_700_000_000_000)),
            60 * 60 * 1000,
        )
    }

    fn submission(stage_id: &str, drops: Vec<TypedDrop>) -> Submission {
        Submission {
            stage_id: stage_id.to_string(),
            server: Server::CN,
            source: "frontend-v2".to_string(),
            version: "v3.4.1".to_string(),
            drops,
            user_id: "u1".to_string(),
            ip: "10.0.0.1".to_string(),
        }
    }

    #[test]
    fn test_unreliable_report_is_still_stored() {
        let reports = Arc::new(InMemoryReportStore::new());
        let svc = service(reports.clone(), Arc::new(|_: &ValidatorContext| false));

        let receipt = svc
            .submit(submission("main_01-07", vec![TypedDrop::new("30012", 1, DropType::NormalDrop)]))
            .unwrap();

        assert!(!receipt.is_reliable);
        let stored = reports.get(&receipt.report_id).unwrap().unwrap();
        assert!(!stored.is_reliable);
        assert!(!stored.is_deleted);
        assert_eq!(receipt.report_hash, ReportHasher::hash(&stored.id));
    }

    #[test]
    fn test_context_carries_activity() {
        let reports = Arc::new(InMemoryReportStore::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_in_check = seen.clone();
        let svc = service(
            reports,
            Arc::new(move |ctx: &ValidatorContext| {
                seen_in_check.lock().push(ctx.activity);
                true
            }),
        );

        svc.submit(submission("main_01-07", vec![])).unwrap();
        svc.submit(submission("main_01-07", vec![])).unwrap();

        let seen = seen.lock();
        assert_eq!(seen[0].user_reports, 0);
        assert_eq!(seen[1].user_reports, 1);
        assert_eq!(seen[1].ip_reports, 1);
    }

    #[test]
    fn test_gacha_and_regular_times() {
        let reports = Arc::new(InMemoryReportStore::new());
        let svc = service(reports.clone(), Arc::new(|_: &ValidatorContext| true));

        let regular = svc
            .submit(submission(
                "main_01-07",
                vec![
                    TypedDrop::new("30012", 2, DropType::NormalDrop),
                    TypedDrop::new("30012", 1, DropType::NormalDrop),
                ],
            ))
            .unwrap();
        let stored = reports.get(&regular.report_id).unwrap().unwrap();
        assert_eq!(stored.drops, vec![Drop::new("30012", 3)]);
        assert_eq!(stored.times, 1);

        let gacha = svc
            .submit(submission(
                "gacha_1",
                vec![
                    TypedDrop::new("A", 2, DropType::NormalDrop),
                    TypedDrop::new("B", 3, DropType::NormalDrop),
                ],
            ))
            .unwrap();
        assert_eq!(gacha.times, 5);
    }

    #[test]
    fn test_overflowing_total_is_rejected() {
        let reports = Arc::new(InMemoryReportStore::new());
        let svc = service(reports.clone(), Arc::new(|_: &ValidatorContext| true));

        let err = svc
            .submit(submission(
                "gacha_1",
                vec![
                    TypedDrop::new("A", u32::MAX, DropType::NormalDrop),
                    TypedDrop::new("B", 3, DropType::NormalDrop),
                ],
            ))
            .unwrap_err();
        assert!(matches!(err, DropError::Validation(_)));
        assert!(reports.is_empty());

        let receipt = svc
            .submit(submission(
                "gacha_1",
                vec![
                    TypedDrop::new("A", u32::MAX - 3, DropType::NormalDrop),
                    TypedDrop::new("A", 3, DropType::ExtraDrop),
                ],
            ))
            .unwrap();
        let stored = reports.get(&receipt.report_id).unwrap().unwrap();
        assert_eq!(stored.drops, vec![Drop::new("A", u32::MAX)]);
        assert_eq!(stored.times, u32::MAX);
    }

    #[test]
    fn test_identical_bodies_make_distinct_reports() {
        let reports = Arc::new(InMemoryReportStore::new());
        let svc = service(reports.clone(), Arc::new(|_: &ValidatorContext| true));
        let a = svc.submit(submission("main_01-07", vec![])).unwrap();
        let b = svc.submit(submission("main_01-07", vec![])).unwrap();
        assert_ne!(a.report_id, b.report_id);
        assert_ne!(a.report_hash, b.report_hash);
        assert_eq!(reports.len(), 2);
    }
}
