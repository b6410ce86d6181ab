//! Recall: a submitter retracts their own latest report by token
use crate::clock::Clock;
use crate::data_model::ReportId;
use crate::error::DropError;
use crate::hash::ReportHasher;
use crate::store::ReportStore;
use crate::RECALL_WINDOW_MS;
use std::sync::Arc;

pub struct RecallService {
    reports: Arc<dyn ReportStore>,
    clock: Arc<dyn Clock>,
}

impl RecallService {
    pub fn new(reports: Arc<dyn ReportStore>, clock: Arc<dyn Clock>) -> Self {
        Self { reports, clock }
    }

    /// Soft-delete the caller's most recent report if `token` is its recall
    /// token and it is at most 24 hours old.
    ///
    /// Only the single latest report is ever recallable. A wrong token and a
    /// missing report fail the same way. "Latest" is looked up on every call.
    pub fn recall(&self, user_id: &str, token: &str) -> Result<ReportId, DropError> {
        if user_id.is_empty() {
            return Err(DropError::BusinessRule("Cannot read user ID".to_string()));
        }

        let latest = self
            .reports
            .find_latest_by_user(user_id)?
            .ok_or_else(not_found)?;

        if latest.user_id != user_id {
            tracing::error!(uid = user_id, owner = %latest.user_id, "store returned a foreign report");
            return Err(DropError::Forbidden(
                "Report does not belong to the current user".to_string(),
            ));
        }

        if !ReportHasher::matches(&latest.id, token) || latest.is_deleted {
            return Err(not_found());
        }

        let age = self.clock.now_millis() - latest.timestamp;
        if age > RECALL_WINDOW_MS {
            return Err(DropError::Expired(
                "The last report was created more than 24 hours ago".to_string(),
            ));
        }

        // A concurrent recall may have flipped the flag since the read above.
        if !self.reports.mark_deleted(&latest.id)? {
            return Err(not_found());
        }

        tracing::info!(uid = user_id, report_id = %latest.id, "report recalled");
        Ok(latest.id)
    }
}

fn not_found() -> DropError {
    DropError::NotFound("Report not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::data_model::{Report, Server};
    use crate::memory::InMemoryReportStore;

    const T0: i64 = 1_700_000_000_000;

    fn report(user_id: &str, timestamp: i64) -> Report {
        Report {
            id: ReportId::generate(),
            stage_id: "main_01-07".to_string(),
            server: Server::US,
            times: 1,
            drops: vec![],
            timestamp,
            ip: "10.0.0.1".to_string(),
            user_id: user_id.to_string(),
            is_reliable: true,
            is_deleted: false,
            source: "test".to_string(),
            version: "v1".to_string(),
        }
    }

    fn setup() -> (Arc<InMemoryReportStore>, Arc<ManualClock>, RecallService) {
        let store = Arc::new(InMemoryReportStore::new());
        let clock = Arc::new(ManualClock::new(T0));
        let service = RecallService::new(store.clone(), clock.clone());
        (store, clock, service)
    }

    #[test]
    fn test_empty_identity_is_business_error() {
        let (_, _, service) = setup();
        assert!(matches!(
            service.recall("", "abc"),
            Err(DropError::BusinessRule(_))
        ));
    }

    #[test]
    fn test_no_report_and_wrong_token_look_the_same() {
        let (store, _, service) = setup();
        let missing = service.recall("u1", &ReportHasher::hash(&ReportId::generate()));

        store.save(report("u1", T0)).unwrap();
        let wrong = service.recall("u1", &ReportHasher::hash(&ReportId::generate()));

        assert_eq!(missing.unwrap_err(), wrong.unwrap_err());
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let (store, clock, service) = setup();
        let id = store.save(report("u1", T0)).unwrap();
        clock.set(T0 + RECALL_WINDOW_MS);
        assert_eq!(service.recall("u1", &ReportHasher::hash(&id)).unwrap(), id);
    }

    #[test]
    fn test_just_past_window_expires() {
        let (store, clock, service) = setup();
        let id = store.save(report("u1", T0)).unwrap();
        clock.set(T0 + RECALL_WINDOW_MS + 1);
        assert!(matches!(
            service.recall("u1", &ReportHasher::hash(&id)),
            Err(DropError::Expired(_))
        ));
        assert!(!store.get(&id).unwrap().unwrap().is_deleted);
    }

    #[test]
    fn test_older_report_is_final() {
        let (store, _, service) = setup();
        let older = store.save(report("u1", T0)).unwrap();
        store.save(report("u1", T0 + 1)).unwrap();
        assert!(matches!(
            service.recall("u1", &ReportHasher::hash(&older)),
            Err(DropError::NotFound(_))
        ));
    }

    #[test]
    fn test_recalled_report_does_not_expose_previous() {
        let (store, _, service) = setup();
        let older = store.save(report("u1", T0)).unwrap();
        let newer = store.save(report("u1", T0 + 1)).unwrap();
        service.recall("u1", &ReportHasher::hash(&newer)).unwrap();
        assert!(service.recall("u1", &ReportHasher::hash(&older)).is_err());
        assert!(!store.get(&older).unwrap().unwrap().is_deleted);
    }

    struct ForeignStore(InMemoryReportStore);

    impl ReportStore for ForeignStore {
        fn save(&self, report: Report) -> Result<ReportId, DropError> {
            self.0.save(report)
        }
        fn get(&self, id: &ReportId) -> Result<Option<Report>, DropError> {
            self.0.get(id)
        }
        fn find_latest_by_user(&self, _user_id: &str) -> Result<Option<Report>, DropError> {
            self.0.find_latest_by_user("someone-else")
        }
        fn mark_deleted(&self, id: &ReportId) -> Result<bool, DropError> {
            self.0.mark_deleted(id)
        }
        fn count_by_user_since(&self, user_id: &str, since: i64) -> Result<usize, DropError> {
            self.0.count_by_user_since(user_id, since)
        }
        fn count_by_ip_since(&self, ip: &str, since: i64) -> Result<usize, DropError> {
            self.0.count_by_ip_since(ip, since)
        }
    }

    #[test]
    fn test_foreign_report_is_forbidden() {
        let store = Arc::new(ForeignStore(InMemoryReportStore::new()));
        let id = store.save(report("someone-else", T0)).unwrap();
        let service = RecallService::new(store.clone(), Arc::new(ManualClock::new(T0)));
        assert!(matches!(
            service.recall("u1", &ReportHasher::hash(&id)),
            Err(DropError::Forbidden(_))
        ));
        assert!(!store.get(&id).unwrap().unwrap().is_deleted);
    }
}
