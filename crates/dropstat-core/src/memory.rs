//! In-process collaborators used by the service binary and tests
use crate::data_model::{Report, ReportId, StageInfo, User};
use crate::error::DropError;
use crate::store::{ReportStore, StageCatalog, UserDirectory};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Reports kept in insertion order
#[derive(Debug, Default)]
pub struct InMemoryReportStore {
    reports: RwLock<Vec<Report>>,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.reports.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.read().is_empty()
    }
}

impl ReportStore for InMemoryReportStore {
    fn save(&self, report: Report) -> Result<ReportId, DropError> {
        let mut reports = self.reports.write();
        if reports.iter().any(|existing| existing.id == report.id) {
            return Err(DropError::Service(format!("duplicate report id {}", report.id)));
        }
        let id = report.id.clone();
        reports.push(report);
        Ok(id)
    }

    fn get(&self, id: &ReportId) -> Result<Option<Report>, DropError> {
        Ok(self.reports.read().iter().find(|r| &r.id == id).cloned())
    }

    fn find_latest_by_user(&self, user_id: &str) -> Result<Option<Report>, DropError> {
        // max_by_key keeps the last of equal maxima, i.e. the later insertion
        Ok(self
            .reports
            .read()
            .iter()
            .filter(|r| r.user_id == user_id)
            .max_by_key(|r| r.timestamp)
            .cloned())
    }

    fn mark_deleted(&self, id: &ReportId) -> Result<bool, DropError> {
        let mut reports = self.reports.write();
        match reports.iter_mut().find(|r| &r.id == id) {
            Some(report) if !report.is_deleted => {
                report.is_deleted = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn count_by_user_since(&self, user_id: &str, since: i64) -> Result<usize, DropError> {
        Ok(self
            .reports
            .read()
            .iter()
            .filter(|r| r.user_id == user_id && r.timestamp >= since)
            .count())
    }

    fn count_by_ip_since(&self, ip: &str, since: i64) -> Result<usize, DropError> {
        Ok(self
            .reports
            .read()
            .iter()
            .filter(|r| r.ip == ip && r.timestamp >= since)
            .count())
    }
}

/// Fixed stage table, usually loaded from configuration
#[derive(Debug, Default)]
pub struct InMemoryStageCatalog {
    stages: HashMap<String, StageInfo>,
}

impl InMemoryStageCatalog {
    pub fn new(stages: impl IntoIterator<Item = StageInfo>) -> Self {
        Self {
            stages: stages
                .into_iter()
                .map(|stage| (stage.stage_id.clone(), stage))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl StageCatalog for InMemoryStageCatalog {
    fn get_stage(&self, stage_id: &str) -> Result<Option<StageInfo>, DropError> {
        Ok(self.stages.get(stage_id).cloned())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    fn generate_id() -> String {
        let mut id = uuid::Uuid::new_v4().simple().to_string();
        id.truncate(16);
        id
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn create_user(&self, ip: &str) -> Result<String, DropError> {
        let mut users = self.users.write();
        let mut user_id = Self::generate_id();
        while users.contains_key(&user_id) {
            user_id = Self::generate_id();
        }
        users.insert(
            user_id.clone(),
            User {
                user_id: user_id.clone(),
                ip: ip.to_string(),
                created_at: chrono::Utc::now().timestamp_millis(),
                tags: Vec::new(),
            },
        );
        tracing::debug!(uid = %user_id, ip, "created user");
        Ok(user_id)
    }

    fn create_user_with_id(&self, user_id: &str, ip: &str) -> Result<String, DropError> {
        let mut users = self.users.write();
        if users.contains_key(user_id) {
            return Err(DropError::BusinessRule(format!(
                "user already exists: uid={}",
                user_id
            )));
        }
        users.insert(
            user_id.to_string(),
            User {
                user_id: user_id.to_string(),
                ip: ip.to_string(),
                created_at: chrono::Utc::now().timestamp_millis(),
                tags: Vec::new(),
            },
        );
        tracing::debug!(uid = %user_id, ip, "created user with chosen id");
        Ok(user_id.to_string())
    }

    fn find_user(&self, user_id: &str) -> Result<Option<User>, DropError> {
        Ok(self.users.read().get(user_id).cloned())
    }

    fn add_tag(&self, user_id: &str, tag: &str) -> Result<(), DropError> {
        let mut users = self.users.write();
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| DropError::NotFound(format!("user not found: uid={}", user_id)))?;
        if !user.tags.iter().any(|t| t == tag) {
            user.tags.push(tag.to_string());
        }
        Ok(())
    }
}
