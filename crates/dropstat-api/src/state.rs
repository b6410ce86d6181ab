//! Shared handler state and its wiring from configuration
use crate::config::ServiceConfig;
use crate::identity::{CookieIdentity, IdentityResolver};
use crate::metrics::Metrics;
use dropstat_core::{
    Clock, InMemoryReportStore, InMemoryStageCatalog, InMemoryUserDirectory, RecallService,
    ReportStore, SubmissionService, SystemClock, UserDirectory,
};
use dropstat_validators::ValidatorChain;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub submissions: Arc<SubmissionService>,
    pub recalls: Arc<RecallService>,
    pub reports: Arc<dyn ReportStore>,
    pub users: Arc<dyn UserDirectory>,
    pub identity: Arc<dyn IdentityResolver>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn from_config(config: &ServiceConfig) -> Result<Self, prometheus::Error> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// In-memory collaborators, the configured chain and stage table
    pub fn with_clock(
        config: &ServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, prometheus::Error> {
        let reports: Arc<dyn ReportStore> = Arc::new(InMemoryReportStore::new());
        let users: Arc<dyn UserDirectory> = Arc::new(InMemoryUserDirectory::new());
        let stages = Arc::new(InMemoryStageCatalog::new(config.stages.clone()));
        let chain = Arc::new(ValidatorChain::new(config.validation.clone()));

        tracing::info!(
            stages = stages.len(),
            policy = %config.validation.name,
            order = ?config.validation.order,
            "state initialised"
        );

        let submissions = SubmissionService::new(
            reports.clone(),
            stages,
            chain,
            clock.clone(),
            config.activity_window_ms(),
        );
        let recalls = RecallService::new(reports.clone(), clock);
        let identity = CookieIdentity::new(users.clone(), config.cookie_max_age_days);

        Ok(Self {
            submissions: Arc::new(submissions),
            recalls: Arc::new(recalls),
            reports,
            users,
            identity: Arc::new(identity),
            metrics: Arc::new(Metrics::new()?),
        })
    }
}
