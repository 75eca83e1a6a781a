use std::sync::Arc;

use crate::alerts::AlertEngine;
use crate::auth::AuthService;
use crate::config::AppConfig;
use crate::error::StudyError;
use crate::performance::PerformanceMonitor;
use crate::progress::ProgressTracker;
use crate::review::ReviewPrioritizer;
use crate::scheduler::ScheduleGenerator;
use crate::sessions::TimeTracker;
use crate::storage::Repository;
use crate::timers::TimerService;

/// Application-wide state container.
/// Every service shares one repository, passed in explicitly rather than
/// reached through a global.
pub struct AppState {
    pub config: AppConfig,
    pub repo: Arc<Repository>,
    pub auth: AuthService,
    pub prioritizer: ReviewPrioritizer,
    pub scheduler: ScheduleGenerator,
    pub progress: ProgressTracker,
    pub performance: PerformanceMonitor,
    pub alerts: AlertEngine,
    pub tracker: TimeTracker,
    pub timers: TimerService,
}

impl AppState {
    /// Open the configured data directory and wire up every service
    pub fn new(config: AppConfig) -> Result<Self, StudyError> {
        let repo = Repository::open(config.resolved_data_dir())?;
        Ok(Self::with_repository(config, Arc::new(repo)))
    }

    pub fn with_repository(config: AppConfig, repo: Arc<Repository>) -> Self {
        AppState {
            auth: AuthService::new(Arc::clone(&repo), &config.default_profile),
            prioritizer: ReviewPrioritizer::new(Arc::clone(&repo)),
            scheduler: ScheduleGenerator::new(Arc::clone(&repo)),
            progress: ProgressTracker::new(Arc::clone(&repo)),
            performance: PerformanceMonitor::new(Arc::clone(&repo)),
            alerts: AlertEngine::new(Arc::clone(&repo)),
            tracker: TimeTracker::new(Arc::clone(&repo)),
            timers: TimerService::new(&config),
            repo,
            config,
        }
    }
}
