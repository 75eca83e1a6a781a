use std::time::Duration;
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::config::settings::BreakReminderConfig;
use crate::records::StudySession;

/// Fires a one-shot callback after a study session has run for the
/// configured interval.
pub struct BreakReminder {
    interval_minutes: u32,
    break_minutes: u32,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl BreakReminder {
    pub fn new(config: &BreakReminderConfig) -> Self {
        Self {
            interval_minutes: config.interval_minutes,
            break_minutes: config.break_minutes,
            task: Mutex::new(None),
        }
    }

    /// Replace any pending reminder with one for `session`
    pub fn start_monitoring<F>(&self, session: &StudySession, on_reminder: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.stop_monitoring();

        let wait = Duration::from_secs(u64::from(self.interval_minutes) * 60);
        let session_id = session.id.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            tracing::info!(session_id = %session_id, "Break reminder due");
            on_reminder();
        });
        *self.task.lock() = Some(handle);
    }

    pub fn stop_monitoring(&self) {
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
        }
    }

    /// True while a reminder is pending
    pub fn is_monitoring(&self) -> bool {
        self.task.lock().as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn break_message(&self) -> String {
        format!(
            "You've been studying for {} minutes. Time for a {}-minute break!",
            self.interval_minutes, self.break_minutes
        )
    }
}

impl Drop for BreakReminder {
    fn drop(&mut self) {
        self.stop_monitoring();
    }
}
