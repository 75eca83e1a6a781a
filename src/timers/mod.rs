//! Focus countdown and break reminders, driven by the Tokio runtime.

pub mod focus;
pub mod reminder;

pub use focus::{FocusTimer, TimerEvent};
pub use reminder::BreakReminder;

use crate::config::AppConfig;

/// Owns every running timer so callers never hold their own tickers.
pub struct TimerService {
    pub focus: FocusTimer,
    pub reminder: BreakReminder,
}

impl TimerService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            focus: FocusTimer::new(&config.focus),
            reminder: BreakReminder::new(&config.break_reminder),
        }
    }

    /// Cancel everything that is still ticking
    pub fn shutdown(&self) {
        self.focus.stop();
        self.reminder.stop_monitoring();
    }
}
