use std::sync::Arc;
use std::time::Duration;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::config::settings::FocusConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// One second elapsed
    Tick { remaining_secs: u32 },
    /// Work interval over, break started
    WorkComplete,
    /// Break over, timer stopped
    BreakComplete,
}

#[derive(Debug)]
struct FocusState {
    remaining_secs: u32,
    work_minutes: u32,
    break_minutes: u32,
    work_phase: bool,
    running: bool,
    events: Option<mpsc::UnboundedSender<TimerEvent>>,
}

impl FocusState {
    fn emit(&self, event: TimerEvent) {
        if let Some(tx) = &self.events {
            // A dropped subscriber just stops receiving.
            let _ = tx.send(event);
        }
    }

    /// Advance one second. Returns false once the timer has finished.
    fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        self.emit(TimerEvent::Tick { remaining_secs: self.remaining_secs });

        if self.remaining_secs > 0 {
            return true;
        }
        if self.work_phase {
            self.work_phase = false;
            self.remaining_secs = self.break_minutes * 60;
            self.emit(TimerEvent::WorkComplete);
            true
        } else {
            self.running = false;
            self.remaining_secs = 0;
            self.emit(TimerEvent::BreakComplete);
            false
        }
    }
}

/// Pomodoro-style countdown: a work interval followed by a break.
///
/// Ticks run on the Tokio runtime, so `start` and `resume` must be called from
/// within one.
pub struct FocusTimer {
    state: Arc<Mutex<FocusState>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl FocusTimer {
    pub fn new(config: &FocusConfig) -> Self {
        FocusTimer {
            state: Arc::new(Mutex::new(FocusState {
                remaining_secs: 0,
                work_minutes: config.work_minutes,
                break_minutes: config.break_minutes,
                work_phase: true,
                running: false,
                events: None,
            })),
            task: Mutex::new(None),
        }
    }

    /// Stream of timer events. A new subscription replaces the previous one.
    pub fn subscribe(&self) -> UnboundedReceiverStream<TimerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.state.lock().events = Some(tx);
        UnboundedReceiverStream::new(rx)
    }

    /// Start with the configured intervals
    pub fn start_default(&self) {
        let (work, rest) = {
            let s = self.state.lock();
            (s.work_minutes, s.break_minutes)
        };
        self.start(work, rest, false);
    }

    /// Restart the countdown from scratch
    pub fn start(&self, work_minutes: u32, break_minutes: u32, start_with_break: bool) {
        self.stop();
        {
            let mut s = self.state.lock();
            s.work_minutes = work_minutes;
            s.break_minutes = break_minutes;
            s.work_phase = !start_with_break;
            s.remaining_secs = if start_with_break { break_minutes * 60 } else { work_minutes * 60 };
            s.running = true;
        }
        self.spawn_ticker();
        tracing::debug!(work_minutes, break_minutes, start_with_break, "Focus timer started");
    }

    /// Cancel the countdown and clear the remaining time
    pub fn stop(&self) {
        self.cancel_task();
        let mut s = self.state.lock();
        s.running = false;
        s.remaining_secs = 0;
    }

    /// Halt ticking but keep the remaining time
    pub fn pause(&self) {
        self.cancel_task();
        self.state.lock().running = false;
    }

    /// Continue a paused countdown. No-op when running or nothing remains.
    pub fn resume(&self) {
        {
            let mut s = self.state.lock();
            if s.running || s.remaining_secs == 0 {
                return;
            }
            s.running = true;
        }
        self.spawn_ticker();
    }

    /// Remaining time as "MM:SS"
    pub fn formatted_time(&self) -> String {
        let secs = self.remaining_seconds();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    pub fn is_active(&self) -> bool {
        self.state.lock().running
    }

    pub fn is_work_phase(&self) -> bool {
        self.state.lock().work_phase
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.state.lock().remaining_secs
    }

    fn cancel_task(&self) {
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
        }
    }

    fn spawn_ticker(&self) {
        let state = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            let period = Duration::from_secs(1);
            let mut ticker = interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                let keep_going = state.lock().tick();
                if !keep_going {
                    break;
                }
            }
        });
        *self.task.lock() = Some(handle);
    }
}

impl Drop for FocusTimer {
    fn drop(&mut self) {
        self.cancel_task();
    }
}
