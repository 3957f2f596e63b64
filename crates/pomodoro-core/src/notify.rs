//! Phase-end notifications.
//!
//! Only one notification id is ever used, so at most one alert is pending at
//! a time. Schedulers treat `schedule` as replace-by-id.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::NotifyError;
use crate::timer::Phase;

/// The single notification id used for phase-end alerts.
pub const PHASE_END_ID: &str = "pomodoro.phaseEnd";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub fire_in_secs: u64,
    pub title: String,
    pub body: String,
}

impl Notification {
    /// Alert announcing the end of `phase`, firing in `fire_in_secs`.
    pub fn phase_end(phase: Phase, fire_in_secs: u64) -> Self {
        let (title, body) = match phase {
            Phase::Work => ("Work finished", "Time for a break."),
            Phase::Break => ("Break finished", "Back to work."),
        };
        Self {
            id: PHASE_END_ID.to_string(),
            fire_in_secs,
            title: title.to_string(),
            body: body.to_string(),
        }
    }
}

/// Platform local-notification service.
pub trait NotificationScheduler {
    /// Schedule a one-shot alert, replacing any pending one with the same id.
    fn schedule(&mut self, notification: &Notification) -> Result<(), NotifyError>;

    /// Remove a pending alert. Unknown ids are not an error.
    fn cancel(&mut self, id: &str) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerCall {
    Schedule(Notification),
    Cancel(String),
}

#[derive(Debug, Default)]
struct Recorded {
    calls: Vec<SchedulerCall>,
    pending: Vec<Notification>,
}

/// In-memory scheduler that records every call.
///
/// Clones share the same log. `deny` makes every `schedule` fail, as when
/// the user has refused notification permission.
#[derive(Debug, Clone, Default)]
pub struct RecordingScheduler {
    inner: Arc<Mutex<Recorded>>,
    deny: bool,
}

impl RecordingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn denying() -> Self {
        Self {
            deny: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<SchedulerCall> {
        self.lock().calls.clone()
    }

    pub fn pending(&self) -> Vec<Notification> {
        self.lock().pending.clone()
    }

    pub fn schedule_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, SchedulerCall::Schedule(_)))
            .count()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Recorded> {
        // A poisoned log is still readable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl NotificationScheduler for RecordingScheduler {
    fn schedule(&mut self, notification: &Notification) -> Result<(), NotifyError> {
        let mut rec = self.lock();
        rec.calls.push(SchedulerCall::Schedule(notification.clone()));
        if self.deny {
            return Err(NotifyError::Denied);
        }
        rec.pending.retain(|n| n.id != notification.id);
        rec.pending.push(notification.clone());
        Ok(())
    }

    fn cancel(&mut self, id: &str) -> Result<(), NotifyError> {
        let mut rec = self.lock();
        rec.calls.push(SchedulerCall::Cancel(id.to_string()));
        rec.pending.retain(|n| n.id != id);
        Ok(())
    }
}
