//! Terminal stand-in for the platform notification service.
//!
//! Holds at most one pending alert. The run loop polls it every tick and
//! announces the alert once its fire time has passed.

use chrono::{DateTime, Duration, Utc};
use pomodoro_core::{Clock, Notification, NotificationScheduler, NotifyError, SystemClock};
use tracing::debug;

#[derive(Debug)]
struct Pending {
    notification: Notification,
    fire_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct TerminalNotifier<C = SystemClock> {
    enabled: bool,
    clock: C,
    pending: Option<Pending>,
}

impl TerminalNotifier {
    pub fn new(enabled: bool) -> Self {
        Self::with_clock(enabled, SystemClock)
    }
}

impl<C: Clock> TerminalNotifier<C> {
    pub fn with_clock(enabled: bool, clock: C) -> Self {
        Self {
            enabled,
            clock,
            pending: None,
        }
    }

    /// Take the pending alert if it is due.
    pub fn take_due(&mut self) -> Option<Notification> {
        let now = self.clock.now();
        match &self.pending {
            Some(p) if p.fire_at <= now => self.pending.take().map(|p| p.notification),
            _ => None,
        }
    }
}

impl<C: Clock> NotificationScheduler for TerminalNotifier<C> {
    fn schedule(&mut self, notification: &Notification) -> Result<(), NotifyError> {
        if !self.enabled {
            return Ok(());
        }
        let fire_at = i64::try_from(notification.fire_in_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|delay| self.clock.now().checked_add_signed(delay))
            .ok_or_else(|| {
                NotifyError::Backend(format!(
                    "fire delay of {}s is out of range",
                    notification.fire_in_secs
                ))
            })?;
        debug!(id = %notification.id, %fire_at, "alert scheduled");
        self.pending = Some(Pending {
            notification: notification.clone(),
            fire_at,
        });
        Ok(())
    }

    fn cancel(&mut self, id: &str) -> Result<(), NotifyError> {
        if self
            .pending
            .as_ref()
            .is_some_and(|p| p.notification.id == id)
        {
            self.pending = None;
        }
        Ok(())
    }
}
