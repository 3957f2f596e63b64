//! Session controller.
//!
//! The controller is a wall-clock-anchored state machine. It keeps no
//! internal thread and no countdown: the host owns the [`Session`] value,
//! calls `on_tick()` about once a second while visible, and the remaining
//! time is always recomputed from the session's absolute target timestamp.
//! That is what lets a session survive suspension and process death.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running(Work) <-> Running(Break)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut controller = SessionController::new(config, store, scheduler, ThreadRandom, SystemClock);
//! let mut session = controller.idle_session();
//! controller.on_launch(&mut session);
//! controller.on_start(&mut session);
//! // Once per second:
//! controller.on_tick(&mut session); // Some(Event::PhaseChanged) on a flip
//! ```
//!
//! When the app was suspended through a whole phase and into the next, a
//! single tick still performs only one flip and re-anchors the new phase at
//! "now". Skipped phases are absorbed rather than replayed.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use super::clock::Clock;
use super::messages::{select_break_message, RandomSource};
use super::session::{ceil_secs, Phase, Session};
use crate::events::{DiscardReason, Event};
use crate::notify::{Notification, NotificationScheduler, PHASE_END_ID};
use crate::storage::{PersistedSessionRecord, PersistenceStore, TimerConfig};

/// A persisted target must be at least this far ahead to be resumed.
const MIN_RESUME_MS: i64 = 1000;

/// Upper bound on a single phase, keeps timestamp arithmetic in range.
const MAX_PHASE_SECS: i64 = 100 * 365 * 24 * 60 * 60;

pub struct SessionController<S, N, R, C> {
    config: TimerConfig,
    store: S,
    scheduler: N,
    rng: R,
    clock: C,
}

impl<S, N, R, C> SessionController<S, N, R, C>
where
    S: PersistenceStore,
    N: NotificationScheduler,
    R: RandomSource,
    C: Clock,
{
    pub fn new(config: TimerConfig, store: S, scheduler: N, rng: R, clock: C) -> Self {
        Self {
            config,
            store,
            scheduler,
            rng,
            clock,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn scheduler(&self) -> &N {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut N {
        &mut self.scheduler
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Fresh idle session for this configuration.
    pub fn idle_session(&self) -> Session {
        Session::idle(self.config.work_duration_secs)
    }

    pub fn duration_secs(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Work => self.config.work_duration_secs,
            Phase::Break => self.config.break_duration_secs,
        }
    }

    /// Build a full state snapshot event. Does not move the state machine.
    pub fn snapshot(&self, session: &Session) -> Event {
        let now = self.clock.now();
        let remaining_secs = session
            .remaining_ms(now)
            .map(ceil_secs)
            .unwrap_or(session.current_time);
        Event::StateSnapshot {
            state: session.state(),
            phase: session.phase,
            remaining_secs,
            display: super::format_time(remaining_secs),
            message: session.display_message.clone(),
            target: session.target,
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// User start input. Only the first one does anything.
    pub fn on_start(&mut self, session: &mut Session) -> Option<Event> {
        if session.is_started() {
            debug!("start ignored, session already running");
            return None;
        }

        let now = self.clock.now();
        let duration_secs = self.config.work_duration_secs;
        let target = now + secs(duration_secs);
        session.phase = Phase::Work;
        session.target = Some(target);
        session.current_time = duration_secs;
        session.display_message = None;

        self.persist(session);
        self.schedule_phase_end(Phase::Work, duration_secs);
        info!(ends_at = %target, "session started");

        Some(Event::SessionStarted {
            phase: Phase::Work,
            duration_secs,
            target,
            at: now,
        })
    }

    /// Periodic tick. Returns `Some(Event::PhaseChanged)` when a phase ends.
    pub fn on_tick(&mut self, session: &mut Session) -> Option<Event> {
        let target = session.target?;
        let now = self.clock.now();
        let remaining_ms = (target - now).num_milliseconds();
        if remaining_ms > 0 {
            session.current_time = ceil_secs(remaining_ms);
            return None;
        }
        Some(self.advance(session, now))
    }

    /// App came back to the foreground. Catches up on a phase change that
    /// happened while nothing was ticking.
    pub fn on_foreground_resume(&mut self, session: &mut Session) -> Option<Event> {
        self.on_tick(session)
    }

    /// App is leaving the foreground. Snapshots the session so it can be
    /// rebuilt after process death; the session itself is untouched.
    pub fn on_background(&mut self, session: &Session) {
        if session.is_started() {
            self.persist(session);
        } else if let Err(e) = PersistedSessionRecord::clear(&mut self.store) {
            warn!(error = %e, "failed to clear session record");
        }
    }

    /// Process launch. Resumes a persisted session if its current phase is
    /// still more than a second away from ending, otherwise starts clean.
    ///
    /// Any pending phase-end alert is cancelled first so a stale one from a
    /// force-quit run can never fire.
    pub fn on_launch(&mut self, session: &mut Session) -> Option<Event> {
        if let Err(e) = self.scheduler.cancel(PHASE_END_ID) {
            warn!(error = %e, "failed to cancel stale notification");
        }

        let now = self.clock.now();
        let reason = match PersistedSessionRecord::read(&self.store) {
            Ok(None) => {
                *session = self.idle_session();
                return None;
            }
            Ok(Some(record)) => {
                let remaining_ms = (record.target - now).num_milliseconds();
                if record.started && remaining_ms > MIN_RESUME_MS {
                    return Some(self.restore(session, record, remaining_ms, now));
                }
                debug!(ends_at = %record.target, "persisted session already over");
                DiscardReason::Expired
            }
            Err(crate::error::StoreError::Malformed { key, message }) => {
                warn!(%key, %message, "discarding malformed session record");
                DiscardReason::Malformed
            }
            Err(e) => {
                warn!(error = %e, "session record unreadable");
                DiscardReason::Unreadable
            }
        };

        if let Err(e) = PersistedSessionRecord::clear(&mut self.store) {
            warn!(error = %e, "failed to clear session record");
        }
        *session = self.idle_session();
        Some(Event::SessionDiscarded { reason, at: now })
    }

    /// Explicit reset: drop the session, its record, and its alert.
    pub fn reset(&mut self, session: &mut Session) -> Option<Event> {
        if let Err(e) = self.scheduler.cancel(PHASE_END_ID) {
            warn!(error = %e, "failed to cancel notification");
        }
        if let Err(e) = PersistedSessionRecord::clear(&mut self.store) {
            warn!(error = %e, "failed to clear session record");
        }
        *session = self.idle_session();
        info!("session reset");
        Some(Event::SessionReset {
            at: self.clock.now(),
        })
    }

    /// Pick a break message and show it on the session.
    pub fn select_break_message(&mut self, session: &mut Session) -> &'static str {
        let message = select_break_message(&mut self.rng);
        session.display_message = Some(message.to_string());
        message
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance(&mut self, session: &mut Session, now: DateTime<Utc>) -> Event {
        let from = session.phase;
        let to = from.next();
        let duration_secs = self.duration_secs(to);
        let target = now + secs(duration_secs);

        session.phase = to;
        session.target = Some(target);
        session.current_time = duration_secs;
        match to {
            Phase::Break => {
                self.select_break_message(session);
            }
            Phase::Work => session.display_message = None,
        }

        if let Err(e) = self.scheduler.cancel(PHASE_END_ID) {
            warn!(error = %e, "failed to cancel notification");
        }
        self.schedule_phase_end(to, duration_secs);
        self.persist(session);
        info!(?from, ?to, ends_at = %target, "phase changed");

        Event::PhaseChanged {
            from,
            to,
            duration_secs,
            target,
            message: session.display_message.clone(),
            at: now,
        }
    }

    fn restore(
        &mut self,
        session: &mut Session,
        record: PersistedSessionRecord,
        remaining_ms: i64,
        now: DateTime<Utc>,
    ) -> Event {
        let remaining_secs = ceil_secs(remaining_ms);
        session.phase = record.phase;
        session.target = Some(record.target);
        session.current_time = remaining_secs;
        // The message isn't persisted; a restored break gets a fresh one.
        session.display_message = None;
        if record.phase == Phase::Break {
            self.select_break_message(session);
        }

        self.schedule_phase_end(record.phase, remaining_secs);
        info!(phase = ?record.phase, remaining_secs, "session restored");

        Event::SessionRestored {
            phase: record.phase,
            remaining_secs,
            target: record.target,
            at: now,
        }
    }

    fn schedule_phase_end(&mut self, phase: Phase, fire_in_secs: u64) {
        let notification = Notification::phase_end(phase, fire_in_secs);
        if let Err(e) = self.scheduler.schedule(&notification) {
            warn!(error = %e, "failed to schedule phase-end notification");
        }
    }

    fn persist(&mut self, session: &Session) {
        let Some(record) = PersistedSessionRecord::from_session(session) else {
            return;
        };
        if let Err(e) = record.write(&mut self.store) {
            warn!(error = %e, "failed to persist session");
        }
    }
}

fn secs(secs: u64) -> Duration {
    Duration::seconds(i64::try_from(secs).unwrap_or(MAX_PHASE_SECS).min(MAX_PHASE_SECS))
}
