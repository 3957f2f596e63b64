use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    /// The phase that follows this one.
    pub fn next(self) -> Self {
        match self {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        }
    }

    pub fn is_work(self) -> bool {
        self == Phase::Work
    }
}

/// Coarse view of a session, derived from [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "phase", rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Running(Phase),
}

/// The live or recovered timer instance.
///
/// A session counts as started exactly when it has a target timestamp, so
/// there is no separate flag that could drift out of sync with the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub(crate) phase: Phase,
    /// End of the current phase. `None` while idle.
    pub(crate) target: Option<DateTime<Utc>>,
    /// Seconds shown on the timer face.
    pub(crate) current_time: u64,
    /// Message shown during a break.
    pub(crate) display_message: Option<String>,
}

impl Session {
    /// A fresh idle session showing the full work duration.
    pub fn idle(work_duration_secs: u64) -> Self {
        Self {
            phase: Phase::Work,
            target: None,
            current_time: work_duration_secs,
            display_message: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn target(&self) -> Option<DateTime<Utc>> {
        self.target
    }

    pub fn is_started(&self) -> bool {
        self.target.is_some()
    }

    pub fn state(&self) -> SessionState {
        if self.is_started() {
            SessionState::Running(self.phase)
        } else {
            SessionState::Idle
        }
    }

    pub fn current_time(&self) -> u64 {
        self.current_time
    }

    pub fn display_message(&self) -> Option<&str> {
        self.display_message.as_deref()
    }

    /// `current_time` rendered as `MM:SS`.
    pub fn display(&self) -> String {
        format_time(self.current_time)
    }

    /// Milliseconds until the target, negative once it has passed.
    pub fn remaining_ms(&self, now: DateTime<Utc>) -> Option<i64> {
        self.target.map(|target| (target - now).num_milliseconds())
    }
}

/// Whole seconds left, rounded up so a partially elapsed second still shows.
pub(crate) fn ceil_secs(remaining_ms: i64) -> u64 {
    if remaining_ms <= 0 {
        0
    } else {
        (remaining_ms as u64).div_ceil(1000)
    }
}

/// Render seconds as `MM:SS`. Minutes are not capped at 59.
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn format_time_examples() {
        assert_eq!(format_time(1500), "25:00");
        assert_eq!(format_time(59), "00:59");
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(6000), "100:00");
    }

    proptest! {
        #[test]
        fn format_time_matches_minutes_and_seconds(s in 0u64..10_000_000) {
            let rendered = format_time(s);
            let (mm, ss) = rendered.split_once(':').unwrap();
            prop_assert_eq!(mm.parse::<u64>().unwrap(), s / 60);
            prop_assert_eq!(ss.parse::<u64>().unwrap(), s % 60);
            prop_assert_eq!(ss.len(), 2);
            prop_assert!(mm.len() >= 2);
        }
    }

    #[test]
    fn idle_session_is_not_started() {
        let session = Session::idle(1500);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.display(), "25:00");
        assert!(session.remaining_ms(Utc::now()).is_none());
    }

    #[test]
    fn phase_alternates() {
        assert_eq!(Phase::Work.next(), Phase::Break);
        assert_eq!(Phase::Break.next(), Phase::Work);
    }

    #[test]
    fn ceil_secs_rounds_partial_seconds_up() {
        assert_eq!(ceil_secs(-5), 0);
        assert_eq!(ceil_secs(0), 0);
        assert_eq!(ceil_secs(1), 1);
        assert_eq!(ceil_secs(1000), 1);
        assert_eq!(ceil_secs(1001), 2);
    }
}
