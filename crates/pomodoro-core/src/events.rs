use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Phase, SessionState};

/// Every state change made by the session controller produces an Event.
/// The host renders from them; the CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SessionStarted {
        phase: Phase,
        duration_secs: u64,
        target: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    PhaseChanged {
        from: Phase,
        to: Phase,
        duration_secs: u64,
        target: DateTime<Utc>,
        message: Option<String>,
        at: DateTime<Utc>,
    },
    /// A persisted session was picked up again after launch.
    SessionRestored {
        phase: Phase,
        remaining_secs: u64,
        target: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    /// A persisted record existed but could not be resumed.
    SessionDiscarded {
        reason: DiscardReason,
        at: DateTime<Utc>,
    },
    SessionReset {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: SessionState,
        phase: Phase,
        remaining_secs: u64,
        display: String,
        message: Option<String>,
        target: Option<DateTime<Utc>>,
        at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardReason {
    /// The phase ended, or ends within a second.
    Expired,
    /// The stored values could not be decoded.
    Malformed,
    /// The store itself could not be read.
    Unreadable,
}
