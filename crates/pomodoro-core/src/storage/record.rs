//! Encoding of the persisted session record.
//!
//! | Key | Value |
//! |---|---|
//! | `target_timestamp` | RFC 3339, UTC, millisecond precision |
//! | `is_work_phase` | `true` / `false` |
//! | `session_started` | `true` / `false` |

use chrono::{DateTime, SecondsFormat, Utc};

use super::PersistenceStore;
use crate::error::StoreError;
use crate::timer::{Phase, Session};

pub const KEY_TARGET_TIMESTAMP: &str = "target_timestamp";
pub const KEY_IS_WORK_PHASE: &str = "is_work_phase";
pub const KEY_SESSION_STARTED: &str = "session_started";

const ALL_KEYS: [&str; 3] = [KEY_TARGET_TIMESTAMP, KEY_IS_WORK_PHASE, KEY_SESSION_STARTED];

/// Durable mirror of a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistedSessionRecord {
    pub target: DateTime<Utc>,
    pub phase: Phase,
    pub started: bool,
}

impl PersistedSessionRecord {
    /// Record for a started session, `None` for an idle one.
    pub fn from_session(session: &Session) -> Option<Self> {
        session.target().map(|target| Self {
            target,
            phase: session.phase(),
            started: true,
        })
    }

    pub fn write<S: PersistenceStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        store.set(
            KEY_TARGET_TIMESTAMP,
            &self.target.to_rfc3339_opts(SecondsFormat::Millis, true),
        )?;
        store.set(KEY_IS_WORK_PHASE, bool_str(self.phase.is_work()))?;
        store.set(KEY_SESSION_STARTED, bool_str(self.started))?;
        Ok(())
    }

    /// Read the record back.
    ///
    /// `Ok(None)` means there is no active session. A record with
    /// `session_started = false` counts as no session, whatever else is
    /// stored. Anything undecodable is `StoreError::Malformed`.
    pub fn read<S: PersistenceStore + ?Sized>(store: &S) -> Result<Option<Self>, StoreError> {
        let target = store.get(KEY_TARGET_TIMESTAMP)?;
        let is_work = store.get(KEY_IS_WORK_PHASE)?;
        let started = store.get(KEY_SESSION_STARTED)?;

        if target.is_none() && is_work.is_none() && started.is_none() {
            return Ok(None);
        }

        let started = match started {
            Some(raw) => parse_bool(KEY_SESSION_STARTED, &raw)?,
            None => return Err(missing(KEY_SESSION_STARTED)),
        };
        if !started {
            return Ok(None);
        }

        let target = target.ok_or_else(|| missing(KEY_TARGET_TIMESTAMP))?;
        let target = DateTime::parse_from_rfc3339(&target)
            .map_err(|e| StoreError::Malformed {
                key: KEY_TARGET_TIMESTAMP.into(),
                message: e.to_string(),
            })?
            .with_timezone(&Utc);

        let is_work = is_work.ok_or_else(|| missing(KEY_IS_WORK_PHASE))?;
        let phase = if parse_bool(KEY_IS_WORK_PHASE, &is_work)? {
            Phase::Work
        } else {
            Phase::Break
        };

        Ok(Some(Self {
            target,
            phase,
            started,
        }))
    }

    /// Remove every record key. Attempts all keys even if one fails.
    pub fn clear<S: PersistenceStore + ?Sized>(store: &mut S) -> Result<(), StoreError> {
        let mut first_err = None;
        for key in ALL_KEYS {
            if let Err(e) = store.remove(key) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, StoreError> {
    raw.trim().parse::<bool>().map_err(|e| StoreError::Malformed {
        key: key.into(),
        message: format!("'{raw}': {e}"),
    })
}

fn missing(key: &str) -> StoreError {
    StoreError::Malformed {
        key: key.into(),
        message: "missing".into(),
    }
}
