//! # Pomodoro Core Library
//!
//! This library provides the core logic of the Pomodoro timer: a session that
//! alternates Work and Break phases, survives suspension and process death,
//! and keeps exactly one phase-end notification in sync with its state.
//! Hosts (the CLI, or a GUI shell) own the [`Session`] value and feed the
//! controller four inputs: start, tick, foreground resume, and launch.
//!
//! ## Architecture
//!
//! - **Session Controller**: A wall-clock-anchored state machine; remaining
//!   time is always derived from an absolute target timestamp
//! - **Storage**: Key-value persistence of the running session (SQLite or
//!   in-memory) and TOML-based configuration
//! - **Notifications**: A single replace-by-id phase-end alert
//!
//! ## Key Components
//!
//! - [`SessionController`]: Core timer state machine
//! - [`PersistenceStore`]: Durable key-value capability
//! - [`NotificationScheduler`]: Phase-end alert capability
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod notify;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, NotifyError, StoreError};
pub use events::{DiscardReason, Event};
pub use notify::{
    Notification, NotificationScheduler, RecordingScheduler, SchedulerCall, PHASE_END_ID,
};
pub use storage::{
    Config, MemoryStore, PersistedSessionRecord, PersistenceStore, SqliteStore, TimerConfig,
};
pub use timer::{
    format_time, Clock, ManualClock, Phase, RandomSource, SeededRandom, Session,
    SessionController, SessionState, SystemClock, ThreadRandom,
};
