//! # Focus Timer Core Library
//!
//! This library provides the core logic of the Focus Timer, a Pomodoro
//! timer that alternates focus and break intervals and survives restarts.
//! The CLI binary is a thin shell over the same engine.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A single-threaded state machine driven by
//!   start/pause/reset commands and by jobs it defers to a scheduler
//! - **Scheduler / Clock**: Injected seams for deferred work and "now",
//!   so the whole engine runs on virtual time in tests
//! - **Storage**: A string key-value store holding the settings record and
//!   the daily stats snapshot (SQLite for the CLI, in-memory for tests)
//! - **Events**: Every state change is reported as an [`Event`]; rendering,
//!   tones and notifications happen outside the engine
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`TimerQueue`]: Deterministic [`Scheduler`] implementation
//! - [`Database`]: SQLite-backed [`KvStore`]
//! - [`AppConfig`]: Application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod scheduler;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, StoreError};
pub use events::Event;
pub use scheduler::{Job, Scheduler, TimerId, TimerQueue};
pub use storage::{AppConfig, Database, KvStore, MemoryStore, PersistedStats};
pub use timer::{Mode, RunState, SettingChange, Settings, TimerEngine, TimerState};
