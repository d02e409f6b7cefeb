pub mod display;
mod engine;
mod mode;
mod settings;
mod state;

pub use engine::{
    TimerEngine, ADVANCE_DELAY_MS, COMPLETE_TONE_HZ, DEFAULT_TONE_SECS, SAVE_DEBOUNCE_MS,
    START_TONE_HZ, TICK_INTERVAL_MS,
};
pub use mode::Mode;
pub use settings::{SettingChange, Settings};
pub use state::{RunState, TimerState};
