use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{display, Mode, RunState, Settings, TimerState};

/// Every state change in the engine produces an Event.
/// The application root drains them and hands them to its renderer,
/// tone emitter and notifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: Mode,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: Mode,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    /// One second elapsed. Carries only what the clock face needs.
    TimerTicked {
        remaining_secs: u64,
        total_secs: u64,
        progress: f64,
        display: String,
    },
    TimerCompleted {
        mode: Mode,
        completed_sessions: u32,
        at: DateTime<Utc>,
    },
    ModeChanged {
        from: Mode,
        to: Mode,
        session_count: u32,
        at: DateTime<Utc>,
    },
    SettingsChanged {
        settings: Settings,
        at: DateTime<Utc>,
    },
    /// Ask the tone emitter for a beep.
    ToneRequested {
        frequency_hz: u32,
        duration_secs: f64,
    },
    /// Ask the notifier for a system notification.
    NotificationRequested {
        title: String,
        body: String,
    },
    /// Full view model; the renderer redraws everything from it.
    StateSnapshot {
        mode: Mode,
        mode_label: String,
        color: String,
        state: RunState,
        remaining_secs: u64,
        total_secs: u64,
        display: String,
        progress: f64,
        session_count: u32,
        completed_sessions: u32,
        total_focus_min: f64,
        focus_time_display: String,
        start_label: String,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn snapshot(state: &TimerState, at: DateTime<Utc>) -> Self {
        Event::StateSnapshot {
            mode: state.mode,
            mode_label: state.mode.label().into(),
            color: state.mode.color().into(),
            state: state.run_state,
            remaining_secs: state.remaining_time,
            total_secs: state.total_time,
            display: display::format_clock(state.remaining_time),
            progress: state.progress(),
            session_count: state.session_count,
            completed_sessions: state.completed_sessions,
            total_focus_min: state.total_focus_time,
            focus_time_display: display::format_focus_time(state.total_focus_time),
            start_label: display::start_label(state).into(),
            at,
        }
    }

    pub fn tick(state: &TimerState) -> Self {
        Event::TimerTicked {
            remaining_secs: state.remaining_time,
            total_secs: state.total_time,
            progress: state.progress(),
            display: display::format_clock(state.remaining_time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_type_tagged() {
        let json = serde_json::to_value(Event::ToneRequested {
            frequency_hz: 440,
            duration_secs: 0.3,
        })
        .unwrap();
        assert_eq!(json["type"], "ToneRequested");
        assert_eq!(json["frequency_hz"], 440);
    }

    #[test]
    fn snapshot_reflects_state() {
        let state = TimerState::default();
        match Event::snapshot(&state, Utc::now()) {
            Event::StateSnapshot {
                display,
                mode_label,
                focus_time_display,
                start_label,
                ..
            } => {
                assert_eq!(display, "25:00");
                assert_eq!(mode_label, "Focus Time");
                assert_eq!(focus_time_display, "0h 0m");
                assert_eq!(start_label, "Start");
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }
}
