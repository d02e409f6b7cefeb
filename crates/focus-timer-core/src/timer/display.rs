//! Formatting shared by every renderer.

use super::state::TimerState;

/// `MM:SS`, zero-padded. Minutes are not wrapped into hours.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Cumulative focus time as `Hh Mm`. Partial minutes are dropped.
pub fn format_focus_time(minutes: f64) -> String {
    let whole = if minutes.is_finite() && minutes > 0.0 {
        minutes.floor() as u64
    } else {
        0
    };
    format!("{}h {}m", whole / 60, whole % 60)
}

pub fn window_title(state: &TimerState) -> String {
    format!(
        "{} - {} | Focus Timer",
        format_clock(state.remaining_time),
        state.mode.label()
    )
}

/// Label for the start control while the timer is not running.
pub fn start_label(state: &TimerState) -> &'static str {
    if state.is_paused() {
        "Resume"
    } else {
        "Start"
    }
}

pub fn session_label(state: &TimerState) -> String {
    format!("Session {}", state.session_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{Mode, RunState};

    #[test]
    fn clock_is_zero_padded() {
        assert_eq!(format_clock(1500), "25:00");
        assert_eq!(format_clock(61), "01:01");
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(6000), "100:00");
    }

    #[test]
    fn focus_time_hours_and_minutes() {
        assert_eq!(format_focus_time(0.0), "0h 0m");
        assert_eq!(format_focus_time(75.0), "1h 15m");
        assert_eq!(format_focus_time(0.1), "0h 0m");
        assert_eq!(format_focus_time(-5.0), "0h 0m");
    }

    #[test]
    fn title_and_labels() {
        let mut state = TimerState::default();
        state.mode = Mode::ShortBreak;
        state.remaining_time = 299;
        assert_eq!(window_title(&state), "04:59 - Short Break | Focus Timer");
        assert_eq!(start_label(&state), "Start");
        state.run_state = RunState::Paused;
        assert_eq!(start_label(&state), "Resume");
        assert_eq!(session_label(&state), "Session 1");
    }
}
