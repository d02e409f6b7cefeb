use serde::{Deserialize, Serialize};

use super::mode::Mode;
use super::settings::Settings;

/// Run-state of the countdown, orthogonal to [`Mode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    #[default]
    Idle,
    Running,
    Paused,
}

impl RunState {
    /// Inverse of the persisted `isRunning`/`isPaused` pair. A record with
    /// both flags set is treated as paused.
    pub fn from_flags(is_running: bool, is_paused: bool) -> Self {
        match (is_running, is_paused) {
            (_, true) => RunState::Paused,
            (true, false) => RunState::Running,
            (false, false) => RunState::Idle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub mode: Mode,
    pub run_state: RunState,
    /// Seconds left in the current interval.
    pub remaining_time: u64,
    /// Seconds in the current interval.
    pub total_time: u64,
    /// Focus intervals begun today, starting at 1.
    pub session_count: u32,
    /// Focus intervals run to completion today.
    pub completed_sessions: u32,
    /// Minutes of completed focus today.
    pub total_focus_time: f64,
}

impl TimerState {
    pub fn new(settings: &Settings) -> Self {
        let total = settings.duration_secs(Mode::Focus);
        Self {
            mode: Mode::Focus,
            run_state: RunState::Idle,
            remaining_time: total,
            total_time: total,
            session_count: 1,
            completed_sessions: 0,
            total_focus_time: 0.0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.run_state == RunState::Paused
    }

    /// Elapsed fraction of the current interval, 0.0 ..= 1.0.
    pub fn progress(&self) -> f64 {
        if self.total_time == 0 {
            return 0.0;
        }
        let elapsed = self.total_time.saturating_sub(self.remaining_time);
        (elapsed as f64 / self.total_time as f64).clamp(0.0, 1.0)
    }

    /// Reload the current interval with `secs` on the clock.
    pub(crate) fn load_interval(&mut self, secs: u64) {
        self.remaining_time = secs;
        self.total_time = secs;
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_idle_focus() {
        let s = TimerState::default();
        assert_eq!(s.mode, Mode::Focus);
        assert_eq!(s.run_state, RunState::Idle);
        assert_eq!(s.remaining_time, 1500);
        assert_eq!(s.total_time, 1500);
        assert_eq!(s.session_count, 1);
        assert_eq!(s.completed_sessions, 0);
        assert!(!s.is_running() && !s.is_paused());
    }

    #[test]
    fn flags_map_to_run_state() {
        assert_eq!(RunState::from_flags(false, false), RunState::Idle);
        assert_eq!(RunState::from_flags(true, false), RunState::Running);
        assert_eq!(RunState::from_flags(false, true), RunState::Paused);
        assert_eq!(RunState::from_flags(true, true), RunState::Paused);
    }

    #[test]
    fn progress_fraction() {
        let mut s = TimerState::default();
        assert_eq!(s.progress(), 0.0);
        s.remaining_time = 750;
        assert!((s.progress() - 0.5).abs() < f64::EPSILON);
        s.total_time = 0;
        assert_eq!(s.progress(), 0.0);
    }
}
