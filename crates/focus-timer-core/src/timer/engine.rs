//! Timer engine implementation.
//!
//! The engine is a single-threaded state machine. It owns no threads and no
//! real timers: deferred work goes through the injected [`Scheduler`], and
//! whoever drives the engine calls [`TimerEngine::run_due`] when the
//! scheduler says something is due.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Paused -> Running
//!           |
//!           +-> (complete) Idle --1s--> advance_mode -> [auto-start] Running
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(store, TimerQueue::new(), SystemClock);
//! engine.init();
//! engine.start();
//! // In a loop, whenever engine.next_due() has passed:
//! engine.run_due();
//! for event in engine.take_events() { /* render, beep, notify */ }
//! ```

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::mode::Mode;
use super::settings::{SettingChange, Settings};
use super::state::{RunState, TimerState};
use crate::clock::{calendar_day, to_datetime, Clock};
use crate::events::Event;
use crate::scheduler::{Job, Scheduler, TimerId};
use crate::storage::{KvStore, PersistedStats, SETTINGS_KEY, STATS_KEY};

/// Countdown resolution.
pub const TICK_INTERVAL_MS: u64 = 1_000;
/// Delay of the coalesced stats write while ticking.
pub const SAVE_DEBOUNCE_MS: u64 = 5_000;
/// Pause between a completion and the switch to the next mode.
pub const ADVANCE_DELAY_MS: u64 = 1_000;

pub const START_TONE_HZ: u32 = 440;
pub const COMPLETE_TONE_HZ: u32 = 880;
pub const DEFAULT_TONE_SECS: f64 = 0.3;

/// Core timer engine.
pub struct TimerEngine {
    state: TimerState,
    settings: Settings,
    store: Box<dyn KvStore>,
    scheduler: Box<dyn Scheduler>,
    clock: Box<dyn Clock>,
    tick_timer: Option<TimerId>,
    pending_save: Option<TimerId>,
    pending_advance: Option<TimerId>,
    /// Due time of the job being dispatched. Stands in for "now" so a
    /// driver that wakes late still chains follow-up jobs on schedule.
    firing_at: Option<u64>,
    tone_duration_secs: f64,
    events: Vec<Event>,
}

impl TimerEngine {
    /// Create an engine with default settings in the Idle/Focus state.
    ///
    /// Nothing is read from the store until [`init`](Self::init) (or
    /// [`load_settings`](Self::load_settings) / [`load_stats`](Self::load_stats)).
    pub fn new(
        store: impl KvStore + 'static,
        scheduler: impl Scheduler + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        let settings = Settings::default();
        Self {
            state: TimerState::new(&settings),
            settings,
            store: Box::new(store),
            scheduler: Box::new(scheduler),
            clock: Box::new(clock),
            tick_timer: None,
            pending_save: None,
            pending_advance: None,
            firing_at: None,
            tone_duration_secs: DEFAULT_TONE_SECS,
            events: Vec::new(),
        }
    }

    pub fn with_tone_duration(mut self, secs: f64) -> Self {
        self.tone_duration_secs = secs;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    /// Whether the one-second tick is armed.
    pub fn is_ticking(&self) -> bool {
        self.tick_timer.is_some()
    }

    pub fn has_pending_save(&self) -> bool {
        self.pending_save.is_some()
    }

    pub fn has_pending_advance(&self) -> bool {
        self.pending_advance.is_some()
    }

    /// Earliest instant (epoch ms) at which [`run_due`](Self::run_due) has work.
    pub fn next_due(&self) -> Option<u64> {
        self.scheduler.next_due()
    }

    /// Duration of `mode` in seconds under the current settings.
    pub fn duration_secs(&self, mode: Mode) -> u64 {
        self.settings.duration_secs(mode)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::snapshot(&self.state, self.now())
    }

    /// Drain the events produced since the last call.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Page-load sequence: settings, stats, first render, resume.
    /// Returns whether a running interval was resumed.
    pub fn init(&mut self) -> bool {
        self.load_settings();
        let resume = self.load_stats();
        self.update_ui();
        if resume {
            info!(remaining = self.state.remaining_time, "resuming interrupted interval");
            self.start();
        }
        resume
    }

    /// Unload flush: drop the pending deferred write and persist now.
    pub fn flush(&mut self) {
        self.clear_scheduled_save();
        self.save_stats();
    }

    /// Dispatch every job due at the clock's current time.
    /// Returns how many jobs fired.
    pub fn run_due(&mut self) -> usize {
        let now = self.clock.now_ms();
        let mut fired = 0;
        while let Some((due, job)) = self.scheduler.pop_due(now) {
            self.firing_at = Some(due);
            self.dispatch(job);
            fired += 1;
        }
        self.firing_at = None;
        fired
    }

    fn dispatch(&mut self, job: Job) {
        match job {
            Job::Tick => self.tick(),
            Job::FlushStats => {
                self.pending_save = None;
                self.save_stats();
            }
            Job::AdvanceMode => {
                self.pending_advance = None;
                self.advance_mode();
            }
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Returns `false` if the timer was already running.
    pub fn start(&mut self) -> bool {
        if self.state.is_running() {
            return false;
        }

        // Starting during the post-completion pause moves on first.
        if let Some(id) = self.pending_advance.take() {
            self.scheduler.cancel(id);
            self.advance_mode();
            if self.state.is_running() {
                return true;
            }
        }

        self.state.run_state = RunState::Running;
        self.clear_scheduled_save();
        self.save_stats();

        if self.settings.sound_enabled {
            self.request_tone(START_TONE_HZ);
        }

        self.cancel_tick();
        let first = self.now_ms().saturating_add(TICK_INTERVAL_MS);
        self.tick_timer = Some(
            self.scheduler
                .schedule_every(first, TICK_INTERVAL_MS, Job::Tick),
        );

        debug!(mode = %self.state.mode, remaining = self.state.remaining_time, "timer started");
        self.events.push(Event::TimerStarted {
            mode: self.state.mode,
            remaining_secs: self.state.remaining_time,
            at: self.now(),
        });
        self.update_ui();
        true
    }

    /// Returns `false` if the timer was not running.
    pub fn pause(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }

        self.state.run_state = RunState::Paused;
        self.cancel_tick();
        self.clear_scheduled_save();
        self.save_stats();

        debug!(remaining = self.state.remaining_time, "timer paused");
        self.events.push(Event::TimerPaused {
            mode: self.state.mode,
            remaining_secs: self.state.remaining_time,
            at: self.now(),
        });
        self.update_ui();
        true
    }

    pub fn reset(&mut self) {
        self.state.run_state = RunState::Idle;
        self.cancel_tick();
        self.clear_scheduled_save();
        self.cancel_advance();

        let secs = self.settings.duration_secs(self.state.mode);
        self.state.load_interval(secs);
        self.save_stats();

        debug!(mode = %self.state.mode, "timer reset");
        self.events.push(Event::TimerReset {
            mode: self.state.mode,
            total_secs: secs,
            at: self.now(),
        });
        self.update_ui();
    }

    /// One second of countdown.
    pub fn tick(&mut self) {
        self.state.remaining_time = self.state.remaining_time.saturating_sub(1);
        self.events.push(Event::tick(&self.state));
        self.schedule_save_stats();

        if self.state.remaining_time == 0 {
            self.complete();
        }
    }

    /// End of the current interval.
    pub fn complete(&mut self) {
        self.state.run_state = RunState::Idle;
        self.cancel_tick();

        if self.settings.sound_enabled {
            self.request_tone(COMPLETE_TONE_HZ);
        }

        let finished = self.state.mode;
        if finished == Mode::Focus {
            self.state.completed_sessions += 1;
            self.state.total_focus_time += self.settings.focus_duration.max(0.0);
            self.clear_scheduled_save();
            self.save_stats();
        }

        info!(
            mode = %finished,
            completed_sessions = self.state.completed_sessions,
            "interval complete"
        );
        self.events.push(Event::TimerCompleted {
            mode: finished,
            completed_sessions: self.state.completed_sessions,
            at: self.now(),
        });
        self.events.push(Event::NotificationRequested {
            title: format!("{} Complete!", finished.label()),
            body: finished.completion_message().to_string(),
        });
        self.update_ui();

        self.schedule_advance();
    }

    /// Switch to the mode that follows the current one, auto-starting it
    /// when the settings say so.
    pub fn advance_mode(&mut self) {
        self.cancel_advance();

        if self.state.mode == Mode::Focus {
            let next = if self.settings.is_long_break_due(self.state.completed_sessions) {
                Mode::LongBreak
            } else {
                Mode::ShortBreak
            };
            self.apply_mode(next);

            if self.settings.auto_start_breaks {
                self.start();
            }
        } else {
            self.state.session_count += 1;
            self.apply_mode(Mode::Focus);

            if self.settings.auto_start_focus {
                self.start();
            }
        }
    }

    /// Run a pending auto-advance now instead of waiting for the scheduler.
    /// For drivers that exit before [`ADVANCE_DELAY_MS`] has passed.
    /// Returns whether there was one.
    pub fn settle(&mut self) -> bool {
        if self.pending_advance.is_none() {
            return false;
        }
        self.advance_mode();
        true
    }

    /// Manual mode change. Supersedes a pending auto-advance.
    pub fn set_mode(&mut self, mode: Mode) {
        self.cancel_advance();
        self.apply_mode(mode);
    }

    /// Apply one settings change and persist the settings record.
    pub fn apply_setting(&mut self, change: SettingChange) {
        self.settings.apply(change);
        self.save_settings();
        self.events.push(Event::SettingsChanged {
            settings: self.settings.clone(),
            at: self.now(),
        });

        if matches!(change, SettingChange::FocusDuration(_))
            && self.state.mode == Mode::Focus
            && !self.state.is_running()
        {
            self.apply_mode(Mode::Focus);
        }
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Merge the stored settings record over the defaults and reload the
    /// current interval with the resulting duration.
    pub fn load_settings(&mut self) {
        match self.store.get(SETTINGS_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => self.settings = settings,
                Err(e) => warn!(error = %e, "ignoring malformed settings record"),
            },
            Ok(None) => {}
            Err(e) => warn!(error = %e, "failed to read settings"),
        }

        let secs = self.settings.duration_secs(self.state.mode);
        self.state.load_interval(secs);
    }

    pub fn save_settings(&self) {
        match serde_json::to_string(&self.settings) {
            Ok(json) => {
                if let Err(e) = self.store.set(SETTINGS_KEY, &json) {
                    warn!(error = %e, "failed to write settings");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize settings"),
        }
    }

    /// Restore today's snapshot.
    ///
    /// Returns `true` when the snapshot was mid-interval and the caller
    /// should [`start`](Self::start) to resume it. Time spent away is
    /// deducted; if that exhausts the interval it completes right here and
    /// `false` is returned.
    pub fn load_stats(&mut self) -> bool {
        let stats = match self.store.get(STATS_KEY) {
            Ok(Some(json)) => match PersistedStats::parse(&json) {
                Some(stats) => stats,
                None => return false,
            },
            Ok(None) => return false,
            Err(e) => {
                warn!(error = %e, "failed to read stats");
                return false;
            }
        };

        let today = self.today();
        if !stats.is_for_day(&today) {
            debug!(saved = ?stats.date, %today, "stats snapshot is from another day");
            return false;
        }

        self.state.completed_sessions = stats.completed_sessions.unwrap_or(0);
        self.state.total_focus_time = stats
            .total_focus_time
            .filter(|t| t.is_finite() && *t >= 0.0)
            .unwrap_or(0.0);
        if let Some(count) = stats.session_count.filter(|&n| n > 0) {
            self.state.session_count = count;
        }
        if let Some(mode) = stats.mode.as_deref().filter(|m| !m.is_empty()) {
            self.state.mode = Mode::from_persisted(mode);
        }
        if let Some(total) = stats.total_time {
            self.state.total_time = total.max(1) as u64;
        }
        if let Some(remaining) = stats.remaining_time {
            self.state.remaining_time = remaining.max(0) as u64;
        }
        self.state.remaining_time = self.state.remaining_time.min(self.state.total_time);

        // A running snapshot comes back Idle until start() re-arms the tick.
        self.state.run_state = match RunState::from_flags(
            stats.is_running.unwrap_or(false),
            stats.is_paused.unwrap_or(false),
        ) {
            RunState::Running => RunState::Idle,
            other => other,
        };

        if !stats.was_running() {
            if self.state.run_state == RunState::Idle && self.state.remaining_time == 0 {
                // Completed, but the switch to the next mode never ran.
                debug!(mode = %self.state.mode, "re-arming lost advance");
                self.schedule_advance();
            }
            return false;
        }

        let Some(last_updated) = stats.last_updated else {
            return true;
        };

        let elapsed = self.now_ms().saturating_sub(last_updated) / 1000;
        if elapsed >= self.state.remaining_time {
            debug!(elapsed, "interval ran out while away");
            self.state.remaining_time = 0;
            self.complete();
            false
        } else {
            self.state.remaining_time -= elapsed;
            true
        }
    }

    /// Write the full snapshot, stamped with the current time.
    pub fn save_stats(&self) {
        let now = self.now_ms();
        let stats = PersistedStats::capture(&self.state, calendar_day(now), now);
        match serde_json::to_string(&stats) {
            Ok(json) => {
                if let Err(e) = self.store.set(STATS_KEY, &json) {
                    warn!(error = %e, "failed to write stats");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize stats"),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn apply_mode(&mut self, mode: Mode) {
        let from = self.state.mode;
        self.state.mode = mode;
        let secs = self.settings.duration_secs(mode);
        self.state.load_interval(secs);
        self.clear_scheduled_save();
        self.save_stats();

        debug!(%from, to = %mode, "mode changed");
        self.events.push(Event::ModeChanged {
            from,
            to: mode,
            session_count: self.state.session_count,
            at: self.now(),
        });
        self.update_ui();
    }

    /// Arm the coalesced write unless one is already pending.
    fn schedule_save_stats(&mut self) {
        if self.pending_save.is_some() {
            return;
        }
        let due = self.now_ms().saturating_add(SAVE_DEBOUNCE_MS);
        self.pending_save = Some(self.scheduler.schedule(due, Job::FlushStats));
    }

    fn clear_scheduled_save(&mut self) {
        if let Some(id) = self.pending_save.take() {
            self.scheduler.cancel(id);
        }
    }

    fn cancel_tick(&mut self) {
        if let Some(id) = self.tick_timer.take() {
            self.scheduler.cancel(id);
        }
    }

    fn schedule_advance(&mut self) {
        self.cancel_advance();
        let due = self.now_ms().saturating_add(ADVANCE_DELAY_MS);
        self.pending_advance = Some(self.scheduler.schedule(due, Job::AdvanceMode));
    }

    fn cancel_advance(&mut self) {
        if let Some(id) = self.pending_advance.take() {
            self.scheduler.cancel(id);
        }
    }

    fn request_tone(&mut self, frequency_hz: u32) {
        self.events.push(Event::ToneRequested {
            frequency_hz,
            duration_secs: self.tone_duration_secs,
        });
    }

    fn update_ui(&mut self) {
        self.events.push(Event::snapshot(&self.state, self.now()));
    }

    fn now_ms(&self) -> u64 {
        self.firing_at.unwrap_or_else(|| self.clock.now_ms())
    }

    fn now(&self) -> DateTime<Utc> {
        to_datetime(self.now_ms())
    }

    fn today(&self) -> String {
        calendar_day(self.now_ms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::scheduler::TimerQueue;
    use crate::storage::MemoryStore;

    fn engine() -> (TimerEngine, MemoryStore, ManualClock) {
        let store = MemoryStore::new();
        let clock = ManualClock::starting_now();
        let engine = TimerEngine::new(store.clone(), TimerQueue::new(), clock.clone());
        (engine, store, clock)
    }

    fn saved_stats(store: &MemoryStore) -> PersistedStats {
        let json = store.get(STATS_KEY).unwrap().expect("stats written");
        PersistedStats::parse(&json).unwrap()
    }

    fn advance(engine: &mut TimerEngine, clock: &ManualClock, ms: u64) {
        clock.advance_ms(ms);
        engine.run_due();
    }

    #[test]
    fn start_pause_resume() {
        let (mut engine, _, _) = engine();
        assert!(!engine.is_running() && !engine.is_paused());

        assert!(engine.start());
        assert!(engine.is_running());
        assert!(engine.is_ticking());

        assert!(engine.pause());
        assert!(engine.is_paused());
        assert!(!engine.is_running());
        assert!(!engine.is_ticking());

        assert!(engine.start());
        assert!(engine.is_running() && !engine.is_paused());
    }

    #[test]
    fn start_twice_is_noop() {
        let (mut engine, _, _) = engine();
        engine.start();
        engine.take_events();
        assert!(!engine.start());
        assert!(engine.take_events().is_empty());
    }

    #[test]
    fn pause_when_idle_is_noop() {
        let (mut engine, store, _) = engine();
        assert!(!engine.pause());
        assert!(!engine.is_paused());
        assert!(store.is_empty());
    }

    #[test]
    fn start_persists_and_requests_tone() {
        let (mut engine, store, _) = engine();
        engine.start();
        assert_eq!(saved_stats(&store).is_running, Some(true));
        let events = engine.take_events();
        assert!(events.contains(&Event::ToneRequested {
            frequency_hz: START_TONE_HZ,
            duration_secs: DEFAULT_TONE_SECS,
        }));
    }

    #[test]
    fn no_tone_when_sound_disabled() {
        let (mut engine, _, _) = engine();
        engine.apply_setting(SettingChange::SoundEnabled(false));
        engine.start();
        assert!(!engine
            .take_events()
            .iter()
            .any(|e| matches!(e, Event::ToneRequested { .. })));
    }

    #[test]
    fn ticks_count_down_in_real_seconds() {
        let (mut engine, _, clock) = engine();
        engine.start();
        advance(&mut engine, &clock, 3_000);
        assert_eq!(engine.state().remaining_time, 1497);
    }

    #[test]
    fn reset_restores_mode_duration() {
        let (mut engine, _, clock) = engine();
        engine.apply_setting(SettingChange::ShortBreakDuration(1.0));
        engine.set_mode(Mode::ShortBreak);
        engine.start();
        advance(&mut engine, &clock, 10_000);
        engine.reset();
        assert_eq!(engine.state().remaining_time, 60);
        assert_eq!(engine.state().total_time, 60);
        assert!(!engine.is_running() && !engine.is_paused());
        assert!(!engine.is_ticking());
    }

    #[test]
    fn set_mode_loads_duration() {
        let (mut engine, _, _) = engine();
        for mode in Mode::ALL {
            engine.set_mode(mode);
            let expected = engine.settings().duration_secs(mode);
            assert_eq!(engine.state().remaining_time, expected);
            assert_eq!(engine.state().total_time, expected);
        }
    }

    #[test]
    fn tick_at_one_second_completes_once() {
        let (mut engine, _, _) = engine();
        engine.start();
        engine.take_events();
        engine.state.remaining_time = 1;
        engine.tick();

        assert!(!engine.is_running());
        let completions = engine
            .take_events()
            .iter()
            .filter(|e| matches!(e, Event::TimerCompleted { .. }))
            .count();
        assert_eq!(completions, 1);
        assert_eq!(engine.state().completed_sessions, 1);
        assert_eq!(engine.state().total_focus_time, 25.0);
    }

    #[test]
    fn completion_notifies_with_mode_text() {
        let (mut engine, _, _) = engine();
        engine.state.remaining_time = 1;
        engine.tick();
        let events = engine.take_events();
        assert!(events.contains(&Event::NotificationRequested {
            title: "Focus Time Complete!".into(),
            body: "Great job! Time for a break.".into(),
        }));
        assert!(events.contains(&Event::ToneRequested {
            frequency_hz: COMPLETE_TONE_HZ,
            duration_secs: DEFAULT_TONE_SECS,
        }));
    }

    #[test]
    fn break_completion_does_not_count_session() {
        let (mut engine, _, _) = engine();
        engine.set_mode(Mode::ShortBreak);
        engine.state.remaining_time = 1;
        engine.tick();
        assert_eq!(engine.state().completed_sessions, 0);
        assert_eq!(engine.state().total_focus_time, 0.0);
    }

    #[test]
    fn advance_from_focus_picks_long_break_on_interval() {
        let (mut engine, _, _) = engine();
        engine.apply_setting(SettingChange::AutoStartBreaks(false));

        engine.state.completed_sessions = 4;
        engine.advance_mode();
        assert_eq!(engine.mode(), Mode::LongBreak);

        engine.set_mode(Mode::Focus);
        engine.state.completed_sessions = 3;
        engine.advance_mode();
        assert_eq!(engine.mode(), Mode::ShortBreak);
    }

    #[test]
    fn advance_from_break_starts_next_session() {
        let (mut engine, _, _) = engine();
        engine.apply_setting(SettingChange::AutoStartFocus(false));
        for mode in [Mode::ShortBreak, Mode::LongBreak] {
            engine.set_mode(mode);
            let before = engine.state().session_count;
            engine.advance_mode();
            assert_eq!(engine.mode(), Mode::Focus);
            assert_eq!(engine.state().session_count, before + 1);
            assert!(!engine.is_running());
        }
    }

    #[test]
    fn advance_auto_starts_when_enabled() {
        let (mut engine, _, _) = engine();
        engine.state.completed_sessions = 1;
        engine.advance_mode();
        assert_eq!(engine.mode(), Mode::ShortBreak);
        assert!(engine.is_running());
        assert!(engine.is_ticking());
    }

    #[test]
    fn settle_runs_pending_advance_once() {
        let (mut engine, store, _) = engine();
        assert!(!engine.settle());

        engine.state.remaining_time = 1;
        engine.start();
        engine.tick();
        assert!(engine.has_pending_advance());

        assert!(engine.settle());
        assert!(!engine.has_pending_advance());
        assert_eq!(engine.mode(), Mode::ShortBreak);
        assert_eq!(engine.next_due(), Some(engine.now_ms() + TICK_INTERVAL_MS));
        assert_eq!(saved_stats(&store).mode.as_deref(), Some("shortBreak"));
        assert!(!engine.settle());
    }

    #[test]
    fn deferred_save_fires_five_seconds_after_first_tick() {
        let (mut engine, store, clock) = engine();
        engine.start();
        assert_eq!(saved_stats(&store).remaining_time, Some(1500));

        advance(&mut engine, &clock, 1_000);
        assert!(engine.has_pending_save());

        advance(&mut engine, &clock, 4_999);
        assert_eq!(saved_stats(&store).remaining_time, Some(1500));

        advance(&mut engine, &clock, 1);
        assert_eq!(saved_stats(&store).remaining_time, Some(1495));
        // The tick due at the same instant re-armed a fresh write.
        assert!(engine.has_pending_save());
    }

    #[test]
    fn pause_cancels_deferred_save() {
        let (mut engine, _, clock) = engine();
        engine.start();
        advance(&mut engine, &clock, 2_000);
        assert!(engine.has_pending_save());
        engine.pause();
        assert!(!engine.has_pending_save());
        assert_eq!(engine.next_due(), None);
    }

    #[test]
    fn reset_cancels_pending_advance() {
        let (mut engine, _, clock) = engine();
        engine.state.remaining_time = 1;
        engine.tick();
        assert!(engine.has_pending_advance());
        engine.reset();
        assert!(!engine.has_pending_advance());
        advance(&mut engine, &clock, 5_000);
        assert_eq!(engine.mode(), Mode::Focus);
        assert!(!engine.is_running());
    }

    #[test]
    fn manual_mode_change_supersedes_advance() {
        let (mut engine, _, clock) = engine();
        engine.state.remaining_time = 1;
        engine.tick();
        engine.set_mode(Mode::LongBreak);
        advance(&mut engine, &clock, 5_000);
        assert_eq!(engine.mode(), Mode::LongBreak);
        assert!(!engine.is_running());
    }

    #[test]
    fn start_during_advance_delay_moves_on_first() {
        let (mut engine, _, _) = engine();
        engine.apply_setting(SettingChange::AutoStartBreaks(false));
        engine.state.remaining_time = 1;
        engine.tick();

        assert!(engine.start());
        assert_eq!(engine.mode(), Mode::ShortBreak);
        assert!(engine.is_running());
        assert!(!engine.has_pending_advance());
        assert_eq!(engine.state().completed_sessions, 1);
    }

    #[test]
    fn focus_duration_change_reapplies_when_idle() {
        let (mut engine, store, _) = engine();
        engine.apply_setting(SettingChange::FocusDuration(50.0));
        assert_eq!(engine.state().remaining_time, 3000);
        assert!(store.get(SETTINGS_KEY).unwrap().unwrap().contains("\"focusDuration\":50"));
    }

    #[test]
    fn focus_duration_change_leaves_running_interval_alone() {
        let (mut engine, _, _) = engine();
        engine.start();
        engine.apply_setting(SettingChange::FocusDuration(50.0));
        assert_eq!(engine.state().total_time, 1500);
    }

    #[test]
    fn break_duration_change_does_not_reapply() {
        let (mut engine, _, _) = engine();
        engine.set_mode(Mode::ShortBreak);
        engine.apply_setting(SettingChange::ShortBreakDuration(10.0));
        assert_eq!(engine.state().total_time, 300);
    }

    #[test]
    fn load_settings_merges_and_applies_duration() {
        let (mut engine, store, _) = engine();
        store.set(SETTINGS_KEY, r#"{"focusDuration":45}"#).unwrap();
        engine.load_settings();
        assert_eq!(engine.settings().focus_duration, 45.0);
        assert_eq!(engine.settings().short_break_duration, 5.0);
        assert_eq!(engine.state().remaining_time, 2700);
    }

    #[test]
    fn malformed_settings_keep_defaults() {
        let (mut engine, store, _) = engine();
        store.set(SETTINGS_KEY, "{{{").unwrap();
        engine.load_settings();
        assert_eq!(engine.settings(), &Settings::default());
    }

    #[test]
    fn flush_writes_and_clears_pending() {
        let (mut engine, store, clock) = engine();
        engine.start();
        advance(&mut engine, &clock, 2_000);
        engine.flush();
        assert!(!engine.has_pending_save());
        assert_eq!(saved_stats(&store).remaining_time, Some(1498));
    }

    #[test]
    fn every_transition_renders() {
        let (mut engine, _, _) = engine();
        engine.start();
        let events = engine.take_events();
        assert!(matches!(events.last(), Some(Event::StateSnapshot { .. })));
    }
}
