//! Application root.
//!
//! Builds the one engine a process uses and routes the engine's events to
//! the terminal collaborators: a status-line renderer, the terminal bell as
//! tone emitter, and stderr as the notification surface.

use std::io::Write;

use focus_timer_core::error::Result;
use focus_timer_core::timer::display;
use focus_timer_core::{
    AppConfig, Database, Event, RunState, SystemClock, TimerEngine, TimerQueue,
};
use tracing::debug;

pub struct App {
    pub engine: TimerEngine,
    config: AppConfig,
}

impl App {
    pub fn open(config: AppConfig) -> Result<Self> {
        let db = Database::open()?;
        let engine = TimerEngine::new(db, TimerQueue::new(), SystemClock)
            .with_tone_duration(config.tone_duration_secs);
        Ok(Self { engine, config })
    }

    /// Restore persisted state for a one-shot command. A running interval
    /// resumes silently; only an explicit command rings the bell.
    pub fn restore(&mut self) -> bool {
        let resumed = self.engine.init();
        let events = self.engine.take_events();
        self.route(events, None, false);
        resumed
    }

    /// Hand every pending engine event to its collaborator. Without a
    /// status line only tones and notifications are acted on.
    /// Returns how many tones were played.
    pub fn drain(&mut self, screen: Option<&mut StatusLine>) -> usize {
        let events = self.engine.take_events();
        self.route(events, screen, true)
    }

    fn route(
        &self,
        events: Vec<Event>,
        mut screen: Option<&mut StatusLine>,
        audible: bool,
    ) -> usize {
        let mut tones = 0;
        for event in events {
            match &event {
                Event::ToneRequested {
                    frequency_hz,
                    duration_secs,
                } if audible => {
                    self.emit_tone(*frequency_hz, *duration_secs);
                    tones += 1;
                }
                Event::NotificationRequested { title, body } => {
                    if let Some(screen) = screen.as_deref_mut() {
                        screen.clear();
                    }
                    self.notify(title, body);
                }
                _ => {}
            }
            if let Some(screen) = screen.as_deref_mut() {
                screen.apply(&event);
            }
        }
        if let Some(screen) = screen {
            screen.draw();
        }
        tones
    }

    fn emit_tone(&self, frequency_hz: u32, duration_secs: f64) {
        debug!(frequency_hz, duration_secs, "tone");
        if self.config.bell {
            let mut out = std::io::stderr();
            let _ = out.write_all(b"\x07");
            let _ = out.flush();
        }
    }

    fn notify(&self, title: &str, body: &str) {
        if self.config.notifications {
            eprintln!("{title} {body}");
        }
    }
}

/// Single-line terminal view of the timer.
#[derive(Debug, Default)]
pub struct StatusLine {
    mode_label: String,
    display: String,
    progress: f64,
    state: RunState,
    start_label: String,
    session_count: u32,
    completed_sessions: u32,
    focus_time: String,
    dirty: bool,
}

const BAR_WIDTH: usize = 20;

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &Event) {
        match event {
            Event::StateSnapshot {
                mode_label,
                display,
                progress,
                state,
                start_label,
                session_count,
                completed_sessions,
                focus_time_display,
                ..
            } => {
                self.mode_label = mode_label.clone();
                self.display = display.clone();
                self.progress = *progress;
                self.state = *state;
                self.start_label = start_label.clone();
                self.session_count = *session_count;
                self.completed_sessions = *completed_sessions;
                self.focus_time = focus_time_display.clone();
                self.dirty = true;
            }
            Event::TimerTicked {
                display, progress, ..
            } => {
                self.display = display.clone();
                self.progress = *progress;
                self.dirty = true;
            }
            _ => {}
        }
    }

    pub fn render(&self) -> String {
        let filled = ((self.progress * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
        let bar = format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled));
        let hint = match self.state {
            RunState::Running => "p: pause".to_string(),
            RunState::Paused | RunState::Idle => format!("s: {}", self.start_label.to_lowercase()),
        };
        format!(
            "{:<11} {} [{}] Session {} | {} done, {} | {}",
            self.mode_label,
            self.display,
            bar,
            self.session_count,
            self.completed_sessions,
            self.focus_time,
            hint
        )
    }

    pub fn draw(&mut self) {
        if !self.dirty {
            return;
        }
        self.dirty = false;
        let mut out = std::io::stdout();
        let _ = write!(out, "\r\x1b[2K{}", self.render());
        let _ = out.flush();
    }

    /// Wipe the line so other output starts in column zero.
    pub fn clear(&mut self) {
        let mut out = std::io::stdout();
        let _ = write!(out, "\r\x1b[2K");
        let _ = out.flush();
        self.dirty = true;
    }

    pub fn finish(&mut self) {
        self.draw();
        println!();
    }
}

/// Title line used when a one-shot command prints a human summary.
pub fn title(engine: &TimerEngine) -> String {
    display::window_title(engine.state())
}
