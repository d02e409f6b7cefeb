//! Foreground session.
//!
//! Sleeps until the engine's next scheduled job, reads one-letter commands
//! from stdin, and flushes the snapshot on quit or Ctrl-C so the next
//! invocation can resume where this one stopped.

use std::time::Duration;

use focus_timer_core::error::Result;
use focus_timer_core::{clock, Mode, TimerEngine};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::app::{App, StatusLine};

const HELP: &str = "commands: s start | p pause | t toggle | r reset | f focus | sb short break | lb long break | q quit";

pub fn run(app: App) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(session(app))
}

async fn session(mut app: App) -> Result<()> {
    let mut screen = StatusLine::new();
    eprintln!("{HELP}");
    if app.engine.init() {
        info!("resumed running interval");
    }
    app.drain(Some(&mut screen));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        let due = app.engine.next_due();
        tokio::select! {
            _ = wait_until(due) => {
                app.engine.run_due();
            }
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => {
                    if !handle_command(&mut app.engine, line.trim()) {
                        break;
                    }
                }
                None => {
                    debug!("stdin closed, running until interrupted");
                    stdin_open = false;
                }
            },
            _ = &mut ctrl_c => break,
        }
        app.drain(Some(&mut screen));
    }

    app.engine.settle();
    app.engine.flush();
    app.drain(Some(&mut screen));
    screen.finish();
    Ok(())
}

async fn wait_until(due_ms: Option<u64>) {
    match due_ms {
        Some(due) => {
            let delay = due.saturating_sub(clock::now_ms());
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Returns `false` when the session should end.
fn handle_command(engine: &mut TimerEngine, input: &str) -> bool {
    match input {
        "s" | "start" => {
            engine.start();
        }
        "p" | "pause" => {
            engine.pause();
        }
        "" | "t" | "toggle" => {
            if engine.is_running() {
                engine.pause();
            } else {
                engine.start();
            }
        }
        "r" | "reset" => engine.reset(),
        "f" | "focus" => engine.set_mode(Mode::Focus),
        "sb" => engine.set_mode(Mode::ShortBreak),
        "lb" => engine.set_mode(Mode::LongBreak),
        "q" | "quit" => return false,
        _ => eprintln!("\n{HELP}"),
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use focus_timer_core::{ManualClock, MemoryStore, TimerQueue};

    fn engine() -> TimerEngine {
        TimerEngine::new(MemoryStore::new(), TimerQueue::new(), ManualClock::starting_now())
    }

    #[test]
    fn empty_line_toggles() {
        let mut engine = engine();
        assert!(handle_command(&mut engine, ""));
        assert!(engine.is_running());
        assert!(handle_command(&mut engine, ""));
        assert!(engine.is_paused());
    }

    #[test]
    fn mode_shortcuts() {
        let mut engine = engine();
        handle_command(&mut engine, "lb");
        assert_eq!(engine.mode(), Mode::LongBreak);
        handle_command(&mut engine, "f");
        assert_eq!(engine.mode(), Mode::Focus);
    }

    #[test]
    fn quit_ends_session() {
        let mut engine = engine();
        assert!(!handle_command(&mut engine, "q"));
        assert!(handle_command(&mut engine, "bogus"));
    }
}
