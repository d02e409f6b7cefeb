use clap::Subcommand;
use focus_timer_core::error::Result;
use focus_timer_core::Mode;

use crate::app::App;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start or resume the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Start when stopped, pause when running
    Toggle,
    /// Stop and reload the current mode's full duration
    Reset,
    /// Switch mode (focus, short-break, long-break)
    Mode {
        mode: Mode,
    },
    /// Print current timer state as JSON
    Status,
}

/// Each invocation is one page load: restore, apply, flush, print.
pub fn run(mut app: App, action: TimerAction) -> Result<()> {
    app.restore();

    match action {
        TimerAction::Start => {
            app.engine.start();
        }
        TimerAction::Pause => {
            app.engine.pause();
        }
        TimerAction::Toggle => {
            if app.engine.is_running() {
                app.engine.pause();
            } else {
                app.engine.start();
            }
        }
        TimerAction::Reset => app.engine.reset(),
        TimerAction::Mode { mode } => app.engine.set_mode(mode),
        TimerAction::Status => {}
    }

    app.engine.settle();
    app.engine.flush();
    app.drain(None);
    println!("{}", serde_json::to_string_pretty(&app.engine.snapshot())?);
    Ok(())
}
