use focus_timer_core::error::Result;
use focus_timer_core::timer::display;
use serde::Serialize;

use crate::app::{self, App};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TodayStats {
    completed_sessions: u32,
    total_focus_time: f64,
    focus_time_display: String,
    session_count: u32,
}

pub fn run(mut app: App, json: bool) -> Result<()> {
    app.restore();
    app.engine.settle();
    app.engine.flush();
    app.drain(None);

    let state = app.engine.state();
    let stats = TodayStats {
        completed_sessions: state.completed_sessions,
        total_focus_time: state.total_focus_time,
        focus_time_display: display::format_focus_time(state.total_focus_time),
        session_count: state.session_count,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{}", app::title(&app.engine));
        println!("{}", display::session_label(state));
        println!("Completed: {}", stats.completed_sessions);
        println!("Focus time: {}", stats.focus_time_display);
    }
    Ok(())
}
