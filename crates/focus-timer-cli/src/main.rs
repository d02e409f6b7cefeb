use clap::{Parser, Subcommand};
use focus_timer_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod app;
mod commands;

#[derive(Parser)]
#[command(name = "focus-timer", version, about = "Pomodoro focus timer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the timer in the foreground, reading commands from stdin
    Run,
    /// One-shot timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Timer settings
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Today's statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_env("FOCUS_TIMER_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let config = AppConfig::load_or_default();
    init_tracing(&config);

    let result = app::App::open(config).and_then(|app| match cli.command {
        Commands::Run => commands::run::run(app),
        Commands::Timer { action } => commands::timer::run(app, action),
        Commands::Settings { action } => commands::settings::run(app, action),
        Commands::Stats { json } => commands::stats::run(app, json),
    });

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
