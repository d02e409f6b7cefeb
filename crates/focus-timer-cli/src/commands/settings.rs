use clap::Subcommand;
use focus_timer_core::error::Result;
use focus_timer_core::{ConfigError, SettingChange};

use crate::app::App;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print all settings as JSON
    Show,
    /// Get a setting value
    Get {
        /// Setting key (e.g. "focusDuration" or "focus_duration")
        key: String,
    },
    /// Set a setting value
    Set {
        /// Setting key
        key: String,
        /// New value
        value: String,
    },
}

pub fn run(mut app: App, action: SettingsAction) -> Result<()> {
    app.restore();

    match action {
        SettingsAction::Show => {
            println!("{}", serde_json::to_string_pretty(app.engine.settings())?);
        }
        SettingsAction::Get { key } => match app.engine.settings().get(&key) {
            Some(value) => println!("{value}"),
            None => return Err(ConfigError::UnknownKey(key).into()),
        },
        SettingsAction::Set { key, value } => {
            let change = SettingChange::parse(&key, &value)?;
            app.engine.apply_setting(change);
            println!("ok");
        }
    }

    app.engine.settle();
    app.engine.flush();
    app.drain(None);
    Ok(())
}
