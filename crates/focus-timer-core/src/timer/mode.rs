use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    #[default]
    Focus,
    ShortBreak,
    LongBreak,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Focus, Mode::ShortBreak, Mode::LongBreak];

    /// Wire name used in the persisted snapshot.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Focus => "focus",
            Mode::ShortBreak => "shortBreak",
            Mode::LongBreak => "longBreak",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Focus => "Focus Time",
            Mode::ShortBreak => "Short Break",
            Mode::LongBreak => "Long Break",
        }
    }

    /// Progress ring color.
    pub fn color(self) -> &'static str {
        match self {
            Mode::Focus => "#e74c3c",
            Mode::ShortBreak => "#27ae60",
            Mode::LongBreak => "#3498db",
        }
    }

    pub fn is_break(self) -> bool {
        !matches!(self, Mode::Focus)
    }

    /// Body text of the notification shown when this mode completes.
    pub fn completion_message(self) -> &'static str {
        match self {
            Mode::Focus => "Great job! Time for a break.",
            Mode::ShortBreak | Mode::LongBreak => "Break time is over. Ready to focus?",
        }
    }

    /// Lenient parse for persisted values: anything unrecognised is Focus.
    pub fn from_persisted(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    /// Accepts the wire names plus kebab/snake spellings used on the command line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "focus" => Ok(Mode::Focus),
            "shortBreak" | "short-break" | "short_break" | "short" => Ok(Mode::ShortBreak),
            "longBreak" | "long-break" | "long_break" | "long" => Ok(Mode::LongBreak),
            other => Err(ConfigError::InvalidValue {
                key: "mode".into(),
                message: format!("unknown mode '{other}'"),
            }),
        }
    }
}
