//! User-adjustable timer settings.
//!
//! Stored as a camelCase JSON record under its own key. Missing fields fall
//! back to the defaults field by field, so an older or partial record still
//! loads.

use serde::{Deserialize, Serialize};

use super::mode::Mode;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Minutes. Fractional values are honoured.
    #[serde(default = "default_focus_duration")]
    pub focus_duration: f64,
    #[serde(default = "default_short_break")]
    pub short_break_duration: f64,
    #[serde(default = "default_long_break")]
    pub long_break_duration: f64,
    /// Every Nth completed focus session earns a long break.
    #[serde(default = "default_long_break_interval")]
    pub long_break_interval: u32,
    #[serde(default = "default_true")]
    pub auto_start_breaks: bool,
    #[serde(default = "default_true")]
    pub auto_start_focus: bool,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
}

fn default_focus_duration() -> f64 {
    25.0
}
fn default_short_break() -> f64 {
    5.0
}
fn default_long_break() -> f64 {
    15.0
}
fn default_long_break_interval() -> u32 {
    4
}
fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_duration: default_focus_duration(),
            short_break_duration: default_short_break(),
            long_break_duration: default_long_break(),
            long_break_interval: default_long_break_interval(),
            auto_start_breaks: true,
            auto_start_focus: true,
            sound_enabled: true,
        }
    }
}

impl Settings {
    /// Configured length of `mode` in minutes.
    pub fn duration_min(&self, mode: Mode) -> f64 {
        match mode {
            Mode::Focus => self.focus_duration,
            Mode::ShortBreak => self.short_break_duration,
            Mode::LongBreak => self.long_break_duration,
        }
    }

    /// Length of `mode` in whole seconds, never less than one.
    pub fn duration_secs(&self, mode: Mode) -> u64 {
        let secs = (self.duration_min(mode) * 60.0).round();
        if secs.is_finite() && secs >= 1.0 {
            secs as u64
        } else {
            1
        }
    }

    /// Whether the `completed`-th focus session earns a long break.
    /// An interval of zero never does.
    pub fn is_long_break_due(&self, completed: u32) -> bool {
        completed
            .checked_rem(self.long_break_interval)
            .is_some_and(|r| r == 0)
    }

    pub fn apply(&mut self, change: SettingChange) {
        match change {
            SettingChange::FocusDuration(v) => self.focus_duration = v,
            SettingChange::ShortBreakDuration(v) => self.short_break_duration = v,
            SettingChange::LongBreakDuration(v) => self.long_break_duration = v,
            SettingChange::LongBreakInterval(v) => self.long_break_interval = v,
            SettingChange::AutoStartBreaks(v) => self.auto_start_breaks = v,
            SettingChange::AutoStartFocus(v) => self.auto_start_focus = v,
            SettingChange::SoundEnabled(v) => self.sound_enabled = v,
        }
    }

    /// Get a setting as a string by key (camelCase or snake_case).
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match normalize_key(key)? {
            "focusDuration" => self.focus_duration.to_string(),
            "shortBreakDuration" => self.short_break_duration.to_string(),
            "longBreakDuration" => self.long_break_duration.to_string(),
            "longBreakInterval" => self.long_break_interval.to_string(),
            "autoStartBreaks" => self.auto_start_breaks.to_string(),
            "autoStartFocus" => self.auto_start_focus.to_string(),
            "soundEnabled" => self.sound_enabled.to_string(),
            _ => return None,
        };
        Some(value)
    }
}

/// A single settings mutation, as produced by a settings input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "key", content = "value", rename_all = "camelCase")]
pub enum SettingChange {
    FocusDuration(f64),
    ShortBreakDuration(f64),
    LongBreakDuration(f64),
    LongBreakInterval(u32),
    AutoStartBreaks(bool),
    AutoStartFocus(bool),
    SoundEnabled(bool),
}

impl SettingChange {
    /// Parse a `key value` pair. Keys may be camelCase (`focusDuration`) or
    /// snake_case (`focus_duration`).
    pub fn parse(key: &str, value: &str) -> Result<Self, ConfigError> {
        let canonical = normalize_key(key).ok_or_else(|| ConfigError::UnknownKey(key.into()))?;
        let invalid = |message: String| ConfigError::InvalidValue {
            key: canonical.into(),
            message,
        };
        let minutes = || {
            value
                .trim()
                .parse::<f64>()
                .map_err(|e| invalid(format!("cannot parse '{value}' as minutes: {e}")))
        };
        let flag = || {
            value
                .trim()
                .parse::<bool>()
                .map_err(|e| invalid(format!("cannot parse '{value}' as bool: {e}")))
        };

        let change = match canonical {
            "focusDuration" => SettingChange::FocusDuration(minutes()?),
            "shortBreakDuration" => SettingChange::ShortBreakDuration(minutes()?),
            "longBreakDuration" => SettingChange::LongBreakDuration(minutes()?),
            "longBreakInterval" => SettingChange::LongBreakInterval(
                value
                    .trim()
                    .parse::<u32>()
                    .map_err(|e| invalid(format!("cannot parse '{value}' as interval: {e}")))?,
            ),
            "autoStartBreaks" => SettingChange::AutoStartBreaks(flag()?),
            "autoStartFocus" => SettingChange::AutoStartFocus(flag()?),
            "soundEnabled" => SettingChange::SoundEnabled(flag()?),
            _ => return Err(ConfigError::UnknownKey(key.into())),
        };
        Ok(change)
    }
}

const KEYS: [(&str, &str); 7] = [
    ("focusDuration", "focus_duration"),
    ("shortBreakDuration", "short_break_duration"),
    ("longBreakDuration", "long_break_duration"),
    ("longBreakInterval", "long_break_interval"),
    ("autoStartBreaks", "auto_start_breaks"),
    ("autoStartFocus", "auto_start_focus"),
    ("soundEnabled", "sound_enabled"),
];

fn normalize_key(key: &str) -> Option<&'static str> {
    KEYS.iter()
        .find(|(camel, snake)| *camel == key || *snake == key)
        .map(|(camel, _)| *camel)
}
