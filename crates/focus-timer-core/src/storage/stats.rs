use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::timer::TimerState;

/// Daily snapshot of the timer, written under [`STATS_KEY`](super::STATS_KEY).
///
/// Every field is optional on the way in: a record written by an older
/// build, or hand-edited, restores whatever it has and leaves the rest at
/// the engine's current values. A field of the wrong type is dropped on
/// its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedStats {
    /// Local calendar day the snapshot belongs to.
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub completed_sessions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub total_focus_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub session_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub remaining_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub total_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub is_running: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub is_paused: Option<bool>,
    /// Epoch milliseconds of the write.
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub last_updated: Option<u64>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

impl PersistedStats {
    pub fn capture(state: &TimerState, date: String, now_ms: u64) -> Self {
        Self {
            date: Some(date),
            completed_sessions: Some(state.completed_sessions),
            total_focus_time: Some(state.total_focus_time),
            session_count: Some(state.session_count),
            mode: Some(state.mode.as_str().to_string()),
            remaining_time: Some(state.remaining_time as i64),
            total_time: Some(state.total_time as i64),
            is_running: Some(state.is_running()),
            is_paused: Some(state.is_paused()),
            last_updated: Some(now_ms),
        }
    }

    /// Parse a stored record. Malformed JSON, or anything but an object, is
    /// logged and treated as absent.
    pub fn parse(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!(error = %e, "ignoring malformed stats record");
                None
            }
        }
    }

    pub fn is_for_day(&self, today: &str) -> bool {
        self.date.as_deref() == Some(today)
    }

    pub fn was_running(&self) -> bool {
        self.is_running.unwrap_or(false) && !self.is_paused.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_writes_camel_case_fields() {
        let state = TimerState::default();
        let stats = PersistedStats::capture(&state, "Mon Oct 19 2026".into(), 42);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["date"], "Mon Oct 19 2026");
        assert_eq!(json["remainingTime"], 1500);
        assert_eq!(json["mode"], "focus");
        assert_eq!(json["isRunning"], false);
        assert_eq!(json["lastUpdated"], 42);
    }

    #[test]
    fn missing_fields_parse_as_none() {
        let stats = PersistedStats::parse(r#"{"date":"Mon Oct 19 2026"}"#).unwrap();
        assert!(stats.is_for_day("Mon Oct 19 2026"));
        assert!(stats.completed_sessions.is_none());
        assert!(!stats.was_running());
    }

    #[test]
    fn malformed_json_is_absent() {
        assert!(PersistedStats::parse("{not json").is_none());
        assert!(PersistedStats::parse("42").is_none());
    }

    #[test]
    fn wrong_typed_field_keeps_the_rest() {
        let stats = PersistedStats::parse(
            r#"{"date":"Mon Oct 19 2026","completedSessions":-1,"totalFocusTime":"lots","remainingTime":"soon","sessionCount":3,"mode":"shortBreak"}"#,
        )
        .unwrap();
        assert!(stats.completed_sessions.is_none());
        assert!(stats.total_focus_time.is_none());
        assert!(stats.remaining_time.is_none());
        assert_eq!(stats.session_count, Some(3));
        assert_eq!(stats.mode.as_deref(), Some("shortBreak"));
        assert!(stats.is_for_day("Mon Oct 19 2026"));
    }

    #[test]
    fn paused_flag_blocks_running() {
        let stats = PersistedStats {
            is_running: Some(true),
            is_paused: Some(true),
            ..Default::default()
        };
        assert!(!stats.was_running());
    }
}
