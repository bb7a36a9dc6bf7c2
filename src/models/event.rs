//! Upstream event metadata and the tournament listing built from it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

fn lenient_begin_time<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let val: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match val {
        Some(serde_json::Value::String(s)) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        _ => None,
    })
}

/// A round number that may arrive as a number or a numeric string.
fn lenient_round<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let val: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match val {
        Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Keep every window that decodes; a window without an id is dropped alone.
fn lenient_windows<'de, D>(deserializer: D) -> Result<Vec<EventWindow>, D::Error>
where
    D: Deserializer<'de>,
{
    let val: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match val {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// A scored sub-period of an event, as defined upstream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventWindow {
    pub event_window_id: String,

    /// `None` when upstream omits it or sends something unparsable
    #[serde(default, deserialize_with = "lenient_begin_time")]
    pub begin_time: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "lenient_round")]
    pub round: Option<u32>,
}

impl EventWindow {
    pub fn new(event_window_id: impl Into<String>, begin_time: Option<DateTime<Utc>>) -> Self {
        Self {
            event_window_id: event_window_id.into(),
            begin_time,
            round: None,
        }
    }

    /// Whether the window had begun at `now`. Undated windows never qualify.
    pub fn has_begun(&self, now: DateTime<Utc>) -> bool {
        self.begin_time.is_some_and(|t| t <= now)
    }
}

/// An upstream event with its windows.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInfo {
    pub event_id: String,

    #[serde(default, deserialize_with = "lenient_windows")]
    pub event_windows: Vec<EventWindow>,
}

impl EventInfo {
    pub fn new(event_id: impl Into<String>, event_windows: Vec<EventWindow>) -> Self {
        Self {
            event_id: event_id.into(),
            event_windows,
        }
    }

    /// First window whose id contains `pattern`.
    pub fn find_window(&self, pattern: &str) -> Option<&EventWindow> {
        self.event_windows
            .iter()
            .find(|w| w.event_window_id.contains(pattern))
    }
}

/// A selectable tournament: a real window or a synthetic cumulative one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentInfo {
    pub event_id: String,
    pub event_window_id: String,
    pub event_name: String,
    pub date: Option<DateTime<Utc>>,

    /// `DD/MM/YYYY`
    pub display_date: Option<String>,
}
