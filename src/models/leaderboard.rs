//! Upstream leaderboard rows and their per-match session records.
//!
//! Upstream payloads are untrusted: fields go missing, change type or get
//! renamed between seasons. Every field here decodes leniently and falls
//! back to its default instead of failing the whole entry.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Tracked stat: finishing position of the team in a match (1 = won).
pub const PLACEMENT_STAT_INDEX: &str = "PLACEMENT_STAT_INDEX";

/// Tracked stat: set when the team won the match.
pub const VICTORY_ROYALE_STAT: &str = "VICTORY_ROYALE_STAT";

/// Tracked stat: team eliminations in a match.
pub const TEAM_ELIMS_STAT_INDEX: &str = "TEAM_ELIMS_STAT_INDEX";

/// Point-breakdown key fragments that count as eliminations.
pub const KILL_BREAKDOWN_KEYS: &[&str] = &["ELIMS", "KILLS", "TEAM_ELIMS"];

/// Session stat keys read as a match's kill count, in priority order.
pub const SESSION_KILL_KEYS: &[&str] = &[TEAM_ELIMS_STAT_INDEX, "ELIMS", "KILLS"];

// ── Lenient field decoders ──────────────────────────────────────────────────

/// Deserialize a count that may be a number, a numeric string, or garbage.
fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let val: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(val.and_then(|v| value_as_f64(&v)).map_or(0, |n| {
        if n.is_finite() && n > 0.0 {
            n.min(u32::MAX as f64) as u32
        } else {
            0
        }
    }))
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let val: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(val
        .and_then(|v| value_as_f64(&v))
        .filter(|n| n.is_finite())
        .unwrap_or(0.0))
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let val: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match val {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let val: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match val {
        Some(serde_json::Value::String(s)) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    })
}

/// An identifier that may arrive as a string or a number.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let val: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match val {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Keep only the numeric stats of a session; anything else is dropped.
fn lenient_stats<'de, D>(deserializer: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let val: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match val {
        Some(serde_json::Value::Object(map)) => map
            .into_iter()
            .filter_map(|(k, v)| value_as_f64(&v).map(|n| (k, n)))
            .collect(),
        _ => BTreeMap::new(),
    })
}

fn lenient_breakdown<'de, D>(deserializer: D) -> Result<BTreeMap<String, BreakdownItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let val: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match val {
        Some(serde_json::Value::Object(map)) => map
            .into_iter()
            .filter_map(|(k, v)| serde_json::from_value(v).ok().map(|item| (k, item)))
            .collect(),
        _ => BTreeMap::new(),
    })
}

fn lenient_sessions<'de, D>(deserializer: D) -> Result<Vec<SessionRecord>, D::Error>
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

fn value_as_f64(v: &serde_json::Value) -> Option<f64> {
    match v {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        serde_json::Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

// ── Upstream records ────────────────────────────────────────────────────────

/// One category of a leaderboard entry's point breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownItem {
    #[serde(default, deserialize_with = "lenient_u32")]
    pub times_achieved: u32,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub points_earned: f64,
}

/// One match played by a team within a window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(
        default,
        alias = "matchId",
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub session_id: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_time: Option<DateTime<Utc>>,

    #[serde(default, alias = "stats", deserialize_with = "lenient_stats")]
    pub tracked_stats: BTreeMap<String, f64>,
}

impl SessionRecord {
    /// Value of a tracked stat, if the session reports it.
    pub fn stat(&self, key: &str) -> Option<f64> {
        self.tracked_stats.get(key).copied()
    }

    /// First stat present among `keys`, in order.
    pub fn first_stat(&self, keys: &[&str]) -> Option<f64> {
        keys.iter().find_map(|k| self.stat(k))
    }

    /// A session is a win if it carries a victory flag or a first place.
    pub fn is_win(&self) -> bool {
        self.stat(VICTORY_ROYALE_STAT).is_some_and(|v| v > 0.0)
            || self.stat(PLACEMENT_STAT_INDEX) == Some(1.0)
    }
}

/// One ranked row of an upstream leaderboard page (one team).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    #[serde(default, deserialize_with = "lenient_strings")]
    pub team_account_ids: Vec<String>,

    #[serde(
        default,
        alias = "teamDisplayNames",
        deserialize_with = "lenient_strings"
    )]
    pub team_account_display_names: Vec<String>,

    #[serde(default, deserialize_with = "lenient_u32")]
    pub rank: u32,

    #[serde(default, alias = "points", deserialize_with = "lenient_u32")]
    pub points_earned: u32,

    #[serde(default, deserialize_with = "lenient_breakdown")]
    pub point_breakdown: BTreeMap<String, BreakdownItem>,

    #[serde(default, alias = "sessions", deserialize_with = "lenient_sessions")]
    pub session_history: Vec<SessionRecord>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub kd: f64,

    #[serde(default, alias = "damage", deserialize_with = "lenient_f64")]
    pub damage_dealt: f64,
}
