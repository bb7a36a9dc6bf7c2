//! Derived standings and per-match details.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::SessionRecord;

/// One tracked player's standing within a window.
///
/// `rank == 0` means the player was found without an upstream rank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingRecord {
    /// Canonical roster label
    pub player: String,

    /// Roster account id (the merge and dedup key)
    pub account_id: String,

    pub rank: u32,
    pub points: u32,
    pub kills: u32,
    pub wins: u32,
    pub matches: u32,
    pub kd: f64,
    pub damage: f64,

    /// Raw match history, in upstream (chronological) order
    #[serde(default)]
    pub session_history: Vec<SessionRecord>,

    /// Set when the record is masked by the spoiler guard
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

impl RankingRecord {
    /// End time of the most recent session, if any session reports one.
    pub fn latest_session_end(&self) -> Option<DateTime<Utc>> {
        self.session_history.iter().filter_map(|s| s.end_time).max()
    }

    /// Whether the latest match ended less than `delay` before `now`.
    pub fn is_spoiler(&self, delay: Duration, now: DateTime<Utc>) -> bool {
        if delay <= Duration::zero() {
            return false;
        }
        self.latest_session_end()
            .is_some_and(|end| now.signed_duration_since(end) < delay)
    }

    /// Copy of this record with results withheld.
    pub fn masked(&self) -> Self {
        Self {
            player: self.player.clone(),
            account_id: self.account_id.clone(),
            rank: self.rank,
            hidden: true,
            ..Default::default()
        }
    }
}

/// One match result, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDetail {
    pub match_id: String,

    /// Per-match points are not reported upstream; always 0.
    pub points: u32,

    pub kills: u32,
    pub placement: u32,

    /// `HH:MM:SS` (UTC) or [`MatchDetail::TIME_UNAVAILABLE`]
    pub time: String,

    pub ended_at: Option<DateTime<Utc>>,
}

impl MatchDetail {
    pub const TIME_UNAVAILABLE: &'static str = "N/A";
}
