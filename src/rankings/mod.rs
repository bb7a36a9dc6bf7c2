//! Leaderboard aggregation for the tracked roster.
//!
//! - **roster**: which roster player (if any) a leaderboard entry belongs to
//! - **stats**: per-player statistics from one entry
//! - **window**: paginated rankings of one real window
//! - **cumulative**: constituent resolution and merging of synthetic windows
//! - **matches**: match-by-match projection of a player's sessions
//!
//! Nothing here keeps state between calls and nothing here fails: upstream
//! errors become empty results where they happen.

pub mod cumulative;
pub mod matches;
pub mod roster;
pub mod stats;
pub mod window;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{info, warn};

use crate::models::{RankingRecord, TournamentInfo, TrackedPlayer, WindowFamily, WindowRef};
use crate::source::{EventScope, LeaderboardSource};
use crate::tournaments::list_tournaments;

pub use cumulative::{locate_constituents, merge};
pub use matches::project;
pub use roster::match_player;
pub use stats::extract;
pub use window::PageSchedule;

/// Rankings of a fixed roster against an upstream leaderboard source.
pub struct RankingsEngine {
    source: Arc<dyn LeaderboardSource>,
    roster: Vec<TrackedPlayer>,
    schedule: PageSchedule,
}

impl RankingsEngine {
    pub fn new(
        source: Arc<dyn LeaderboardSource>,
        roster: Vec<TrackedPlayer>,
        schedule: PageSchedule,
    ) -> Self {
        Self {
            source,
            roster,
            schedule,
        }
    }

    pub fn roster(&self) -> &[TrackedPlayer] {
        &self.roster
    }

    /// Rankings for any window id, real or cumulative.
    pub async fn rankings(&self, event_id: &str, window_id: &str) -> Vec<RankingRecord> {
        self.rankings_at(event_id, window_id, Utc::now()).await
    }

    /// [`Self::rankings`] with an explicit resolution time.
    pub async fn rankings_at(
        &self,
        event_id: &str,
        window_id: &str,
        now: DateTime<Utc>,
    ) -> Vec<RankingRecord> {
        match WindowRef::classify(window_id) {
            WindowRef::Real(id) => self.fetch_window(event_id, &id).await,
            WindowRef::Cumulative(family) => {
                self.cumulative_rankings(event_id, family, now).await
            }
            WindowRef::UnknownCumulative(id) => {
                warn!("Unrecognized cumulative window {}", id);
                Vec::new()
            }
        }
    }

    /// Rankings of one real window.
    pub async fn fetch_window(&self, event_id: &str, window_id: &str) -> Vec<RankingRecord> {
        window::fetch_window(
            self.source.as_ref(),
            &self.roster,
            self.schedule,
            event_id,
            window_id,
        )
        .await
    }

    /// Real window ids summed by `family` in `event_id`.
    pub async fn resolve_constituents(
        &self,
        event_id: &str,
        family: WindowFamily,
        now: DateTime<Utc>,
    ) -> Vec<String> {
        cumulative::resolve_constituents(self.source.as_ref(), event_id, family, now).await
    }

    /// Merged rankings over the constituents of `family`.
    pub async fn cumulative_rankings(
        &self,
        event_id: &str,
        family: WindowFamily,
        now: DateTime<Utc>,
    ) -> Vec<RankingRecord> {
        let constituents = self.resolve_constituents(event_id, family, now).await;
        if constituents.is_empty() {
            return Vec::new();
        }

        info!(
            "Merging {} of {} from {:?}",
            family, event_id, constituents
        );
        let result_sets = join_all(
            constituents
                .iter()
                .map(|window_id| self.fetch_window(event_id, window_id)),
        )
        .await;
        merge(result_sets)
    }

    /// Tournaments available for selection, newest first.
    pub async fn tournaments(&self) -> Vec<TournamentInfo> {
        self.tournaments_at(Utc::now()).await
    }

    pub async fn tournaments_at(&self, now: DateTime<Utc>) -> Vec<TournamentInfo> {
        let (past, current) = tokio::join!(
            self.source.events(EventScope::Past),
            self.source.events(EventScope::Current)
        );
        let past = past.unwrap_or_else(|e| {
            warn!("Past events unavailable: {}", e);
            Vec::new()
        });
        let current = current.unwrap_or_else(|e| {
            warn!("Current events unavailable: {}", e);
            Vec::new()
        });

        list_tournaments(past.iter().chain(current.iter()), now)
    }

    /// Drop cached upstream responses so the next call refetches.
    pub async fn refresh(&self) {
        self.source.invalidate().await;
    }
}
