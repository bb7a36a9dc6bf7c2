//! Rankings of the roster within a single real window.
//!
//! The leaderboard is read page by page in fixed-size concurrent batches.
//! A batch is joined before the next one starts, and only then do we check
//! whether the whole roster has been found. Pages that fail to load count
//! as empty.

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{extract, match_player};
use crate::models::{LeaderboardEntry, RankingRecord, TrackedPlayer};
use crate::source::LeaderboardSource;

/// How many leaderboard pages to read, and how many at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSchedule {
    /// Pages `0..total_pages` are read (100 entries per page upstream)
    pub total_pages: u32,

    /// Pages requested concurrently per batch
    pub batch_size: u32,
}

impl Default for PageSchedule {
    fn default() -> Self {
        Self {
            total_pages: 50,
            batch_size: 10,
        }
    }
}

impl PageSchedule {
    /// Page ranges of each batch, in order.
    pub fn batches(&self) -> impl Iterator<Item = Range<u32>> {
        let total = self.total_pages;
        let size = self.batch_size.max(1);
        (0..total)
            .step_by(size as usize)
            .map(move |start| start..(start + size).min(total))
    }
}

/// One ranking record per roster player found in the window, best rank first.
///
/// The first entry claiming a player wins; later entries for the same
/// player are discarded.
///
/// Ordering is rank ascending except that unranked records (`rank == 0`)
/// sort after every ranked one rather than first. See [`sort_by_rank`].
pub async fn fetch_window(
    source: &dyn LeaderboardSource,
    roster: &[TrackedPlayer],
    schedule: PageSchedule,
    event_id: &str,
    window_id: &str,
) -> Vec<RankingRecord> {
    let wanted: HashSet<&str> = roster.iter().map(|p| p.id.as_str()).collect();
    if wanted.is_empty() {
        return Vec::new();
    }

    let mut found: HashMap<String, RankingRecord> = HashMap::new();

    for batch in schedule.batches() {
        debug!(
            "{}: fetching pages {}..{} of {}/{}",
            source.name(),
            batch.start,
            batch.end,
            event_id,
            window_id
        );
        let pages = join_all(
            batch.map(|page| fetch_page_or_empty(source, event_id, window_id, page)),
        )
        .await;

        // join_all keeps request order, so entries are visited in rank order.
        for entries in &pages {
            collect_matches(entries, roster, &mut found);
        }

        if found.len() >= wanted.len() {
            debug!("All {} roster players found, stopping early", wanted.len());
            break;
        }
    }

    info!(
        "Found {}/{} roster players in {}/{}",
        found.len(),
        wanted.len(),
        event_id,
        window_id
    );

    let mut records: Vec<RankingRecord> = found.into_values().collect();
    sort_by_rank(&mut records);
    records
}

async fn fetch_page_or_empty(
    source: &dyn LeaderboardSource,
    event_id: &str,
    window_id: &str,
    page: u32,
) -> Vec<LeaderboardEntry> {
    match source.leaderboard_page(event_id, window_id, page).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!(
                "{}: page {} of {}/{} failed, treating as empty: {}",
                source.name(),
                page,
                event_id,
                window_id,
                e
            );
            Vec::new()
        }
    }
}

fn collect_matches(
    entries: &[LeaderboardEntry],
    roster: &[TrackedPlayer],
    found: &mut HashMap<String, RankingRecord>,
) {
    for entry in entries {
        let Some(player) = match_player(entry, roster) else {
            continue;
        };
        if found.contains_key(&player.id) {
            debug!(
                "Ignoring later entry for {} at rank {}",
                player.name, entry.rank
            );
            continue;
        }
        found.insert(player.id.clone(), extract(entry, player));
    }
}

/// Rank ascending with unranked records last; ties broken by account id.
pub fn sort_by_rank(records: &mut [RankingRecord]) {
    records.sort_by(|a, b| {
        (a.rank == 0, a.rank)
            .cmp(&(b.rank == 0, b.rank))
            .then_with(|| a.account_id.cmp(&b.account_id))
    });
}
