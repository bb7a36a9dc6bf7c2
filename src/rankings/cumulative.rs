//! Synthetic cumulative windows: constituent resolution and merging.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::models::{EventInfo, EventWindow, RankingRecord, WindowFamily};
use crate::source::{EventScope, LeaderboardSource};

/// The two real windows of `family` within `event`, if both exist and have
/// begun at `now`.
pub fn locate_constituents(
    event: &EventInfo,
    family: WindowFamily,
    now: DateTime<Utc>,
) -> Option<[&EventWindow; 2]> {
    let [first_pattern, second_pattern] = family.constituent_patterns();
    let first = event.find_window(&first_pattern)?;
    let second = event.find_window(&second_pattern)?;

    if first.has_begun(now) && second.has_begun(now) {
        Some([first, second])
    } else {
        debug!(
            "{} of {}: constituents not started yet at {}",
            family, event.event_id, now
        );
        None
    }
}

/// Real window ids making up `family` for `event_id`, in play order.
///
/// Empty means "no cumulative data available": the event is unknown, a
/// constituent is missing, or one has not begun yet.
pub async fn resolve_constituents(
    source: &dyn LeaderboardSource,
    event_id: &str,
    family: WindowFamily,
    now: DateTime<Utc>,
) -> Vec<String> {
    let (past, current) = tokio::join!(
        events_or_empty(source, EventScope::Past),
        events_or_empty(source, EventScope::Current)
    );

    let constituents = past
        .iter()
        .chain(current.iter())
        .filter(|event| event.event_id == event_id)
        .find_map(|event| locate_constituents(event, family, now))
        .map(|windows| {
            windows
                .iter()
                .map(|w| w.event_window_id.clone())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    if constituents.is_empty() {
        info!("No cumulative data for {} of {}", family, event_id);
    }
    constituents
}

async fn events_or_empty(source: &dyn LeaderboardSource, scope: EventScope) -> Vec<EventInfo> {
    match source.events(scope).await {
        Ok(events) => events,
        Err(e) => {
            warn!(
                "{}: {} events unavailable, treating as empty: {}",
                source.name(),
                scope.as_str(),
                e
            );
            Vec::new()
        }
    }
}

/// Sum per-window rankings into one record per player and re-rank by points.
///
/// Records are keyed by account id. Points, kills, wins and matches are
/// added and session histories concatenated in input order. Upstream ranks
/// are discarded: the result is ranked 1..N by total points, descending,
/// ties keeping first-seen order.
pub fn merge(result_sets: Vec<Vec<RankingRecord>>) -> Vec<RankingRecord> {
    let mut order: Vec<String> = Vec::new();
    let mut merged: HashMap<String, RankingRecord> = HashMap::new();

    for record in result_sets.into_iter().flatten() {
        match merged.entry(record.account_id.clone()) {
            Entry::Occupied(mut existing) => accumulate(existing.get_mut(), record),
            Entry::Vacant(slot) => {
                order.push(record.account_id.clone());
                slot.insert(record);
            }
        }
    }

    let mut records: Vec<RankingRecord> = order
        .iter()
        .filter_map(|id| merged.remove(id))
        .collect();

    records.sort_by(|a, b| b.points.cmp(&a.points));
    for (i, record) in records.iter_mut().enumerate() {
        record.rank = i as u32 + 1;
    }
    records
}

fn accumulate(total: &mut RankingRecord, next: RankingRecord) {
    total.points = total.points.saturating_add(next.points);
    total.kills = total.kills.saturating_add(next.kills);
    total.wins = total.wins.saturating_add(next.wins);
    total.matches = total.matches.saturating_add(next.matches);
    total.session_history.extend(next.session_history);
}
