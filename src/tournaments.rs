//! Tournament discovery: which windows can be picked, and what to call them.
//!
//! Upstream lists hundreds of events per region and platform. Only major EU
//! competitions are kept, and for events played over two sessions a
//! synthetic cumulative window is listed next to the real ones.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::debug;

use crate::models::{
    week_numbers, EventInfo, EventWindow, TournamentInfo, WindowFamily,
};
use crate::rankings::locate_constituents;

/// Most entries returned by [`list_tournaments`].
pub const MAX_TOURNAMENTS: usize = 50;

static MAJOR_EVENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"fncs|victorycup|cashcup|soloseries|elite|champion|cup")
        .expect("major event pattern is valid")
});

static EXCLUDED_EVENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"mobile|ranked|stranger|android|ios|blitz|playstation")
        .expect("excluded event pattern is valid")
});

static DIVISION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Division(\d+)").expect("division pattern is valid"));

static WEEK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Week(\d+)").expect("week pattern is valid"));

static HEAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Heat(\d+)").expect("heat pattern is valid"));

static QUALIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Qualifier(\d+)").expect("qualifier pattern is valid"));

static ROUND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Round(\d+)").expect("round pattern is valid"));

/// Whether an event is a major EU competition worth listing.
pub fn is_relevant_event(event_id: &str) -> bool {
    let id = event_id.to_lowercase();
    id.contains("_eu") && MAJOR_EVENT.is_match(&id) && !EXCLUDED_EVENT.is_match(&id)
}

/// Selectable tournaments across `events`, newest first.
///
/// Real windows are listed once they have begun at `now`. Cumulative
/// windows are listed once both of their constituents have begun, and are
/// dated by the later one.
pub fn list_tournaments<'a>(
    events: impl IntoIterator<Item = &'a EventInfo>,
    now: DateTime<Utc>,
) -> Vec<TournamentInfo> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut listed: Vec<TournamentInfo> = Vec::new();

    let mut push = |info: TournamentInfo| {
        if seen.insert(format!("{}:{}", info.event_id, info.event_window_id)) {
            listed.push(info);
        }
    };

    for event in events {
        if !is_relevant_event(&event.event_id) {
            continue;
        }

        for window in event.event_windows.iter().filter(|w| w.has_begun(now)) {
            push(TournamentInfo {
                event_id: event.event_id.clone(),
                event_window_id: window.event_window_id.clone(),
                event_name: display_name(&event.event_id, window),
                date: window.begin_time,
                display_date: window.begin_time.map(display_date),
            });
        }

        for family in cumulative_families(event) {
            let Some([_, last]) = locate_constituents(event, family, now) else {
                continue;
            };
            push(TournamentInfo {
                event_id: event.event_id.clone(),
                event_window_id: family.synthetic_id(&event.event_id),
                event_name: family.label(),
                date: last.begin_time,
                display_date: last.begin_time.map(display_date),
            });
        }
    }

    // Stable: equal dates keep discovery order.
    listed.sort_by(|a, b| b.date.cmp(&a.date));
    listed.truncate(MAX_TOURNAMENTS);
    debug!("Listing {} tournaments", listed.len());
    listed
}

/// Cumulative families an event can offer, before checking its windows.
fn cumulative_families(event: &EventInfo) -> Vec<WindowFamily> {
    let id = event.event_id.as_str();
    let mut families = Vec::new();

    if id.contains("FNCSDivisionalCup_Division1_EU") {
        let ids = event.event_windows.iter().map(|w| w.event_window_id.as_str());
        families.extend(week_numbers(ids).into_iter().map(WindowFamily::WeeklyCumulative));
    }
    if id.contains("EliteSeries") {
        if id.contains("PlayIn") {
            families.push(WindowFamily::PlayInCumulative);
        }
        families.push(WindowFamily::OpensCumulative);
    }
    families
}

/// `DD/MM/YYYY`
pub fn display_date(date: DateTime<Utc>) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Readable label of a real window.
pub fn display_name(event_id: &str, window: &EventWindow) -> String {
    let name = event_id
        .trim_start_matches("epicgames_")
        .trim_start_matches("Fortnite:");
    let window_id = window.event_window_id.as_str();
    let week = capture(&WEEK, window_id);

    if name.contains("EliteSeries") {
        if let Some(label) = elite_series_name(window_id) {
            return label;
        }
    }

    if let (true, Some(week)) = (name.contains("FNCS"), week) {
        if window_id.contains("Day1") {
            return format!("FNCS Div 1 - Week {week} (Session 1)");
        }
        if window_id.contains("Day2") {
            return format!("FNCS Div 1 - Week {week} (Session 2)");
        }
        if window_id.contains("Final") {
            return format!("FNCS Div 1 - Weekly Final {week}");
        }
    }

    let mut label = base_name(name);

    if let Some(week) = week {
        label.push_str(&format!(" W{week}"));
    } else if let Some(qualifier) = capture(&QUALIFIER, window_id) {
        label.push_str(&format!(" Q{qualifier}"));
    }

    if window_id.contains("Final") {
        label.push_str(" Finals");
    } else if window_id.contains("Day1") {
        label.push_str(" Day 1");
    } else if window_id.contains("Day2") {
        label.push_str(" Day 2");
    } else if let Some(round) = window.round.filter(|r| *r > 1) {
        label.push_str(&format!(" Round {round}"));
    } else if let Some(round) = capture(&ROUND, window_id) {
        label.push_str(&format!(" Rd {round}"));
    }

    label.trim().to_string()
}

fn elite_series_name(window_id: &str) -> Option<String> {
    let label = if window_id.contains("Open1") {
        "Elite Series - Open (Session 1)".to_string()
    } else if window_id.contains("Open2") {
        "Elite Series - Open (Session 2)".to_string()
    } else if window_id.contains("Open") {
        "Elite Series - Open".to_string()
    } else if window_id.contains("PlayIn") && window_id.contains("Day1") {
        "Elite Series - Play-In (Session 1)".to_string()
    } else if window_id.contains("PlayIn") && window_id.contains("Day2") {
        "Elite Series - Play-In (Session 2)".to_string()
    } else if window_id.contains("PlayIn") {
        "Elite Series - Play-In".to_string()
    } else if window_id.contains("Heat") {
        match capture(&HEAT, window_id) {
            Some(heat) => format!("Elite Series - Heat {heat}"),
            None => "Elite Series - Heat".to_string(),
        }
    } else if window_id.contains("Final") {
        "Elite Series - Final".to_string()
    } else {
        return None;
    };
    Some(label)
}

fn base_name(name: &str) -> String {
    if name.contains("FNCS") {
        return match capture(&DIVISION, name) {
            Some(div) => format!("FNCS Div {div}"),
            None => "FNCS".to_string(),
        };
    }
    if name.contains("SoloVictoryCup") || name.contains("SoloSeries") {
        return "Solo Victory Cup".to_string();
    }
    if name.contains("DuosVictoryCup") {
        return "Duos Victory Cup".to_string();
    }
    if name.contains("CashCup") {
        return "Cash Cup".to_string();
    }
    if name.contains("EliteSeries") {
        return "Elite Series".to_string();
    }

    const NOISE: [&str; 6] = ["EU", "S39", "S38", "S37", "Day1", "Day2"];
    name.split('_')
        .filter(|part| !NOISE.contains(part))
        .collect::<Vec<_>>()
        .join(" ")
}

fn capture(pattern: &Regex, haystack: &str) -> Option<u32> {
    pattern
        .captures(haystack)
        .and_then(|caps| caps[1].parse().ok())
}
