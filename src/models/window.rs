//! Window identifiers: real upstream windows vs. synthetic cumulative ones.
//!
//! A cumulative window id has no upstream existence. It is built by
//! convention (`<eventId>_Week<N>_Cumulative`, `<eventId>_PlayIn_Cumulative`,
//! `<eventId>_Opens_Cumulative`) and classified exactly once, here, into a
//! [`WindowFamily`] that names the pair of real windows to sum.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Suffix marking a synthetic cumulative window id.
pub const CUMULATIVE_SUFFIX: &str = "_Cumulative";

static WEEK_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Week(\d+)").expect("week pattern is valid"));

/// The closed set of cumulative window families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "family", content = "week", rename_all = "snake_case")]
pub enum WindowFamily {
    /// Week N Day 1 + Week N Day 2
    WeeklyCumulative(u32),
    /// Play-In Day 1 + Play-In Day 2
    PlayInCumulative,
    /// Open 1 + Open 2
    OpensCumulative,
}

impl WindowFamily {
    /// Window id fragments of the constituent real windows, in play order.
    pub fn constituent_patterns(&self) -> [String; 2] {
        match self {
            WindowFamily::WeeklyCumulative(week) => {
                [format!("Week{week}Day1"), format!("Week{week}Day2")]
            }
            WindowFamily::PlayInCumulative => ["PlayInDay1".to_string(), "PlayInDay2".to_string()],
            WindowFamily::OpensCumulative => ["Open1".to_string(), "Open2".to_string()],
        }
    }

    /// The synthetic window id for this family within `event_id`.
    pub fn synthetic_id(&self, event_id: &str) -> String {
        match self {
            WindowFamily::WeeklyCumulative(week) => {
                format!("{event_id}_Week{week}{CUMULATIVE_SUFFIX}")
            }
            WindowFamily::PlayInCumulative => format!("{event_id}_PlayIn{CUMULATIVE_SUFFIX}"),
            WindowFamily::OpensCumulative => format!("{event_id}_Opens{CUMULATIVE_SUFFIX}"),
        }
    }

    /// Human readable label for tournament listings.
    pub fn label(&self) -> String {
        match self {
            WindowFamily::WeeklyCumulative(week) => format!("FNCS Div 1 - Week {week} (Cumulative)"),
            WindowFamily::PlayInCumulative => "Elite Series - Play-In (Cumulative)".to_string(),
            WindowFamily::OpensCumulative => "Elite Series - Open (Cumulative)".to_string(),
        }
    }
}

impl fmt::Display for WindowFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowFamily::WeeklyCumulative(week) => write!(f, "week-{}", week),
            WindowFamily::PlayInCumulative => write!(f, "play-in"),
            WindowFamily::OpensCumulative => write!(f, "opens"),
        }
    }
}

/// A classified window id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowRef {
    /// An upstream-defined window, fetched as is.
    Real(String),
    /// A synthetic window summing the constituents of a family.
    Cumulative(WindowFamily),
    /// Carries the cumulative suffix but matches no known family.
    UnknownCumulative(String),
}

impl WindowRef {
    /// Classify a window id.
    pub fn classify(window_id: &str) -> Self {
        let Some(stem) = window_id.strip_suffix(CUMULATIVE_SUFFIX) else {
            return WindowRef::Real(window_id.to_string());
        };

        // The family token is the last segment; the event id before it may
        // itself contain "PlayIn" or "Week".
        let token = stem.rsplit('_').next().unwrap_or(stem);
        match token {
            "PlayIn" => WindowRef::Cumulative(WindowFamily::PlayInCumulative),
            "Opens" => WindowRef::Cumulative(WindowFamily::OpensCumulative),
            _ => match token
                .strip_prefix("Week")
                .and_then(|n| n.parse::<u32>().ok())
            {
                Some(week) => WindowRef::Cumulative(WindowFamily::WeeklyCumulative(week)),
                None => WindowRef::UnknownCumulative(window_id.to_string()),
            },
        }
    }
}

/// Week numbers referenced by a set of window ids, ascending and unique.
pub fn week_numbers<'a>(window_ids: impl IntoIterator<Item = &'a str>) -> Vec<u32> {
    let mut weeks: Vec<u32> = window_ids
        .into_iter()
        .filter_map(|id| WEEK_NUMBER.captures(id))
        .filter_map(|caps| caps[1].parse().ok())
        .collect();
    weeks.sort_unstable();
    weeks.dedup();
    weeks
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENT: &str = "epicgames_S39_FNCSDivisionalCup_Division1_EU";

    #[test]
    fn test_classify_real() {
        assert_eq!(
            WindowRef::classify("S39_FNCSDivisionalCup_Week2Day1_EU"),
            WindowRef::Real("S39_FNCSDivisionalCup_Week2Day1_EU".to_string())
        );
    }

    #[test]
    fn test_classify_cumulative_families() {
        assert_eq!(
            WindowRef::classify(&format!("{EVENT}_Week2_Cumulative")),
            WindowRef::Cumulative(WindowFamily::WeeklyCumulative(2))
        );
        assert_eq!(
            WindowRef::classify("epicgames_EliteSeries_PlayIn_EU_PlayIn_Cumulative"),
            WindowRef::Cumulative(WindowFamily::PlayInCumulative)
        );
        assert_eq!(
            WindowRef::classify("epicgames_EliteSeries_EU_Opens_Cumulative"),
            WindowRef::Cumulative(WindowFamily::OpensCumulative)
        );
    }

    #[test]
    fn test_classify_uses_family_token_not_event_id() {
        assert_eq!(
            WindowRef::classify("epicgames_EliteSeries_PlayIn_EU_Opens_Cumulative"),
            WindowRef::Cumulative(WindowFamily::OpensCumulative)
        );
    }

    #[test]
    fn test_classify_unknown_cumulative() {
        assert_eq!(
            WindowRef::classify("something_Cumulative"),
            WindowRef::UnknownCumulative("something_Cumulative".to_string())
        );
    }

    #[test]
    fn test_synthetic_id_round_trips_through_classify() {
        for family in [
            WindowFamily::WeeklyCumulative(11),
            WindowFamily::PlayInCumulative,
            WindowFamily::OpensCumulative,
        ] {
            let id = family.synthetic_id("epicgames_EU_Event");
            assert_eq!(WindowRef::classify(&id), WindowRef::Cumulative(family));
        }
    }

    #[test]
    fn test_constituent_patterns() {
        assert_eq!(
            WindowFamily::WeeklyCumulative(3).constituent_patterns(),
            ["Week3Day1".to_string(), "Week3Day2".to_string()]
        );
        assert_eq!(
            WindowFamily::OpensCumulative.constituent_patterns(),
            ["Open1".to_string(), "Open2".to_string()]
        );
    }

    #[test]
    fn test_week_numbers() {
        let ids = ["W_Week2Day1", "W_Week2Day2", "W_Week1Day1", "W_Final", "W_Week10Day2"];
        assert_eq!(week_numbers(ids), vec![1, 2, 10]);
    }

    #[test]
    fn test_family_display() {
        assert_eq!(WindowFamily::WeeklyCumulative(4).to_string(), "week-4");
        assert_eq!(WindowFamily::PlayInCumulative.to_string(), "play-in");
    }
}
