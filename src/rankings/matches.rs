//! Match-by-match view of a player's session history.

use chrono::{DateTime, Utc};

use crate::models::{MatchDetail, RankingRecord, PLACEMENT_STAT_INDEX, SESSION_KILL_KEYS};

/// Project the record's sessions into match details, most recent first.
///
/// Per-match points are not reported upstream and are always 0.
pub fn project(record: &RankingRecord) -> Vec<MatchDetail> {
    record
        .session_history
        .iter()
        .enumerate()
        .map(|(i, session)| MatchDetail {
            match_id: session
                .session_id
                .clone()
                .unwrap_or_else(|| format!("match-{}", i)),
            points: 0,
            kills: session.first_stat(SESSION_KILL_KEYS).map_or(0, as_count),
            placement: session.stat(PLACEMENT_STAT_INDEX).map_or(0, as_count),
            time: display_time(session.end_time),
            ended_at: session.end_time,
        })
        .rev()
        .collect()
}

fn as_count(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.min(u32::MAX as f64) as u32
    } else {
        0
    }
}

fn display_time(end_time: Option<DateTime<Utc>>) -> String {
    match end_time {
        Some(t) => t.format("%H:%M:%S").to_string(),
        None => MatchDetail::TIME_UNAVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SessionRecord, TEAM_ELIMS_STAT_INDEX};
    use chrono::TimeZone;

    fn session(id: Option<&str>, minute: Option<u32>, stats: &[(&str, f64)]) -> SessionRecord {
        SessionRecord {
            session_id: id.map(str::to_string),
            end_time: minute.map(|m| Utc.with_ymd_and_hms(2026, 2, 1, 18, m, 5).unwrap()),
            tracked_stats: stats.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    fn record(sessions: Vec<SessionRecord>) -> RankingRecord {
        RankingRecord {
            matches: sessions.len() as u32,
            session_history: sessions,
            ..Default::default()
        }
    }

    #[test]
    fn test_project_reverses_order() {
        let details = project(&record(vec![
            session(Some("a"), Some(1), &[]),
            session(Some("b"), Some(20), &[]),
            session(Some("c"), Some(45), &[]),
        ]));
        let ids: Vec<&str> = details.iter().map(|d| d.match_id.as_str()).collect();

        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_project_missing_end_time() {
        let details = project(&record(vec![session(None, None, &[])]));

        assert_eq!(details.len(), 1);
        assert_eq!(details[0].time, MatchDetail::TIME_UNAVAILABLE);
        assert!(details[0].ended_at.is_none());
    }

    #[test]
    fn test_project_time_format() {
        let details = project(&record(vec![session(None, Some(7), &[])]));
        assert_eq!(details[0].time, "18:07:05");
    }

    #[test]
    fn test_project_generated_match_ids_use_source_index() {
        let details = project(&record(vec![
            session(None, None, &[]),
            session(Some("real"), None, &[]),
            session(None, None, &[]),
        ]));
        let ids: Vec<&str> = details.iter().map(|d| d.match_id.as_str()).collect();

        assert_eq!(ids, vec!["match-2", "real", "match-0"]);
    }

    #[test]
    fn test_project_kills_priority() {
        let details = project(&record(vec![
            session(None, None, &[("KILLS", 1.0), ("ELIMS", 2.0), (TEAM_ELIMS_STAT_INDEX, 6.0)]),
            session(None, None, &[("KILLS", 1.0), ("ELIMS", 2.0)]),
            session(None, None, &[("KILLS", 1.0)]),
            session(None, None, &[]),
        ]));
        let kills: Vec<u32> = details.iter().map(|d| d.kills).collect();

        assert_eq!(kills, vec![0, 1, 2, 6]);
    }

    #[test]
    fn test_project_placement_and_points() {
        let details = project(&record(vec![session(
            None,
            None,
            &[(PLACEMENT_STAT_INDEX, 3.0)],
        )]));

        assert_eq!(details[0].placement, 3);
        assert_eq!(details[0].points, 0);
    }

    #[test]
    fn test_project_empty_history() {
        assert!(project(&RankingRecord::default()).is_empty());
    }
}
