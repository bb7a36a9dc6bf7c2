//! Per-player statistics extracted from a leaderboard entry.

use std::collections::BTreeMap;

use crate::models::{
    BreakdownItem, LeaderboardEntry, RankingRecord, SessionRecord, TrackedPlayer,
    KILL_BREAKDOWN_KEYS,
};

/// Build the ranking record of `player` from the entry they were matched in.
pub fn extract(entry: &LeaderboardEntry, player: &TrackedPlayer) -> RankingRecord {
    RankingRecord {
        player: player.name.clone(),
        account_id: player.id.clone(),
        rank: entry.rank,
        points: entry.points_earned,
        kills: count_kills(&entry.point_breakdown),
        wins: count_wins(&entry.session_history),
        matches: entry.session_history.len() as u32,
        kd: entry.kd,
        damage: entry.damage_dealt,
        session_history: entry.session_history.clone(),
        hidden: false,
    }
}

/// Sum of `timesAchieved` over breakdown keys naming an elimination stat.
pub fn count_kills(breakdown: &BTreeMap<String, BreakdownItem>) -> u32 {
    breakdown
        .iter()
        .filter(|(key, _)| KILL_BREAKDOWN_KEYS.iter().any(|k| key.contains(k)))
        .map(|(_, item)| item.times_achieved)
        .fold(0u32, u32::saturating_add)
}

/// Number of sessions that ended in a win.
pub fn count_wins(sessions: &[SessionRecord]) -> u32 {
    sessions.iter().filter(|s| s.is_win()).count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PLACEMENT_STAT_INDEX, VICTORY_ROYALE_STAT};
    use serde_json::json;

    fn player() -> TrackedPlayer {
        TrackedPlayer::new("p1", "Akiira", "Akiira")
    }

    fn session(stats: &[(&str, f64)]) -> SessionRecord {
        SessionRecord {
            tracked_stats: stats.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_kills_ignore_unrecognized_keys() {
        let entry: LeaderboardEntry = serde_json::from_value(json!({
            "pointBreakdown": {
                "TEAM_ELIMS": { "timesAchieved": 4 },
                "DAMAGE": { "timesAchieved": 900 }
            }
        }))
        .unwrap();

        assert_eq!(extract(&entry, &player()).kills, 4);
    }

    #[test]
    fn test_kills_sum_over_recognized_keys() {
        let entry: LeaderboardEntry = serde_json::from_value(json!({
            "pointBreakdown": {
                "TEAM_ELIMS_STAT_INDEX:1": { "timesAchieved": 3 },
                "KILLS:2": { "timesAchieved": 2 },
                "PLACEMENT_STAT_INDEX:10": { "timesAchieved": 6 }
            }
        }))
        .unwrap();

        assert_eq!(count_kills(&entry.point_breakdown), 5);
    }

    #[test]
    fn test_kills_key_match_is_case_sensitive() {
        let entry: LeaderboardEntry = serde_json::from_value(json!({
            "pointBreakdown": { "team_elims": { "timesAchieved": 4 } }
        }))
        .unwrap();

        assert_eq!(count_kills(&entry.point_breakdown), 0);
    }

    #[test]
    fn test_wins_no_double_count() {
        let sessions = vec![
            session(&[(VICTORY_ROYALE_STAT, 1.0), (PLACEMENT_STAT_INDEX, 1.0)]),
            session(&[(PLACEMENT_STAT_INDEX, 1.0)]),
            session(&[(VICTORY_ROYALE_STAT, 1.0)]),
            session(&[(PLACEMENT_STAT_INDEX, 2.0)]),
            session(&[]),
        ];
        assert_eq!(count_wins(&sessions), 3);
    }

    #[test]
    fn test_extract_copies_entry_fields() {
        let entry = LeaderboardEntry {
            team_account_ids: vec!["p1".to_string()],
            rank: 42,
            points_earned: 1500,
            kd: 2.25,
            damage_dealt: 3100.0,
            session_history: vec![session(&[(PLACEMENT_STAT_INDEX, 1.0)]), session(&[])],
            ..Default::default()
        };
        let record = extract(&entry, &player());

        assert_eq!(record.player, "Akiira");
        assert_eq!(record.account_id, "p1");
        assert_eq!(record.rank, 42);
        assert_eq!(record.points, 1500);
        assert_eq!(record.matches, 2);
        assert_eq!(record.wins, 1);
        assert_eq!(record.kd, 2.25);
        assert_eq!(record.damage, 3100.0);
        assert_eq!(record.session_history.len(), 2);
    }

    #[test]
    fn test_extract_absent_fields_default_to_zero() {
        let record = extract(&LeaderboardEntry::default(), &player());

        assert_eq!(record.rank, 0);
        assert_eq!(record.points, 0);
        assert_eq!(record.kills, 0);
        assert_eq!(record.wins, 0);
        assert_eq!(record.matches, 0);
        assert!(record.session_history.is_empty());
    }
}
