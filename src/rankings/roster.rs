//! Roster identity matching against noisy team compositions.

use crate::models::{LeaderboardEntry, TrackedPlayer};

/// The first roster player that `entry` belongs to, in roster order.
///
/// A player is claimed by an entry if their account id is one of the
/// team's account ids, or if their username appears (case-insensitively)
/// inside any team display name.
pub fn match_player<'r>(
    entry: &LeaderboardEntry,
    roster: &'r [TrackedPlayer],
) -> Option<&'r TrackedPlayer> {
    roster.iter().find(|player| claims(entry, player))
}

fn claims(entry: &LeaderboardEntry, player: &TrackedPlayer) -> bool {
    if entry.team_account_ids.iter().any(|id| *id == player.id) {
        return true;
    }

    // An empty username would be a substring of every name.
    let username = player.username.to_lowercase();
    if username.is_empty() {
        return false;
    }
    entry
        .team_account_display_names
        .iter()
        .any(|name| name.to_lowercase().contains(&username))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<TrackedPlayer> {
        vec![
            TrackedPlayer::new("id-akiira", "Akiira", "Akiira"),
            TrackedPlayer::new("id-marius", "MariusCOW", "Marius"),
        ]
    }

    fn team(ids: &[&str], names: &[&str]) -> LeaderboardEntry {
        LeaderboardEntry {
            team_account_ids: ids.iter().map(|s| s.to_string()).collect(),
            team_account_display_names: names.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_match_by_account_id() {
        let roster = roster();
        let entry = team(&["other", "id-marius"], &["x", "y"]);
        assert_eq!(match_player(&entry, &roster).unwrap().id, "id-marius");
    }

    #[test]
    fn test_match_by_display_name_case_insensitive() {
        let roster = roster();
        let entry = team(&["other"], &["TTV AKIIRA 7"]);
        assert_eq!(match_player(&entry, &roster).unwrap().id, "id-akiira");
    }

    #[test]
    fn test_no_match() {
        let roster = roster();
        let entry = team(&["a", "b"], &["Somebody", "Else"]);
        assert!(match_player(&entry, &roster).is_none());
    }

    #[test]
    fn test_empty_team_arrays() {
        let roster = roster();
        assert!(match_player(&LeaderboardEntry::default(), &roster).is_none());
    }

    #[test]
    fn test_empty_roster() {
        let entry = team(&["id-akiira"], &["Akiira"]);
        assert!(match_player(&entry, &[]).is_none());
    }

    #[test]
    fn test_first_roster_player_wins() {
        let roster = roster();
        // Both roster players are on this team; roster order decides.
        let entry = team(&["id-marius"], &["Akiira"]);
        assert_eq!(match_player(&entry, &roster).unwrap().id, "id-akiira");
    }

    #[test]
    fn test_empty_username_never_matches_by_name() {
        let roster = vec![TrackedPlayer::new("id-x", "", "Nameless")];
        let entry = team(&[], &["Anyone"]);
        assert!(match_player(&entry, &roster).is_none());
    }
}
