//! Tracked roster identities.

use serde::{Deserialize, Serialize};

/// A roster member whose results are tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedPlayer {
    /// Epic account id (stable across display name changes)
    pub id: String,

    /// Display name fragment used for fuzzy lookup
    pub username: String,

    /// Canonical label shown in rankings
    pub name: String,
}

impl TrackedPlayer {
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            name: name.into(),
        }
    }
}

/// The built-in roster used when the configuration does not provide one.
pub fn default_roster() -> Vec<TrackedPlayer> {
    vec![
        TrackedPlayer::new("d706641c93524ceba9cd195b5e287d98", "Akiira", "Akiira"),
        TrackedPlayer::new("f0d8961f20d04631a6b2abda24a17070", "MariusCOW", "MariusCOW"),
        TrackedPlayer::new("5bec82879fbf436887597f49d9bcc7c3", "Merstach", "Merstach"),
        TrackedPlayer::new("79f1994f55eb4931a148935efa188b2f", "Vanyak3k", "Vanyak3k"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roster_ids_unique() {
        let roster = default_roster();
        let mut ids: Vec<&str> = roster.iter().map(|p| p.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), roster.len());
    }

    #[test]
    fn test_tracked_player_deserialize() {
        let player: TrackedPlayer =
            toml::from_str("id = \"abc\"\nusername = \"Foo\"\nname = \"Foo Bar\"").unwrap();
        assert_eq!(player, TrackedPlayer::new("abc", "Foo", "Foo Bar"));
    }
}
