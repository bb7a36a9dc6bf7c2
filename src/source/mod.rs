//! Upstream leaderboard sources.
//!
//! The ranking engine only talks to the upstream API through the
//! [`LeaderboardSource`] trait, so tests can script pages and failures.

pub mod fortnite;

use async_trait::async_trait;

use crate::fetch::FetchError;
use crate::models::{EventInfo, LeaderboardEntry};

pub use fortnite::{FortniteClient, FortniteClientConfig};

/// Which event metadata listing to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventScope {
    Past,
    Current,
}

impl EventScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventScope::Past => "past",
            EventScope::Current => "current",
        }
    }
}

/// Trait for upstream leaderboard APIs.
#[async_trait]
pub trait LeaderboardSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &'static str;

    /// One page of a window's leaderboard, in rank order.
    async fn leaderboard_page(
        &self,
        event_id: &str,
        window_id: &str,
        page: u32,
    ) -> Result<Vec<LeaderboardEntry>, FetchError>;

    /// Event metadata, including each event's windows.
    async fn events(&self, scope: EventScope) -> Result<Vec<EventInfo>, FetchError>;

    /// Discard any cached upstream data.
    async fn invalidate(&self) {}
}

#[cfg(test)]
pub use mock::MockSource;
