//! Fortnite competitive API client.
//!
//! All endpoint paths and payload shapes of the upstream API live in this
//! module. Pages and event listings are decoded entry by entry, so one
//! malformed row never discards its neighbours.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{EventScope, LeaderboardSource};
use crate::fetch::{build_url, FetchError, Fetcher};
use crate::models::{EventInfo, LeaderboardEntry};

/// Cache lifetimes per endpoint.
#[derive(Debug, Clone)]
pub struct FortniteClientConfig {
    pub base_url: String,
    pub leaderboard_ttl: Duration,
    pub past_events_ttl: Duration,
    pub current_events_ttl: Duration,
}

impl Default for FortniteClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://prod.api-fortnite.com/api".to_string(),
            leaderboard_ttl: Duration::from_secs(300),
            past_events_ttl: Duration::from_secs(3600),
            current_events_ttl: Duration::from_secs(300),
        }
    }
}

/// Fortnite API client.
pub struct FortniteClient {
    fetcher: Fetcher,
    config: FortniteClientConfig,
}

impl FortniteClient {
    pub fn new(fetcher: Fetcher, config: FortniteClientConfig) -> Self {
        Self { fetcher, config }
    }

    fn ttl_for(&self, scope: EventScope) -> Duration {
        match scope {
            EventScope::Past => self.config.past_events_ttl,
            EventScope::Current => self.config.current_events_ttl,
        }
    }
}

#[async_trait]
impl LeaderboardSource for FortniteClient {
    fn name(&self) -> &'static str {
        "fortnite"
    }

    async fn leaderboard_page(
        &self,
        event_id: &str,
        window_id: &str,
        page: u32,
    ) -> Result<Vec<LeaderboardEntry>, FetchError> {
        let page_str = page.to_string();
        let url = build_url(
            &self.config.base_url,
            "v1/events/leaderboard",
            &[
                ("eventId", event_id),
                ("eventWindowId", window_id),
                ("page", page_str.as_str()),
            ],
        )?;

        let body = self.fetcher.get_json(&url, self.config.leaderboard_ttl).await?;
        let entries = parse_leaderboard_page(&body);
        debug!(
            "Fortnite: {} entries on page {} of {}/{}",
            entries.len(),
            page,
            event_id,
            window_id
        );
        Ok(entries)
    }

    async fn events(&self, scope: EventScope) -> Result<Vec<EventInfo>, FetchError> {
        let url = build_url(
            &self.config.base_url,
            &format!("v1/events/data/{}", scope.as_str()),
            &[],
        )?;

        let body = self.fetcher.get_json(&url, self.ttl_for(scope)).await?;
        let events = parse_events(&body);
        info!("Fortnite: {} {} events", events.len(), scope.as_str());
        Ok(events)
    }

    async fn invalidate(&self) {
        info!("Fortnite: clearing response cache");
        self.fetcher.clear_cache().await;
    }
}

/// Decode a leaderboard page: a bare array or an object with `entries`.
pub fn parse_leaderboard_page(body: &Value) -> Vec<LeaderboardEntry> {
    let items: &[Value] = match body {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("entries") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        },
        _ => {
            warn!("Fortnite: unexpected leaderboard payload, treating as empty page");
            &[]
        }
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Fortnite: skipping malformed leaderboard entry: {}", e);
                None
            }
        })
        .collect()
}

/// Decode an event listing: `{ "events": [...] }` or a bare array.
pub fn parse_events(body: &Value) -> Vec<EventInfo> {
    let items: &[Value] = match body {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("events") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        },
        _ => &[],
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(event) => Some(event),
            Err(e) => {
                debug!("Fortnite: skipping malformed event: {}", e);
                None
            }
        })
        .collect()
}
