//! HTTP fetching with caching.
//!
//! Fetches JSON documents from the leaderboard API, attaching the API key
//! to every request. Responses are kept in an in-memory cache with a
//! per-request time-to-live, so repeated lookups within the TTL do not hit
//! the network. Cached and fresh responses are indistinguishable to callers.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};
use url::Url;

/// Header carrying the API credential.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Errors that can occur during fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    #[error("Rate limited by {host}, retry after {retry_after_secs}s")]
    RateLimited { host: String, retry_after_secs: u64 },

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Opaque API credential, sent as `x-api-key`
    pub api_key: String,

    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            timeout: Duration::from_secs(30),
            user_agent: format!("roster-tracker/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// A cached JSON response.
#[derive(Debug, Clone)]
struct CacheEntry {
    fetched_at: Instant,

    /// Lifetime requested when the entry was stored
    ttl: Duration,
    body: serde_json::Value,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.fetched_at) <= ttl
    }

    fn is_expired(&self, now: Instant) -> bool {
        !self.is_fresh(self.ttl, now)
    }
}

/// Insert `entry` under `key`, dropping entries past their own lifetime.
fn store(cache: &mut HashMap<String, CacheEntry>, key: String, entry: CacheEntry, now: Instant) {
    let before = cache.len();
    cache.retain(|_, e| !e.is_expired(now));
    if cache.len() < before {
        debug!("Pruned {} expired cache entries", before - cache.len());
    }
    cache.insert(key, entry);
}

/// HTTP fetcher with an in-memory response cache.
pub struct Fetcher {
    client: Client,
    cache: RwLock<HashMap<String, CacheEntry>>,
}

impl Fetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("roster-tracker")),
        );
        let mut api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| FetchError::InvalidApiKey(e.to_string()))?;
        api_key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, api_key);

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Fetch a JSON document, serving it from cache if younger than `ttl`.
    pub async fn get_json(&self, url: &Url, ttl: Duration) -> Result<serde_json::Value, FetchError> {
        if let Some(body) = self.check_cache(url, ttl).await {
            return Ok(body);
        }
        self.fetch_and_cache(url, ttl).await
    }

    /// Drop every cached response.
    pub async fn clear_cache(&self) {
        self.cache.write().await.clear();
    }

    async fn check_cache(&self, url: &Url, ttl: Duration) -> Option<serde_json::Value> {
        let cache = self.cache.read().await;
        let entry = cache.get(url.as_str())?;

        if !entry.is_fresh(ttl, Instant::now()) {
            debug!("Cache expired for {}", url);
            return None;
        }

        debug!("Serving {} from cache", url);
        Some(entry.body.clone())
    }

    async fn fetch_and_cache(
        &self,
        url: &Url,
        ttl: Duration,
    ) -> Result<serde_json::Value, FetchError> {
        info!("Fetching {}", url);

        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);

            return Err(FetchError::RateLimited {
                host: url.host_str().unwrap_or("unknown").to_string(),
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let bytes = response.bytes().await?;
        let body: serde_json::Value = serde_json::from_slice(&bytes)?;

        let now = Instant::now();
        store(
            &mut *self.cache.write().await,
            url.to_string(),
            CacheEntry {
                fetched_at: now,
                ttl,
                body: body.clone(),
            },
            now,
        );

        Ok(body)
    }
}

/// Join `path` onto `base` and append query parameters.
pub fn build_url(base: &str, path: &str, query: &[(&str, &str)]) -> Result<Url, FetchError> {
    let raw = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let mut url =
        Url::parse(&raw).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", raw, e)))?;
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_with_query() {
        let url = build_url(
            "https://prod.api-fortnite.com/api/",
            "/v1/events/leaderboard",
            &[("eventId", "e1"), ("eventWindowId", "w 1"), ("page", "3")],
        )
        .unwrap();

        assert_eq!(
            url.as_str(),
            "https://prod.api-fortnite.com/api/v1/events/leaderboard?eventId=e1&eventWindowId=w+1&page=3"
        );
    }

    #[test]
    fn test_build_url_without_query() {
        let url = build_url("https://example.com/api", "v1/events/data/past", &[]).unwrap();
        assert_eq!(url.as_str(), "https://example.com/api/v1/events/data/past");
        assert!(url.query().is_none());
    }

    #[test]
    fn test_build_url_invalid() {
        assert!(matches!(
            build_url("not a base", "x", &[]),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_cache_entry_freshness() {
        let fetched_at = Instant::now();
        let entry = CacheEntry {
            fetched_at,
            ttl: Duration::from_secs(300),
            body: serde_json::Value::Null,
        };
        let ttl = Duration::from_secs(300);

        assert!(entry.is_fresh(ttl, fetched_at));
        assert!(entry.is_fresh(ttl, fetched_at + Duration::from_secs(300)));
        assert!(!entry.is_fresh(ttl, fetched_at + Duration::from_secs(301)));
    }

    #[test]
    fn test_store_prunes_expired_entries() {
        let start = Instant::now();
        let entry = |ttl_secs: u64| CacheEntry {
            fetched_at: start,
            ttl: Duration::from_secs(ttl_secs),
            body: serde_json::Value::Null,
        };
        let mut cache = HashMap::new();
        store(&mut cache, "short".to_string(), entry(10), start);
        store(&mut cache, "long".to_string(), entry(3600), start);

        store(
            &mut cache,
            "new".to_string(),
            entry(60),
            start + Duration::from_secs(11),
        );

        assert!(!cache.contains_key("short"));
        assert!(cache.contains_key("long"));
        assert!(cache.contains_key("new"));
    }

    #[test]
    fn test_fetcher_config_default() {
        let config = FetcherConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("roster-tracker/"));
    }

    #[test]
    fn test_fetcher_rejects_unprintable_api_key() {
        let config = FetcherConfig {
            api_key: "bad\nkey".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            Fetcher::new(config),
            Err(FetchError::InvalidApiKey(_))
        ));
    }

    #[tokio::test]
    async fn test_clear_cache() {
        let fetcher = Fetcher::new(FetcherConfig {
            api_key: "key".to_string(),
            ..Default::default()
        })
        .unwrap();
        let url = Url::parse("https://example.com/a").unwrap();
        fetcher.cache.write().await.insert(
            url.to_string(),
            CacheEntry {
                fetched_at: Instant::now(),
                ttl: Duration::from_secs(60),
                body: serde_json::json!({ "ok": true }),
            },
        );

        assert!(fetcher.check_cache(&url, Duration::from_secs(60)).await.is_some());
        fetcher.clear_cache().await;
        assert!(fetcher.check_cache(&url, Duration::from_secs(60)).await.is_none());
    }
}
