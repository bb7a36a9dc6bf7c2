//! # Roster Tracker
//!
//! Competitive Fortnite results for a fixed roster of players, per
//! tournament window and over multi-session cumulative windows.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (leaderboard rows, rankings, events, windows)
//! - **fetch**: HTTP transport with an in-memory response cache
//! - **source**: The upstream leaderboard API behind a trait
//! - **rankings**: Roster rankings per window and cumulative merges
//! - **tournaments**: Discovery and naming of selectable tournaments
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod config;
pub mod fetch;
pub mod models;
pub mod rankings;
pub mod source;
pub mod tournaments;

pub use models::*;

use std::time::Duration;

/// Parse a human-friendly duration string (e.g., "6h", "30m", "90s").
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('h') {
        (n, 3600)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1)
    } else {
        // Default to seconds
        (s, 1)
    };

    let num: u64 = num_str.parse().ok()?;
    Some(Duration::from_secs(num.checked_mul(multiplier)?))
}
