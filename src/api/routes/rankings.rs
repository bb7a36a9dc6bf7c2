use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{Duration, Utc};
use serde::Deserialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::{MatchDetail, RankingRecord};
use crate::rankings::project;

#[derive(Debug, Deserialize)]
pub struct RankingsParams {
    /// Hide players whose latest match ended less than this many minutes ago
    pub spoiler_minutes: Option<i64>,
}

async fn rankings_for(state: &AppState, event_id: &str, window_id: &str) -> Vec<RankingRecord> {
    match &state.engine {
        Some(engine) => engine.rankings(event_id, window_id).await,
        None => Vec::new(),
    }
}

pub async fn get_rankings(
    State(state): State<AppState>,
    Path((event_id, window_id)): Path<(String, String)>,
    Query(params): Query<RankingsParams>,
) -> Result<Json<Vec<RankingRecord>>, ApiError> {
    let delay = match params.spoiler_minutes {
        Some(minutes) if minutes < 0 => {
            return Err(ApiError::BadRequest(format!(
                "spoiler_minutes must not be negative, got {}",
                minutes
            )))
        }
        Some(minutes) => Duration::try_minutes(minutes).ok_or_else(|| {
            ApiError::BadRequest(format!("spoiler_minutes out of range, got {}", minutes))
        })?,
        None => Duration::zero(),
    };

    let now = Utc::now();
    let records = rankings_for(&state, &event_id, &window_id)
        .await
        .into_iter()
        .map(|record| {
            if record.is_spoiler(delay, now) {
                record.masked()
            } else {
                record
            }
        })
        .collect();

    Ok(Json(records))
}

/// Match details of one roster player within a window.
pub async fn get_player_matches(
    State(state): State<AppState>,
    Path((event_id, window_id, account_id)): Path<(String, String, String)>,
) -> Result<Json<Vec<MatchDetail>>, ApiError> {
    let records = rankings_for(&state, &event_id, &window_id).await;
    let record = records
        .iter()
        .find(|r| r.account_id == account_id)
        .ok_or_else(|| {
            ApiError::NotFound(format!("player {} in {}/{}", account_id, event_id, window_id))
        })?;

    Ok(Json(project(record)))
}

/// Match details of a ranking record the client already holds.
pub async fn project_matches(Json(record): Json<RankingRecord>) -> Json<Vec<MatchDetail>> {
    Json(project(&record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::build_router;
    use crate::api::routes::fixtures::state_with;
    use crate::api::test_support::{get_json, post_json};
    use crate::models::{LeaderboardEntry, SessionRecord, PLACEMENT_STAT_INDEX};
    use crate::rankings::fixtures::entry;
    use crate::source::MockSource;
    use axum::http::StatusCode;
    use std::sync::Arc;

    const EVENT: &str = "epicgames_S39_CashCup_EU";
    const WINDOW: &str = "S39_CashCup_Round1_EU";

    fn entry_with_session(id: &str, name: &str, rank: u32, ended_minutes_ago: i64) -> LeaderboardEntry {
        let mut e = entry(id, name, rank, 100);
        e.session_history = vec![SessionRecord {
            session_id: Some(format!("{}-m1", id)),
            end_time: Some(Utc::now() - Duration::minutes(ended_minutes_ago)),
            tracked_stats: [(PLACEMENT_STAT_INDEX.to_string(), 4.0)].into_iter().collect(),
        }];
        e
    }

    fn source() -> Arc<MockSource> {
        Arc::new(MockSource::new().with_page(
            WINDOW,
            0,
            vec![
                entry_with_session("P1", "Akiira", 5, 2),
                entry_with_session("P2", "Marius", 9, 120),
            ],
        ))
    }

    fn uri(suffix: &str) -> String {
        format!("/api/rankings/{}/{}{}", EVENT, WINDOW, suffix)
    }

    #[tokio::test]
    async fn test_rankings_without_credential() {
        let app = build_router(AppState::without_credential(), "*");
        let (status, json) = get_json(app, &uri("")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_rankings_ordered() {
        let app = build_router(state_with(source()), "*");
        let (status, json) = get_json(app, &uri("")).await;

        assert_eq!(status, StatusCode::OK);
        let records = json.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["account_id"], "P1");
        assert_eq!(records[0]["rank"], 5);
        assert!(records[0].get("hidden").is_none());
    }

    #[tokio::test]
    async fn test_rankings_spoiler_masks_recent_players() {
        let app = build_router(state_with(source()), "*");
        let (_, json) = get_json(app, &uri("?spoiler_minutes=30")).await;
        let records = json.as_array().unwrap();

        let p1 = records.iter().find(|r| r["account_id"] == "P1").unwrap();
        assert_eq!(p1["hidden"], true);
        assert_eq!(p1["points"], 0);
        assert_eq!(p1["session_history"], serde_json::json!([]));

        let p2 = records.iter().find(|r| r["account_id"] == "P2").unwrap();
        assert!(p2.get("hidden").is_none());
        assert_eq!(p2["points"], 100);
    }

    #[tokio::test]
    async fn test_rankings_negative_spoiler_rejected() {
        let app = build_router(state_with(source()), "*");
        let (status, json) = get_json(app, &uri("?spoiler_minutes=-5")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_rankings_huge_spoiler_rejected() {
        let app = build_router(state_with(source()), "*");
        let (status, json) = get_json(app, &uri("?spoiler_minutes=9223372036854775807")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_player_matches() {
        let app = build_router(state_with(source()), "*");
        let (status, json) = get_json(app, &uri("/matches/P2")).await;

        assert_eq!(status, StatusCode::OK);
        let details = json.as_array().unwrap();
        assert_eq!(details.len(), 1);
        assert_eq!(details[0]["match_id"], "P2-m1");
        assert_eq!(details[0]["placement"], 4);
    }

    #[tokio::test]
    async fn test_player_matches_unknown_player() {
        let app = build_router(state_with(source()), "*");
        let (status, json) = get_json(app, &uri("/matches/P9")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_project_posted_record() {
        let body = serde_json::json!({
            "player": "Akiira",
            "account_id": "P1",
            "rank": 1,
            "points": 10,
            "kills": 3,
            "wins": 0,
            "matches": 2,
            "kd": 1.5,
            "damage": 800.0,
            "session_history": [
                { "sessionId": "first", "trackedStats": { "TEAM_ELIMS_STAT_INDEX": 1 } },
                { "endTime": "2026-02-01T18:30:00Z", "trackedStats": { "ELIMS": 2 } }
            ]
        });

        let app = build_router(AppState::without_credential(), "*");
        let (status, json) = post_json(app, "/api/matches", &body.to_string()).await;

        assert_eq!(status, StatusCode::OK);
        let details = json.as_array().unwrap();
        assert_eq!(details.len(), 2);
        assert_eq!(details[0]["match_id"], "match-1");
        assert_eq!(details[0]["time"], "18:30:00");
        assert_eq!(details[0]["kills"], 2);
        assert_eq!(details[1]["match_id"], "first");
        assert_eq!(details[1]["time"], "N/A");
    }
}
