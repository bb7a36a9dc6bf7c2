use axum::extract::State;
use axum::Json;

use crate::api::state::AppState;
use crate::models::TournamentInfo;

pub async fn list_tournaments(State(state): State<AppState>) -> Json<Vec<TournamentInfo>> {
    let tournaments = match &state.engine {
        Some(engine) => engine.tournaments().await,
        None => Vec::new(),
    };
    Json(tournaments)
}
