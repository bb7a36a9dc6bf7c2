use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::api::state::AppState;

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub refreshed: bool,
}

/// Drop cached upstream responses so the next request refetches.
pub async fn refresh(State(state): State<AppState>) -> Json<RefreshResponse> {
    let Some(engine) = &state.engine else {
        return Json(RefreshResponse { refreshed: false });
    };
    engine.refresh().await;
    info!("Upstream cache cleared");
    Json(RefreshResponse { refreshed: true })
}
