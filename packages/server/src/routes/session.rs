use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::models::game::Game;
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("no game is running in channel {0}")]
    SessionNotFound(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        };
        let body = Json(serde_json::json!({
            "error": self.to_string()
        }));
        (status, body).into_response()
    }
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        // curl http://localhost:8080/api/sessions/{channel_id}
        .route("/:channel_id", get(get_session))
        .with_state(state)
}

async fn get_session(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> Result<Json<Game>, ApiError> {
    let sessions = state.sessions.lock().await;
    sessions
        .find(&channel_id)
        .cloned()
        .map(Json)
        .ok_or(ApiError::SessionNotFound(channel_id))
}
