use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::models::message::{InboundMessage, OutboundMessage};
use crate::services::game_service;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    /// Messages the platform should post immediately.
    pub replies: Vec<OutboundMessage>,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        // curl -X POST http://localhost:8080/api/messages -H 'Content-Type: application/json' \
        //   -d '{"channel_id":"c","author_id":"u","author_name":"n","content":"##help"}'
        .route("/", post(receive_message))
        .with_state(state)
}

async fn receive_message(
    State(state): State<AppState>,
    Json(message): Json<InboundMessage>,
) -> impl IntoResponse {
    let replies = game_service::handle_message(&state, message).await;
    (StatusCode::OK, Json(CommandResponse { replies }))
}
