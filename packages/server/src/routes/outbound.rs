use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct OutboundStatus {
    pub pending: usize,
    pub ready: bool,
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        // curl http://localhost:8080/api/outbound
        .route("/", get(get_status))
        .with_state(state)
}

async fn get_status(State(state): State<AppState>) -> Json<OutboundStatus> {
    let outbound = state.outbound.lock().await;
    Json(OutboundStatus {
        pending: outbound.len(),
        ready: outbound.is_ready(),
    })
}
