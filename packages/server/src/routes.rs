use crate::state::AppState;
use axum::Router;

mod message;
mod outbound;
mod session;

pub use message::CommandResponse;
pub use outbound::OutboundStatus;
pub use session::ApiError;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .nest("/api/messages", message::routes(state.clone()))
        .nest("/api/sessions", session::routes(state.clone()))
        .nest("/api/outbound", outbound::routes(state))
}
