use crate::routes;
use crate::state::AppState;
use axum::{http, Router};
use tower_http::trace::TraceLayer;

pub fn create_app(state: AppState) -> Router {
    routes::create_routes(state).layer(
        TraceLayer::new_for_http().make_span_with(|request: &http::Request<_>| {
            tracing::info_span!(
                "HTTP request",
                method = %request.method(),
                uri = %request.uri(),
            )
        }),
    )
}
