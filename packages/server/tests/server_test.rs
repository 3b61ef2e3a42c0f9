use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use mafia_server::{
    app,
    models::{game::Game, persisted::PersistedData, phase::GamePhase},
    routes::{CommandResponse, OutboundStatus},
    utils::test_setup::{test_state_with, TestHarness},
};
use serde_json::{json, Value};
use tower::ServiceExt;

fn activated() -> TestHarness {
    test_state_with(PersistedData {
        channels_activated: vec!["general".to_string()],
        ..PersistedData::default()
    })
}

async fn post_message(app: &Router, author_id: &str, content: &str) -> (StatusCode, Value) {
    let payload = json!({
        "channel_id": "general",
        "author_id": author_id,
        "author_name": author_id,
        "content": content,
    });
    let request = Request::builder()
        .method("POST")
        .uri("/api/messages")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

#[tokio::test]
async fn test_message_returns_direct_replies() {
    let harness = activated();
    let app = app::create_app(harness.state.clone());

    let (status, body) = post_message(&app, "host", "##creategame").await;
    assert_eq!(status, StatusCode::OK);
    let response: CommandResponse = serde_json::from_value(body).unwrap();
    assert_eq!(response.replies.len(), 1);
    assert_eq!(response.replies[0].channel_id, "general");
    assert_eq!(
        response.replies[0].content,
        "Starting a game of mafia in <#general> hosted by <@host>!"
    );
}

#[tokio::test]
async fn test_plain_chatter_gets_no_reply() {
    let harness = activated();
    let app = app::create_app(harness.state.clone());

    let (status, body) = post_message(&app, "someone", "good morning").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "replies": [] }));
}

#[tokio::test]
async fn test_malformed_message_is_rejected() {
    let harness = activated();
    let app = app::create_app(harness.state.clone());

    let request = Request::builder()
        .method("POST")
        .uri("/api/messages")
        .header("content-type", "application/json")
        .body(Body::from(r###"{"content":"##help"}"###))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_get_session() {
    let harness = activated();
    let app = app::create_app(harness.state.clone());

    let (status, body) = get(&app, "/api/sessions/general").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "no game is running in channel general");

    post_message(&app, "host", "##creategame").await;
    let (status, body) = get(&app, "/api/sessions/general").await;
    assert_eq!(status, StatusCode::OK);
    let game: Game = serde_json::from_value(body).unwrap();
    assert_eq!(game.host_id, "host");
    assert_eq!(game.phase, GamePhase::Init);
    assert_eq!(game.day, 0);
}

#[tokio::test]
async fn test_outbound_status() {
    let harness = activated();
    let app = app::create_app(harness.state.clone());

    let (status, body) = get(&app, "/api/outbound").await;
    assert_eq!(status, StatusCode::OK);
    let outbound: OutboundStatus = serde_json::from_value(body).unwrap();
    assert_eq!(outbound.pending, 0);
    assert!(outbound.ready);

    post_message(&app, "host", "##creategame").await;
    post_message(&app, "host", "##players").await;
    let (_, body) = get(&app, "/api/outbound").await;
    let outbound: OutboundStatus = serde_json::from_value(body).unwrap();
    assert_eq!(outbound.pending, 1);
}
