//! Integration tests for the HTTP surface and the shared room state.
//!
//! HTTP tests use Axum's `Router` directly via `tower::ServiceExt`
//! without starting a TCP server. Session tests drive [`AppState`] the
//! way socket tasks do, reading each connection's outbox.

#![allow(clippy::unwrap_used, clippy::unreachable)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use bingo_server::build_router;
use bingo_server::config::RoomConfig;
use bingo_server::state::AppState;
use bingo_types::ServerMessage;
use serde_json::Value;
use tokio::sync::mpsc::Receiver;
use tower::ServiceExt;

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn drain(rx: &mut Receiver<ServerMessage>) -> Vec<ServerMessage> {
    let mut out = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        out.push(msg);
    }
    out
}

const JOIN_3X3: &str = r#"{"event":"join","data":{"name":"Alice","boardSize":3,"boardData":[["a","b","c"],["d","e","f"],["g","h","i"]]}}"#;

fn mark_frame(row: usize, col: usize, text: &str) -> String {
    format!(r#"{{"event":"markCell","data":{{"row":{row},"col":{col},"cellText":"{text}"}}}}"#)
}

// =========================================================================
// HTTP
// =========================================================================

#[tokio::test]
async fn test_status_reports_empty_room() {
    let router = build_router(Arc::new(AppState::default()));

    let response = router
        .oneshot(Request::get("/api/status").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["message"], "bingo room server is running");
    assert_eq!(json["players"], 0);
    assert_eq!(json["connections"], 0);
    assert_eq!(json["history"], 0);
}

#[tokio::test]
async fn test_status_counts_players_and_history() {
    let state = Arc::new(AppState::default());
    let (id, _rx) = state.connect().await;
    state.handle_frame(id, JOIN_3X3).await;
    state.handle_frame(id, &mark_frame(0, 0, "a")).await;

    let response = build_router(Arc::clone(&state))
        .oneshot(Request::get("/api/status").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["players"], 1);
    assert_eq!(json["connections"], 1);
    assert_eq!(json["history"], 1);
}

#[tokio::test]
async fn test_post_is_method_not_allowed() {
    let router = build_router(Arc::new(AppState::default()));

    let response = router
        .oneshot(Request::post("/api/status").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_socket_without_upgrade_is_rejected() {
    let router = build_router(Arc::new(AppState::default()));

    let response = router
        .oneshot(Request::get("/api/socket").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let router = build_router(Arc::new(AppState::default()));

    let response = router
        .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =========================================================================
// Sessions
// =========================================================================

#[tokio::test]
async fn test_join_is_broadcast_to_everyone() {
    let state = AppState::default();
    let (a, mut rx_a) = state.connect().await;
    let (_b, mut rx_b) = state.connect().await;
    drain(&mut rx_a);
    drain(&mut rx_b);

    state.handle_frame(a, JOIN_3X3).await;

    for rx in [&mut rx_a, &mut rx_b] {
        let events = drain(rx);
        let [ServerMessage::PlayerJoined(player)] = events.as_slice() else {
            unreachable!("expected a single playerJoined, got {events:?}");
        };
        assert_eq!(player.id, a);
        assert_eq!(player.name, "Alice");
    }
}

#[tokio::test]
async fn test_malformed_frames_change_nothing() {
    let state = AppState::default();
    let (a, mut rx) = state.connect().await;
    state.handle_frame(a, JOIN_3X3).await;
    drain(&mut rx);

    state.handle_frame(a, "garbage").await;
    state.handle_frame(a, r#"{"event":"markCell","data":{"row":0}}"#).await;
    state.handle_frame(a, &mark_frame(5, 5, "x")).await;

    assert!(drain(&mut rx).is_empty());
    let status = state.status().await;
    assert_eq!(status.players, 1);
    assert_eq!(status.history, 0);
}

#[tokio::test]
async fn test_oversized_board_is_not_joined() {
    let state = AppState::new(&RoomConfig {
        max_board_size: 5,
        ..RoomConfig::default()
    });
    let (a, mut rx) = state.connect().await;
    drain(&mut rx);

    state
        .handle_frame(
            a,
            r#"{"event":"join","data":{"name":"Huge","boardSize":6,"boardData":[]}}"#,
        )
        .await;

    assert!(drain(&mut rx).is_empty());
    assert_eq!(state.status().await.players, 0);
}

#[tokio::test]
async fn test_diagonal_win_through_frames() {
    let state = AppState::default();
    let (a, mut rx) = state.connect().await;
    state.handle_frame(a, JOIN_3X3).await;
    drain(&mut rx);

    for (i, text) in ["a", "e", "i"].into_iter().enumerate() {
        state.handle_frame(a, &mark_frame(i, i, text)).await;
    }

    let events = drain(&mut rx);
    assert_eq!(events.len(), 4);
    assert!(matches!(
        events.last(),
        Some(ServerMessage::PlayerWon(won)) if won.player_id == a && won.player_name == "Alice"
    ));
    assert!(state.room().await.registry().get(a).unwrap().has_won);
}

#[tokio::test]
async fn test_disconnect_announces_departure() {
    let state = AppState::default();
    let (a, _rx_a) = state.connect().await;
    let (_b, mut rx_b) = state.connect().await;
    state.handle_frame(a, JOIN_3X3).await;
    drain(&mut rx_b);

    state.disconnect(a).await;

    assert_eq!(drain(&mut rx_b), vec![ServerMessage::PlayerLeft(a)]);
    let status = state.status().await;
    assert_eq!(status.players, 0);
    assert_eq!(status.connections, 1);
}

#[tokio::test]
async fn test_bounded_history_from_config() {
    let state = AppState::new(&RoomConfig {
        history_limit: Some(1),
        ..RoomConfig::default()
    });
    let (a, _rx) = state.connect().await;
    state.handle_frame(a, JOIN_3X3).await;
    state.handle_frame(a, &mark_frame(0, 0, "a")).await;
    state.handle_frame(a, &mark_frame(0, 1, "b")).await;

    let snapshot = state.room().await.registry().snapshot();
    assert_eq!(snapshot.mark_history.len(), 1);
    assert_eq!(
        snapshot.mark_history.first().map(|e| e.cell_text.as_str()),
        Some("b")
    );
}

#[tokio::test]
async fn test_stalled_connection_is_evicted_and_announced() {
    let state = AppState::new(&RoomConfig {
        outbox_capacity: 4,
        ..RoomConfig::default()
    });
    let (a, mut rx_a) = state.connect().await;
    let (b, _rx_b) = state.connect().await;
    state.handle_frame(a, JOIN_3X3).await;
    state.handle_frame(b, JOIN_3X3).await;
    drain(&mut rx_a);

    for round in 0..20 {
        state.handle_frame(a, &mark_frame(1, 1, "e")).await;
        assert_eq!(drain(&mut rx_a).len(), 1, "round {round}");
    }
    assert_eq!(state.status().await.connections, 1);

    // The socket task sees its outbox close and tears the connection down.
    state.disconnect(b).await;
    assert_eq!(drain(&mut rx_a), vec![ServerMessage::PlayerLeft(b)]);
    assert_eq!(state.status().await.players, 1);
}
