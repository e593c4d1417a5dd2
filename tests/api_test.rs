//! End-to-end HTTP tests over the assembled router

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use stakehouse::api::handlers::AppState;
use stakehouse::api::routes::create_router;
use stakehouse::games::payout::{PayoutEngine, RandomSource, TieredEngine};
use stakehouse::games::BetResolver;
use stakehouse::ledger::LedgerStore;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// Random source pinned to one draw so payouts are predictable
struct Fixed(f64);

impl RandomSource for Fixed {
    fn next(&self) -> f64 {
        self.0
    }
}

fn test_app(initial_balance: f64, draw: f64) -> (Router, TempDir) {
    let dir = TempDir::new().expect("temp dir");
    let store = Arc::new(LedgerStore::open(dir.path()).expect("open store"));
    let engine = Arc::new(PayoutEngine::Tiered(TieredEngine::with_defaults()));
    let resolver = Arc::new(BetResolver::new(store, engine, Arc::new(Fixed(draw))));
    let state = Arc::new(AppState {
        resolver,
        initial_balance,
    });
    (create_router(state), dir)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request failed");
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response was not JSON")
    };
    (status, body)
}

fn get(path: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

fn post(path: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn register(app: &Router) -> (String, String) {
    let (status, body) = send(app, post("/user/register", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    (
        body["user"]["id"].as_str().unwrap().to_string(),
        body["token"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_health() {
    let (app, _dir) = test_app(0.0, 0.0);
    let (status, body) = send(&app, get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Running");
}

#[tokio::test]
async fn test_full_bet_flow() {
    // Draw 0.65 -> multiplier 0.6 in the tiered table.
    let (app, _dir) = test_app(500.0, 0.65);
    let (user_id, token) = register(&app).await;

    // Start a session.
    let (status, body) = send(&app, post("/game/start", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    let game = &body["game"];
    assert_eq!(game["player_id"].as_str().unwrap(), user_id);
    assert_eq!(game["bet"].as_f64().unwrap(), 0.0);
    assert_eq!(game["win"].as_f64().unwrap(), 0.0);
    assert!(game["createdAt"].is_string());
    let game_id = game["id"].as_str().unwrap().to_string();

    // Place a bet: stake 100 at multiplier 0.6 pays floor(60) = 60.
    let (status, body) = send(
        &app,
        post(
            "/game/bet",
            Some(&token),
            Some(json!({ "gameId": game_id, "betAmount": 100.0 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let result = &body["betResult"];
    assert_eq!(result["betAmount"].as_f64().unwrap(), 100.0);
    assert_eq!(result["multiplier"].as_f64().unwrap(), 0.6);
    assert_eq!(result["winAmount"].as_f64().unwrap(), 60.0);
    assert_eq!(result["newBalance"].as_f64().unwrap(), 460.0);
    // Tiered variant carries no spatial fields.
    assert!(result.get("sinkIndex").is_none());
    assert_eq!(body["game"]["bet"].as_f64().unwrap(), 100.0);
    assert_eq!(body["game"]["win"].as_f64().unwrap(), 60.0);

    // The committed balance matches the reported one.
    let (status, body) = send(&app, get("/user/me", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["balance"].as_f64().unwrap(), 460.0);

    // History lists the session with its aggregates.
    let (status, body) = send(&app, get("/game/history", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    let games = body["games"].as_array().unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0]["id"].as_str().unwrap(), game_id);
    assert_eq!(games[0]["bet"].as_f64().unwrap(), 100.0);

    // Direct lookup.
    let (status, body) = send(&app, get(&format!("/game/{}", game_id), Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["game"]["win"].as_f64().unwrap(), 60.0);
}

#[tokio::test]
async fn test_auth_required() {
    let (app, _dir) = test_app(100.0, 0.0);

    let (status, body) = send(&app, post("/game/start", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authorization token required");

    let (status, body) = send(&app, post("/game/start", Some("deadbeef"), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid authorization token");
}

#[tokio::test]
async fn test_bet_input_validation() {
    let (app, _dir) = test_app(100.0, 0.0);
    let (_, token) = register(&app).await;
    let game_id = {
        let (_, body) = send(&app, post("/game/start", Some(&token), None)).await;
        body["game"]["id"].as_str().unwrap().to_string()
    };

    let expected = "Game ID and valid bet amount are required";
    let bad_bodies = [
        json!({}),
        json!({ "gameId": game_id }),
        json!({ "betAmount": 10.0 }),
        json!({ "gameId": "not-a-uuid", "betAmount": 10.0 }),
        json!({ "gameId": game_id, "betAmount": 0.0 }),
        json!({ "gameId": game_id, "betAmount": -5.0 }),
    ];

    for body in bad_bodies {
        let (status, response) =
            send(&app, post("/game/bet", Some(&token), Some(body.clone()))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
        assert_eq!(response["message"], expected, "body {}", body);
    }
}

#[tokio::test]
async fn test_malformed_bet_body_keeps_error_contract() {
    let (app, _dir) = test_app(100.0, 0.0);
    let (_, token) = register(&app).await;
    let game_id = {
        let (_, body) = send(&app, post("/game/start", Some(&token), None)).await;
        body["game"]["id"].as_str().unwrap().to_string()
    };

    let expected = "Game ID and valid bet amount are required";

    // A wrong-typed field fails deserialization outright rather than
    // landing in the Option-field softening.
    let (status, body) = send(
        &app,
        post(
            "/game/bet",
            Some(&token),
            Some(json!({ "gameId": game_id, "betAmount": "ten" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], expected);

    // Syntactically invalid JSON.
    let request = Request::builder()
        .method("POST")
        .uri("/game/bet")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], expected);

    // A valid JSON body without the JSON content type.
    let request = Request::builder()
        .method("POST")
        .uri("/game/bet")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(
            json!({ "gameId": game_id, "betAmount": 10.0 }).to_string(),
        ))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], expected);
}

#[tokio::test]
async fn test_insufficient_funds_leaves_balance_untouched() {
    let (app, _dir) = test_app(10.0, 0.0);
    let (_, token) = register(&app).await;
    let game_id = {
        let (_, body) = send(&app, post("/game/start", Some(&token), None)).await;
        body["game"]["id"].as_str().unwrap().to_string()
    };

    let (status, body) = send(
        &app,
        post(
            "/game/bet",
            Some(&token),
            Some(json!({ "gameId": game_id, "betAmount": 50.0 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Insufficient balance");

    let (_, body) = send(&app, get("/user/me", Some(&token))).await;
    assert_eq!(body["user"]["balance"].as_f64().unwrap(), 10.0);
}

#[tokio::test]
async fn test_foreign_game_reads_as_not_found() {
    let (app, _dir) = test_app(100.0, 0.65);
    let (_, alice_token) = register(&app).await;
    let (_, bob_token) = register(&app).await;

    let (_, body) = send(&app, post("/game/start", Some(&alice_token), None)).await;
    let alices_game = body["game"]["id"].as_str().unwrap().to_string();

    // Betting against someone else's game: 404, not 403.
    let (status, body) = send(
        &app,
        post(
            "/game/bet",
            Some(&bob_token),
            Some(json!({ "gameId": alices_game, "betAmount": 10.0 })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Game not found or doesn't belong to user");

    // Reading it leaks nothing either.
    let (status, body) = send(
        &app,
        get(&format!("/game/{}", alices_game), Some(&bob_token)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Game not found");

    // And it never shows up in bob's history.
    let (_, body) = send(&app, get("/game/history", Some(&bob_token))).await;
    assert!(body["games"].as_array().unwrap().is_empty());
}
