//! Request handlers
//!
//! Thin translation layer between the HTTP surface and the wagering
//! core: parse and validate the wire shape, call the resolver, map
//! the result. All identity comes from the auth middleware.

use super::{auth::AuthUser, errors::ApiError, models::*};
use crate::errors::WagerError;
use crate::games::resolver::BetResolver;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Extension, Json,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

const DEFAULT_HISTORY_LIMIT: usize = 10;
const MAX_HISTORY_LIMIT: usize = 100;

/// Shared application state
pub struct AppState {
    pub resolver: Arc<BetResolver>,
    /// Balance credited to each newly registered user
    pub initial_balance: f64,
}

/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Running".to_string(),
    })
}

/// POST /user/register
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let (user, token) = state
        .resolver
        .store()
        .create_user(state.initial_balance)?;

    info!(user_id = %user.id, balance = user.balance, "user registered");
    Ok(Json(RegisterResponse {
        user: user.into(),
        token,
    }))
}

/// GET /user/me
pub async fn me_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.resolver.get_user(user_id)?;
    Ok(Json(UserResponse { user: user.into() }))
}

/// POST /game/start
pub async fn start_game_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<GameResponse>, ApiError> {
    let game = state.resolver.start_game(user_id)?;
    Ok(Json(GameResponse { game: game.into() }))
}

/// POST /game/bet
pub async fn bet_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    payload: Result<Json<BetRequest>, JsonRejection>,
) -> Result<Json<BetResponse>, ApiError> {
    // Every malformed request collapses into the one contract message,
    // whether the body fails to parse at all, a field carries the
    // wrong type, or a field is missing.
    let invalid =
        || WagerError::invalid_input("Game ID and valid bet amount are required");

    let Json(request) = payload.map_err(|_| invalid())?;

    let game_id = request
        .game_id
        .as_deref()
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .ok_or_else(invalid)?;
    let stake = request.bet_amount.ok_or_else(invalid)?;

    let resolved = state.resolver.resolve_bet(user_id, game_id, stake)?;
    Ok(Json(resolved.into()))
}

/// GET /game/history?limit&offset
pub async fn history_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .min(MAX_HISTORY_LIMIT);
    let offset = query.offset.unwrap_or(0);

    let games = state.resolver.list_games(user_id, limit, offset)?;
    Ok(Json(HistoryResponse {
        games: games.into_iter().map(Into::into).collect(),
    }))
}

/// GET /game/:gameId
pub async fn get_game_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(game_id): Path<String>,
) -> Result<Json<GameResponse>, ApiError> {
    // An unparseable id is indistinguishable from an absent game.
    let game_id = Uuid::parse_str(&game_id)
        .map_err(|_| WagerError::not_found("Game not found"))?;

    let game = state.resolver.get_game(user_id, game_id)?;
    Ok(Json(GameResponse { game: game.into() }))
}
