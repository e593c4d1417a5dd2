//! Route definitions
//!
//! Registration and health are public; everything else sits behind
//! the bearer-token middleware.

use super::{auth::require_auth, handlers::*};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Build the API router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/user/me", get(me_handler))
        .route("/game/start", post(start_game_handler))
        .route("/game/bet", post(bet_handler))
        .route("/game/history", get(history_handler))
        .route("/game/:game_id", get(get_game_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health_handler))
        .route("/user/register", post(register_handler))
        .merge(protected)
        .with_state(state)
}
