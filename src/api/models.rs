//! API request/response models
//!
//! Wire field names follow the original client contract: snake_case
//! for record fields except `createdAt`, camelCase for bet payloads.

use crate::games::types::{BallPosition, GameRecord, ResolvedBet, UserRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub id: Uuid,
    pub balance: f64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for UserDto {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            balance: user.balance,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameDto {
    pub id: Uuid,
    pub player_id: Uuid,
    pub bet: f64,
    pub win: f64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<GameRecord> for GameDto {
    fn from(game: GameRecord) -> Self {
        Self {
            id: game.id,
            player_id: game.player_id,
            bet: game.bet,
            win: game.win,
            created_at: game.created_at,
        }
    }
}

/// POST /user/register response; the token is only ever returned here
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user: UserDto,
    pub token: String,
}

/// GET /user/me response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: UserDto,
}

/// POST /game/start and GET /game/:gameId response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResponse {
    pub game: GameDto,
}

/// POST /game/bet request body. Fields are optional so that missing
/// ones surface as the contract's InvalidInput message rather than a
/// deserialization rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetRequest {
    #[serde(default)]
    pub game_id: Option<String>,
    #[serde(default)]
    pub bet_amount: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetResultDto {
    pub bet_amount: f64,
    pub multiplier: f64,
    pub win_amount: f64,
    pub new_balance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sink_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ball_start_position: Option<BallPosition>,
}

/// POST /game/bet response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetResponse {
    pub game: GameDto,
    pub bet_result: BetResultDto,
}

impl From<ResolvedBet> for BetResponse {
    fn from(resolved: ResolvedBet) -> Self {
        Self {
            game: resolved.game.clone().into(),
            bet_result: BetResultDto {
                bet_amount: resolved.bet_amount,
                multiplier: resolved.multiplier,
                win_amount: resolved.win_amount,
                new_balance: resolved.new_balance,
                sink_index: resolved.sink_index,
                ball_start_position: resolved.ball_start,
            },
        }
    }
}

/// GET /game/history query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
}

/// GET /game/history response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub games: Vec<GameDto>,
}
