//! Domain types shared by the ledger, the payout engines, and the API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Durable user record. The balance is the only mutable field and is
/// only ever mutated inside a ledger transaction (stake debit, payout
/// credit).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    pub balance: f64,
    pub created_at: DateTime<Utc>,
}

/// Durable game session record. `bet` and `win` are cumulative over
/// the life of the session and monotonically non-decreasing; the
/// owner reference is immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: Uuid,
    pub player_id: Uuid,
    pub bet: f64,
    pub win: f64,
    pub created_at: DateTime<Utc>,
}

impl GameRecord {
    pub fn new(player_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            player_id,
            bet: 0.0,
            win: 0.0,
            created_at: Utc::now(),
        }
    }
}

/// Ball start coordinate for the plinko presentation layer. Carries
/// no monetary effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallPosition {
    pub x: f64,
    pub y: f64,
}

/// Outcome of one payout draw, before it is applied to the ledger
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetOutcome {
    pub multiplier: f64,
    pub payout: f64,
    /// Selected sink index (plinko variant only)
    pub sink_index: Option<usize>,
    /// Ball start position picked from the sink's candidate table
    /// (plinko variant only)
    pub ball_start: Option<BallPosition>,
}

/// Result of a committed bet resolution, reflecting post-commit state
#[derive(Debug, Clone)]
pub struct ResolvedBet {
    pub game: GameRecord,
    pub bet_amount: f64,
    pub multiplier: f64,
    pub win_amount: f64,
    pub new_balance: f64,
    pub sink_index: Option<usize>,
    pub ball_start: Option<BallPosition>,
}
