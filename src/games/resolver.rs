//! Bet resolution and session management
//!
//! The resolver is the composition root of the wagering core: it
//! validates a bet, reserves the stake, runs the payout engine, and
//! applies the result to the user's balance and the game's cumulative
//! aggregates inside one ledger transaction. Collaborators (store,
//! engine, random source) are injected so tests can substitute
//! deterministic fakes.

use crate::errors::{WagerError, WagerResult};
use crate::games::payout::{PayoutEngine, RandomSource};
use crate::games::types::{GameRecord, ResolvedBet, UserRecord};
use crate::ledger::LedgerStore;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

pub struct BetResolver {
    store: Arc<LedgerStore>,
    engine: Arc<PayoutEngine>,
    random: Arc<dyn RandomSource>,
}

impl BetResolver {
    pub fn new(
        store: Arc<LedgerStore>,
        engine: Arc<PayoutEngine>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            store,
            engine,
            random,
        }
    }

    pub fn store(&self) -> &Arc<LedgerStore> {
        &self.store
    }

    /// Start a new game session for the user. A user may hold
    /// arbitrarily many concurrent sessions.
    pub fn start_game(&self, user_id: Uuid) -> WagerResult<GameRecord> {
        let game = self.store.with_user(user_id, |tx| {
            tx.get_user(user_id)?
                .ok_or_else(|| WagerError::not_found("User not found"))?;

            let game = GameRecord::new(user_id);
            tx.stage_game(&game)?;
            tx.stage_game_index(&game);
            Ok(game)
        })?;

        debug!(user_id = %user_id, game_id = %game.id, "game session started");
        Ok(game)
    }

    /// Resolve one bet. Preconditions run in order and the first
    /// failure aborts with no mutation; on success the stake debit,
    /// payout credit, and game aggregate update commit atomically.
    pub fn resolve_bet(
        &self,
        user_id: Uuid,
        game_id: Uuid,
        stake: f64,
    ) -> WagerResult<ResolvedBet> {
        if !stake.is_finite() || stake <= 0.0 {
            return Err(WagerError::invalid_input(
                "Game ID and valid bet amount are required",
            ));
        }

        let resolved = self.store.with_user(user_id, |tx| {
            let mut user = tx
                .get_user(user_id)?
                .ok_or_else(|| WagerError::not_found("User not found"))?;

            if user.balance < stake {
                return Err(WagerError::InsufficientFunds {
                    balance: user.balance,
                    stake,
                });
            }

            // Existence and ownership collapse into one predicate so a
            // foreign game id is indistinguishable from a missing one.
            let mut game = tx
                .get_game(game_id)?
                .filter(|game| game.player_id == user_id)
                .ok_or_else(|| {
                    WagerError::not_found("Game not found or doesn't belong to user")
                })?;

            user.balance -= stake;

            let outcome = self.engine.draw(stake, self.random.as_ref());

            game.bet += stake;
            game.win += outcome.payout;
            user.balance += outcome.payout;

            tx.stage_user(&user)?;
            tx.stage_game(&game)?;

            Ok(ResolvedBet {
                game,
                bet_amount: stake,
                multiplier: outcome.multiplier,
                win_amount: outcome.payout,
                new_balance: user.balance,
                sink_index: outcome.sink_index,
                ball_start: outcome.ball_start,
            })
        })?;

        info!(
            user_id = %user_id,
            game_id = %game_id,
            stake = resolved.bet_amount,
            multiplier = resolved.multiplier,
            payout = resolved.win_amount,
            "bet resolved"
        );
        Ok(resolved)
    }

    /// A user's game history, newest first
    pub fn list_games(
        &self,
        user_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> WagerResult<Vec<GameRecord>> {
        self.store.list_games(user_id, limit, offset)
    }

    /// Fetch one game, owner-filtered: a game owned by someone else
    /// reports NotFound rather than leaking its existence.
    pub fn get_game(&self, user_id: Uuid, game_id: Uuid) -> WagerResult<GameRecord> {
        self.store
            .get_game(game_id)?
            .filter(|game| game.player_id == user_id)
            .ok_or_else(|| WagerError::not_found("Game not found"))
    }

    pub fn get_user(&self, user_id: Uuid) -> WagerResult<UserRecord> {
        self.store
            .get_user(user_id)?
            .ok_or_else(|| WagerError::not_found("User not found"))
    }
}
