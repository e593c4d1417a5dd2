//! Ledger Store: durable user and game records
//!
//! All mutation goes through [`LedgerStore::with_user`], which
//! serializes concurrent transactions against the same user with a
//! striped lock and commits staged writes in one atomic RocksDB
//! batch. A closure that returns an error commits nothing, so a
//! failed bet can never leave a partial debit behind.
//!
//! Key layout:
//!   `user:{uuid}`                      -> UserRecord JSON
//!   `user:token:{sha256 hex}`          -> user uuid (auth index)
//!   `game:{uuid}`                      -> GameRecord JSON
//!   `game:index:{player}:{inv_ms}{id}` -> empty (newest-first index)

use crate::errors::{WagerError, WagerResult};
use crate::games::types::{GameRecord, UserRecord};
use crate::storage::LedgerDb;
use chrono::Utc;
use dashmap::DashMap;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

const USER_PREFIX: &str = "user:";
const TOKEN_PREFIX: &str = "user:token:";
const GAME_PREFIX: &str = "game:";
const GAME_INDEX_PREFIX: &str = "game:index:";

fn user_key(id: Uuid) -> Vec<u8> {
    format!("{}{}", USER_PREFIX, id).into_bytes()
}

fn token_key(digest_hex: &str) -> Vec<u8> {
    format!("{}{}", TOKEN_PREFIX, digest_hex).into_bytes()
}

fn game_key(id: Uuid) -> Vec<u8> {
    format!("{}{}", GAME_PREFIX, id).into_bytes()
}

fn game_index_prefix(player_id: Uuid) -> Vec<u8> {
    format!("{}{}:", GAME_INDEX_PREFIX, player_id).into_bytes()
}

/// Newest-first index key: lexicographic order over an inverted
/// big-endian creation timestamp, tie-broken by the game id bytes.
fn game_index_key(game: &GameRecord) -> Vec<u8> {
    let inv_millis = u64::MAX - game.created_at.timestamp_millis().max(0) as u64;
    let mut key = game_index_prefix(game.player_id);
    key.extend_from_slice(&inv_millis.to_be_bytes());
    key.extend_from_slice(game.id.as_bytes());
    key
}

/// SHA-256 digest of an auth token; only digests are persisted.
pub fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Staged writes for one in-flight ledger transaction. Reads go
/// straight to the store; writes accumulate here and are committed as
/// a single batch when the transaction closure returns Ok.
pub struct LedgerTx<'a> {
    store: &'a LedgerStore,
    staged: Vec<(Vec<u8>, Vec<u8>)>,
}

impl LedgerTx<'_> {
    pub fn get_user(&self, id: Uuid) -> WagerResult<Option<UserRecord>> {
        self.store.get_user(id)
    }

    pub fn get_game(&self, id: Uuid) -> WagerResult<Option<GameRecord>> {
        self.store.get_game(id)
    }

    pub fn stage_user(&mut self, user: &UserRecord) -> WagerResult<()> {
        self.staged.push((user_key(user.id), serde_json::to_vec(user)?));
        Ok(())
    }

    pub fn stage_game(&mut self, game: &GameRecord) -> WagerResult<()> {
        self.staged.push((game_key(game.id), serde_json::to_vec(game)?));
        Ok(())
    }

    pub fn stage_game_index(&mut self, game: &GameRecord) {
        self.staged.push((game_index_key(game), Vec::new()));
    }
}

/// Durable, transactional store for users and games
pub struct LedgerStore {
    db: LedgerDb,
    user_locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl LedgerStore {
    pub fn open<P: AsRef<Path>>(path: P) -> WagerResult<Self> {
        let db = LedgerDb::open(path)?;
        Ok(Self {
            db,
            user_locks: DashMap::new(),
        })
    }

    fn lock_for(&self, user_id: Uuid) -> Arc<Mutex<()>> {
        self.user_locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Run one atomic read-modify-write transaction against a user's
    /// rows. Transactions for the same user serialize; transactions
    /// for different users proceed independently. Staged writes are
    /// committed in a single atomic batch; if the closure fails,
    /// nothing is written.
    pub fn with_user<T>(
        &self,
        user_id: Uuid,
        f: impl FnOnce(&mut LedgerTx) -> WagerResult<T>,
    ) -> WagerResult<T> {
        let lock = self.lock_for(user_id);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut tx = LedgerTx {
            store: self,
            staged: Vec::new(),
        };
        let out = f(&mut tx)?;

        if !tx.staged.is_empty() {
            self.db.batch_write(&tx.staged)?;
        }
        Ok(out)
    }

    /// Create a user with the given starting balance and issue an
    /// opaque auth token. The token itself is returned to the caller
    /// exactly once; only its digest is stored.
    pub fn create_user(&self, initial_balance: f64) -> WagerResult<(UserRecord, String)> {
        let user = UserRecord {
            id: Uuid::new_v4(),
            balance: initial_balance,
            created_at: Utc::now(),
        };

        let mut token_bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut token_bytes);
        let token = hex::encode(token_bytes);

        self.db.batch_write(&[
            (user_key(user.id), serde_json::to_vec(&user)?),
            (
                token_key(&token_digest(&token)),
                user.id.to_string().into_bytes(),
            ),
        ])?;

        Ok((user, token))
    }

    pub fn get_user(&self, id: Uuid) -> WagerResult<Option<UserRecord>> {
        match self.db.get(&user_key(id))? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Resolve an auth token to its user id, if the token is known
    pub fn user_id_for_token(&self, token: &str) -> WagerResult<Option<Uuid>> {
        match self.db.get(&token_key(&token_digest(token)))? {
            Some(bytes) => {
                let text = String::from_utf8(bytes)
                    .map_err(|e| WagerError::Corrupted(e.to_string()))?;
                let id = Uuid::parse_str(&text)
                    .map_err(|e| WagerError::Corrupted(e.to_string()))?;
                Ok(Some(id))
            }
            None => Ok(None),
        }
    }

    pub fn get_game(&self, id: Uuid) -> WagerResult<Option<GameRecord>> {
        match self.db.get(&game_key(id))? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// List a user's games newest-first via the index scan
    pub fn list_games(
        &self,
        player_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> WagerResult<Vec<GameRecord>> {
        let prefix = game_index_prefix(player_id);
        let rows = self.db.scan_prefix(&prefix, offset, limit)?;

        let mut games = Vec::with_capacity(rows.len());
        for (key, _) in rows {
            if key.len() < prefix.len() + 8 + 16 {
                return Err(WagerError::Corrupted(format!(
                    "malformed game index key ({} bytes)",
                    key.len()
                )));
            }
            let id_bytes: [u8; 16] = key[key.len() - 16..]
                .try_into()
                .map_err(|_| WagerError::Corrupted("bad game id in index key".to_string()))?;
            let game_id = Uuid::from_bytes(id_bytes);

            match self.get_game(game_id)? {
                Some(game) => games.push(game),
                None => {
                    // Index entries are written in the same batch as the
                    // game row, so a dangling entry means corruption.
                    return Err(WagerError::Corrupted(format!(
                        "game index references missing game {}",
                        game_id
                    )));
                }
            }
        }
        Ok(games)
    }
}
