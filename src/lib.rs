//! Stakehouse - wagering microservice
//!
//! A user registers, starts a game session, and places bets against
//! it; each bet resolves through a probabilistic payout engine inside
//! one atomic ledger transaction. Money is never created, lost, or
//! duplicated: the stake debit, payout credit, and session aggregates
//! commit together or not at all, and concurrent bets against the
//! same user serialize at the ledger.

pub mod api;
pub mod config;
pub mod errors;
pub mod games;
pub mod ledger;
pub mod storage;

pub use config::ServiceConfig;
pub use errors::{WagerError, WagerResult};
pub use games::{BetResolver, PayoutEngine, RandomSource, SeededRandom, ThreadRandom};
pub use ledger::LedgerStore;
