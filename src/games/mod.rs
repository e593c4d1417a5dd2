//! Wagering core: payout engines, bet resolution, session tracking

pub mod payout;
pub mod resolver;
pub mod types;

pub use payout::{PayoutEngine, PlinkoEngine, RandomSource, SeededRandom, ThreadRandom, TieredEngine};
pub use resolver::BetResolver;
pub use types::{BallPosition, BetOutcome, GameRecord, ResolvedBet, UserRecord};
