//! Payout engines
//!
//! Two interchangeable variants, both pure: given a random source
//! they are deterministic and side-effect free. The tiered engine
//! partitions [0, 100) into multiplier bands; the plinko engine runs
//! a triangular weighted draw over 17 sinks whose multipliers peak at
//! the edges. Tables are validated once at construction and shared
//! read-only across all requests.

use crate::errors::{WagerError, WagerResult};
use crate::games::types::{BallPosition, BetOutcome};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Injectable randomness capability. Production uses the thread-local
/// generator; tests inject a seeded generator through the same trait.
pub trait RandomSource: Send + Sync {
    /// Uniform draw in [0, 1)
    fn next(&self) -> f64;
}

/// Thread-local OS-seeded randomness for production draws
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Deterministic randomness for tests and reproducible simulations
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next(&self) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        rng.gen::<f64>()
    }
}

// ============================================================================
// Variant A: tiered multiplier draw
// ============================================================================

/// Cumulative upper bounds over [0, 100) mapped to multipliers.
/// Bands are contiguous and evaluated in ascending order; the first
/// band whose bound exceeds the draw wins.
#[derive(Debug, Clone)]
pub struct TierTable {
    pub bands: Vec<(f64, f64)>,
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            bands: vec![
                (40.0, 0.2),  // 40% chance
                (70.0, 0.6),  // 30% chance
                (85.0, 1.2),  // 15% chance
                (93.0, 3.0),  // 8% chance
                (97.0, 10.0), // 4% chance
                (99.0, 15.0), // 2% chance
                (100.0, 50.0), // 1% chance
            ],
        }
    }
}

/// Tiered payout engine. Payouts use floor semantics: the fractional
/// remainder of `stake * multiplier` is discarded.
#[derive(Debug, Clone)]
pub struct TieredEngine {
    table: TierTable,
}

impl TieredEngine {
    /// Validate that the bands cover [0, 100) with no gap and no
    /// overlap: strictly ascending positive bounds terminating at
    /// exactly 100.
    pub fn new(table: TierTable) -> WagerResult<Self> {
        if table.bands.is_empty() {
            return Err(WagerError::Configuration(
                "tier table must have at least one band".to_string(),
            ));
        }

        let mut prev = 0.0;
        for (bound, multiplier) in &table.bands {
            if *bound <= prev {
                return Err(WagerError::Configuration(format!(
                    "tier bounds must be strictly ascending, got {} after {}",
                    bound, prev
                )));
            }
            if *multiplier < 0.0 || !multiplier.is_finite() {
                return Err(WagerError::Configuration(format!(
                    "invalid tier multiplier {}",
                    multiplier
                )));
            }
            prev = *bound;
        }

        if prev != 100.0 {
            return Err(WagerError::Configuration(format!(
                "tier bands must terminate at 100, got {}",
                prev
            )));
        }

        Ok(Self { table })
    }

    pub fn with_defaults() -> Self {
        // The built-in table always passes validation.
        Self::new(TierTable::default()).expect("default tier table is valid")
    }

    /// Map a draw in [0, 100) to its band's multiplier. Boundary
    /// values resolve to the next band: the comparison is `r < bound`.
    pub fn multiplier_for(&self, r: f64) -> f64 {
        for (bound, multiplier) in &self.table.bands {
            if r < *bound {
                return *multiplier;
            }
        }
        // Unreachable for r in [0, 100) because validation pins the
        // last bound at 100; clamp out-of-range draws to the top band.
        self.table.bands[self.table.bands.len() - 1].1
    }

    pub fn draw(&self, stake: f64, random: &dyn RandomSource) -> BetOutcome {
        let r = random.next() * 100.0;
        let multiplier = self.multiplier_for(r);
        let payout = (stake * multiplier).floor();

        BetOutcome {
            multiplier,
            payout,
            sink_index: None,
            ball_start: None,
        }
    }
}

// ============================================================================
// Variant B: spatial weighted-sink draw (plinko)
// ============================================================================

pub const SINK_COUNT: usize = 17;
pub const CENTER_SINK: usize = 8;

/// Sink multipliers, symmetric around the center. Edges pay the most
/// and are the least likely to be hit; the center pays the least and
/// is the most likely. That inversion is the house-edge design.
pub const SINK_MULTIPLIERS: [f64; SINK_COUNT] = [
    16.0, 9.0, 2.0, 1.4, 1.4, 1.2, 1.1, 1.0, 0.5, 1.0, 1.1, 1.2, 1.4, 1.4, 2.0, 9.0, 16.0,
];

/// Triangular selection weight: 17 at the center, falling linearly to
/// 1 at the edges.
pub fn sink_weight(index: usize) -> u32 {
    let distance = (index as i64 - CENTER_SINK as i64).unsigned_abs();
    std::cmp::max(1, 17 - 2 * distance as i64) as u32
}

/// Plinko table: multipliers plus candidate ball start positions per
/// sink. The candidate positions exist purely for presentation; the
/// multiplier is the only monetary input.
#[derive(Debug, Clone)]
pub struct PlinkoTable {
    pub multipliers: [f64; SINK_COUNT],
    pub candidates: Vec<Vec<BallPosition>>,
}

impl Default for PlinkoTable {
    fn default() -> Self {
        // Three drop positions per sink, spread around the sink's
        // horizontal offset from the board center.
        let candidates = (0..SINK_COUNT)
            .map(|i| {
                let base = (i as f64 - CENTER_SINK as f64) * 12.5;
                vec![
                    BallPosition { x: base - 4.0, y: 0.0 },
                    BallPosition { x: base, y: 0.0 },
                    BallPosition { x: base + 4.0, y: 0.0 },
                ]
            })
            .collect();

        Self {
            multipliers: SINK_MULTIPLIERS,
            candidates,
        }
    }
}

/// Weighted-sink payout engine. Payouts round to 2 decimal places,
/// half away from zero.
#[derive(Debug, Clone)]
pub struct PlinkoEngine {
    table: PlinkoTable,
    total_weight: u32,
}

impl PlinkoEngine {
    pub fn new(table: PlinkoTable) -> WagerResult<Self> {
        for multiplier in &table.multipliers {
            if *multiplier <= 0.0 || !multiplier.is_finite() {
                return Err(WagerError::Configuration(format!(
                    "invalid sink multiplier {}",
                    multiplier
                )));
            }
        }

        let total_weight = (0..SINK_COUNT).map(sink_weight).sum();
        Ok(Self {
            table,
            total_weight,
        })
    }

    pub fn with_defaults() -> Self {
        Self::new(PlinkoTable::default()).expect("default plinko table is valid")
    }

    pub fn total_weight(&self) -> u32 {
        self.total_weight
    }

    /// Walk the sinks in index order subtracting each weight from the
    /// raw draw until the remainder drops to zero or below.
    pub fn sink_for(&self, raw: f64) -> usize {
        let mut remainder = raw;
        for index in 0..SINK_COUNT {
            remainder -= sink_weight(index) as f64;
            if remainder <= 0.0 {
                return index;
            }
        }
        SINK_COUNT - 1
    }

    pub fn draw(&self, stake: f64, random: &dyn RandomSource) -> BetOutcome {
        let raw = random.next() * self.total_weight as f64;
        let selected = self.sink_for(raw);

        // A sink with no candidate positions falls back to the center
        // sink's table and multiplier; the bet itself never fails here.
        let (sink_index, row) = match self.table.candidates.get(selected) {
            Some(row) if !row.is_empty() => (selected, row.as_slice()),
            _ => {
                let center_row = self
                    .table
                    .candidates
                    .get(CENTER_SINK)
                    .map(|row| row.as_slice())
                    .unwrap_or(&[]);
                (CENTER_SINK, center_row)
            }
        };

        let multiplier = self.table.multipliers[sink_index];
        let payout = round_to_cents(stake * multiplier);

        let ball_start = if row.is_empty() {
            None
        } else {
            let pick = (random.next() * row.len() as f64) as usize;
            Some(row[pick.min(row.len() - 1)])
        };

        BetOutcome {
            multiplier,
            payout,
            sink_index: Some(sink_index),
            ball_start,
        }
    }
}

/// Round to 2 decimal places, half away from zero
pub fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

// ============================================================================
// Variant selection
// ============================================================================

/// The active payout engine, chosen once at startup from config
#[derive(Debug, Clone)]
pub enum PayoutEngine {
    Tiered(TieredEngine),
    Plinko(PlinkoEngine),
}

impl PayoutEngine {
    pub fn draw(&self, stake: f64, random: &dyn RandomSource) -> BetOutcome {
        match self {
            PayoutEngine::Tiered(engine) => engine.draw(stake, random),
            PayoutEngine::Plinko(engine) => engine.draw(stake, random),
        }
    }
}
