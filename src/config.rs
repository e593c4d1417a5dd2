//! Configuration management with validation and defaults
//!
//! Loaded from a TOML file when one is given, otherwise built from
//! defaults; individual fields can be overridden from the CLI.

use crate::errors::{WagerError, WagerResult};
use crate::games::payout::{PayoutEngine, PlinkoEngine, PlinkoTable, TierTable, TieredEngine};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level service configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub game: GameConfig,
}

/// HTTP server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            allowed_origins: vec!["*".to_string()],
            request_timeout_secs: 30,
        }
    }
}

/// Ledger database configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./DB/ledger".to_string(),
        }
    }
}

/// Which payout variant the service runs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayoutVariant {
    /// Tiered multiplier bands over [0, 100)
    Tiered,
    /// 17-sink weighted plinko board
    Plinko,
}

/// Game/payout configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub variant: PayoutVariant,
    /// Balance credited to a user at registration
    pub initial_balance: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            variant: PayoutVariant::Plinko,
            initial_balance: 1000.0,
        }
    }
}

impl GameConfig {
    /// Build the immutable payout engine from the configured variant.
    /// Table validation happens here, once, at startup.
    pub fn build_engine(&self) -> WagerResult<PayoutEngine> {
        match self.variant {
            PayoutVariant::Tiered => Ok(PayoutEngine::Tiered(TieredEngine::new(
                TierTable::default(),
            )?)),
            PayoutVariant::Plinko => Ok(PayoutEngine::Plinko(PlinkoEngine::new(
                PlinkoTable::default(),
            )?)),
        }
    }
}

impl ServiceConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> WagerResult<Self> {
        let text = std::fs::read_to_string(&path).map_err(|e| {
            WagerError::Configuration(format!(
                "failed to read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let config: ServiceConfig = toml::from_str(&text)
            .map_err(|e| WagerError::Configuration(format!("invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> WagerResult<()> {
        if self.server.request_timeout_secs == 0 {
            return Err(WagerError::Configuration(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        if self.storage.data_dir.is_empty() {
            return Err(WagerError::Configuration(
                "storage.data_dir must not be empty".to_string(),
            ));
        }
        if self.game.initial_balance < 0.0 || !self.game.initial_balance.is_finite() {
            return Err(WagerError::Configuration(format!(
                "initial_balance must be a non-negative number, got {}",
                self.game.initial_balance
            )));
        }
        Ok(())
    }
}
