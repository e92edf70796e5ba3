//! Gameplay tunables.
//!
//! Defaults are the shipped balance. The host page may pass a partial JSON
//! object to override any subset (e.g. a different recipient on testnet).

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub match_delay_ms: u32,
    pub mismatch_base_ms: u32,
    pub mismatch_step_ms: u32,
    pub mismatch_floor_ms: u32,
    pub hint_reveal_ms: u32,
    pub payment_advance_ms: u32,
    pub match_points_per_level: u64,
    pub quiz_points_per_level: u64,
    pub payment_bonus: u64,
    pub check_in_bonus: u64,
    pub bonus_hints_every: u32,
    pub bonus_hints: u32,
    pub starting_hints: u32,
    pub chain_id: u64,
    pub recipient: String,
    /// Hex-encoded wei amount.
    pub value_wei: String,
    pub data: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            match_delay_ms: 200,
            mismatch_base_ms: 1_000,
            mismatch_step_ms: 40,
            mismatch_floor_ms: 250,
            hint_reveal_ms: 1_200,
            payment_advance_ms: 2_000,
            match_points_per_level: 30,
            quiz_points_per_level: 200,
            payment_bonus: 1_000,
            check_in_bonus: 500,
            bonus_hints_every: 5,
            bonus_hints: 2,
            starting_hints: 3,
            chain_id: 8453,
            recipient: "0x000000000000000000000000000000000000dEaD".into(),
            // 0.00001 ETH
            value_wei: "0x9184e72a000".into(),
            data: "0x".into(),
        }
    }
}

impl GameConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mismatch_floor_ms > self.mismatch_base_ms {
            return Err(ConfigError::Invalid(
                "mismatchFloorMs must not exceed mismatchBaseMs".into(),
            ));
        }
        if self.bonus_hints_every == 0 {
            return Err(ConfigError::Invalid("bonusHintsEvery must be positive".into()));
        }
        if self.recipient.trim().is_empty() {
            return Err(ConfigError::Invalid("recipient is empty".into()));
        }
        Ok(())
    }

    /// Flip-back delay after a mismatch: shrinks with the level, never below the floor.
    pub fn mismatch_delay_ms(&self, level: u8) -> u32 {
        self.mismatch_base_ms
            .saturating_sub(self.mismatch_step_ms.saturating_mul(level as u32))
            .max(self.mismatch_floor_ms)
    }
}
