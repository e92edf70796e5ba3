//! Wallet capability as seen by the game.
//!
//! The mini-app host owns the actual wallet; the game only knows whether one
//! is connected, which address to show, and how to phrase the single
//! transaction it asks the host to send.

use serde::Serialize;
use thiserror::Error;

use crate::config::GameConfig;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("transaction rejected: {0}")]
    Rejected(String),
    #[error("wallet returned no transaction hash")]
    MissingHash,
}

/// Payload handed to the host's `sendTransaction`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxRequest {
    pub chain_id: u64,
    pub to: String,
    pub value: String,
    pub data: String,
}

impl TxRequest {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            chain_id: config.chain_id,
            to: config.recipient.clone(),
            value: config.value_wei.clone(),
            data: config.data.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "lowercase")]
pub enum TxStatus {
    #[default]
    Idle,
    Loading,
    Success(String),
    Error(String),
}

impl TxStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, TxStatus::Loading)
    }

    pub fn hash(&self) -> Option<&str> {
        match self {
            TxStatus::Success(hash) => Some(hash),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WalletStatus {
    pub address: Option<String>,
}

impl WalletStatus {
    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    pub fn display(&self) -> Option<String> {
        self.address.as_deref().map(short_address)
    }
}

/// `0x1234567890abcdef` -> `0x1234…cdef`. Short inputs come back unchanged.
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}
