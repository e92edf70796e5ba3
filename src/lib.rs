//! Memory Match core crate.
//!
//! Players flip term/definition cards across 20 themed levels, answer a quiz
//! after each cleared board, and may send a small on-chain transaction (or
//! skip) to unlock the next level. The gameplay core (`levels`, `board`,
//! `game`, `checkin`, `storage`, `timers`) is plain Rust and runs natively
//! under `cargo test`; the `web` module wires it to the browser and the
//! mini-app wallet when built for wasm32.

use wasm_bindgen::prelude::*;

pub mod board;
pub mod checkin;
pub mod config;
pub mod game;
pub mod levels;
pub mod storage;
pub mod timers;
pub mod wallet;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use board::{Board, Card, Face, PairKey, Selection};
pub use config::{ConfigError, GameConfig};
pub use game::{Game, GameSnapshot, PaymentAction, Phase};
pub use levels::{LAST_LEVEL, LevelDefinition, catalog, level};
pub use storage::{KeyValueStore, MemoryStore, SavedProgress, StorageError, Theme};
pub use timers::{Scheduler, TimerId, VirtualTimers};
pub use wallet::{TxRequest, TxStatus, WalletError};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    wasm_logger::init(wasm_logger::Config::default());
    log::info!("Logging initialized");
}
