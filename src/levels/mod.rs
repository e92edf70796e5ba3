//! Level catalog.
//!
//! Every level is a themed round: a lesson blurb, an ordered list of
//! term/definition pairs and one quiz question. Levels 1 and 2 are authored by
//! hand (see `level1.rs` / `level2.rs`); levels 3..=20 come from a
//! deterministic template in `generated.rs`. The whole table is built once into
//! a read-only slice on first access and never mutated afterwards.

use serde::Serialize;
use std::sync::OnceLock;

mod generated;
mod level1;
mod level2;

pub use generated::{GLOSSARY, THEMES, generate_level};
pub use level1::LEVEL1_PAIRS;
pub use level2::LEVEL2_PAIRS;

pub const FIRST_LEVEL: u8 = 1;
pub const LAST_LEVEL: u8 = 20;

/// A single term and the definition it matches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Pair {
    pub term: String,
    pub definition: String,
}

impl Pair {
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Quiz {
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub answer: usize,
}

impl Quiz {
    pub fn is_correct(&self, choice: usize) -> bool {
        choice == self.answer
    }
}

/// Immutable description of one level.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LevelDefinition {
    pub number: u8,
    pub theme: String,
    pub lesson: String,
    pub pairs: Vec<Pair>,
    pub quiz: Quiz,
}

/// Number of pairs on the board for a templated level.
pub fn pair_count(level: u8) -> usize {
    (4 + level as usize / 3).min(6)
}

/// Clamp an arbitrary number into the playable level range.
pub fn clamp_level(level: u8) -> u8 {
    level.clamp(FIRST_LEVEL, LAST_LEVEL)
}

/// All levels in order, index 0 holding level 1.
pub fn catalog() -> &'static [LevelDefinition] {
    static CATALOG: OnceLock<Vec<LevelDefinition>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        let mut levels = Vec::with_capacity(LAST_LEVEL as usize);
        levels.push(level1::level1());
        levels.push(level2::level2());
        for n in 3..=LAST_LEVEL {
            levels.push(generate_level(n));
        }
        levels
    })
}

pub fn level(number: u8) -> Option<&'static LevelDefinition> {
    if !(FIRST_LEVEL..=LAST_LEVEL).contains(&number) {
        return None;
    }
    catalog().get(number as usize - 1)
}

/// Like [`level`] but clamps out-of-range numbers instead of failing.
pub fn level_or_clamped(number: u8) -> &'static LevelDefinition {
    let idx = clamp_level(number) as usize - 1;
    &catalog()[idx]
}

fn pairs_from(table: &[(&str, &str)]) -> Vec<Pair> {
    table.iter().map(|(t, d)| Pair::new(*t, *d)).collect()
}
