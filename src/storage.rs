//! Per-device persistence of the session scalars.
//!
//! All access goes through [`KeyValueStore`]. [`MemoryStore`] is the fallback
//! used natively, in tests, and in browsers where `localStorage` is blocked;
//! `BrowserStore` wraps `window.localStorage` on wasm. Reads never fail:
//! missing or unparsable values fall back to [`SavedProgress::default`].
//! Writes are best effort and failures are only logged.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

use crate::levels::{FIRST_LEVEL, LAST_LEVEL};

pub const KEY_LEVEL: &str = "memory_level";
pub const KEY_SCORE: &str = "memory_score";
pub const KEY_HINTS: &str = "memory_hints";
pub const KEY_QUIZZES: &str = "memory_quizzes";
pub const KEY_THEME: &str = "memory_theme";
pub const KEY_STREAK: &str = "memory_streak";
pub const KEY_LAST_CHECK_IN: &str = "memory_last_checkin";

pub const ALL_KEYS: [&str; 7] = [
    KEY_LEVEL,
    KEY_SCORE,
    KEY_HINTS,
    KEY_QUIZZES,
    KEY_THEME,
    KEY_STREAK,
    KEY_LAST_CHECK_IN,
];

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("failed to write {key}: {message}")]
    Write { key: String, message: String },
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// Copy every game key out of another store.
    pub fn copy_from(other: &dyn KeyValueStore) -> Self {
        Self {
            values: ALL_KEYS
                .iter()
                .filter_map(|k| other.get(k).map(|v| (k.to_string(), v)))
                .collect(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl FromStr for Theme {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            _ => Err(()),
        }
    }
}

/// Everything that survives a reload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedProgress {
    pub level: u8,
    pub score: u64,
    pub hints: u32,
    pub quizzes_solved: u32,
    pub theme: Theme,
    pub streak: u32,
    pub last_check_in: Option<NaiveDate>,
}

impl Default for SavedProgress {
    fn default() -> Self {
        Self {
            level: FIRST_LEVEL,
            score: 0,
            hints: 3,
            quizzes_solved: 0,
            theme: Theme::Dark,
            streak: 0,
            last_check_in: None,
        }
    }
}

fn read<T: FromStr>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    store.get(key).and_then(|raw| raw.trim().parse().ok())
}

impl SavedProgress {
    /// Read every field, falling back per field to the default. `default_hints`
    /// overrides the stock hint allowance for fresh devices.
    pub fn load(store: &dyn KeyValueStore, default_hints: u32) -> Self {
        let defaults = Self {
            hints: default_hints,
            ..Self::default()
        };
        let level = read::<u8>(store, KEY_LEVEL)
            .filter(|l| (FIRST_LEVEL..=LAST_LEVEL).contains(l))
            .unwrap_or(defaults.level);
        let last_check_in = store
            .get(KEY_LAST_CHECK_IN)
            .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok());
        Self {
            level,
            score: read(store, KEY_SCORE).unwrap_or(defaults.score),
            hints: read(store, KEY_HINTS).unwrap_or(defaults.hints),
            quizzes_solved: read(store, KEY_QUIZZES).unwrap_or(defaults.quizzes_solved),
            theme: read(store, KEY_THEME).unwrap_or(defaults.theme),
            streak: read(store, KEY_STREAK).unwrap_or(defaults.streak),
            last_check_in,
        }
    }

    /// Write every field. Failures are logged and otherwise ignored.
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        let mut entries = vec![
            (KEY_LEVEL, self.level.to_string()),
            (KEY_SCORE, self.score.to_string()),
            (KEY_HINTS, self.hints.to_string()),
            (KEY_QUIZZES, self.quizzes_solved.to_string()),
            (KEY_THEME, self.theme.as_str().to_string()),
            (KEY_STREAK, self.streak.to_string()),
        ];
        if let Some(date) = self.last_check_in {
            entries.push((KEY_LAST_CHECK_IN, date.format(DATE_FORMAT).to_string()));
        }
        for (key, value) in entries {
            if let Err(e) = store.set(key, &value) {
                log::warn!("storage write skipped: {e}");
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserStore;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{KeyValueStore, MemoryStore, StorageError};

    /// `window.localStorage`, or an in-memory map when the browser refuses it
    /// (private mode, sandboxed iframes).
    pub enum BrowserStore {
        Local(web_sys::Storage),
        Fallback(MemoryStore),
    }

    impl BrowserStore {
        pub fn open() -> Self {
            match web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
                Some(storage) => BrowserStore::Local(storage),
                None => {
                    log::warn!("localStorage unavailable; progress will not survive reload");
                    BrowserStore::Fallback(MemoryStore::new())
                }
            }
        }
    }

    impl KeyValueStore for BrowserStore {
        fn get(&self, key: &str) -> Option<String> {
            match self {
                BrowserStore::Local(storage) => storage.get_item(key).ok().flatten(),
                BrowserStore::Fallback(mem) => mem.get(key),
            }
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            match self {
                BrowserStore::Local(storage) => {
                    storage
                        .set_item(key, value)
                        .map_err(|e| StorageError::Write {
                            key: key.to_string(),
                            message: format!("{e:?}"),
                        })
                }
                BrowserStore::Fallback(mem) => mem.set(key, value),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }
        fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Write {
                key: key.to_string(),
                message: "quota exceeded".into(),
            })
        }
    }

    #[test]
    fn test_empty_store_yields_defaults() {
        let store = MemoryStore::new();
        let p = SavedProgress::load(&store, 3);
        assert_eq!(p, SavedProgress::default());
        assert_eq!(p.level, 1);
        assert_eq!(p.hints, 3);
        assert_eq!(p.theme, Theme::Dark);
    }

    #[test]
    fn test_corrupt_values_fall_back_per_field() {
        let store = MemoryStore::with_values([
            (KEY_LEVEL, "abc"),
            (KEY_SCORE, "1200"),
            (KEY_HINTS, "-4"),
            (KEY_THEME, "purple"),
            (KEY_STREAK, "2"),
            (KEY_LAST_CHECK_IN, "yesterday"),
        ]);
        let p = SavedProgress::load(&store, 3);
        assert_eq!(p.level, 1);
        assert_eq!(p.score, 1200);
        assert_eq!(p.hints, 3);
        assert_eq!(p.theme, Theme::Dark);
        assert_eq!(p.streak, 2);
        assert_eq!(p.last_check_in, None);
    }

    #[test]
    fn test_out_of_range_level_is_rejected() {
        let store = MemoryStore::with_values([(KEY_LEVEL, "21")]);
        assert_eq!(SavedProgress::load(&store, 3).level, 1);
        let store = MemoryStore::with_values([(KEY_LEVEL, "0")]);
        assert_eq!(SavedProgress::load(&store, 3).level, 1);
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        let progress = SavedProgress {
            level: 7,
            score: 4_560,
            hints: 1,
            quizzes_solved: 6,
            theme: Theme::Light,
            streak: 3,
            last_check_in: NaiveDate::from_ymd_opt(2026, 3, 14),
        };
        progress.save(&mut store);
        assert_eq!(store.get(KEY_LAST_CHECK_IN).as_deref(), Some("2026-03-14"));
        assert_eq!(SavedProgress::load(&store, 3), progress);
    }

    #[test]
    fn test_failed_writes_are_swallowed() {
        let mut store = BrokenStore;
        SavedProgress::default().save(&mut store);
        assert_eq!(SavedProgress::load(&store, 3), SavedProgress::default());
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!("light".parse::<Theme>(), Ok(Theme::Light));
    }
}
