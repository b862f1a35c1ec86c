//! Durable high score.

/// Single durable integer. Read once when a session starts, written at most
/// once per game over.
pub trait HighScoreStore {
    fn load(&self) -> Option<u32>;
    fn save(&mut self, score: u32);
}

/// Stored values are decimal strings; anything else reads as "no high score".
pub fn parse_stored(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.trim().parse().ok())
}

/// In-process store for native use and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    value: Option<u32>,
    pub writes: usize,
}

impl MemoryStore {
    pub fn with_value(value: u32) -> Self {
        Self {
            value: Some(value),
            writes: 0,
        }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Option<u32> {
        self.value
    }

    fn save(&mut self, score: u32) {
        self.value = Some(score);
        self.writes += 1;
    }
}

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorageStore;

#[cfg(target_arch = "wasm32")]
mod local {
    use super::{parse_stored, HighScoreStore};

    /// `window.localStorage[key]`. Storage being unavailable (private mode,
    /// disabled cookies) degrades to a non-persistent high score.
    pub struct LocalStorageStore {
        key: String,
    }

    impl LocalStorageStore {
        pub fn new(key: impl Into<String>) -> Self {
            Self { key: key.into() }
        }

        fn storage() -> Option<web_sys::Storage> {
            web_sys::window().and_then(|w| w.local_storage().ok().flatten())
        }
    }

    impl HighScoreStore for LocalStorageStore {
        fn load(&self) -> Option<u32> {
            let raw = Self::storage().and_then(|s| s.get_item(&self.key).ok().flatten());
            parse_stored(raw.as_deref())
        }

        fn save(&mut self, score: u32) {
            match Self::storage() {
                Some(storage) => {
                    if storage.set_item(&self.key, &score.to_string()).is_err() {
                        log::warn!("could not persist high score");
                    }
                }
                None => log::warn!("localStorage unavailable; high score not persisted"),
            }
        }
    }
}
