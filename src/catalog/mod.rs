//! Catalog document: every playable image and the answers accepted for it.
//!
//! The catalog is produced offline by the builder (`towers.json`) and read once
//! by the quiz at session start. It holds two independently addressable pools:
//! the scanned default set and the hand-curated Pit of Misery bonus set.

use serde::{Deserialize, Deserializer, Serialize};

pub mod bonus;
pub mod integrity;

pub use bonus::{bonus_entries, BONUS_DIR, POM_TOWERS};
pub use integrity::{check_catalog, check_file, Finding};

/// Normalizes a guess or an accepted answer for comparison.
pub fn normalize_answer(s: &str) -> String {
    s.trim().to_lowercase()
}

/// One playable image. `answers[0]` is the canonical display form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub url: String,
    pub answers: Vec<String>,
}

impl CatalogEntry {
    pub fn new(url: impl Into<String>, answers: Vec<String>) -> Self {
        Self { url: url.into(), answers }
    }

    pub fn canonical(&self) -> Option<&str> {
        self.answers.first().map(String::as_str)
    }

    /// Case- and surrounding-whitespace-insensitive answer check.
    pub fn accepts(&self, guess: &str) -> bool {
        let guess = normalize_answer(guess);
        self.answers.iter().any(|a| normalize_answer(a) == guess)
    }
}

/// Which half of the catalog an entry lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolKind {
    Default,
    Bonus,
}

impl PoolKind {
    /// Field name used in the JSON document.
    pub fn field_name(self) -> &'static str {
        match self {
            PoolKind::Default => "defaultImages",
            PoolKind::Bonus => "pomImages",
        }
    }
}

impl std::fmt::Display for PoolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field_name())
    }
}

/// A pool written as `null` reads as empty, so one bad field does not cost the
/// other pool.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<CatalogEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<CatalogEntry>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub default_images: Vec<CatalogEntry>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub pom_images: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Runtime loading path: anything that is not a catalog document degrades
    /// to an empty (unplayable) catalog instead of an error.
    pub fn from_json_or_empty(text: &str) -> Self {
        match Self::from_json(text) {
            Ok(catalog) => catalog,
            Err(e) => {
                log::error!("catalog document has unexpected shape: {e}");
                Self::default()
            }
        }
    }

    pub fn entries(&self, kind: PoolKind) -> &[CatalogEntry] {
        match kind {
            PoolKind::Default => &self.default_images,
            PoolKind::Bonus => &self.pom_images,
        }
    }

    /// Default entries, followed by the bonus entries when `include_bonus` is set.
    pub fn pool(&self, include_bonus: bool) -> Vec<CatalogEntry> {
        let mut pool = self.default_images.clone();
        if include_bonus {
            pool.extend(self.pom_images.iter().cloned());
        }
        pool
    }
}
