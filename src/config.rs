//! Runtime configuration for the quiz front end and the catalog builder.
//! Defaults match the deployed site layout (`public/images/towers.json`).

use std::path::PathBuf;

use serde::Deserialize;

pub const DEFAULT_CATALOG_URL: &str = "/images/towers.json";
pub const DEFAULT_PRELOAD_TIMEOUT_MS: u32 = 6_000;
pub const DEFAULT_HIGH_SCORE_KEY: &str = "highScore";

pub const DEFAULT_SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/1FlogEu7UQ2KZ4JjHQLs7jzv_S7QLxLfxAVJOEvQ231o/export?format=csv";
pub const DEFAULT_IMAGES_DIR: &str = "public/images";
pub const DEFAULT_URL_PREFIX: &str = "/images";
pub const CATALOG_FILE_NAME: &str = "towers.json";
pub const DEFAULT_CATALOG_PATH: &str = "public/images/towers.json";

/// Browser-side settings. Any field left out of the JSON keeps its default.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QuizConfig {
    pub catalog_url: String,
    /// Hard upper bound on the image preload barrier.
    pub preload_timeout_ms: u32,
    /// localStorage key holding the high score.
    pub high_score_key: String,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            preload_timeout_ms: DEFAULT_PRELOAD_TIMEOUT_MS,
            high_score_key: DEFAULT_HIGH_SCORE_KEY.to_string(),
        }
    }
}

impl QuizConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuilderConfig {
    pub sheet_url: String,
    pub images_dir: PathBuf,
    pub output: PathBuf,
    pub url_prefix: String,
}

impl BuilderConfig {
    /// Output defaults to `towers.json` inside the image directory.
    pub fn new(images_dir: impl Into<PathBuf>) -> Self {
        let images_dir = images_dir.into();
        Self {
            sheet_url: DEFAULT_SHEET_URL.to_string(),
            output: images_dir.join(CATALOG_FILE_NAME),
            images_dir,
            url_prefix: DEFAULT_URL_PREFIX.to_string(),
        }
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGES_DIR)
    }
}
