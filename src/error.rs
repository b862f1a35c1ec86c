//! Error types shared by the catalog tooling and the quiz engine.

use std::path::PathBuf;

use thiserror::Error;

use crate::quiz::Phase;

/// Failures while loading or inspecting a persisted catalog document.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read catalog {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Fatal build-time errors. Any of these aborts the catalog build before
/// anything is written.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to fetch lookup sheet from {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("malformed lookup sheet (row {row}): {reason}")]
    MalformedLookup { row: usize, reason: String },
    #[error("image root does not exist: {}", .0.display())]
    ImageRootMissing(PathBuf),
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize catalog: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Rejected quiz actions. None of these are crashes; the engine state is left
/// untouched when one is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("no images available for the selected set")]
    EmptyPool,
    #[error("cannot {action} while in {phase:?}")]
    WrongPhase { action: &'static str, phase: Phase },
}
