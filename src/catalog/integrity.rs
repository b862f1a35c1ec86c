//! Content-quality checks over a built catalog.
//!
//! Findings are advisory: they are reported, never fatal. The builder logs them
//! after writing and the `check-catalog` CLI prints them.

use std::fs;
use std::path::Path;

use super::{normalize_answer, Catalog, CatalogEntry, PoolKind};
use crate::error::CatalogError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Finding {
    /// Two accepted answers collapse to the same string once case-folded.
    DuplicateAnswers {
        pool: PoolKind,
        url: String,
        answers: Vec<String>,
    },
    EmptyAnswers { pool: PoolKind, url: String },
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Finding::DuplicateAnswers { pool, url, answers } => write!(
                f,
                "Duplicate answers in {pool} for {url}: [{}]",
                answers.join(", ")
            ),
            Finding::EmptyAnswers { pool, url } => {
                write!(f, "No accepted answers in {pool} for {url}")
            }
        }
    }
}

fn has_duplicate_answers(entry: &CatalogEntry) -> bool {
    let folded: Vec<String> = entry.answers.iter().map(|a| normalize_answer(a)).collect();
    folded
        .iter()
        .enumerate()
        .any(|(i, a)| folded[i + 1..].contains(a))
}

pub fn check_catalog(catalog: &Catalog) -> Vec<Finding> {
    let mut findings = Vec::new();
    for pool in [PoolKind::Default, PoolKind::Bonus] {
        for entry in catalog.entries(pool) {
            if entry.answers.is_empty() {
                findings.push(Finding::EmptyAnswers {
                    pool,
                    url: entry.url.clone(),
                });
            } else if has_duplicate_answers(entry) {
                findings.push(Finding::DuplicateAnswers {
                    pool,
                    url: entry.url.clone(),
                    answers: entry.answers.clone(),
                });
            }
        }
    }
    findings
}

/// Loads a persisted catalog and checks it.
pub fn check_file(path: &Path) -> Result<Vec<Finding>, CatalogError> {
    if !path.exists() {
        return Err(CatalogError::NotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = Catalog::from_json(&text)?;
    Ok(check_catalog(&catalog))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(answers: &[&str]) -> CatalogEntry {
        CatalogEntry::new("/images/x.png", answers.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn flags_case_insensitive_duplicate() {
        let catalog = Catalog {
            default_images: vec![entry(&["ToM", "tom"])],
            pom_images: vec![],
        };
        let findings = check_catalog(&catalog);
        assert_eq!(findings.len(), 1);
        assert!(matches!(
            &findings[0],
            Finding::DuplicateAnswers { pool: PoolKind::Default, .. }
        ));
        assert_eq!(
            findings[0].to_string(),
            "Duplicate answers in defaultImages for /images/x.png: [ToM, tom]"
        );
    }

    #[test]
    fn distinct_answers_pass() {
        let catalog = Catalog {
            default_images: vec![entry(&["ToM", "Tower of Misery"])],
            pom_images: vec![entry(&["WaT", "Was A Tower"])],
        };
        assert!(check_catalog(&catalog).is_empty());
    }

    #[test]
    fn unmatched_lookup_fallback_is_flagged() {
        // builder emits [acronym, acronym] when the sheet has no row for a file
        let catalog = Catalog {
            default_images: vec![],
            pom_images: vec![entry(&["ToX", " ToX "])],
        };
        let findings = check_catalog(&catalog);
        assert!(matches!(
            &findings[0],
            Finding::DuplicateAnswers { pool: PoolKind::Bonus, .. }
        ));
    }

    #[test]
    fn empty_answers_reported() {
        let catalog = Catalog {
            default_images: vec![entry(&[])],
            pom_images: vec![],
        };
        assert_eq!(
            check_catalog(&catalog),
            vec![Finding::EmptyAnswers {
                pool: PoolKind::Default,
                url: "/images/x.png".into()
            }]
        );
    }

    #[test]
    fn check_file_missing_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_file(&dir.path().join("towers.json")).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[test]
    fn check_file_reads_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("towers.json");
        fs::write(
            &path,
            r#"{"defaultImages":[{"url":"/images/ToM.png","answers":["ToM","TOM"]}],"pomImages":[]}"#,
        )
        .unwrap();
        assert_eq!(check_file(&path).unwrap().len(), 1);
    }
}
