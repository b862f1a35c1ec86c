//! Catalog builder: joins the spreadsheet lookup with the image folder scan and
//! writes `towers.json`.
//!
//! Pipeline: fetch sheet → [`parse_lookup`] → [`scan_images`] →
//! [`assemble_catalog`] → [`write_catalog`]. Every step before the write can
//! fail fatally; nothing is written unless all of them succeed.

use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::{bonus, check_catalog, Catalog, CatalogEntry, Finding};
use crate::config::BuilderConfig;
use crate::error::BuildError;

#[cfg(feature = "builder")]
pub mod fetch;
pub mod lookup;
pub mod scan;

pub use lookup::{parse_lookup, Lookup};
pub use scan::scan_images;

/// Entry for one scanned file. The acronym is the file stem; a missing lookup
/// row falls back to the acronym as the full name.
pub fn entry_for_file(relative: &str, lookup: &Lookup, url_prefix: &str) -> CatalogEntry {
    let acronym = Path::new(relative)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let full_name = lookup.get(&acronym).cloned().unwrap_or_else(|| acronym.clone());
    CatalogEntry::new(
        format!("{}/{}", url_prefix.trim_end_matches('/'), relative),
        vec![acronym, full_name],
    )
}

pub fn assemble_catalog(files: &[String], lookup: &Lookup, url_prefix: &str) -> Catalog {
    Catalog {
        default_images: files
            .iter()
            .map(|file| entry_for_file(file, lookup, url_prefix))
            .collect(),
        pom_images: bonus::bonus_entries_with_prefix(url_prefix),
    }
}

fn temp_path_for(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "catalog.json".into());
    name.push(".tmp");
    output.with_file_name(name)
}

/// Writes pretty JSON next to `output` and renames it into place.
pub fn write_catalog(output: &Path, catalog: &Catalog) -> Result<(), BuildError> {
    let json = serde_json::to_string_pretty(catalog)?;
    let tmp = temp_path_for(output);
    fs::write(&tmp, json).map_err(|source| BuildError::Io {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, output).map_err(|source| {
        let _ = fs::remove_file(&tmp);
        BuildError::Io {
            path: output.to_path_buf(),
            source,
        }
    })
}

/// Everything after the fetch: parse, scan, assemble, write, then report
/// advisory findings.
pub fn build_from_sheet(
    sheet_text: &str,
    config: &BuilderConfig,
) -> Result<(Catalog, Vec<Finding>), BuildError> {
    let lookup = parse_lookup(sheet_text)?;
    log::info!("parsed {} lookup rows", lookup.len());

    log::info!("scanning images in {}", config.images_dir.display());
    let files = scan_images(&config.images_dir)?;

    let catalog = assemble_catalog(&files, &lookup, &config.url_prefix);
    write_catalog(&config.output, &catalog)?;
    log::info!(
        "wrote {} ({} default, {} bonus)",
        config.output.display(),
        catalog.default_images.len(),
        catalog.pom_images.len()
    );

    let findings = check_catalog(&catalog);
    for finding in &findings {
        log::warn!("{finding}");
    }
    Ok((catalog, findings))
}

/// Full build including the sheet download.
#[cfg(feature = "builder")]
pub async fn build(config: &BuilderConfig) -> Result<(Catalog, Vec<Finding>), BuildError> {
    log::info!("fetching tower names from {}", config.sheet_url);
    let text = fetch::fetch_lookup_text(&config.sheet_url).await?;
    build_from_sheet(&text, config)
}
