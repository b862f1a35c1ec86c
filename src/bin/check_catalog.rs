use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Arg, Command};
use tower_guess::catalog::check_file;
use tower_guess::config::DEFAULT_CATALOG_PATH;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = Command::new("check-catalog")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Reports catalog entries whose accepted answers collide")
        .arg(
            Arg::new("catalog")
                .long("catalog")
                .value_name("FILE")
                .help("Catalog to check")
                .default_value(DEFAULT_CATALOG_PATH),
        )
        .get_matches();

    let path = matches
        .get_one::<String>("catalog")
        .map(PathBuf::from)
        .context("missing --catalog")?;

    // Findings are warnings only; a missing or unreadable file is the sole failure.
    let findings = check_file(&path)
        .with_context(|| format!("Cannot check {} (run generate-catalog first)", path.display()))?;

    if findings.is_empty() {
        println!("✅ No duplicate answers found in either defaultImages or pomImages.");
    } else {
        for finding in &findings {
            println!("⚠️ {finding}");
        }
    }
    Ok(())
}
