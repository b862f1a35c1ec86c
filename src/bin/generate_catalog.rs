use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Arg, Command};
use tower_guess::builder;
use tower_guess::config::{
    BuilderConfig, DEFAULT_IMAGES_DIR, DEFAULT_SHEET_URL, DEFAULT_URL_PREFIX,
};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = Command::new("generate-catalog")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Builds towers.json from the tower name sheet and the image folder")
        .arg(
            Arg::new("sheet-url")
                .long("sheet-url")
                .value_name("URL")
                .help("CSV export of the acronym / full name sheet")
                .default_value(DEFAULT_SHEET_URL),
        )
        .arg(
            Arg::new("images-dir")
                .long("images-dir")
                .value_name("DIR")
                .help("Image root to scan (PoM/ is skipped)")
                .default_value(DEFAULT_IMAGES_DIR),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .value_name("FILE")
                .help("Catalog path [default: <images-dir>/towers.json]"),
        )
        .arg(
            Arg::new("url-prefix")
                .long("url-prefix")
                .value_name("PREFIX")
                .help("URL prefix the site serves the image root under")
                .default_value(DEFAULT_URL_PREFIX),
        )
        .get_matches();

    let images_dir = matches
        .get_one::<String>("images-dir")
        .map(PathBuf::from)
        .context("missing --images-dir")?;
    let mut config = BuilderConfig::new(images_dir);
    if let Some(url) = matches.get_one::<String>("sheet-url") {
        config.sheet_url = url.clone();
    }
    if let Some(output) = matches.get_one::<String>("output") {
        config.output = PathBuf::from(output);
    }
    if let Some(prefix) = matches.get_one::<String>("url-prefix") {
        config.url_prefix = prefix.clone();
    }

    let (_, findings) = builder::build(&config)
        .await
        .with_context(|| format!("Failed to build {}", config.output.display()))?;

    println!("✅ towers.json generated at {}", config.output.display());
    if !findings.is_empty() {
        println!("⚠️ {} suspect entries (run check-catalog for details)", findings.len());
    }
    Ok(())
}
