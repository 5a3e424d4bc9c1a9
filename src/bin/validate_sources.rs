//! Source Configuration Validator
//!
//! Checks config/sources.yml before a run:
//! - scraper kinds are supported
//! - names and URLs are present and plausible
//! Reports issues and exits non-zero on errors.

use anyhow::{Context, Result};

use chemjobs::storage;

const SUPPORTED_SCRAPERS: &[&str] = &["cen", "chronicle", "higheredjobs", "blogfeed"];

fn main() -> Result<()> {
    let root = std::env::var("ROOT").unwrap_or_else(|_| ".".to_string());

    println!("=== Source Configuration Validator ===");

    let sources = storage::load_sources(&root).context("Failed to load sources.yml")?;

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for source in &sources.sources {
        if !SUPPORTED_SCRAPERS.contains(&source.scraper.as_str()) {
            errors.push(format!(
                "Source '{}' has unsupported scraper type: '{}'. Supported types: {:?}",
                source.name, source.scraper, SUPPORTED_SCRAPERS
            ));
        }

        if source.url.is_empty() {
            errors.push(format!("Source '{}' has empty URL", source.name));
        }

        if source.name.is_empty() {
            errors.push("A source has an empty name".to_string());
        }

        if !source.url.starts_with("http://") && !source.url.starts_with("https://") {
            warnings.push(format!(
                "Source '{}' has URL without http/https scheme: {}",
                source.name, source.url
            ));
        }

        if source.scraper == "blogfeed" && !source.url.contains("feed") {
            warnings.push(format!(
                "Source '{}' uses the feed scraper but its URL does not look like a feed: {}",
                source.name, source.url
            ));
        }

        if !source.enabled {
            warnings.push(format!("Source '{}' is disabled", source.name));
        }
    }

    if errors.is_empty() && warnings.is_empty() {
        println!("All {} sources are valid", sources.sources.len());
        return Ok(());
    }

    if !errors.is_empty() {
        println!("\nERRORS (must fix):");
        for error in &errors {
            println!("  - {}", error);
        }
    }

    if !warnings.is_empty() {
        println!("\nWARNINGS:");
        for warning in &warnings {
            println!("  - {}", warning);
        }
    }

    if !errors.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}
