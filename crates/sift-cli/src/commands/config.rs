//! Configuration management commands

use crate::console::CliConsole;
use sift_core::config::loader::ENV_PREFIX;
use sift_core::{SiftError, SiftResult, load_options};
use std::path::Path;

/// Show the effective options as TOML
pub async fn show(config: &Path) -> SiftResult<()> {
    let console = CliConsole::new(true);

    console.print_header("Configuration");
    if config.exists() {
        console.success(&format!("Loaded configuration from: {}", config.display()));
    } else {
        console.warn(&format!("Configuration file not found: {}", config.display()));
        console.info("Using default configuration");
    }
    console.info(&format!("{}* environment variables override file values", ENV_PREFIX));

    let options = load_options(Some(config))?;
    options.validate()?;

    let rendered = toml::to_string_pretty(&options)
        .map_err(|e| SiftError::config(format!("Failed to render configuration: {}", e)))?;
    println!();
    println!("{}", rendered);
    Ok(())
}
