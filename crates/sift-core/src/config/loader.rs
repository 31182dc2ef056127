//! Loading options from files and environment variables

use super::options::AnalysisOptions;
use crate::error::{SiftError, SiftResult};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Environment variable prefix for option overrides
pub const ENV_PREFIX: &str = "SIFT_";

/// Load options from a file
///
/// Supports JSON, TOML, and YAML formats based on file extension.
/// Returns default options if the file doesn't exist.
pub fn load_from_file(path: &Path) -> SiftResult<AnalysisOptions> {
    if !path.exists() {
        tracing::debug!("Config file {} not found, using defaults", path.display());
        return Ok(AnalysisOptions::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        SiftError::config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let options = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| {
            SiftError::config(format!(
                "Failed to parse TOML config '{}': {}",
                path.display(),
                e
            ))
        })?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| {
            SiftError::config(format!(
                "Failed to parse YAML config '{}': {}",
                path.display(),
                e
            ))
        })?,
        _ => serde_json::from_str(&content).map_err(|e| {
            SiftError::config(format!(
                "Failed to parse JSON config '{}': {}",
                path.display(),
                e
            ))
        })?,
    };

    Ok(options)
}

/// Apply `SIFT_*` overrides from the process environment
pub fn apply_env_overrides(options: AnalysisOptions) -> SiftResult<AnalysisOptions> {
    apply_overrides_from(options, |key| std::env::var(key).ok())
}

/// Apply `SIFT_*` overrides using an arbitrary variable lookup
pub fn apply_overrides_from<F>(mut options: AnalysisOptions, lookup: F) -> SiftResult<AnalysisOptions>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = parse_var(&lookup, "CONCURRENT_LIMIT")? {
        options.concurrent_limit = v;
    }
    if let Some(v) = parse_var(&lookup, "BATCH_SIZE")? {
        options.batch_size = v;
    }
    if let Some(v) = parse_var(&lookup, "MAX_BATCH_BYTES")? {
        options.max_batch_bytes = v;
    }
    if let Some(v) = parse_var(&lookup, "MAX_FILE_SIZE")? {
        options.max_file_size = v;
    }
    if let Some(v) = parse_var(&lookup, "MAX_RETRIES")? {
        options.max_retries = v;
    }
    if let Some(v) = parse_var(&lookup, "RETRY_DELAY_MS")? {
        options.retry_delay_ms = v;
    }
    if let Some(v) = parse_var(&lookup, "BATCH_DELAY_MS")? {
        options.batch_delay_ms = v;
    }
    Ok(options)
}

fn parse_var<T, F>(lookup: &F, name: &str) -> SiftResult<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let key = format!("{}{}", ENV_PREFIX, name);
    match lookup(&key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| SiftError::config(format!("Invalid {} value: '{}'", key, raw))),
        None => Ok(None),
    }
}

/// Load options from an optional file, then apply environment overrides
pub fn load_options(path: Option<&Path>) -> SiftResult<AnalysisOptions> {
    let options = match path {
        Some(path) => load_from_file(path)?,
        None => AnalysisOptions::default(),
    };
    apply_env_overrides(options)
}
