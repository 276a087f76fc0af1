//! Configuration file loaders.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::types::CopyConfig;

/// Load a configuration file, auto-detecting the format based on extension.
///
/// # Arguments
///
/// * `path` - Path to a `.toml` or `.json` configuration file
///
/// # Errors
///
/// * If the file extension is not supported
/// * If the file cannot be read
/// * If the file cannot be parsed
pub fn load_config(path: &Path) -> Result<CopyConfig, ConfigError> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match extension {
        "toml" => load_toml_config(path),
        "json" => load_json_config(path),
        _ => Err(ConfigError::UnsupportedFormat(extension.to_string())),
    }
}

/// Load a TOML configuration file.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Errors
///
/// * If the file cannot be read
/// * If the file cannot be parsed as TOML
pub fn load_toml_config(path: &Path) -> Result<CopyConfig, ConfigError> {
    log::debug!("Loading TOML config from {}", path.display());

    let content = read(path)?;

    let config: CopyConfig = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    log::debug!("Loaded {} patterns", config.patterns.len());

    Ok(config)
}

/// Load a JSON configuration file.
///
/// # Arguments
///
/// * `path` - Path to the JSON configuration file
///
/// # Errors
///
/// * If the file cannot be read
/// * If the file cannot be parsed as JSON
pub fn load_json_config(path: &Path) -> Result<CopyConfig, ConfigError> {
    log::debug!("Loading JSON config from {}", path.display());

    let content = read(path)?;

    let config: CopyConfig =
        serde_json::from_str(&content).map_err(|e| ConfigError::JsonParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

    log::debug!("Loaded {} patterns", config.patterns.len());

    Ok(config)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })
}
