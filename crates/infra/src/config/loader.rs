//! Configuration loader
//!
//! Loads platform connection settings from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Searches multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! Each setting is read from the `TENANTFORM_` name first, then from the
//! `CIDAAS_` name where one exists.
//! - `TENANTFORM_HOST` / `CIDAAS_HOST`: Tenant base URL
//! - `TENANTFORM_CLIENT_ID` / `CIDAAS_CLIENT_ID`: OAuth2 client id
//! - `TENANTFORM_CLIENT_SECRET` / `CIDAAS_CLIENT_SECRET`: OAuth2 client secret
//! - `TENANTFORM_TIMEOUT_SECS`: Request timeout in seconds (optional)
//! - `TENANTFORM_HOSTED_PAGES_API`: `v3` or `legacy` (optional)
//! - `TENANTFORM_TEMPLATE_GROUPS_API`: `notifications` or `legacy` (optional)
//!
//! ## File Locations
//! The loader searches the following paths (in order):
//! 1. `./tenantform.json` or `./tenantform.toml` (current working directory)
//! 2. `../tenantform.json` or `../tenantform.toml` (parent directory)
//! 3. `../../tenantform.json` or `../../tenantform.toml` (grandparent)
//! 4. The same names relative to the executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tenantform_domain::{
    ApiVersions, PlatformConfig, ReconcileError, Result, DEFAULT_TIMEOUT_SECS,
};

const FILE_NAMES: [&str; 2] = ["tenantform.json", "tenantform.toml"];

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `ReconcileError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<PlatformConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Host, client id and client secret must be present; the rest fall back
/// to their defaults.
///
/// # Errors
/// Returns `ReconcileError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<PlatformConfig> {
    let host = env_var("TENANTFORM_HOST", Some("CIDAAS_HOST"))?;
    let client_id = env_var("TENANTFORM_CLIENT_ID", Some("CIDAAS_CLIENT_ID"))?;
    let client_secret = env_var("TENANTFORM_CLIENT_SECRET", Some("CIDAAS_CLIENT_SECRET"))?;

    let timeout_secs = optional_env("TENANTFORM_TIMEOUT_SECS")
        .map(|s| {
            s.parse::<u64>()
                .map_err(|e| ReconcileError::Config(format!("Invalid timeout: {}", e)))
        })
        .transpose()?
        .unwrap_or(DEFAULT_TIMEOUT_SECS);

    let api = ApiVersions {
        hosted_pages: env_keyword("TENANTFORM_HOSTED_PAGES_API")?.unwrap_or_default(),
        template_groups: env_keyword("TENANTFORM_TEMPLATE_GROUPS_API")?.unwrap_or_default(),
    };

    let config = PlatformConfig { host, client_id, client_secret, timeout_secs, api };
    config.validate().map_err(ReconcileError::Config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, searches multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `ReconcileError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<PlatformConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ReconcileError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => search_config_paths().ok_or_else(|| {
            ReconcileError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ReconcileError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate().map_err(ReconcileError::Config)?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<PlatformConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ReconcileError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ReconcileError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(ReconcileError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Search multiple paths for configuration files
///
/// Searches the working directory and its two parents, then the
/// executable's directory and its two parents.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn search_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            roots.push(exe_dir.to_path_buf());
        }
    }

    roots
        .iter()
        .flat_map(|root| ["", "..", "../.."].into_iter().map(move |up| root.join(up)))
        .flat_map(|dir| FILE_NAMES.into_iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get a required environment variable, trying `fallback` when `key` is
/// unset or blank.
///
/// # Errors
/// Returns `ReconcileError::Config` if neither variable is set.
fn env_var(key: &str, fallback: Option<&str>) -> Result<String> {
    optional_env(key).or_else(|| fallback.and_then(optional_env)).ok_or_else(|| {
        ReconcileError::Config(format!("Missing required environment variable: {}", key))
    })
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse an optional keyword enum from an environment variable.
fn env_keyword<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr<Err = String>,
{
    optional_env(key)
        .map(|value| value.parse::<T>().map_err(|e| ReconcileError::Config(format!("{key}: {e}"))))
        .transpose()
}
