//! Configuration loading and root folder resolution
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing config file is not an error; defaults apply.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::{Error, Result};

/// Environment variable overriding the root folder
pub const ENV_ROOT_FOLDER: &str = "SHOWTRACK_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DB_FILE_NAME: &str = "showtrack.db";

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    /// tracing filter directive, e.g. "info" or "showtrack_dash=debug"
    pub log_level: Option<String>,
}

impl TomlConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
    }
}

/// Load the TOML config
///
/// With `explicit_path` the file must exist. Without it the platform default
/// location is tried and silently skipped when absent.
pub fn load_toml_config(explicit_path: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit_path {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => {
                debug!("No config file found, using defaults");
                return Ok(TomlConfig::default());
            }
        },
    };

    let content = std::fs::read_to_string(&path)?;
    let config = TomlConfig::from_toml_str(&content)?;
    debug!("Loaded config file {}", path.display());
    Ok(config)
}

/// Resolve the root folder following the priority order above
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    config: &TomlConfig,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
        warn!("{} is set but empty, ignoring", env_var_name);
    }

    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// Database file location for a root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join(DB_FILE_NAME)
}

/// `<config dir>/showtrack/config.toml`, or /etc/showtrack on Linux systems
/// without a user-level file
fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("showtrack").join("config.toml"));

    if cfg!(target_os = "linux") {
        if let Some(path) = &user_config {
            if path.exists() {
                return user_config;
            }
        }
        return Some(PathBuf::from("/etc/showtrack/config.toml"));
    }

    user_config
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("showtrack"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/showtrack"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("showtrack"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/showtrack"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("showtrack"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\showtrack"))
    } else {
        PathBuf::from("./showtrack_data")
    }
}
