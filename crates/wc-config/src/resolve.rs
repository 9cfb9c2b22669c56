//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG config dir.
//! There is no built-in default model: rate and shape must come from somewhere.

use std::path::{Path, PathBuf};

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Nothing found.
    #[default]
    NotFound,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::NotFound => write!(f, "not found"),
        }
    }
}

/// A resolved configuration path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPath {
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Environment variable names.
pub const ENV_CONFIG_PATH: &str = "WEIBULL_COUNT_CONFIG";
pub const ENV_CONFIG_DIR: &str = "WEIBULL_COUNT_CONFIG_DIR";

/// Standard config file names, in lookup order.
const CONFIG_FILENAMES: [&str; 2] = ["weibull-count.json", "weibull-count.toml"];

/// Application name for XDG directories.
const APP_NAME: &str = "weibull-count";

/// Resolve the configuration path.
///
/// 1. Explicit CLI path (if it exists)
/// 2. `WEIBULL_COUNT_CONFIG` (direct path)
/// 3. `WEIBULL_COUNT_CONFIG_DIR` + standard filename
/// 4. XDG config directory (`~/.config/weibull-count/`)
pub fn resolve_config(cli_path: Option<&Path>) -> ConfigPath {
    if let Some(path) = cli_path {
        if path.exists() {
            return found(path.to_path_buf(), ConfigSource::CliArgument);
        }
        tracing::warn!(
            target: "wc_config::resolve",
            path = %path.display(),
            "config path given on the command line does not exist"
        );
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return found(path, ConfigSource::Environment);
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        if let Some(path) = first_existing(Path::new(&config_dir)) {
            return found(path, ConfigSource::Environment);
        }
    }

    if let Some(dir) = xdg_config_dir() {
        if let Some(path) = first_existing(&dir) {
            return found(path, ConfigSource::XdgConfig);
        }
    }

    ConfigPath::default()
}

fn found(path: PathBuf, source: ConfigSource) -> ConfigPath {
    tracing::debug!(
        target: "wc_config::resolve",
        path = %path.display(),
        %source,
        "resolved config path"
    );
    ConfigPath {
        path: Some(path),
        source,
    }
}

fn first_existing(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILENAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|p| p.exists())
}

/// Get the XDG config directory for weibull-count.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}
