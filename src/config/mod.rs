use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::mapping::VerticalAxis;
use crate::region::RegionKind;
use crate::render::DEFAULT_FILTER_STRENGTH;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("neither XDG_CONFIG_HOME nor HOME is set")]
    MissingHomeDirectory,
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

const APP_DIR: &str = "redactor";
const APP_CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub default_kind: RegionKind,
    pub filter_strength: f64,
    /// Maximum number of undo entries; unlimited when absent.
    pub history_limit: Option<usize>,
    pub view_axis: VerticalAxis,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_kind: RegionKind::default(),
            filter_strength: DEFAULT_FILTER_STRENGTH,
            history_limit: None,
            view_axis: VerticalAxis::default(),
        }
    }
}

/// Falls back to defaults when the file is missing or invalid.
pub(crate) fn load_config() -> EngineConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_config_with(xdg_config_home: Option<&Path>, home: Option<&Path>) -> EngineConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(path) => path,
        Err(err) => {
            tracing::debug!(%err, "no config directory; using defaults");
            return EngineConfig::default();
        }
    };
    if !path.exists() {
        return EngineConfig::default();
    }
    read_config(&path).unwrap_or_else(|err| {
        tracing::warn!(%err, "invalid config.json; using defaults");
        EngineConfig::default()
    })
}

pub(crate) fn read_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(?path, ?config, "loaded config");
    Ok(config)
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(xdg_config_home: Option<&Path>, home: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}
