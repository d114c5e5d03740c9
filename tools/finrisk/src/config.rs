use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use medi_data::ObservationCodes;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE: &str = "finrisk.toml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Bundle file or directory of bundles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle: Option<PathBuf>,

    pub output: OutputMode,

    pub codes: ObservationCodes,
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bundle = self
            .bundle
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        write!(f, "bundle={bundle}, output={:?}", self.output)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub fn parse_config(text: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(text)
}

/// Load `explicit`, or `finrisk.toml` in `dir` if present, or the defaults.
///
/// A relative `bundle` path is resolved against the config file's directory.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<Config, ConfigError> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let default = dir.join(CONFIG_FILE);
            if !default.exists() {
                log::debug!("no {CONFIG_FILE} in {}, using defaults", dir.display());
                return Ok(Config::default());
            }
            default
        }
    };

    let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    let mut config = parse_config(&text).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;

    let resolved = match (&config.bundle, path.parent()) {
        (Some(bundle), Some(base)) if bundle.is_relative() => Some(base.join(bundle)),
        _ => None,
    };
    if resolved.is_some() {
        config.bundle = resolved;
    }
    log::info!("loaded {}: {config}", path.display());
    Ok(config)
}
