//! `goml.json` project configuration.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Settings shared by every command.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    /// Element names accepted by the parser.
    #[serde(default)]
    pub(crate) definitions: Vec<String>,
    /// Files holding prefab definitions, parsed before the input file.
    #[serde(default)]
    pub(crate) prefabs: Vec<PathBuf>,
}

/// Failure to load a config file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file is not a valid config.
    #[error("invalid config '{}'", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Config {
    /// Read `path`. Relative prefab paths are resolved against the config
    /// file's directory.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for prefab in &mut config.prefabs {
            if prefab.is_relative() {
                *prefab = base.join(&*prefab);
            }
        }
        log::debug!(
            "config '{}': {} definitions, {} prefab files",
            path.display(),
            config.definitions.len(),
            config.prefabs.len()
        );
        Ok(config)
    }
}
