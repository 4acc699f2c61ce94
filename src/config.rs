//! Optional project configuration (`.relver.toml`).
//!
//! Carries VersionPolicy defaults so a project does not repeat `--hash-length`
//! and friends on every invocation. CLI flags override individual fields
//! after loading.
//!
//! ```toml
//! [policy]
//! hash_length = 8
//! build_number_length = 4
//! build_number_prefix = "b"
//! ```

use crate::derive::VersionPolicy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILENAME: &str = ".relver.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config ({path}): {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml_edit::de::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    policy: VersionPolicy,
}

/// Load the policy defaults for the project at `dir`.
///
/// A missing config file is the default policy; a present but invalid one
/// is an error (silently ignoring a typo'd config would derive wrong
/// versions).
pub fn load_policy(dir: &Path) -> Result<VersionPolicy, ConfigError> {
    let path = dir.join(CONFIG_FILENAME);
    if !path.exists() {
        return Ok(VersionPolicy::default());
    }

    let contents = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    let config: ConfigFile =
        toml_edit::de::from_str(&contents).map_err(|source| ConfigError::Toml {
            path: path.clone(),
            source,
        })?;
    Ok(config.policy)
}
