// Configuration sources
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Toml, Yaml};
use figment::Figment;

use crate::error::{ConfigError, Result};

pub const ENV_PREFIX: &str = "PRACTICE_";

/// A layer of configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// File that may be absent; YAML unless the extension is `.toml`
    File(PathBuf),
    /// File that must exist, e.g. one passed explicitly on the command line
    RequiredFile(PathBuf),
    /// Prefixed environment variables
    Env { prefix: String },
}

impl ConfigSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn required_file(path: impl Into<PathBuf>) -> Self {
        Self::RequiredFile(path.into())
    }

    pub fn env() -> Self {
        Self::Env {
            prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Merge this source on top of `figment`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SourceNotFound`] for a missing required file.
    pub fn merge_into(&self, figment: Figment) -> Result<Figment> {
        match self {
            Self::File(path) => Ok(merge_file(figment, path)),
            Self::RequiredFile(path) => {
                if !path.is_file() {
                    return Err(ConfigError::SourceNotFound(path.display().to_string()));
                }
                Ok(merge_file(figment, path))
            }
            Self::Env { prefix } => Ok(figment.merge(Env::prefixed(prefix).split("__"))),
        }
    }
}

fn merge_file(figment: Figment, path: &Path) -> Figment {
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    if is_toml {
        figment.merge(Toml::file(path))
    } else {
        figment.merge(Yaml::file(path))
    }
}
