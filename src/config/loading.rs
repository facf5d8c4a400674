use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use super::GeneratorConfig;
use crate::{DocsError, Result};

impl GeneratorConfig {
    /// Config file looked up in the working directory when none is given.
    pub const DEFAULT_PATH: &'static str = "confref.toml";

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `DocsError::IoError` if the file cannot be read and
    /// `DocsError::TomlParseError` if it is not a valid configuration.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| DocsError::io(err, path))?;
        Self::from_toml_str(&content, Some(path))
    }

    /// Loads `path` if given, otherwise [`Self::DEFAULT_PATH`] if it exists,
    /// otherwise the defaults.
    ///
    /// An explicitly given path must exist.
    ///
    /// # Errors
    ///
    /// Same as [`GeneratorConfig::load`].
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let default_path = PathBuf::from(Self::DEFAULT_PATH);
        if default_path.exists() {
            return Self::load(&default_path);
        }

        debug!("No {} found, using defaults", Self::DEFAULT_PATH);
        Ok(Self::default())
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `DocsError::TomlParseError` if the text is not a valid
    /// configuration.
    pub fn from_toml_str(content: &str, path: Option<&Path>) -> Result<Self> {
        toml::from_str(content).map_err(|err| DocsError::toml_parse(err, path))
    }
}
