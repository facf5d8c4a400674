use std::{
    fmt,
    path::{Path, PathBuf},
    result,
};

use thiserror::Error;

/// Error types for reference page generation.
///
/// Every variant aborts the run. Output is regenerated from scratch on the
/// next run, so no partially written tree is ever repaired in place.
#[derive(Error, Debug)]
pub enum DocsError {
    /// Directory creation or file write failed
    #[error("I/O error on '{path}': {details}")]
    IoError {
        /// Path where the I/O error occurred
        path: PathBuf,
        /// I/O error details
        details: String,
    },

    /// The schema document could not be read into a schema tree
    #[error("invalid schema at '{location}': {details}")]
    InvalidSchema {
        /// JSON pointer-ish location inside the schema document
        location: String,
        /// What was wrong with it
        details: String,
    },

    /// Reflecting or serializing a schema failed
    #[error("schema conversion failed for '{source_name}': {details}")]
    SchemaConversion {
        /// Type or file the schema was produced from
        source_name: String,
        /// Conversion error details
        details: String,
    },

    /// A `$ref` chain loops back onto a definition already being expanded
    #[error("cyclic schema definition: {chain}")]
    CyclicSchema {
        /// Definition names along the recursion path, joined with " -> "
        chain: String,
    },

    /// Two distinct schema nodes would write the same output file
    #[error("output path '{path}' would be written twice")]
    PathCollision {
        /// The doubly written path
        path: PathBuf,
    },

    /// Two partials imported into one file would bind the same symbol
    #[error("import symbol '{symbol}' bound twice in '{file}'")]
    ImportCollision {
        /// The doubly bound symbol
        symbol: String,
        /// Page or group file holding both imports
        file: PathBuf,
    },

    /// TOML parsing error with location context
    #[error("failed to parse TOML at '{location}': {details}")]
    TomlParseError {
        /// Location of TOML being parsed (file path or "string")
        location: String,
        /// Parse error details
        details: String,
    },
}

/// A specialized `Result` type for reference generation.
pub type Result<T> = result::Result<T, DocsError>;

impl DocsError {
    /// Creates an I/O error carrying the path that failed.
    pub fn io(error: impl fmt::Display, path: &Path) -> Self {
        DocsError::IoError {
            path: path.to_path_buf(),
            details: error.to_string(),
        }
    }

    /// Creates a TOML parsing error with optional file path context.
    ///
    /// # Arguments
    ///
    /// * `error` - The underlying parsing error
    /// * `path` - Optional path to the file that failed to parse
    pub fn toml_parse(error: impl fmt::Display, path: Option<&Path>) -> Self {
        let location = match path {
            Some(p) => {
                let clean_path = p.canonicalize().unwrap_or_else(|_| p.to_path_buf());
                clean_path.to_string_lossy().to_string()
            }
            None => "string".to_string(),
        };

        DocsError::TomlParseError {
            location,
            details: error.to_string(),
        }
    }

    /// Creates an invalid schema error at the given location.
    pub fn invalid_schema(location: impl Into<String>, details: impl Into<String>) -> Self {
        DocsError::InvalidSchema {
            location: location.into(),
            details: details.into(),
        }
    }
}
