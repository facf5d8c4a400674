//! Schema extraction from Rust configuration types.
//!
//! Any type deriving [`schemars::JsonSchema`] can be documented. Doc comments
//! on fields become descriptions, and extension keys are attached with
//! `#[schemars(extend("group" = "net"))]`.

use schemars::{JsonSchema, schema_for};

use super::SchemaDocument;
use crate::{DocsError, Result};

/// Reflects `T` into a [`SchemaDocument`].
///
/// # Errors
///
/// Returns `DocsError::SchemaConversion` if the generated schema cannot be
/// serialized, or `DocsError::InvalidSchema` if it cannot be read back.
pub fn schema_document_for<T: JsonSchema>() -> Result<SchemaDocument> {
    let schema = schema_for!(T);
    let value = serde_json::to_value(&schema).map_err(|err| DocsError::SchemaConversion {
        source_name: T::schema_name().to_string(),
        details: err.to_string(),
    })?;

    SchemaDocument::from_value(&value)
}

/// Reflects `T` into pretty printed JSON.
///
/// # Errors
///
/// Returns `DocsError::SchemaConversion` if serialization fails.
pub fn schema_json_for<T: JsonSchema>() -> Result<String> {
    serde_json::to_string_pretty(&schema_for!(T)).map_err(|err| DocsError::SchemaConversion {
        source_name: T::schema_name().to_string(),
        details: err.to_string(),
    })
}
