//! confref - configuration reference page compiler.
//!
//! Turns a configuration JSON schema into cross-referencing MDX pages: one
//! reference page per nesting level, one partial per field, and one
//! aggregate partial per field group. Schemas come from JSON files or from
//! any Rust type deriving `schemars::JsonSchema`.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use confref::{config::GeneratorConfig, docs::DocsGenerator, schema::reflect};
//!
//! let document = reflect::schema_document_for::<GeneratorConfig>()?;
//! let written = DocsGenerator::default()
//!     .with_output_dir("docs/configuration")
//!     .generate(document)?;
//! println!("Wrote {written} files");
//! # Ok::<(), confref::DocsError>(())
//! ```

/// Generator configuration loaded from TOML.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// Reference page compilation.
pub mod docs;

/// Schema tree model, parsing and reflection.
pub mod schema;

/// Logging setup for the binaries.
pub mod tracing_config;

/// Re-exported core types for convenience.
pub use crate::core::{DocsError, Result};
