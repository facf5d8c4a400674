//! Reference documentation generation for configuration schemas.
//!
//! Compiles a [`SchemaDocument`](crate::schema::SchemaDocument) into one
//! page per schema level, one partial per field and one aggregate partial
//! per field group, all cross-linked with import/embed statements.

mod field;
mod generator;
mod group;
mod naming;
mod output;
mod page;
mod resolve;
mod templates;
mod versions;

pub use generator::DocsGenerator;
pub use group::{Group, GroupCollector};
pub use naming::{
    anchor, display_type, import_name, map_key_placeholder, relative_import_path, singularize,
};
pub use output::{DocsSink, FsSink, MemorySink};
pub use page::{CompileSettings, ReferenceCompiler};
pub use resolve::{ResolvedEnum, resolve_default, resolve_enum};
pub use templates::{FieldBlock, MdxRenderer, Renderer};
pub use versions::{apply_version_enum, sort_versions};
