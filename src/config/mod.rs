//! Generator configuration.
//!
//! Read from a TOML file (`confref.toml` by default). Every field has a
//! default, so an empty or missing file is a valid configuration. The
//! configuration derives `JsonSchema` so the generator can document itself.

mod loading;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::docs::CompileSettings;

/// Settings for a reference generation run.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Directory the reference pages are written to.
    #[schemars(extend("group" = "output"))]
    #[schemars(extend("group_name" = "Output"))]
    pub output_dir: PathBuf,

    /// File extension of generated pages and partials, without the dot.
    #[schemars(extend("group" = "output"))]
    pub extension: String,

    /// File name of the top-level reference page, without extension.
    #[schemars(extend("group" = "output"))]
    pub root_page: String,

    /// Top-level property whose allowed values are the configuration versions.
    #[schemars(extend("group" = "versions"))]
    #[schemars(extend("group_name" = "Versions"))]
    pub version_field: String,

    /// Known configuration versions such as `v1beta11`, in any order.
    /// They are sorted newest first before documentation.
    #[schemars(extend("group" = "versions"))]
    pub versions: Vec<String>,

    /// Schema extension keys used to group fields.
    pub groups: GroupsConfig,
}

/// Schema extension keys that place fields into groups.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct GroupsConfig {
    /// Extension key holding a field's group id.
    pub key: String,

    /// Extension key holding a group's display name.
    pub name_key: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let settings = CompileSettings::default();
        Self {
            output_dir: settings.base_dir,
            extension: settings.extension,
            root_page: settings.root_page,
            version_field: "version".to_string(),
            versions: Vec::new(),
            groups: GroupsConfig::default(),
        }
    }
}

impl Default for GroupsConfig {
    fn default() -> Self {
        let settings = CompileSettings::default();
        Self {
            key: settings.group_key,
            name_key: settings.group_name_key,
        }
    }
}

impl GeneratorConfig {
    /// Compiler settings described by this configuration.
    pub fn compile_settings(&self) -> CompileSettings {
        CompileSettings {
            base_dir: self.output_dir.clone(),
            extension: self.extension.clone(),
            root_page: self.root_page.clone(),
            group_key: self.groups.key.clone(),
            group_name_key: self.groups.name_key.clone(),
        }
    }
}
