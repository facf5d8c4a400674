//! Unit tests for config module
//!
//! Tests configuration defaults, TOML parsing and compiler settings.

#![allow(clippy::unwrap_used)]

use std::{fs, path::PathBuf};

use tempfile::TempDir;

use crate::{DocsError, config::GeneratorConfig};

#[test]
fn config_default() {
    let config = GeneratorConfig::default();

    assert_eq!(config.output_dir, PathBuf::from("docs"));
    assert_eq!(config.extension, "mdx");
    assert_eq!(config.root_page, "reference");
    assert_eq!(config.version_field, "version");
    assert!(config.versions.is_empty());
    assert_eq!(config.groups.key, "group");
    assert_eq!(config.groups.name_key, "group_name");
}

#[test]
fn config_empty_toml() {
    let config = GeneratorConfig::from_toml_str("", None).unwrap();
    assert_eq!(config, GeneratorConfig::default());
}

#[test]
fn config_partial_toml() {
    let toml_str = r#"
        output_dir = "site/docs/configuration"
        versions = ["v1beta10", "v2beta1"]

        [groups]
        key = "x-group"
    "#;

    let config = GeneratorConfig::from_toml_str(toml_str, None).unwrap();

    assert_eq!(config.output_dir, PathBuf::from("site/docs/configuration"));
    assert_eq!(config.versions, vec!["v1beta10", "v2beta1"]);
    assert_eq!(config.groups.key, "x-group");
    assert_eq!(config.groups.name_key, "group_name");
    assert_eq!(config.extension, "mdx");
}

#[test]
fn config_serialize_roundtrip() {
    let original = GeneratorConfig {
        versions: vec!["v1".to_string()],
        ..GeneratorConfig::default()
    };

    let toml_str = toml::to_string(&original).unwrap();
    let deserialized = GeneratorConfig::from_toml_str(&toml_str, None).unwrap();

    assert_eq!(original, deserialized);
}

#[test]
fn config_invalid_toml() {
    let invalid_toml = r#"
        output_dir = [
        missing closing bracket
    "#;

    let err = GeneratorConfig::from_toml_str(invalid_toml, None).unwrap_err();

    assert!(matches!(err, DocsError::TomlParseError { ref location, .. } if location == "string"));
}

#[test]
fn config_wrong_value_type() {
    let err = GeneratorConfig::from_toml_str("versions = 3", None).unwrap_err();
    assert!(matches!(err, DocsError::TomlParseError { .. }));
}

#[test]
fn config_load_from_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("confref.toml");
    fs::write(&path, "root_page = \"index\"\n").unwrap();

    let config = GeneratorConfig::load(&path).unwrap();
    assert_eq!(config.root_page, "index");

    let explicit = GeneratorConfig::load_or_default(Some(&path)).unwrap();
    assert_eq!(explicit, config);
}

#[test]
fn config_missing_explicit_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("absent.toml");

    let err = GeneratorConfig::load_or_default(Some(&path)).unwrap_err();
    assert!(matches!(err, DocsError::IoError { .. }));
}

#[test]
fn config_compile_settings() {
    let config = GeneratorConfig::from_toml_str(
        r#"
        output_dir = "out"
        extension = "md"
        root_page = "config"

        [groups]
        key = "section"
        name_key = "section_title"
        "#,
        None,
    )
    .unwrap();

    let settings = config.compile_settings();

    assert_eq!(settings.base_dir, PathBuf::from("out"));
    assert_eq!(settings.extension, "md");
    assert_eq!(settings.root_page, "config");
    assert_eq!(settings.group_key, "section");
    assert_eq!(settings.group_name_key, "section_title");
}
