//! Display types, anchors and generated names.

use std::path::{Component, Path};

use inflector::string::singularize::to_singular;

use crate::schema::SchemaNode;

const UNION_SEPARATOR: &str = "|";
const ANCHOR_SEPARATOR: &str = "-";
const FALLBACK_TYPE: &str = "object";
const IMPORT_NAME_PREFIX: &str = "Partial";

/// Returns the English singular of a plural field name.
///
/// `services` becomes `service`, `images` becomes `image`.
pub fn singularize(plural: &str) -> String {
    to_singular(plural)
}

/// Placeholder key shown for entries of a name-keyed map, e.g. `<service_name>`.
pub fn map_key_placeholder(field_name: &str) -> String {
    format!("<{}_name>", singularize(field_name))
}

/// Resolves the type string documented for a field.
///
/// Arrays become `<item>[]`, unions join their member types with `|`, and
/// name-keyed maps become `<singular_name>:<value type>`.
pub fn display_type(field_name: &str, field: &SchemaNode) -> String {
    if let Some(value) = field.map_value() {
        let value_type = if value.type_name.is_empty() {
            FALLBACK_TYPE
        } else {
            value.type_name.as_str()
        };
        return format!("{}:{value_type}", map_key_placeholder(field_name));
    }

    let type_name = if field.type_name.is_empty() {
        union_type(field)
    } else {
        field.type_name.clone()
    };

    if type_name == "array" {
        return match field.items.as_deref() {
            Some(items) if !items.type_name.is_empty() => format!("{}[]", items.type_name),
            _ => format!("{FALLBACK_TYPE}[]"),
        };
    }

    type_name
}

fn union_type(field: &SchemaNode) -> String {
    field
        .one_of
        .iter()
        .map(|member| member.type_name.as_str())
        .collect::<Vec<_>>()
        .join(UNION_SEPARATOR)
}

/// Stable anchor id for a field below `path`.
pub fn anchor(path: &[String], field_name: &str) -> String {
    path.iter()
        .map(String::as_str)
        .chain([field_name])
        .collect::<Vec<_>>()
        .join(ANCHOR_SEPARATOR)
}

/// Symbol an MDX page binds an imported partial to.
///
/// Built from the partial's path relative to the output base, without its
/// extension, so every output file gets its own symbol.
pub fn import_name(relative_file: &Path) -> String {
    let stem = relative_file.with_extension("");
    let mut name = String::from(IMPORT_NAME_PREFIX);

    for word in stem
        .to_string_lossy()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
    {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
    }

    name
}

/// Path of `target` as seen from the directory containing `from_file`.
///
/// Always starts with `./` or `../` and uses forward slashes.
pub fn relative_import_path(from_file: &Path, target: &Path) -> String {
    let from_dir: Vec<Component<'_>> = from_file
        .parent()
        .map(|dir| dir.components().collect())
        .unwrap_or_default();
    let target_parts: Vec<Component<'_>> = target.components().collect();

    let shared = from_dir
        .iter()
        .zip(&target_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    if shared == from_dir.len() {
        parts.push(".".to_string());
    } else {
        parts.extend((shared..from_dir.len()).map(|_| "..".to_string()));
    }
    parts.extend(
        target_parts[shared..]
            .iter()
            .map(|part| part.as_os_str().to_string_lossy().to_string()),
    );

    parts.join("/")
}
