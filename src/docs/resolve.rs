//! Default value and enum resolution for scalar fields.

use serde_json::Value;

use crate::schema::SchemaNode;

const BOOLEAN_TYPE: &str = "boolean";

/// Enum listing of a field together with its effective default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedEnum {
    /// String enum values in declaration order.
    pub values: Vec<String>,
    /// Default after enum inference.
    pub default: String,
}

/// Collects the string enum values of `field`.
///
/// When the field is optional and has no default yet, the first enum value
/// becomes the default. Non-string members are skipped.
pub fn resolve_enum(field: &SchemaNode, required: bool, default: String) -> ResolvedEnum {
    let mut default = default;
    let mut values = Vec::with_capacity(field.enum_values.len());

    for (index, value) in field.enum_values.iter().enumerate() {
        let Some(value) = value.as_str() else {
            continue;
        };

        if index == 0 && !required && default.is_empty() {
            default = value.to_string();
        }
        values.push(value.to_string());
    }

    ResolvedEnum { values, default }
}

/// Required flag and default documented for a scalar field.
///
/// Booleans are never documented as required: a required boolean defaults
/// to `true`, an optional one to `false`.
pub fn resolve_default(field: &SchemaNode, display_type: &str, required: bool) -> (bool, String) {
    if display_type == BOOLEAN_TYPE {
        let default = if required { "true" } else { "false" };
        return (false, default.to_string());
    }

    (required, declared_default(field))
}

fn declared_default(field: &SchemaNode) -> String {
    match &field.default {
        Some(Value::String(value)) => value.clone(),
        Some(value @ (Value::Number(_) | Value::Bool(_))) => value.to_string(),
        _ => String::new(),
    }
}
