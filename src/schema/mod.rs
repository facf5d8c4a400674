//! Schema tree parsing for JSON Schema documents.
//!
//! Reads a JSON Schema document (as produced by `schemars` or written by
//! hand) into an ordered [`SchemaNode`] tree plus a [`Definitions`] table.
//! Property order is taken from the document, so `serde_json` must be built
//! with `preserve_order`.

pub mod reflect;

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::{DocsError, Result};

/// Pattern key that marks a "map keyed by arbitrary name".
pub const CATCH_ALL_PATTERN: &str = ".*";

const NULL_TYPE: &str = "null";
const OBJECT_TYPE: &str = "object";
const TYPE_SEPARATOR: &str = "|";

/// Standard keywords that never end up in [`SchemaNode::extras`].
const KNOWN_KEYWORDS: &[&str] = &[
    "$schema",
    "$id",
    "$ref",
    "$defs",
    "$comment",
    "definitions",
    "title",
    "description",
    "type",
    "properties",
    "items",
    "patternProperties",
    "additionalProperties",
    "oneOf",
    "anyOf",
    "allOf",
    "required",
    "default",
    "enum",
    "const",
    "format",
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "minLength",
    "maxLength",
    "minItems",
    "maxItems",
    "uniqueItems",
    "pattern",
    "examples",
    "deprecated",
    "readOnly",
    "writeOnly",
];

/// One node of a configuration schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaNode {
    /// Declared type. Empty when the node is a `$ref` or a union.
    pub type_name: String,
    /// Object properties in document order.
    pub properties: Vec<(String, SchemaNode)>,
    /// Item schema for arrays.
    pub items: Option<Box<SchemaNode>>,
    /// Pattern-keyed value schemas in document order.
    pub pattern_properties: Vec<(String, SchemaNode)>,
    /// Raw `$ref` pointer.
    pub reference: Option<String>,
    /// Union members, used only for their types.
    pub one_of: Vec<SchemaNode>,
    /// Names of required properties.
    pub required: Vec<String>,
    /// Declared default value.
    pub default: Option<Value>,
    /// Enum values in declaration order.
    pub enum_values: Vec<Value>,
    /// Human readable description.
    pub description: String,
    /// Non-standard keys such as `group` and `group_name`.
    pub extras: Map<String, Value>,
}

impl SchemaNode {
    /// Parses a schema node from a JSON value.
    ///
    /// `location` is used in error messages only.
    ///
    /// # Errors
    ///
    /// Returns `DocsError::InvalidSchema` if a keyword has the wrong shape.
    pub fn from_value(value: &Value, location: &str) -> Result<Self> {
        let object = match value {
            Value::Object(object) => object,
            Value::Bool(_) => return Ok(Self::default()),
            other => {
                return Err(DocsError::invalid_schema(
                    location,
                    format!("expected a schema object, found {other}"),
                ));
            }
        };

        let mut node = SchemaNode {
            type_name: parse_type(object.get("type"), location)?,
            description: get_str(object, "description").unwrap_or_default().to_string(),
            reference: get_str(object, "$ref").map(str::to_string),
            default: object.get("default").cloned(),
            required: parse_required(object.get("required"), location)?,
            ..Self::default()
        };

        if let Some(properties) = object.get("properties") {
            node.properties = parse_named(properties, &format!("{location}/properties"))?;
        }

        if let Some(patterns) = object.get("patternProperties") {
            node.pattern_properties =
                parse_named(patterns, &format!("{location}/patternProperties"))?;
        }

        if let Some(additional @ Value::Object(_)) = object.get("additionalProperties") {
            if node.properties.is_empty() && node.map_value().is_none() {
                let value_schema =
                    Self::from_value(additional, &format!("{location}/additionalProperties"))?;
                node.pattern_properties
                    .push((CATCH_ALL_PATTERN.to_string(), value_schema));
            }
        }

        if let Some(items) = object.get("items") {
            let items_location = format!("{location}/items");
            let items = match items {
                Value::Array(tuple) => tuple.first().unwrap_or(&Value::Bool(true)),
                single => single,
            };
            node.items = Some(Box::new(Self::from_value(items, &items_location)?));
        }

        match object.get("enum") {
            Some(Value::Array(values)) => node.enum_values = values.clone(),
            Some(other) => {
                return Err(DocsError::invalid_schema(
                    format!("{location}/enum"),
                    format!("expected an array, found {other}"),
                ));
            }
            None => {
                if let Some(constant) = object.get("const") {
                    node.enum_values = vec![constant.clone()];
                }
            }
        }

        let union = object.get("oneOf").map(|members| (members, "oneOf"));
        if let Some((members, keyword)) = union.or(object.get("anyOf").map(|m| (m, "anyOf"))) {
            node.apply_union(members, &format!("{location}/{keyword}"))?;
        }

        node.extras = object
            .iter()
            .filter(|(key, _)| !KNOWN_KEYWORDS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(node)
    }

    /// Looks up a property by name.
    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties
            .iter()
            .find(|(property_name, _)| property_name == name)
            .map(|(_, property)| property)
    }

    /// Mutable variant of [`SchemaNode::property`].
    pub fn property_mut(&mut self, name: &str) -> Option<&mut SchemaNode> {
        self.properties
            .iter_mut()
            .find(|(property_name, _)| property_name == name)
            .map(|(_, property)| property)
    }

    /// Whether `name` is listed as required on this node.
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|required| required == name)
    }

    /// Value schema of a name-keyed map, if this node is one.
    pub fn map_value(&self) -> Option<&SchemaNode> {
        self.pattern_properties
            .iter()
            .find(|(pattern, _)| pattern == CATCH_ALL_PATTERN)
            .map(|(_, value)| value)
    }

    /// Mutable variant of [`SchemaNode::map_value`].
    pub fn map_value_mut(&mut self) -> Option<&mut SchemaNode> {
        self.pattern_properties
            .iter_mut()
            .find(|(pattern, _)| pattern == CATCH_ALL_PATTERN)
            .map(|(_, value)| value)
    }

    /// Whether this node has anything to document one level down.
    pub fn has_fields(&self) -> bool {
        !self.properties.is_empty() || self.map_value().is_some()
    }

    /// Whether a field resolving to this definition gets its own page.
    ///
    /// Objects nest even without declared fields; enums, unions and typed
    /// scalars are documented in place.
    pub fn is_nested_definition(&self) -> bool {
        if self.has_fields() {
            return true;
        }

        self.enum_values.is_empty()
            && self.one_of.is_empty()
            && (self.type_name.is_empty() || self.type_name == OBJECT_TYPE)
    }

    /// Copy of `definition` as seen through this referencing node.
    ///
    /// The referencing node's description, default and extension keys take
    /// precedence over the definition's.
    pub fn inline_reference(&self, definition: &SchemaNode) -> SchemaNode {
        let mut inlined = definition.clone();

        if !self.description.is_empty() {
            inlined.description = self.description.clone();
        }
        if self.default.is_some() {
            inlined.default = self.default.clone();
        }
        for (key, value) in &self.extras {
            inlined.extras.insert(key.clone(), value.clone());
        }

        inlined
    }

    /// String value of an extension key.
    pub fn extension_str(&self, key: &str) -> Option<&str> {
        self.extras.get(key).and_then(Value::as_str)
    }

    fn apply_union(&mut self, members: &Value, location: &str) -> Result<()> {
        let Value::Array(raw_members) = members else {
            return Err(DocsError::invalid_schema(
                location,
                format!("expected an array, found {members}"),
            ));
        };

        let all_constants = !raw_members.is_empty()
            && raw_members
                .iter()
                .all(|member| member.get("const").is_some_and(Value::is_string));

        if all_constants {
            self.enum_values = raw_members
                .iter()
                .filter_map(|member| member.get("const").cloned())
                .collect();
            if self.type_name.is_empty() {
                self.type_name = "string".to_string();
            }
            return Ok(());
        }

        let mut parsed = Vec::with_capacity(raw_members.len());
        for (index, member) in raw_members.iter().enumerate() {
            let member = Self::from_value(member, &format!("{location}/{index}"))?;
            if member.type_name != NULL_TYPE {
                parsed.push(member);
            }
        }

        if let [single] = parsed.as_slice() {
            if self.reference.is_none() && single.reference.is_some() {
                self.reference = single.reference.clone();
                return Ok(());
            }
        }

        self.one_of = parsed;
        Ok(())
    }
}

/// Named definitions a `$ref` can point at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Definitions(BTreeMap<String, SchemaNode>);

impl Definitions {
    /// Resolves a `$ref` pointer by its last path segment.
    ///
    /// Returns the definition name along with the node.
    pub fn resolve(&self, reference: &str) -> Option<(&str, &SchemaNode)> {
        let name = reference.rsplit('/').next().unwrap_or(reference);
        self.0
            .get_key_value(name)
            .map(|(name, node)| (name.as_str(), node))
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, SchemaNode)> for Definitions {
    fn from_iter<I: IntoIterator<Item = (String, SchemaNode)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A root schema together with its definitions table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaDocument {
    /// The top-level configuration object.
    pub root: SchemaNode,
    /// Definitions referenced from `root`.
    pub definitions: Definitions,
}

impl SchemaDocument {
    /// Parses a whole schema document.
    ///
    /// Definitions are read from `definitions` (draft-07) and `$defs`
    /// (2019-09 and later).
    ///
    /// # Errors
    ///
    /// Returns `DocsError::InvalidSchema` if any node is malformed.
    pub fn from_value(value: &Value) -> Result<Self> {
        let root = SchemaNode::from_value(value, "#")?;

        let mut definitions = Vec::new();
        for keyword in ["definitions", "$defs"] {
            let Some(table) = value.get(keyword) else {
                continue;
            };
            let location = format!("#/{keyword}");
            definitions.extend(parse_named(table, &location)?);
        }

        Ok(Self {
            root,
            definitions: definitions.into_iter().collect(),
        })
    }

    /// Parses a schema document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `DocsError::SchemaConversion` if the text is not JSON and
    /// `DocsError::InvalidSchema` if the JSON is not a usable schema.
    pub fn from_json_str(json: &str, source_name: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(json).map_err(|err| DocsError::SchemaConversion {
                source_name: source_name.to_string(),
                details: err.to_string(),
            })?;
        Self::from_value(&value)
    }
}

fn get_str<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Value::as_str)
}

fn parse_type(value: Option<&Value>, location: &str) -> Result<String> {
    match value {
        None => Ok(String::new()),
        Some(Value::String(type_name)) => Ok(type_name.clone()),
        Some(Value::Array(types)) => {
            let names: Vec<&str> = types.iter().filter_map(Value::as_str).collect();
            let non_null: Vec<&str> = names
                .iter()
                .copied()
                .filter(|name| *name != NULL_TYPE)
                .collect();

            if non_null.is_empty() {
                Ok(names.join(TYPE_SEPARATOR))
            } else {
                Ok(non_null.join(TYPE_SEPARATOR))
            }
        }
        Some(other) => Err(DocsError::invalid_schema(
            format!("{location}/type"),
            format!("expected a string or array, found {other}"),
        )),
    }
}

fn parse_required(value: Option<&Value>, location: &str) -> Result<Vec<String>> {
    match value {
        None => Ok(Vec::new()),
        Some(Value::Array(names)) => Ok(names
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()),
        Some(other) => Err(DocsError::invalid_schema(
            format!("{location}/required"),
            format!("expected an array, found {other}"),
        )),
    }
}

fn parse_named(value: &Value, location: &str) -> Result<Vec<(String, SchemaNode)>> {
    let Value::Object(entries) = value else {
        return Err(DocsError::invalid_schema(
            location,
            format!("expected an object, found {value}"),
        ));
    };

    entries
        .iter()
        .map(|(name, schema)| {
            let node = SchemaNode::from_value(schema, &format!("{location}/{name}"))?;
            Ok((name.clone(), node))
        })
        .collect()
}
