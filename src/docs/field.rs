//! Per-field emission: classification, nested recursion and partial files.

use std::path::PathBuf;

use tracing::debug;

use super::{
    naming,
    page::ReferenceCompiler,
    resolve::{resolve_default, resolve_enum},
    templates::FieldBlock,
};
use crate::{Result, schema::SchemaNode};

/// Property of a name-map value object that the map key already represents.
pub(crate) const NAME_FIELD: &str = "name";

const ARRAY_TYPE: &str = "array";
const OBJECT_TYPE: &str = "object";

/// How a field is laid out in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    Array,
    NameMap,
    Reference,
    Scalar,
}

impl FieldKind {
    /// Arrays are detected first, then name-keyed maps, then plain `$ref`s.
    pub(crate) fn classify(field: &SchemaNode) -> Self {
        if field.type_name == ARRAY_TYPE {
            FieldKind::Array
        } else if field.map_value().is_some() {
            FieldKind::NameMap
        } else if field.reference.is_some() {
            FieldKind::Reference
        } else {
            FieldKind::Scalar
        }
    }

    /// The `$ref` this kind of field nests into, if any.
    pub(crate) fn target(self, field: &SchemaNode) -> Option<&str> {
        match self {
            FieldKind::Array => field.items.as_deref()?.reference.as_deref(),
            FieldKind::NameMap => field.map_value()?.reference.as_deref(),
            FieldKind::Reference => field.reference.as_deref(),
            FieldKind::Scalar => None,
        }
    }

    /// Copy of `field` with its target replaced by a scalar definition,
    /// so the definition's type and enum are documented in place.
    pub(crate) fn inline(self, field: &SchemaNode, definition: &SchemaNode) -> SchemaNode {
        let mut inlined = field.clone();

        match self {
            FieldKind::Array => {
                if let Some(items) = inlined.items.as_deref_mut() {
                    *items = items.inline_reference(definition);
                }
            }
            FieldKind::NameMap => {
                if let Some(value) = inlined.map_value_mut() {
                    *value = value.inline_reference(definition);
                }
            }
            FieldKind::Reference => inlined = field.inline_reference(definition),
            FieldKind::Scalar => {}
        }

        inlined
    }
}

/// Working record for one property while its level is compiled.
pub(crate) struct FieldDescriptor<'n> {
    pub(crate) name: &'n str,
    pub(crate) field: &'n SchemaNode,
    pub(crate) kind: FieldKind,
    pub(crate) display_type: String,
    pub(crate) anchor: String,
    pub(crate) partial: PathBuf,
}

/// A field after its partial has been written.
pub(crate) struct EmittedField {
    /// File the enclosing page (or group) imports for this field.
    pub(crate) import: PathBuf,
    /// Block the enclosing page (or group) embeds for this field.
    pub(crate) block: String,
}

impl<'a> ReferenceCompiler<'a> {
    pub(crate) fn emit_field(
        &mut self,
        parent: &'a SchemaNode,
        name: &'a str,
        field: &'a SchemaNode,
        path: &[String],
        depth: usize,
    ) -> Result<EmittedField> {
        let kind = FieldKind::classify(field);
        let target = kind.target(field).and_then(|reference| {
            let resolved = self.definitions().resolve(reference);
            if resolved.is_none() {
                debug!(field = name, reference, "Unresolved reference, documenting as plain field");
            }
            resolved
        });

        match target {
            Some((definition, nested_node)) if nested_node.is_nested_definition() => {
                let descriptor = self.describe(name, field, kind, path);
                self.emit_nested(&descriptor, definition, nested_node, path, depth)
            }
            Some((_, scalar_definition)) => {
                let inlined = kind.inline(field, scalar_definition);
                let descriptor = self.describe(name, &inlined, kind, path);
                self.emit_scalar(parent, &descriptor, depth)
            }
            None => {
                let descriptor = self.describe(name, field, kind, path);
                self.emit_scalar(parent, &descriptor, depth)
            }
        }
    }

    fn describe<'n>(
        &self,
        name: &'n str,
        field: &'n SchemaNode,
        kind: FieldKind,
        path: &[String],
    ) -> FieldDescriptor<'n> {
        FieldDescriptor {
            name,
            field,
            kind,
            display_type: naming::display_type(name, field),
            anchor: naming::anchor(path, name),
            partial: self.partial_file(path, name),
        }
    }

    fn emit_scalar(
        &mut self,
        parent: &SchemaNode,
        descriptor: &FieldDescriptor<'_>,
        depth: usize,
    ) -> Result<EmittedField> {
        let required = parent.is_required(descriptor.name);
        let (required, default) =
            resolve_default(descriptor.field, &descriptor.display_type, required);
        let resolved = resolve_enum(descriptor.field, required, default);

        let content = self.renderer().field(&FieldBlock {
            expandable: false,
            open: true,
            depth,
            name: descriptor.name,
            required,
            type_name: &descriptor.display_type,
            default: &resolved.default,
            enum_values: &resolved.values,
            anchor: &descriptor.anchor,
            description: &descriptor.field.description,
            content: "",
        });
        self.write(&descriptor.partial, &content)?;

        Ok(EmittedField {
            block: self.embed(&descriptor.partial),
            import: descriptor.partial.clone(),
        })
    }

    fn emit_nested(
        &mut self,
        descriptor: &FieldDescriptor<'a>,
        definition: &str,
        nested_node: &'a SchemaNode,
        path: &[String],
        depth: usize,
    ) -> Result<EmittedField> {
        let mut child_path = path.to_vec();
        child_path.push(descriptor.name.to_string());

        let is_name_map = descriptor.kind == FieldKind::NameMap;
        self.enter_definition(definition)?;
        let child = self.compile_level(nested_node, &child_path, depth + 1, is_name_map);
        self.leave_definition();
        child?;

        let reference = self.reference_file(path, descriptor.name);
        let mut inner = self.embed(&reference);
        let mut type_name = if descriptor.display_type.is_empty() {
            OBJECT_TYPE.to_string()
        } else {
            descriptor.display_type.clone()
        };

        if let Some(name_field) = nested_node
            .property(NAME_FIELD)
            .filter(|_| is_name_map)
        {
            let placeholder = naming::map_key_placeholder(descriptor.name);
            let resolved = resolve_enum(name_field, true, String::new());

            inner = self.renderer().field(&FieldBlock {
                expandable: true,
                open: true,
                depth,
                name: &placeholder,
                required: true,
                type_name: "string",
                default: &resolved.default,
                enum_values: &resolved.values,
                anchor: &format!("{}-{NAME_FIELD}", descriptor.anchor),
                description: &name_field.description,
                content: &inner,
            });
            type_name = format!("{placeholder}:{OBJECT_TYPE}");
        }

        let block = FieldBlock {
            expandable: true,
            open: true,
            depth,
            name: descriptor.name,
            required: false,
            type_name: &type_name,
            default: "",
            enum_values: &[],
            anchor: &descriptor.anchor,
            description: &descriptor.field.description,
            content: &inner,
        };

        let partial = format!(
            "{}\n\n{}",
            self.import(&reference, &descriptor.partial),
            self.renderer().field(&block)
        );
        self.write(&descriptor.partial, &partial)?;

        Ok(EmittedField {
            import: reference,
            block: self.renderer().field(&FieldBlock {
                open: false,
                ..block
            }),
        })
    }
}
