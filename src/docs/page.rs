//! Recursive compilation of schema levels into reference pages.
//!
//! Each schema level becomes one page. Every property of that level gets
//! its own partial file, nested objects get their own page one level down,
//! and grouped properties are gathered into a group partial. Children are
//! always written before the file that embeds them.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use tracing::{debug, trace};

use super::{
    field::NAME_FIELD,
    group::{Group, GroupCollector},
    naming,
    output::{DocsSink, TrackedSink},
    templates::Renderer,
};
use crate::{
    DocsError, Result,
    schema::{Definitions, SchemaNode},
};

const REFERENCE_SUFFIX: &str = "_reference";
const LEVEL_SEPARATOR: &str = "\n\n";

/// Where and how pages are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileSettings {
    /// Directory every output path lives under.
    pub base_dir: PathBuf,
    /// File extension of pages and partials, without the dot.
    pub extension: String,
    /// File stem of the top-level page.
    pub root_page: String,
    /// Extension key holding a field's group id.
    pub group_key: String,
    /// Extension key holding a group's display name.
    pub group_name_key: String,
}

impl Default for CompileSettings {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("docs"),
            extension: "mdx".to_string(),
            root_page: "reference".to_string(),
            group_key: "group".to_string(),
            group_name_key: "group_name".to_string(),
        }
    }
}

/// Compiles a schema tree into reference pages.
pub struct ReferenceCompiler<'a> {
    definitions: &'a Definitions,
    renderer: &'a dyn Renderer,
    settings: &'a CompileSettings,
    output: TrackedSink<'a>,
    chain: Vec<String>,
}

impl<'a> ReferenceCompiler<'a> {
    /// Creates a compiler writing into `sink`.
    pub fn new(
        definitions: &'a Definitions,
        renderer: &'a dyn Renderer,
        settings: &'a CompileSettings,
        sink: &'a mut dyn DocsSink,
    ) -> Self {
        Self {
            definitions,
            renderer,
            settings,
            output: TrackedSink::new(sink),
            chain: Vec::new(),
        }
    }

    /// Compiles `root` and everything reachable from it.
    ///
    /// Returns the content of the top-level page.
    ///
    /// # Errors
    ///
    /// Fails on the first write error, cyclic `$ref` chain, or output path
    /// written twice.
    pub fn compile(&mut self, root: &'a SchemaNode) -> Result<String> {
        self.compile_level(root, &[], 1, false)
    }

    /// Number of files written so far.
    pub fn files_written(&self) -> usize {
        self.output.written()
    }

    pub(crate) fn compile_level(
        &mut self,
        node: &'a SchemaNode,
        path: &[String],
        depth: usize,
        parent_is_name_map: bool,
    ) -> Result<String> {
        let directory = self.directory(path);
        let mut groups = GroupCollector::new(&directory, &self.settings.extension);
        let mut imports: Vec<PathBuf> = Vec::new();
        let mut body = String::new();

        for (name, field) in &node.properties {
            if parent_is_name_map && name == NAME_FIELD {
                trace!(path = ?path, "Skipping name property of name-keyed map");
                continue;
            }

            let emitted = self.emit_field(node, name, field, path, depth)?;
            let group_id = field
                .extension_str(&self.settings.group_key)
                .filter(|id| !id.is_empty());

            match group_id {
                Some(group_id) => {
                    let group_name = field.extension_str(&self.settings.group_name_key);
                    if let Some(group_file) =
                        groups.add(group_id, group_name, &emitted.block, &emitted.import)
                    {
                        body.push_str(LEVEL_SEPARATOR);
                        body.push_str(&self.embed(&group_file));
                        imports.push(group_file);
                    }
                }
                None => {
                    body.push_str(LEVEL_SEPARATOR);
                    body.push_str(&emitted.block);
                    imports.push(emitted.import);
                }
            }
        }

        for group in groups.finish() {
            self.write_group(&group)?;
        }

        let page_file = self.page_file(path);
        let preamble = self.preamble(&imports, &page_file)?;
        let content = format!("{preamble}{body}");

        self.write(&page_file, &content)?;
        debug!(page = %page_file.display(), depth, partials = imports.len(), "Wrote reference page");

        Ok(content)
    }

    fn write_group(&mut self, group: &Group) -> Result<()> {
        let preamble = self.preamble(&group.imports, &group.file)?;
        let wrapped = self
            .renderer
            .group(&group.id, group.name.as_deref(), &group.content);

        debug!(group = %group.id, members = group.imports.len(), "Wrote group");
        self.write(&group.file, &format!("{preamble}{wrapped}"))
    }

    pub(crate) fn enter_definition(&mut self, definition: &str) -> Result<()> {
        if self.chain.iter().any(|visited| visited == definition) {
            let mut chain = self.chain.clone();
            chain.push(definition.to_string());
            return Err(DocsError::CyclicSchema {
                chain: chain.join(" -> "),
            });
        }

        self.chain.push(definition.to_string());
        Ok(())
    }

    pub(crate) fn leave_definition(&mut self) {
        self.chain.pop();
    }

    pub(crate) fn definitions(&self) -> &'a Definitions {
        self.definitions
    }

    pub(crate) fn renderer(&self) -> &'a dyn Renderer {
        self.renderer
    }

    pub(crate) fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        self.output.write(path, content)
    }

    /// Import statement for `partial` as seen from `from_file`.
    pub(crate) fn import(&self, partial: &Path, from_file: &Path) -> String {
        self.renderer.partial_import(
            &self.import_name(partial),
            &naming::relative_import_path(from_file, partial),
        )
    }

    /// Import statements for every partial `file` embeds.
    ///
    /// Distinct paths can flatten to the same symbol (`log-level` and
    /// `log_level`); binding one twice fails the run.
    fn preamble(&self, partials: &[PathBuf], file: &Path) -> Result<String> {
        let mut bound = HashSet::new();
        let mut preamble = String::new();

        for partial in partials {
            let symbol = self.import_name(partial);
            if !bound.insert(symbol.clone()) {
                return Err(DocsError::ImportCollision {
                    symbol,
                    file: file.to_path_buf(),
                });
            }
            preamble.push_str(&self.renderer.partial_import(
                &symbol,
                &naming::relative_import_path(file, partial),
            ));
        }

        Ok(preamble)
    }

    /// Embed statement for a partial imported with [`Self::import`].
    pub(crate) fn embed(&self, partial: &Path) -> String {
        self.renderer.partial_use(&self.import_name(partial))
    }

    fn import_name(&self, partial: &Path) -> String {
        let relative = partial
            .strip_prefix(&self.settings.base_dir)
            .unwrap_or(partial);
        naming::import_name(relative)
    }

    fn directory(&self, path: &[String]) -> PathBuf {
        path.iter()
            .fold(self.settings.base_dir.clone(), |dir, segment| dir.join(segment))
    }

    pub(crate) fn partial_file(&self, path: &[String], name: &str) -> PathBuf {
        self.directory(path)
            .join(format!("{name}.{}", self.settings.extension))
    }

    pub(crate) fn reference_file(&self, path: &[String], name: &str) -> PathBuf {
        self.directory(path)
            .join(format!("{name}{REFERENCE_SUFFIX}.{}", self.settings.extension))
    }

    fn page_file(&self, path: &[String]) -> PathBuf {
        match path.split_last() {
            Some((name, parent)) => self.reference_file(parent, name),
            None => self.settings.base_dir.join(format!(
                "{}.{}",
                self.settings.root_page, self.settings.extension
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::{
        docs::{output::MemorySink, templates::FieldBlock},
        schema::SchemaDocument,
    };

    /// Renders structure only, so assertions don't depend on MDX markup.
    struct OutlineRenderer;

    impl Renderer for OutlineRenderer {
        fn field(&self, block: &FieldBlock<'_>) -> String {
            format!(
                "[{} type={} required={} default={} enum={} anchor={} expandable={} open={}]{}[/{}]",
                block.name,
                block.type_name,
                block.required,
                block.default,
                block.enum_values.join(","),
                block.anchor,
                block.expandable,
                block.open,
                block.content,
                block.name,
            )
        }

        fn partial_import(&self, import_name: &str, path: &str) -> String {
            format!("import {import_name} {path}\n")
        }

        fn partial_use(&self, import_name: &str) -> String {
            format!("<{import_name}>")
        }

        fn group(&self, group_id: &str, display_name: Option<&str>, content: &str) -> String {
            format!("[group {group_id} {}]{content}[/group]", display_name.unwrap_or("-"))
        }
    }

    fn compile(schema: Value) -> Result<MemorySink> {
        let document = SchemaDocument::from_value(&schema)?;
        let settings = CompileSettings::default();
        let mut sink = MemorySink::new();

        ReferenceCompiler::new(&document.definitions, &OutlineRenderer, &settings, &mut sink)
            .compile(&document.root)?;

        Ok(sink)
    }

    fn services_schema() -> Value {
        json!({
            "type": "object",
            "required": ["version"],
            "properties": {
                "version": { "type": "string", "enum": ["v2", "v1"] },
                "services": {
                    "type": "object",
                    "description": "Services to deploy.",
                    "patternProperties": { ".*": { "$ref": "#/definitions/Service" } }
                },
                "ports": {
                    "type": "array",
                    "items": { "$ref": "#/definitions/Port" }
                },
                "tags": { "type": "array", "items": { "type": "string" } }
            },
            "definitions": {
                "Service": {
                    "type": "object",
                    "required": ["name"],
                    "properties": {
                        "name": { "type": "string", "description": "Service name.", "enum": ["api", "web"] },
                        "image": { "type": "string" }
                    }
                },
                "Port": {
                    "type": "object",
                    "properties": { "port": { "type": "integer", "default": 80 } }
                }
            }
        })
    }

    #[test]
    fn root_page_embeds_fields_in_schema_order() {
        let sink = compile(services_schema()).unwrap();
        let page = sink.get("docs/reference.mdx").unwrap();

        let version = page.find("<PartialVersion>").unwrap();
        let services = page.find("[services ").unwrap();
        let ports = page.find("[ports ").unwrap();
        let tags = page.find("<PartialTags>").unwrap();
        assert!(version < services && services < ports && ports < tags);

        assert!(page.starts_with(
            "import PartialVersion ./version.mdx\n\
             import PartialServicesReference ./services_reference.mdx\n\
             import PartialPortsReference ./ports_reference.mdx\n\
             import PartialTags ./tags.mdx\n"
        ));
    }

    #[test]
    fn scalar_partials_carry_resolved_values() {
        let sink = compile(services_schema()).unwrap();

        let version = sink.get("docs/version.mdx").unwrap();
        assert!(version.starts_with("[version type=string required=true default= enum=v2,v1 anchor=version"));

        let tags = sink.get("docs/tags.mdx").unwrap();
        assert!(tags.contains("type=string[]"));

        let port = sink.get("docs/ports/port.mdx").unwrap();
        assert!(port.contains("type=integer required=false default=80"));
        assert!(port.contains("anchor=ports-port"));
    }

    #[test]
    fn name_map_documents_key_and_suppresses_name() {
        let sink = compile(services_schema()).unwrap();

        let child = sink.get("docs/services_reference.mdx").unwrap();
        assert!(!child.contains("PartialServicesName"));
        assert!(child.contains("<PartialServicesImage>"));
        assert!(sink.get("docs/services/name.mdx").is_none());

        let partial = sink.get("docs/services.mdx").unwrap();
        assert!(partial.starts_with("import PartialServicesReference ./services_reference.mdx\n\n"));
        assert!(partial.contains("[services type=<service_name>:object required=false"));
        assert!(partial.contains(
            "[<service_name> type=string required=true default= enum=api,web anchor=services-name expandable=true open=true]<PartialServicesReference>[/<service_name>]"
        ));

        let root = sink.get("docs/reference.mdx").unwrap();
        assert!(root.contains("[services type=<service_name>:object required=false default= enum= anchor=services expandable=true open=false]"));
    }

    #[test]
    fn array_of_references_nests() {
        let sink = compile(services_schema()).unwrap();

        let child = sink.get("docs/ports_reference.mdx").unwrap();
        assert!(child.contains("import PartialPortsPort ./ports/port.mdx"));

        let root = sink.get("docs/reference.mdx").unwrap();
        assert!(root.contains("[ports type=object[] required=false"));
    }

    #[test]
    fn children_are_written_before_parents() {
        let sink = compile(services_schema()).unwrap();
        let position = |path: &str| {
            sink.order()
                .iter()
                .position(|written| written == Path::new(path))
                .unwrap()
        };

        assert!(position("docs/services/image.mdx") < position("docs/services_reference.mdx"));
        assert!(position("docs/services_reference.mdx") < position("docs/services.mdx"));
        assert!(position("docs/services.mdx") < position("docs/reference.mdx"));
        assert_eq!(sink.order().last().unwrap(), Path::new("docs/reference.mdx"));
    }

    #[test]
    fn booleans_are_never_required() {
        let sink = compile(json!({
            "type": "object",
            "required": ["enabled"],
            "properties": {
                "enabled": { "type": "boolean" },
                "verbose": { "type": "boolean" }
            }
        }))
        .unwrap();

        assert!(sink.get("docs/enabled.mdx").unwrap().contains("required=false default=true"));
        assert!(sink.get("docs/verbose.mdx").unwrap().contains("required=false default=false"));
    }

    #[test]
    fn optional_boolean_ignores_declared_default() {
        let sink = compile(json!({
            "type": "object",
            "properties": { "flag": { "type": "boolean", "default": true } }
        }))
        .unwrap();

        assert!(sink.get("docs/flag.mdx").unwrap().contains("required=false default=false"));
    }

    #[test]
    fn empty_object_definition_gets_a_page() {
        let sink = compile(json!({
            "type": "object",
            "properties": { "extra": { "$ref": "#/definitions/Empty" } },
            "definitions": { "Empty": { "type": "object", "properties": {} } }
        }))
        .unwrap();

        assert_eq!(sink.get("docs/extra_reference.mdx"), Some(""));
        let partial = sink.get("docs/extra.mdx").unwrap();
        assert!(partial.starts_with("import PartialExtraReference ./extra_reference.mdx\n"));
        assert!(partial.contains("type=object"));
        assert!(partial.contains("expandable=true"));
    }

    #[test]
    fn scalar_definition_is_documented_in_place() {
        let sink = compile(json!({
            "type": "object",
            "properties": { "level": { "$ref": "#/definitions/Level" } },
            "definitions": { "Level": { "type": "string", "enum": ["error", "info"] } }
        }))
        .unwrap();

        assert!(sink.get("docs/level_reference.mdx").is_none());
        let partial = sink.get("docs/level.mdx").unwrap();
        assert!(partial.contains("type=string required=false default=error enum=error,info"));
    }

    #[test]
    fn clashing_import_symbols_fail() {
        let err = compile(json!({
            "type": "object",
            "properties": {
                "log-level": { "type": "string" },
                "log_level": { "type": "string" }
            }
        }))
        .unwrap_err();

        match err {
            DocsError::ImportCollision { symbol, file } => {
                assert_eq!(symbol, "PartialLogLevel");
                assert_eq!(file, Path::new("docs/reference.mdx"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn clashing_import_symbols_in_group_fail() {
        let err = compile(json!({
            "type": "object",
            "properties": {
                "log-level": { "type": "string", "group": "logs" },
                "log_level": { "type": "string", "group": "logs" }
            }
        }))
        .unwrap_err();

        assert!(matches!(
            err,
            DocsError::ImportCollision { ref file, .. } if file == Path::new("docs/group_logs.mdx")
        ));
    }

    #[test]
    fn grouped_fields_share_one_placeholder() {
        let sink = compile(json!({
            "type": "object",
            "properties": {
                "host": { "type": "string", "group": "net", "group_name": "Networking" },
                "debug": { "type": "boolean" },
                "port": { "type": "integer", "group": "NET" }
            }
        }))
        .unwrap();

        let page = sink.get("docs/reference.mdx").unwrap();
        assert_eq!(page.matches("<PartialGroupNet>").count(), 1);
        assert!(!page.contains("<PartialHost>"));
        assert!(!page.contains("<PartialPort>"));
        assert!(page.find("<PartialGroupNet>").unwrap() < page.find("<PartialDebug>").unwrap());
        assert!(page.starts_with("import PartialGroupNet ./group_net.mdx\nimport PartialDebug ./debug.mdx\n"));

        let group = sink.get("docs/group_net.mdx").unwrap();
        assert_eq!(
            group,
            "import PartialHost ./host.mdx\n\
             import PartialPort ./port.mdx\n\
             [group net Networking]<PartialHost><PartialPort>[/group]"
        );
    }

    #[test]
    fn shared_definitions_expand_at_every_path() {
        let sink = compile(json!({
            "type": "object",
            "properties": {
                "primary": { "$ref": "#/definitions/Endpoint" },
                "fallback": { "$ref": "#/definitions/Endpoint" }
            },
            "definitions": {
                "Endpoint": { "type": "object", "properties": { "url": { "type": "string" } } }
            }
        }))
        .unwrap();

        assert!(sink.get("docs/primary_reference.mdx").is_some());
        assert!(sink.get("docs/fallback_reference.mdx").is_some());
        assert!(sink.get("docs/primary/url.mdx").is_some());
        assert!(sink.get("docs/fallback/url.mdx").is_some());

        let root = sink.get("docs/reference.mdx").unwrap();
        assert!(root.contains("[primary type=object "));
    }

    #[test]
    fn unresolved_reference_is_a_plain_field() {
        let sink = compile(json!({
            "type": "object",
            "properties": { "mystery": { "$ref": "#/definitions/Missing", "type": "string" } }
        }))
        .unwrap();

        let partial = sink.get("docs/mystery.mdx").unwrap();
        assert!(partial.contains("type=string required=false default= enum= anchor=mystery expandable=false"));
        assert!(sink.get("docs/mystery_reference.mdx").is_none());
    }

    #[test]
    fn cyclic_definitions_fail() {
        let err = compile(json!({
            "type": "object",
            "properties": { "tree": { "$ref": "#/definitions/Tree" } },
            "definitions": {
                "Tree": {
                    "type": "object",
                    "properties": {
                        "children": { "type": "array", "items": { "$ref": "#/definitions/Tree" } }
                    }
                }
            }
        }))
        .unwrap_err();

        match err {
            DocsError::CyclicSchema { chain } => assert_eq!(chain, "Tree -> Tree"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn colliding_paths_fail() {
        let err = compile(json!({
            "type": "object",
            "properties": { "reference": { "type": "string" } }
        }))
        .unwrap_err();

        assert!(matches!(err, DocsError::PathCollision { ref path } if path == Path::new("docs/reference.mdx")));
    }

    #[test]
    fn output_is_deterministic() {
        let first = compile(services_schema()).unwrap();
        let second = compile(services_schema()).unwrap();

        assert_eq!(first.files(), second.files());
        assert_eq!(first.order(), second.order());
    }

    #[test]
    fn returns_root_page_content() {
        let document = SchemaDocument::from_value(&services_schema()).unwrap();
        let settings = CompileSettings::default();
        let mut sink = MemorySink::new();

        let mut compiler =
            ReferenceCompiler::new(&document.definitions, &OutlineRenderer, &settings, &mut sink);
        let content = compiler.compile(&document.root).unwrap();
        let written = compiler.files_written();

        assert_eq!(sink.get("docs/reference.mdx"), Some(content.as_str()));
        assert_eq!(written, sink.files().len());
    }
}
