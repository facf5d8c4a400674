//! Output templates for field blocks and partial embeds.

/// Everything a field block template needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBlock<'a> {
    /// Whether the block has nested content to expand.
    pub expandable: bool,
    /// Whether the block starts expanded.
    pub open: bool,
    /// Nesting depth; the headline uses `depth + 1` markers.
    pub depth: usize,
    /// Field name (or a `<..._name>` placeholder).
    pub name: &'a str,
    /// Whether the field must be set.
    pub required: bool,
    /// Display type.
    pub type_name: &'a str,
    /// Effective default, empty when there is none.
    pub default: &'a str,
    /// Allowed string values.
    pub enum_values: &'a [String],
    /// Anchor id.
    pub anchor: &'a str,
    /// Field description.
    pub description: &'a str,
    /// Embedded child content.
    pub content: &'a str,
}

/// Formatting capability used by the page compiler.
///
/// The compiler decides what goes where; implementations decide how it
/// looks.
pub trait Renderer {
    /// Renders one field block.
    fn field(&self, block: &FieldBlock<'_>) -> String;

    /// Renders an import binding `import_name` to `path`.
    fn partial_import(&self, import_name: &str, path: &str) -> String;

    /// Renders the embed of a previously imported partial.
    fn partial_use(&self, import_name: &str) -> String;

    /// Wraps the member blocks of a group.
    fn group(&self, group_id: &str, display_name: Option<&str>, content: &str) -> String;
}

/// Renders MDX for Docusaurus-style documentation sites.
#[derive(Debug, Clone, Copy, Default)]
pub struct MdxRenderer;

const ENUM_LINE_BREAK: &str = "<br/>";

impl Renderer for MdxRenderer {
    fn field(&self, block: &FieldBlock<'_>) -> String {
        let open = if block.open { " open" } else { "" };
        let headline = "#".repeat(block.depth + 1);
        let enum_values = if block.enum_values.is_empty() {
            String::new()
        } else {
            format!("<span>{}</span>", block.enum_values.join(ENUM_LINE_BREAK))
        };

        format!(
            "\n<details className=\"config-field\" data-expandable=\"{expandable}\"{open}>\n\
             <summary>\n\n\
             {headline} `{name}` \
             <span className=\"config-field-required\" data-required=\"{required}\">required</span> \
             <span className=\"config-field-type\">{type_name}</span> \
             <span className=\"config-field-default\">{default}</span> \
             <span className=\"config-field-enum\">{enum_values}</span> \
             {{#{anchor}}}\n\n\
             {description}\n\n\
             </summary>\n\n\
             {content}\n\n\
             </details>\n",
            expandable = block.expandable,
            name = block.name,
            required = block.required,
            type_name = escape_html(block.type_name),
            default = block.default,
            anchor = block.anchor,
            description = block.description,
            content = block.content,
        )
    }

    fn partial_import(&self, import_name: &str, path: &str) -> String {
        format!("import {import_name} from \"{path}\"\n")
    }

    fn partial_use(&self, import_name: &str) -> String {
        format!("<{import_name} />")
    }

    fn group(&self, group_id: &str, display_name: Option<&str>, content: &str) -> String {
        let heading = display_name
            .map(|name| format!("\n<div className=\"group-name\">{name}</div>\n"))
            .unwrap_or_default();

        format!("<div className=\"group\" data-group=\"{group_id}\">\n{heading}{content}\n</div>\n")
    }
}

fn escape_html(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}
