use tracing::{info, instrument};

use super::{
    output::{DocsSink, FsSink},
    page::ReferenceCompiler,
    templates::{MdxRenderer, Renderer},
    versions::apply_version_enum,
};
use crate::{Result, config::GeneratorConfig, schema::SchemaDocument};

/// Generates reference documentation for a configuration schema.
///
/// Applies the configured version list to the top-level version field,
/// then compiles every schema level into pages and partials.
pub struct DocsGenerator {
    config: GeneratorConfig,
    renderer: Box<dyn Renderer>,
}

impl Default for DocsGenerator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

impl DocsGenerator {
    /// Creates a generator rendering MDX with the given configuration.
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            renderer: Box::new(MdxRenderer),
        }
    }

    /// Sets a custom output directory for generated documentation.
    pub fn with_output_dir(mut self, output_dir: impl Into<std::path::PathBuf>) -> Self {
        self.config.output_dir = output_dir.into();
        self
    }

    /// Replaces the MDX renderer.
    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// The configuration this generator runs with.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Writes all reference pages for `document` to the output directory.
    ///
    /// Returns the number of files written.
    ///
    /// # Errors
    ///
    /// Returns the first error hit; files written before it are left as is
    /// and are fully regenerated by the next run.
    pub fn generate(&self, document: SchemaDocument) -> Result<usize> {
        self.generate_into(document, &mut FsSink)
    }

    /// Same as [`DocsGenerator::generate`], writing into any sink.
    ///
    /// # Errors
    ///
    /// See [`DocsGenerator::generate`].
    #[instrument(skip_all, fields(output_dir = %self.config.output_dir.display()))]
    pub fn generate_into(&self, document: SchemaDocument, sink: &mut dyn DocsSink) -> Result<usize> {
        let mut document = document;

        if !self.config.versions.is_empty() {
            apply_version_enum(
                &mut document.root,
                &self.config.version_field,
                &self.config.versions,
            );
        }

        let settings = self.config.compile_settings();
        let mut compiler = ReferenceCompiler::new(
            &document.definitions,
            self.renderer.as_ref(),
            &settings,
            sink,
        );
        compiler.compile(&document.root)?;
        let written = compiler.files_written();

        info!(
            files = written,
            definitions = document.definitions.len(),
            "Generated reference documentation"
        );
        Ok(written)
    }
}
