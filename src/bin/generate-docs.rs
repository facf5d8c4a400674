//! Generates configuration reference pages from a JSON schema.
//!
//! Without `--schema`, documents the generator's own configuration file.

use std::{error::Error, fs, path::PathBuf, process};

use clap::{Parser, Subcommand};
use confref::{
    config::GeneratorConfig,
    docs::{DocsGenerator, sort_versions},
    schema::{SchemaDocument, reflect},
    tracing_config,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "generate-docs")]
#[command(about = "Generate configuration reference pages from a JSON schema")]
struct Cli {
    /// Generator config file (defaults to ./confref.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a schema into reference pages
    Generate {
        /// JSON schema file to document
        #[arg(short, long)]
        schema: Option<PathBuf>,
        /// Output directory, overriding the config file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the JSON schema of the generator config
    Schema,
    /// Print the configured versions, newest first
    Versions,
}

fn main() {
    if let Err(err) = tracing_config::init() {
        eprintln!("Failed to initialize logging: {err}");
    }

    if let Err(err) = run(Cli::parse()) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = GeneratorConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Generate { schema, output } => {
            let document = match &schema {
                Some(path) => {
                    let json = fs::read_to_string(path)
                        .map_err(|err| confref::DocsError::io(err, path))?;
                    SchemaDocument::from_json_str(&json, &path.to_string_lossy())?
                }
                None => reflect::schema_document_for::<GeneratorConfig>()?,
            };

            let mut generator = DocsGenerator::new(config);
            if let Some(output) = output {
                generator = generator.with_output_dir(output);
            }

            let written = generator.generate(document)?;
            info!(
                files = written,
                output_dir = %generator.config().output_dir.display(),
                "Done"
            );
        }
        Commands::Schema => {
            println!("{}", reflect::schema_json_for::<GeneratorConfig>()?);
        }
        Commands::Versions => {
            for version in sort_versions(&config.versions) {
                println!("{version}");
            }
        }
    }

    Ok(())
}
