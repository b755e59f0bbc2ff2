//! CLI argument definitions and command dispatch

use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::schema::{current_year, document_schema};
use crate::species::SpeciesRegistry;

#[derive(Parser)]
#[command(name = "chemked")]
#[command(author, version, about = "ChemKED schema and species tables")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the registered species table
    Species,

    /// Dump the ChemKED document schema
    Schema(SchemaArgs),
}

#[derive(clap::Args, Debug)]
pub struct SchemaArgs {
    /// Output format
    #[arg(long, short = 'f', default_value = "yaml")]
    pub format: DumpFormat,

    /// Emit the lowered JSON Schema instead of the descriptor tree
    #[arg(long)]
    pub json_schema: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum DumpFormat {
    Yaml,
    Json,
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Species => {
            let registry = SpeciesRegistry::new();
            print!("{}", registry.format_species_table());
            Ok(())
        }
        Commands::Schema(args) => {
            let schema = document_schema(current_year());
            let rendered = if args.json_schema {
                render(&schema.to_json_schema(), args.format)?
            } else {
                render(&schema, args.format)?
            };
            print!("{}", rendered);
            Ok(())
        }
    }
}

fn render<T: Serialize>(value: &T, format: DumpFormat) -> Result<String> {
    match format {
        DumpFormat::Yaml => serde_yml::to_string(value).into_diagnostic(),
        DumpFormat::Json => serde_json::to_string_pretty(value)
            .map(|rendered| rendered + "\n")
            .into_diagnostic(),
    }
}
