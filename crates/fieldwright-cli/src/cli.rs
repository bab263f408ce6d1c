//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fieldwright CLI - Build a canonical field registry from form templates.
#[derive(Debug, Parser)]
#[command(name = "fieldwright")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Registry database path
    #[arg(long, global = true, env = "FIELDWRIGHT_DB")]
    pub db: Option<PathBuf>,

    /// Minimum fuzzy score (0-100) to match an existing field
    #[arg(long, global = true, env = "FIELDWRIGHT_FUZZY_THRESHOLD")]
    pub fuzzy_threshold: Option<u8>,

    /// Minimum similarity (0.0-1.0) to confirm a fuzzy match
    #[arg(long, global = true, env = "FIELDWRIGHT_SEMANTIC_THRESHOLD")]
    pub semantic_threshold: Option<f64>,

    /// Confirm fuzzy matches with the embedding model
    #[arg(long, global = true, env = "FIELDWRIGHT_ENABLE_SEMANTICS")]
    pub semantics: bool,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (names only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Ingest placeholder mentions from JSON files
    Ingest(IngestArgs),

    /// Show how a mention would resolve, without writing
    Resolve(ResolveArgs),

    /// List canonical fields
    Fields(FieldsArgs),

    /// List wide-table columns
    Columns,

    /// Add missing columns for registered fields
    Reconcile,

    /// Show or create the configuration file
    Config(ConfigArgs),
}

/// Arguments for the ingest command.
#[derive(Debug, Parser)]
pub struct IngestArgs {
    /// JSON files with documents or mentions
    pub files: Vec<PathBuf>,

    /// Read JSON from stdin
    #[arg(long)]
    pub stdin: bool,

    /// Source file name for inputs that are bare mention lists
    #[arg(short, long)]
    pub source: Option<String>,
}

/// Arguments for the resolve command.
#[derive(Debug, Parser)]
pub struct ResolveArgs {
    /// Raw mention text
    pub mention: String,
}

/// Arguments for the fields command.
#[derive(Debug, Parser)]
pub struct FieldsArgs {
    /// Show a single field
    pub name: Option<String>,

    /// Include recorded synonyms
    #[arg(short, long)]
    pub synonyms: bool,

    /// Include recorded options
    #[arg(short, long)]
    pub options: bool,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
