//! Ingest command implementation.

use crate::cli::IngestArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use fieldwright_ingest::{DocumentRequest, Mention};
use serde::Deserialize;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::info;

/// Execute the ingest command.
pub fn execute_ingest(args: IngestArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let mut documents = Vec::new();

    if args.stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        let source = args.source.clone().unwrap_or_else(|| "stdin".to_string());
        documents.extend(parse_input(&buffer, &source)?);
    }

    for path in &args.files {
        let contents = fs::read_to_string(path)?;
        let source = args.source.clone().unwrap_or_else(|| source_name(path));
        documents.extend(parse_input(&contents, &source)?);
    }

    if !args.stdin && args.files.is_empty() {
        return Err(CliError::InvalidInput(
            "Must specify input files or --stdin".to_string(),
        ));
    }

    if documents.is_empty() {
        return Err(CliError::InvalidInput("No documents provided".to_string()));
    }

    info!("Ingesting {} document(s)", documents.len());

    let ingestor = config.ingestor()?;
    let report = ingestor.run(documents)?;

    println!("{}", formatter.format_run_report(&report)?);

    Ok(())
}

/// Accepted JSON shapes for ingest input.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IngestInput {
    Documents(Vec<DocumentRequest>),
    Document(DocumentRequest),
    Mentions(Vec<Mention>),
    Texts(Vec<String>),
}

/// Parse one input file into document requests.
///
/// Bare mention lists are attributed to `source`.
fn parse_input(json: &str, source: &str) -> Result<Vec<DocumentRequest>> {
    let input: IngestInput = serde_json::from_str(json)?;

    let documents = match input {
        IngestInput::Documents(documents) => documents,
        IngestInput::Document(document) => vec![document],
        IngestInput::Mentions(mentions) => vec![DocumentRequest {
            source_file: source.to_string(),
            mentions,
        }],
        IngestInput::Texts(texts) => vec![DocumentRequest {
            source_file: source.to_string(),
            mentions: texts.into_iter().map(Mention::new).collect(),
        }],
    };

    Ok(documents)
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
