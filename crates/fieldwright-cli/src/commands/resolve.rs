//! Resolve command implementation.

use crate::cli::ResolveArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the resolve command.
///
/// Nothing is written to the registry.
pub fn execute_resolve(args: ResolveArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let ingestor = config.ingestor()?;
    let preview = ingestor.preview(&args.mention)?;

    println!("{}", formatter.format_preview(&preview)?);

    Ok(())
}
