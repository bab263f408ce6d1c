//! Columns command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use fieldwright_domain::SchemaSynchronizer;

/// Execute the columns command.
pub fn execute_columns(config: &Config, formatter: &Formatter) -> Result<()> {
    let store = config.open_store()?;
    let columns = store.columns()?;

    println!("{}", formatter.format_columns(&columns)?);

    Ok(())
}
