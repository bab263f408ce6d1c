//! Reconcile command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the reconcile command.
pub fn execute_reconcile(config: &Config, formatter: &Formatter) -> Result<()> {
    let ingestor = config.ingestor()?;
    let report = ingestor.reconcile_schema()?;

    println!("{}", formatter.format_reconcile(&report)?);

    if !report.failures.is_empty() {
        eprintln!(
            "{}",
            formatter.warning(&format!("{} field(s) still have no column", report.failures.len()))
        );
    }

    Ok(())
}
