//! Fields command implementation.

use crate::cli::FieldsArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::{FieldListing, Formatter};
use fieldwright_domain::FieldRegistry;

/// Execute the fields command.
pub fn execute_fields(args: FieldsArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let store = config.open_store()?;

    let fields = match &args.name {
        Some(name) => vec![store
            .get_field(name)?
            .ok_or_else(|| CliError::NotFound(name.clone()))?],
        None => store.list_fields()?,
    };

    let mut listings = Vec::with_capacity(fields.len());
    for field in fields {
        let synonyms = if args.synonyms {
            Some(store.synonyms(&field.canonical_name)?)
        } else {
            None
        };
        let options = if args.options {
            Some(store.options(&field.canonical_name)?)
        } else {
            None
        };
        listings.push(FieldListing {
            field,
            synonyms,
            options,
        });
    }

    println!("{}", formatter.format_fields(&listings)?);

    Ok(())
}
