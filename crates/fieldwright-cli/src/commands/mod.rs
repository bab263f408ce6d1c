//! Command implementations.

pub mod columns;
pub mod config;
pub mod fields;
pub mod ingest;
pub mod reconcile;
pub mod resolve;

pub use self::columns::execute_columns;
pub use self::config::execute_config;
pub use self::fields::execute_fields;
pub use self::ingest::execute_ingest;
pub use self::reconcile::execute_reconcile;
pub use self::resolve::execute_resolve;
