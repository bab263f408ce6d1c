//! Fieldwright Storage Layer
//!
//! Implements the `FieldRegistry` and `SchemaSynchronizer` traits on SQLite.
//!
//! # Architecture
//!
//! - `canonical_fields`, `field_synonyms`, `field_options` hold the registry;
//!   uniqueness constraints arbitrate duplicate registrations
//! - `form_field_values_wide` is the wide value table; one column per field is
//!   added at runtime with `ALTER TABLE ... ADD COLUMN`
//! - `schema_columns` records which field owns which physical column
//! - [`embedding`] provides text vectors for semantic confirmation
//!
//! # Examples
//!
//! ```no_run
//! use fieldwright_domain::{DataType, FieldRegistry, SchemaSynchronizer};
//! use fieldwright_store::SqliteStore;
//!
//! let mut store = SqliteStore::new(":memory:").unwrap();
//! store.register("plaintiff_name", DataType::Text, "Enter the plaintiff name").unwrap();
//! store.ensure_column("plaintiff_name", DataType::Text).unwrap();
//! ```

#![warn(missing_docs)]

pub mod embedding;

use fieldwright_domain::traits::{FieldRegistry, SchemaSynchronizer};
use fieldwright_domain::{
    CanonicalField, ColumnOutcome, DataType, FieldOption, ParagraphGroup, PhysicalType,
    SchemaColumn, Synonym, RESERVED_COLUMNS,
};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, info};

/// Name of the wide value table
pub const WIDE_TABLE: &str = "form_field_values_wide";

/// How long a connection waits for a competing writer before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Canonical name not registered
    #[error("Canonical field not found: {0}")]
    NotFound(String),

    /// Two fields would share one physical column
    #[error("Physical column '{physical_name}' for '{canonical_name}' is already owned by '{owner}'")]
    PhysicalNameCollision {
        /// Field that asked for the column
        canonical_name: String,
        /// Sanitized column name
        physical_name: String,
        /// Field (or fixed table column) that already owns it
        owner: String,
    },
}

/// SQLite-based implementation of the registry and schema synchronizer
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each worker should open its own
/// SqliteStore on the same database file; concurrent writers wait on a busy
/// timeout and uniqueness constraints decide registration races.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update(None, "foreign_keys", true)?;

        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Column names of the wide table, in table order
    pub fn wide_table_columns(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare(&format!("PRAGMA table_info({})", WIDE_TABLE))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Current timestamp in seconds since Unix epoch
    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }

    fn require_name(name: &str) -> Result<(), StoreError> {
        if name.trim().is_empty() {
            return Err(StoreError::InvalidData("canonical name is empty".to_string()));
        }
        Ok(())
    }

    fn row_to_field(row: &rusqlite::Row<'_>) -> rusqlite::Result<CanonicalField> {
        let data_type_str: String = row.get(2)?;
        let data_type = DataType::parse(&data_type_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                Box::new(StoreError::InvalidData(format!("Unknown data type: {}", data_type_str))),
            )
        })?;

        Ok(CanonicalField {
            ordinal: row.get::<_, i64>(0)? as u64,
            canonical_name: row.get(1)?,
            data_type,
            tooltip: row.get(3)?,
            created_at: row.get::<_, i64>(4)? as u64,
        })
    }

    /// Who owns a physical column name, if anyone
    fn physical_owner(conn: &Connection, physical_name: &str) -> Result<Option<String>, StoreError> {
        if RESERVED_COLUMNS.contains(&physical_name) {
            return Ok(Some(format!("{}.{}", WIDE_TABLE, physical_name)));
        }

        let owner = conn
            .query_row(
                "SELECT canonical_name FROM schema_columns WHERE physical_name = ?1",
                params![physical_name],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(owner)
    }
}

/// SQLite reports an existing column as a generic error carrying this message
fn is_duplicate_column(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(_, Some(message)) if message.contains("duplicate column name")
    )
}

impl FieldRegistry for SqliteStore {
    type Error = StoreError;

    fn exists(&self, name: &str) -> Result<bool, Self::Error> {
        let exists = self
            .conn
            .query_row(
                "SELECT 1 FROM canonical_fields WHERE canonical_name = ?1",
                params![name],
                |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
        Ok(exists)
    }

    fn register(&mut self, name: &str, data_type: DataType, tooltip: &str) -> Result<bool, Self::Error> {
        Self::require_name(name)?;

        // The UNIQUE constraint is the arbiter; a losing insert changes nothing
        let changed = self.conn.execute(
            "INSERT INTO canonical_fields (canonical_name, data_type, tooltip, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(canonical_name) DO NOTHING",
            params![name, data_type.as_str(), tooltip, Self::now()],
        )?;

        if changed == 1 {
            info!("Registered canonical field '{}' ({})", name, data_type);
        } else {
            debug!("Canonical field '{}' already registered", name);
        }
        Ok(changed == 1)
    }

    fn get_field(&self, name: &str) -> Result<Option<CanonicalField>, Self::Error> {
        let field = self
            .conn
            .query_row(
                "SELECT id, canonical_name, data_type, tooltip, created_at
                 FROM canonical_fields WHERE canonical_name = ?1",
                params![name],
                Self::row_to_field,
            )
            .optional()?;
        Ok(field)
    }

    fn list_fields(&self) -> Result<Vec<CanonicalField>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, canonical_name, data_type, tooltip, created_at
             FROM canonical_fields ORDER BY id",
        )?;
        let fields = stmt
            .query_map([], Self::row_to_field)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(fields)
    }

    fn add_synonym(&mut self, name: &str, raw_text: &str, source_file: &str) -> Result<(), Self::Error> {
        Self::require_name(name)?;
        self.conn.execute(
            "INSERT INTO field_synonyms (canonical_name, raw_text, source_file, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(canonical_name, raw_text) DO NOTHING",
            params![name, raw_text, source_file, Self::now()],
        )?;
        Ok(())
    }

    fn add_option(&mut self, name: &str, value: &str, order: usize) -> Result<(), Self::Error> {
        Self::require_name(name)?;
        self.conn.execute(
            "INSERT INTO field_options (canonical_name, option_value, display_order)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(canonical_name, option_value) DO NOTHING",
            params![name, value, order as i64],
        )?;
        Ok(())
    }

    fn synonyms(&self, name: &str) -> Result<Vec<Synonym>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT canonical_name, raw_text, source_file
             FROM field_synonyms WHERE canonical_name = ?1 ORDER BY id",
        )?;
        let synonyms = stmt
            .query_map(params![name], |row| {
                Ok(Synonym {
                    canonical_name: row.get(0)?,
                    raw_text: row.get(1)?,
                    source_file: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(synonyms)
    }

    fn options(&self, name: &str) -> Result<Vec<FieldOption>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT canonical_name, option_value, display_order
             FROM field_options WHERE canonical_name = ?1 ORDER BY display_order, id",
        )?;
        let options = stmt
            .query_map(params![name], |row| {
                Ok(FieldOption {
                    canonical_name: row.get(0)?,
                    option_value: row.get(1)?,
                    display_order: row.get::<_, i64>(2)? as usize,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(options)
    }

    fn record_paragraph_group(&mut self, group: &ParagraphGroup) -> Result<(), Self::Error> {
        let members = serde_json::to_string(&group.members)?;
        self.conn.execute(
            "INSERT INTO paragraph_groups (instruction_text, source_file, start_paragraph, members, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(source_file, start_paragraph, instruction_text) DO NOTHING",
            params![
                &group.instruction,
                &group.source_file,
                group.start_paragraph,
                members,
                Self::now(),
            ],
        )?;
        Ok(())
    }
}

impl SqliteStore {
    /// Choose-one groups recorded for a document
    pub fn paragraph_groups(&self, source_file: &str) -> Result<Vec<ParagraphGroup>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT instruction_text, source_file, start_paragraph, members
             FROM paragraph_groups WHERE source_file = ?1 ORDER BY start_paragraph, id",
        )?;
        let rows = stmt
            .query_map(params![source_file], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(instruction, source_file, start_paragraph, members)| {
                Ok(ParagraphGroup {
                    instruction,
                    source_file,
                    start_paragraph,
                    members: serde_json::from_str(&members)?,
                })
            })
            .collect()
    }
}

impl SchemaSynchronizer for SqliteStore {
    type Error = StoreError;

    fn ensure_column(&mut self, name: &str, data_type: DataType) -> Result<ColumnOutcome, Self::Error> {
        Self::require_name(name)?;
        let column = SchemaColumn::for_field(name, data_type);

        // Take the write lock up front so the owner check and the ALTER see
        // the same state as any competing connection
        let tx = self.conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        if let Some(owner) = Self::physical_owner(&tx, &column.physical_name)? {
            if owner != name {
                return Err(StoreError::PhysicalNameCollision {
                    canonical_name: name.to_string(),
                    physical_name: column.physical_name,
                    owner,
                });
            }
        }

        // Sanitized names only contain [a-z0-9_], so quoting is enough
        let alter = format!(
            "ALTER TABLE {} ADD COLUMN \"{}\" {}",
            WIDE_TABLE,
            column.physical_name,
            column.physical_type.sql_type()
        );
        let outcome = match tx.execute(&alter, []) {
            Ok(_) => ColumnOutcome::Created,
            Err(e) if is_duplicate_column(&e) => ColumnOutcome::AlreadyPresent,
            Err(e) => return Err(e.into()),
        };

        tx.execute(
            "INSERT INTO schema_columns (canonical_name, physical_name, physical_type, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(canonical_name) DO NOTHING",
            params![
                &column.canonical_name,
                &column.physical_name,
                column.physical_type.sql_type(),
                Self::now(),
            ],
        )?;
        tx.commit()?;

        match outcome {
            ColumnOutcome::Created => info!(
                "Added column {}.{} {}",
                WIDE_TABLE, column.physical_name, column.physical_type
            ),
            ColumnOutcome::AlreadyPresent => debug!("Column already exists: {}", column.physical_name),
        }
        Ok(outcome)
    }

    fn columns(&self) -> Result<Vec<SchemaColumn>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT canonical_name, physical_name, physical_type FROM schema_columns ORDER BY id",
        )?;
        let columns = stmt
            .query_map([], |row| {
                let physical_type_str: String = row.get(2)?;
                let physical_type = PhysicalType::parse_sql(&physical_type_str).ok_or_else(|| {
                    rusqlite::Error::FromSqlConversionFailure(
                        2,
                        rusqlite::types::Type::Text,
                        Box::new(StoreError::InvalidData(format!(
                            "Unknown physical type: {}",
                            physical_type_str
                        ))),
                    )
                })?;
                Ok(SchemaColumn {
                    canonical_name: row.get(0)?,
                    physical_name: row.get(1)?,
                    physical_type,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(columns)
    }
}
