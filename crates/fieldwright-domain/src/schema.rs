//! Physical schema of the wide value table
//!
//! Every canonical field owns one column in `form_field_values_wide`. The
//! column name and type are derived deterministically from the field.

use crate::DataType;
use std::fmt;

/// Columns the wide table carries before any field is registered
///
/// A canonical field whose physical name equals one of these cannot get its
/// own slot.
pub const RESERVED_COLUMNS: [&str; 4] = ["id", "form_id", "created_at", "updated_at"];

/// Physical storage type of a wide-table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalType {
    /// Unbounded text
    LargeText,

    /// Calendar date
    Date,

    /// Whole number
    Integer,

    /// Fixed-point decimal with the given precision and scale
    Decimal {
        /// Total digits
        precision: u8,
        /// Digits after the decimal point
        scale: u8,
    },

    /// Length-bounded string
    BoundedString(u16),

    /// True/false flag
    Boolean,
}

impl PhysicalType {
    /// Map a field data type to its physical storage type
    pub fn for_data_type(data_type: DataType) -> Self {
        match data_type {
            DataType::Text => PhysicalType::LargeText,
            DataType::Date => PhysicalType::Date,
            DataType::Integer => PhysicalType::Integer,
            DataType::Decimal => PhysicalType::Decimal { precision: 18, scale: 4 },
            DataType::Currency => PhysicalType::Decimal { precision: 15, scale: 2 },
            DataType::Email => PhysicalType::BoundedString(255),
            DataType::Phone => PhysicalType::BoundedString(50),
            DataType::Address => PhysicalType::LargeText,
            DataType::Boolean => PhysicalType::Boolean,
        }
    }

    /// SQL column type declaration
    pub fn sql_type(&self) -> String {
        match self {
            PhysicalType::LargeText => "TEXT".to_string(),
            PhysicalType::Date => "DATE".to_string(),
            PhysicalType::Integer => "INTEGER".to_string(),
            PhysicalType::Decimal { precision, scale } => format!("DECIMAL({},{})", precision, scale),
            PhysicalType::BoundedString(len) => format!("VARCHAR({})", len),
            PhysicalType::Boolean => "BOOLEAN".to_string(),
        }
    }

    /// Parse an SQL column type declaration produced by [`PhysicalType::sql_type`]
    pub fn parse_sql(s: &str) -> Option<Self> {
        let upper = s.trim().to_uppercase();
        match upper.as_str() {
            "TEXT" => return Some(PhysicalType::LargeText),
            "DATE" => return Some(PhysicalType::Date),
            "INTEGER" => return Some(PhysicalType::Integer),
            "BOOLEAN" => return Some(PhysicalType::Boolean),
            _ => {}
        }

        let (name, args) = upper.strip_suffix(')')?.split_once('(')?;
        match name {
            "DECIMAL" => {
                let (precision, scale) = args.split_once(',')?;
                Some(PhysicalType::Decimal {
                    precision: precision.trim().parse().ok()?,
                    scale: scale.trim().parse().ok()?,
                })
            }
            "VARCHAR" => Some(PhysicalType::BoundedString(args.trim().parse().ok()?)),
            _ => None,
        }
    }
}

impl fmt::Display for PhysicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql_type())
    }
}

/// Derive the physical column name for a canonical name
///
/// Lowercases, then replaces every character outside `[a-z0-9_]` with `_`.
/// Distinct canonical names can map to the same physical name; callers must
/// check for that collision.
///
/// # Examples
///
/// ```
/// use fieldwright_domain::physical_name;
///
/// assert_eq!(physical_name("Plaintiff Name"), "plaintiff_name");
/// assert_eq!(physical_name("amount-due"), "amount_due");
/// ```
pub fn physical_name(canonical_name: &str) -> String {
    canonical_name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' { c } else { '_' })
        .collect()
}

/// Bookkeeping row for one wide-table column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaColumn {
    /// Field that owns the column
    pub canonical_name: String,

    /// Sanitized column name
    pub physical_name: String,

    /// Column type
    pub physical_type: PhysicalType,
}

impl SchemaColumn {
    /// Build the column a field of the given type should own
    pub fn for_field(canonical_name: impl Into<String>, data_type: DataType) -> Self {
        let canonical_name = canonical_name.into();
        Self {
            physical_name: physical_name(&canonical_name),
            physical_type: PhysicalType::for_data_type(data_type),
            canonical_name,
        }
    }
}

/// What `ensure_column` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnOutcome {
    /// The column was added by this call
    Created,

    /// The column was already there
    AlreadyPresent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_table() {
        assert_eq!(PhysicalType::for_data_type(DataType::Text).sql_type(), "TEXT");
        assert_eq!(PhysicalType::for_data_type(DataType::Date).sql_type(), "DATE");
        assert_eq!(PhysicalType::for_data_type(DataType::Integer).sql_type(), "INTEGER");
        assert_eq!(PhysicalType::for_data_type(DataType::Decimal).sql_type(), "DECIMAL(18,4)");
        assert_eq!(PhysicalType::for_data_type(DataType::Currency).sql_type(), "DECIMAL(15,2)");
        assert_eq!(PhysicalType::for_data_type(DataType::Email).sql_type(), "VARCHAR(255)");
        assert_eq!(PhysicalType::for_data_type(DataType::Phone).sql_type(), "VARCHAR(50)");
        assert_eq!(PhysicalType::for_data_type(DataType::Address).sql_type(), "TEXT");
        assert_eq!(PhysicalType::for_data_type(DataType::Boolean).sql_type(), "BOOLEAN");
    }

    #[test]
    fn test_parse_sql() {
        for data_type in DataType::ALL {
            let physical = PhysicalType::for_data_type(data_type);
            assert_eq!(PhysicalType::parse_sql(&physical.sql_type()), Some(physical));
        }
        assert_eq!(PhysicalType::parse_sql("BLOB"), None);
        assert_eq!(PhysicalType::parse_sql("DECIMAL(15)"), None);
    }

    #[test]
    fn test_physical_name_sanitizes() {
        assert_eq!(physical_name("case_number"), "case_number");
        assert_eq!(physical_name("Case Number #"), "case_number__");
        assert_eq!(physical_name("café"), "caf_");
    }

    #[test]
    fn test_physical_name_collision_is_possible() {
        // Distinct canonical names, same column
        assert_eq!(physical_name("zip-code"), physical_name("zip code"));
    }

    #[test]
    fn test_column_for_field() {
        let column = SchemaColumn::for_field("amount_due", DataType::Currency);
        assert_eq!(column.physical_name, "amount_due");
        assert_eq!(column.physical_type, PhysicalType::Decimal { precision: 15, scale: 2 });
    }
}
