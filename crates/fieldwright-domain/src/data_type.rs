//! Data type categories for canonical fields

use std::fmt;

/// Data type category of a canonical field
///
/// Chosen once, when the field is created, from the raw text of the mention
/// that introduced it. Drives the physical column type in the wide table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataType {
    /// Free text (the fallback)
    #[default]
    Text,

    /// Calendar date
    Date,

    /// Whole number
    Integer,

    /// Fixed-point decimal
    Decimal,

    /// Monetary amount
    Currency,

    /// Email address
    Email,

    /// Phone number
    Phone,

    /// Postal address
    Address,

    /// Yes/no flag
    Boolean,
}

impl DataType {
    /// Every category, in declaration order
    pub const ALL: [DataType; 9] = [
        DataType::Text,
        DataType::Date,
        DataType::Integer,
        DataType::Decimal,
        DataType::Currency,
        DataType::Email,
        DataType::Phone,
        DataType::Address,
        DataType::Boolean,
    ];

    /// Get the data type name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Text => "text",
            DataType::Date => "date",
            DataType::Integer => "integer",
            DataType::Decimal => "decimal",
            DataType::Currency => "currency",
            DataType::Email => "email",
            DataType::Phone => "phone",
            DataType::Address => "address",
            DataType::Boolean => "boolean",
        }
    }

    /// Parse a data type from a string
    ///
    /// Accepts `number` as an alias for `integer`, which older registries
    /// used for every numeric field.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Some(DataType::Text),
            "date" => Some(DataType::Date),
            "integer" | "number" => Some(DataType::Integer),
            "decimal" => Some(DataType::Decimal),
            "currency" => Some(DataType::Currency),
            "email" => Some(DataType::Email),
            "phone" => Some(DataType::Phone),
            "address" => Some(DataType::Address),
            "boolean" => Some(DataType::Boolean),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid data type: {}", s))
    }
}
