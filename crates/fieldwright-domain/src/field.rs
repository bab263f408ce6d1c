//! Canonical fields and the variants observed for them

use crate::DataType;

/// A canonical field - the deduplicated identity mentions resolve to
///
/// The name is the identity: it is assigned when the first unmatched
/// mention is seen and never renamed or merged afterwards. Only the tooltip
/// may change, and only through external admin tooling.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalField {
    /// Registry-assigned creation ordinal (strictly increasing)
    pub ordinal: u64,

    /// Globally unique key, in normalized snake-case form
    pub canonical_name: String,

    /// Data type category chosen at creation
    pub data_type: DataType,

    /// Help text shown next to the field
    pub tooltip: String,

    /// When the field was created (seconds since Unix epoch)
    pub created_at: u64,
}

impl CanonicalField {
    /// Create a new canonical field
    pub fn new(
        ordinal: u64,
        canonical_name: impl Into<String>,
        data_type: DataType,
        tooltip: impl Into<String>,
        created_at: u64,
    ) -> Self {
        Self {
            ordinal,
            canonical_name: canonical_name.into(),
            data_type,
            tooltip: tooltip.into(),
            created_at,
        }
    }
}

/// One observed spelling of a canonical field
///
/// Unique per `(canonical_name, raw_text)`; the first source file that
/// produced the spelling is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synonym {
    /// Field this spelling resolved to
    pub canonical_name: String,

    /// Raw mention text as it appeared in the document
    pub raw_text: String,

    /// Document the spelling was first seen in
    pub source_file: String,
}

/// One element of a bounded choice set
///
/// Unique per `(canonical_name, option_value)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOption {
    /// Field the option belongs to
    pub canonical_name: String,

    /// Option text, trimmed
    pub option_value: String,

    /// Position in the source mention (0-based)
    pub display_order: usize,
}
