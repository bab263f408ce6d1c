//! Configuration for the Ingestor

use crate::IngestError;
use fieldwright_domain::DataType;
use fieldwright_resolver::ResolverConfig;
use serde::{Deserialize, Serialize};

/// A mention split into more `/` segments than this is free text, not a choice set
pub const MAX_OPTION_SEGMENTS: usize = 5;

/// One row of the data-type rule table
///
/// A mention whose raw text contains any keyword (matched on word
/// boundaries, case-insensitive) gets this rule's type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTypeRule {
    /// Target data type name (`date`, `email`, ...)
    pub data_type: String,

    /// Keywords and phrases that select this type
    pub keywords: Vec<String>,
}

impl DataTypeRule {
    fn new(data_type: DataType, keywords: &[&str]) -> Self {
        Self {
            data_type: data_type.as_str().to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Parsed target type
    pub fn parsed_type(&self) -> Result<DataType, IngestError> {
        self.data_type
            .parse()
            .map_err(|e: String| IngestError::Config(format!("type rule: {}", e)))
    }
}

/// Configuration for the Ingestor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Identity resolution settings
    pub resolver: ResolverConfig,

    /// Ordered type rules; first match wins, no match means text
    pub type_rules: Vec<DataTypeRule>,

    /// Largest option set recognized in a single mention (2 to [`MAX_OPTION_SEGMENTS`])
    pub max_options: usize,

    /// Group mentions that follow a "CHOOSE ONE" style instruction
    pub detect_choose_one: bool,

    /// Paragraphs after the instruction that can hold group members
    pub choose_one_window: i64,

    /// Mentions after the instruction considered as members
    pub choose_one_lookahead: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            resolver: ResolverConfig::default(),
            type_rules: default_type_rules(),
            max_options: MAX_OPTION_SEGMENTS,
            detect_choose_one: true,
            choose_one_window: 5,
            choose_one_lookahead: 9,
        }
    }
}

impl IngestConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), IngestError> {
        self.resolver
            .validate()
            .map_err(|e| IngestError::Config(e.to_string()))?;

        if !(2..=MAX_OPTION_SEGMENTS).contains(&self.max_options) {
            return Err(IngestError::Config(format!(
                "max_options must be between 2 and {}, got {}",
                MAX_OPTION_SEGMENTS, self.max_options
            )));
        }
        if self.choose_one_window < 0 {
            return Err(IngestError::Config(
                "choose_one_window cannot be negative".to_string(),
            ));
        }

        for rule in &self.type_rules {
            rule.parsed_type()?;
            if rule.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(IngestError::Config(format!(
                    "type rule '{}' has an empty keyword",
                    rule.data_type
                )));
            }
        }

        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, IngestError> {
        toml::from_str(toml_str)
            .map_err(|e| IngestError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, IngestError> {
        toml::to_string_pretty(self)
            .map_err(|e| IngestError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

/// Type rules used when no other table is configured
pub fn default_type_rules() -> Vec<DataTypeRule> {
    vec![
        DataTypeRule::new(
            DataType::Date,
            &["date", "dob", "d.o.b.", "birthday", "dated", "deadline", "expiration"],
        ),
        DataTypeRule::new(DataType::Email, &["email", "e-mail"]),
        DataTypeRule::new(
            DataType::Phone,
            &["phone", "telephone", "tel.", "fax", "mobile", "cell"],
        ),
        DataTypeRule::new(
            DataType::Currency,
            &[
                "amount", "fee", "fees", "cost", "costs", "price", "payment", "salary",
                "wages", "rent", "damages", "balance", "$", "dollars",
            ],
        ),
        DataTypeRule::new(
            DataType::Address,
            &["address", "street", "city", "zip", "zip code", "postal code", "residence"],
        ),
        DataTypeRule::new(
            DataType::Integer,
            &["number", "no.", "#", "count", "age", "quantity", "year"],
        ),
        DataTypeRule::new(DataType::Decimal, &["percent", "percentage", "rate", "ratio", "%"]),
        DataTypeRule::new(
            DataType::Boolean,
            &["yes/no", "true/false", "check if", "whether"],
        ),
    ]
}
