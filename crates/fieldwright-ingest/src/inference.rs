//! Metadata inference for new fields
//!
//! Data type, tooltip and option set are derived from the raw mention text
//! alone, deterministically.

use crate::config::DataTypeRule;
use crate::IngestError;
use fieldwright_domain::DataType;
use fieldwright_resolver::phrase_pattern;
use regex::Regex;

/// Strip wrapping braces and a trailing colon, collapse whitespace
pub fn clean_label(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let unwrapped = collapsed
        .trim_start_matches(['{', '['])
        .trim_end_matches(['}', ']'])
        .trim();
    unwrapped.trim_end_matches(':').trim().to_string()
}

/// Split a mention into its options, if it is a choice set
///
/// Recognizes 2 to `max` segments separated by `/` or `|`, none empty after
/// trimming. Anything else yields no options.
pub fn detect_options(raw: &str, max: usize) -> Vec<String> {
    let label = clean_label(raw);
    if !label.contains(['/', '|']) {
        return Vec::new();
    }

    let segments: Vec<String> = label
        .split(['/', '|'])
        .map(|s| s.trim().to_string())
        .collect();

    if segments.len() < 2 || segments.len() > max || segments.iter().any(String::is_empty) {
        return Vec::new();
    }
    segments
}

/// Tooltip shown next to a field
pub fn generate_tooltip(raw: &str, options: &[String]) -> String {
    if !options.is_empty() {
        return format!("Select one: {}", options.join(", "));
    }

    let label = clean_label(raw);
    if label.is_empty() {
        "Enter a value".to_string()
    } else {
        format!("Enter the {}", label.to_lowercase())
    }
}

/// Ordered keyword rules mapping mention text to a data type
#[derive(Debug, Clone)]
pub struct TypeInferencer {
    rules: Vec<(DataType, Vec<Regex>)>,
}

impl TypeInferencer {
    /// Compile a rule table
    pub fn new(rules: &[DataTypeRule]) -> Result<Self, IngestError> {
        let mut compiled = Vec::with_capacity(rules.len());
        for rule in rules {
            let data_type = rule.parsed_type()?;
            let patterns = rule
                .keywords
                .iter()
                .map(|k| phrase_pattern(k).map_err(|e| IngestError::Config(e.to_string())))
                .collect::<Result<Vec<_>, _>>()?;
            compiled.push((data_type, patterns));
        }
        Ok(Self { rules: compiled })
    }

    /// Data type for a raw mention; text when no rule matches
    pub fn infer(&self, raw: &str) -> DataType {
        self.rules
            .iter()
            .find(|(_, patterns)| patterns.iter().any(|p| p.is_match(raw)))
            .map(|(data_type, _)| *data_type)
            .unwrap_or_default()
    }
}
