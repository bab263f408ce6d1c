//! Mention normalization
//!
//! Turns a raw mention into canonical key form: lowercase, whitespace
//! collapsed, phrase table applied, then folded to `[a-z0-9_]`.

use crate::{PhraseSubstitution, ResolverError};
use regex::{NoExpand, Regex};

/// Key used when nothing survives folding
pub const UNKNOWN_KEY: &str = "field_unknown";

/// Longest key a mention can fold to
pub const MAX_KEY_LEN: usize = 200;

/// Compile a literal phrase into a case-insensitive word-boundary pattern
///
/// `\b` is only added at edges that are word characters, so phrases such as
/// `no.` or `#` still match next to punctuation.
pub fn phrase_pattern(phrase: &str) -> Result<Regex, ResolverError> {
    let phrase = phrase.trim();
    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');

    let mut pattern = String::from("(?i)");
    if is_word(phrase.chars().next()) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(phrase));
    if is_word(phrase.chars().last()) {
        pattern.push_str(r"\b");
    }

    Ok(Regex::new(&pattern)?)
}

/// Fold text into canonical key form
///
/// Every run of characters outside `[a-z0-9]` becomes one `_`, leading and
/// trailing `_` are trimmed, a leading digit gets a `field_` prefix and the
/// result is capped at [`MAX_KEY_LEN`] characters.
pub fn fold_key(text: &str) -> String {
    let mut key = String::with_capacity(text.len());
    let mut pending_separator = false;

    for c in text.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !key.is_empty() {
                key.push('_');
            }
            pending_separator = false;
            key.push(c);
        } else {
            pending_separator = true;
        }
    }

    if key.is_empty() {
        return UNKNOWN_KEY.to_string();
    }
    if key.starts_with(|c: char| c.is_ascii_digit()) {
        key.insert_str(0, "field_");
    }

    key.truncate(MAX_KEY_LEN);
    key.trim_end_matches('_').to_string()
}

/// Applies the phrase table and folds mentions into keys
#[derive(Debug, Clone)]
pub struct Normalizer {
    substitutions: Vec<(Regex, String)>,
}

impl Normalizer {
    /// Compile the phrase table
    pub fn new(table: &[PhraseSubstitution]) -> Result<Self, ResolverError> {
        let substitutions = table
            .iter()
            .map(|entry| Ok((phrase_pattern(&entry.from)?, entry.to.clone())))
            .collect::<Result<Vec<_>, ResolverError>>()?;
        Ok(Self { substitutions })
    }

    /// Lowercase, collapse whitespace and apply the phrase table
    pub fn clean(&self, raw: &str) -> String {
        let mut text = raw.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        for (pattern, replacement) in &self.substitutions {
            text = pattern.replace_all(&text, NoExpand(replacement)).into_owned();
        }
        text
    }

    /// Normalize a raw mention into canonical key form
    pub fn normalize(&self, raw: &str) -> String {
        fold_key(&self.clean(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_phrase_substitutions;

    fn normalizer() -> Normalizer {
        Normalizer::new(&default_phrase_substitutions()).unwrap()
    }

    #[test]
    fn test_fold_key() {
        assert_eq!(fold_key("plaintiff name"), "plaintiff_name");
        assert_eq!(fold_key("  {Plaintiff   Name}: "), "plaintiff_name");
        assert_eq!(fold_key("amount-due ($)"), "amount_due");
        assert_eq!(fold_key("1st witness"), "field_1st_witness");
        assert_eq!(fold_key("!!!"), UNKNOWN_KEY);
        assert_eq!(fold_key(""), UNKNOWN_KEY);
    }

    #[test]
    fn test_fold_key_length_cap() {
        let long = "word ".repeat(100);
        let key = fold_key(&long);
        assert!(key.len() <= MAX_KEY_LEN);
        assert!(!key.ends_with('_'));
    }

    #[test]
    fn test_normalize_trailing_colon() {
        let n = normalizer();
        assert_eq!(n.normalize("Plaintiff Name"), "plaintiff_name");
        assert_eq!(n.normalize("plaintiff name:"), "plaintiff_name");
    }

    #[test]
    fn test_phrase_table() {
        let n = normalizer();
        assert_eq!(n.normalize("Case No."), "case_number");
        assert_eq!(n.normalize("Case #"), "case_number");
        assert_eq!(n.normalize("Name of the Defendant"), "name_defendant");
        assert_eq!(n.normalize("D.O.B."), "date_of_birth");
        assert_eq!(n.normalize("DOB"), "date_of_birth");
        assert_eq!(n.normalize("E-mail Address"), "email_address");
        assert_eq!(n.normalize("Telephone"), "phone");
    }

    #[test]
    fn test_phrases_respect_word_boundaries() {
        let n = normalizer();
        // "dob" inside a longer word is left alone
        assert_eq!(n.normalize("Adobe Account"), "adobe_account");
        // "no." only matches as a whole word
        assert_eq!(n.normalize("Casino."), "casino");
    }

    #[test]
    fn test_phrase_pattern_edges() {
        assert_eq!(phrase_pattern("dob").unwrap().as_str(), r"(?i)\bdob\b");
        assert_eq!(phrase_pattern("no.").unwrap().as_str(), r"(?i)\bno\.");
        assert_eq!(phrase_pattern("#").unwrap().as_str(), r"(?i)\#");
    }

    #[test]
    fn test_replacement_is_literal() {
        let n = Normalizer::new(&[PhraseSubstitution::new("amount", "$1 total")]).unwrap();
        assert_eq!(n.clean("Amount"), "$1 total");
    }
}
