//! Order-insensitive lexical similarity
//!
//! Scores are on a 0-100 scale. The base ratio is the indel similarity
//! `200 * lcs / (len_a + len_b)`; the token-sort variant sorts words first so
//! "name plaintiff" and "plaintiff name" score 100.

/// Length of the longest common subsequence of two character sequences
fn lcs_len(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    // Two rolling rows of the DP table
    let mut previous = vec![0usize; b.len() + 1];
    let mut current = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            current[j + 1] = if ca == cb {
                previous[j] + 1
            } else {
                previous[j + 1].max(current[j])
            };
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Similarity of two strings, 0-100
///
/// Two empty strings are identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let total = a_chars.len() + b_chars.len();

    if total == 0 {
        return 100.0;
    }

    200.0 * lcs_len(&a_chars, &b_chars) as f64 / total as f64
}

/// Words of a key or phrase, lowercased and sorted
fn sorted_tokens(text: &str) -> String {
    let mut tokens: Vec<String> = text
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect();
    tokens.sort();
    tokens.join(" ")
}

/// Token-sort ratio, 0-100
///
/// Words are split on whitespace and `_`, so canonical keys and free text
/// compare the same way.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}
