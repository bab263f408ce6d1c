//! Choose-one paragraph groups
//!
//! Templates mark mutually exclusive paragraphs with an instruction such as
//! `{CHOOSE ONE}`. The placeholders that follow the instruction within a few
//! paragraphs form one group.

use crate::types::Mention;
use regex::Regex;
use std::sync::LazyLock;

static INSTRUCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bCHOOSE\s+(APPROPRIATE|ONE|ANY)\b").expect("Invalid instruction regex")
});

/// Whether a mention is a choose-one instruction rather than a field
pub fn is_choose_one_instruction(raw: &str) -> bool {
    INSTRUCTION.is_match(raw)
}

/// A group found in one document, by mention index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPlan {
    /// Index of the instruction mention
    pub instruction: usize,

    /// Paragraph index of the instruction
    pub start_paragraph: i64,

    /// Indexes of the member mentions, in paragraph order
    pub members: Vec<usize>,
}

/// Find choose-one groups in a document's mentions
///
/// Mentions are considered in paragraph order; mentions without a paragraph
/// index are ignored. Each instruction collects up to `lookahead` following
/// mentions whose paragraph is at most `window` paragraphs later, stopping at
/// the next instruction.
pub fn detect_choose_one(mentions: &[Mention], window: i64, lookahead: usize) -> Vec<GroupPlan> {
    let mut indexed: Vec<(usize, i64)> = mentions
        .iter()
        .enumerate()
        .filter_map(|(i, m)| m.paragraph_index.map(|p| (i, p)))
        .collect();
    // Stable, so mentions sharing a paragraph keep document order
    indexed.sort_by_key(|&(_, paragraph)| paragraph);

    let mut plans = Vec::new();
    for (position, &(index, start)) in indexed.iter().enumerate() {
        if !is_choose_one_instruction(&mentions[index].raw_text) {
            continue;
        }

        let members: Vec<usize> = indexed[position + 1..]
            .iter()
            .take_while(|&&(i, _)| !is_choose_one_instruction(&mentions[i].raw_text))
            .take_while(|&&(_, paragraph)| paragraph <= start.saturating_add(window))
            .take(lookahead)
            .map(|&(i, _)| i)
            .collect();

        plans.push(GroupPlan {
            instruction: index,
            start_paragraph: start,
            members,
        });
    }
    plans
}
