//! Choose-one paragraph groups

/// A "choose one" instruction and the placeholders that follow it
///
/// Templates mark mutually exclusive paragraphs with an instruction such as
/// `{CHOOSE APPROPRIATE PARAGRAPH}`; the placeholders in the next few
/// paragraphs are the alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphGroup {
    /// Instruction text, as written
    pub instruction: String,

    /// Document the group was found in
    pub source_file: String,

    /// Paragraph index of the instruction
    pub start_paragraph: i64,

    /// Raw text of the member placeholders, in paragraph order
    pub members: Vec<String>,
}
