#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    Blank,
    Comment,
    Section,
    Option,
    Variable,
    Import,
    Command,
    Assignment,
    Text,
}

/// One trimmed source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub line_type: LineType,
    /// 1-based.
    pub number: usize,
    pub text: String,
}
