use super::token::{Line, LineType};
use crate::error::CommandError;

#[derive(Clone)]
pub struct LineReader {
    pub lines: Vec<Line>,
    pub idx: usize,
    scope: String,
}

impl LineReader {
    pub fn new(lines: Vec<Line>) -> Self {
        Self {
            lines,
            idx: 0,
            scope: String::new(),
        }
    }

    pub fn cur(&self) -> Option<&Line> {
        self.lines.get(self.idx)
    }

    pub fn advance(&mut self) {
        if self.idx < self.lines.len() {
            self.idx += 1;
        }
    }

    pub fn is_end(&self) -> bool {
        self.idx >= self.lines.len()
    }

    pub fn is_type(&self, line_type: LineType) -> bool {
        self.cur().is_some_and(|line| line.line_type == line_type)
    }

    /// Section the reader is currently in, `""` before the first header.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn set_scope(&mut self, scope: &str) {
        self.scope = scope.to_string();
    }

    pub fn skip_ignorable(&mut self) {
        while self.is_type(LineType::Blank) || self.is_type(LineType::Comment) {
            self.advance();
        }
    }

    pub fn create_error(&self, message: String) -> CommandError {
        CommandError::Parse {
            line: self.cur().map_or(self.lines.len(), |line| line.number),
            message,
        }
    }
}
