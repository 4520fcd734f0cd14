use super::parse_trait::Parse;
use crate::error::CommandError;
use crate::syntax::{parse_result::ParseResult, reader::LineReader, token::LineType};

/// `[Name]` or `[Name.Sub]` opens a scope that lasts until the next header.
pub struct SectionParser;
impl Parse for SectionParser {
    fn can_parse(&self, r: &LineReader) -> bool {
        r.is_type(LineType::Section)
    }
    fn parse(&self, r: &mut LineReader, _result: &mut ParseResult) -> Result<(), CommandError> {
        let text = r.cur().map(|line| line.text.clone()).unwrap_or_default();
        let name = text.trim_start_matches('[').trim_end_matches(']').trim();
        if name.split('.').any(|segment| segment.trim().is_empty()) && !name.is_empty() {
            return Err(r.create_error(format!("Invalid section name '{name}'")));
        }
        let scope = name
            .split('.')
            .map(str::trim)
            .collect::<Vec<_>>()
            .join(".");
        r.set_scope(&scope);
        Ok(())
    }
}
