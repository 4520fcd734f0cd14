use super::parse_trait::Parse;
use crate::error::CommandError;
use crate::syntax::{parse_result::ParseResult, reader::LineReader, token::LineType};

/// `+Name`. Imports are kept once, in order of first appearance.
pub struct ImportParser;
impl Parse for ImportParser {
    fn can_parse(&self, r: &LineReader) -> bool {
        r.is_type(LineType::Import)
    }
    fn parse(&self, r: &mut LineReader, result: &mut ParseResult) -> Result<(), CommandError> {
        let Some(line) = r.cur().cloned() else {
            return Err(r.create_error("Unexpected end of input".into()));
        };
        let name = line.text.trim_start_matches('+').trim();
        if name.is_empty() {
            return Err(r.create_error("Missing import name".into()));
        }
        if !result.imports.iter().any(|existing| existing == name) {
            result.imports.push(name.to_string());
            result.import_lines.push(line.number);
        }
        Ok(())
    }
}
