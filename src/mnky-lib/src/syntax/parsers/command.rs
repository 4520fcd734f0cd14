use super::parse_trait::Parse;
use crate::error::CommandError;
use crate::syntax::{
    parse_result::{ParseResult, RawCommand},
    reader::LineReader,
    token::LineType,
    tokenize::split_assignment,
};

/// `!command(params) = value` and plain `search = replace` lines. Both are
/// kept raw; variables are substituted when the configuration builds them.
pub struct CommandParser;
impl Parse for CommandParser {
    fn can_parse(&self, r: &LineReader) -> bool {
        r.is_type(LineType::Command) || r.is_type(LineType::Assignment)
    }
    fn parse(&self, r: &mut LineReader, result: &mut ParseResult) -> Result<(), CommandError> {
        let Some(line) = r.cur().cloned() else {
            return Err(r.create_error("Unexpected end of input".into()));
        };
        let (key, value) = split_assignment(&line.text);
        if key.is_empty() {
            return Err(r.create_error("Missing search term before '='".into()));
        }
        if line.line_type == LineType::Assignment && value.is_none() {
            return Err(r.create_error(format!("Expected '=' after '{key}'")));
        }
        result.commands.push(RawCommand::invocation(
            line.number,
            r.scope(),
            &key,
            value.as_deref().unwrap_or_default(),
        ));
        Ok(())
    }
}
