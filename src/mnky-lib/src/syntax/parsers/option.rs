use super::parse_trait::Parse;
use crate::error::CommandError;
use crate::syntax::{
    parse_result::ParseResult, reader::LineReader, token::LineType, tokenize::split_assignment,
};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref OPTION_KEY: Regex = Regex::new(r"^@([A-Za-z_][\w-]*)\s*(\[\])?$").unwrap();
}

/// `@name = value`, `@name[] = value` and bare `@flag`. Repeated keys
/// accumulate in order; a flag is present with no values.
pub struct OptionParser;
impl Parse for OptionParser {
    fn can_parse(&self, r: &LineReader) -> bool {
        r.is_type(LineType::Option)
    }
    fn parse(&self, r: &mut LineReader, result: &mut ParseResult) -> Result<(), CommandError> {
        let text = r.cur().map(|line| line.text.clone()).unwrap_or_default();
        let (key, value) = split_assignment(&text);
        let caps = OPTION_KEY
            .captures(&key)
            .ok_or_else(|| r.create_error(format!("Invalid option '{key}'")))?;
        let values = result.options.entry(caps[1].to_string()).or_default();
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            values.push(value);
        }
        Ok(())
    }
}
