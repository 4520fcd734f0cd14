use super::parse_trait::Parse;
use crate::error::CommandError;
use crate::syntax::{
    keywords::VARIABLE_COMMENT,
    parse_result::{ParseResult, VariableDeclaration},
    reader::LineReader,
    token::LineType,
    tokenize::split_assignment,
};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref VARIABLE_KEY: Regex = Regex::new(r"^\$([A-Za-z_]\w*)$").unwrap();
}

/// `$name = value // description`.
pub struct VariableParser;
impl Parse for VariableParser {
    fn can_parse(&self, r: &LineReader) -> bool {
        r.is_type(LineType::Variable)
    }
    fn parse(&self, r: &mut LineReader, result: &mut ParseResult) -> Result<(), CommandError> {
        let Some(line) = r.cur().cloned() else {
            return Err(r.create_error("Unexpected end of input".into()));
        };
        let (key, value) = split_assignment(&line.text);
        let caps = VARIABLE_KEY
            .captures(&key)
            .ok_or_else(|| r.create_error(format!("Invalid variable name '{key}'")))?;
        let (value, description) = split_description(value.as_deref().unwrap_or_default());
        result.variables.push(VariableDeclaration {
            name: caps[1].to_string(),
            value,
            description,
            scope: r.scope().to_string(),
            line: line.number,
        });
        Ok(())
    }
}

fn split_description(value: &str) -> (String, String) {
    let mut search_from = 0;
    while let Some(offset) = value[search_from..].find(VARIABLE_COMMENT) {
        let at = search_from + offset;
        if !value[..at].ends_with(':') {
            return (
                value[..at].trim().to_string(),
                value[at + VARIABLE_COMMENT.len()..].trim().to_string(),
            );
        }
        search_from = at + VARIABLE_COMMENT.len();
    }
    (value.trim().to_string(), String::new())
}
