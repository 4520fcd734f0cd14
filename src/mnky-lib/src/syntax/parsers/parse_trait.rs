use crate::error::CommandError;
use crate::syntax::{parse_result::ParseResult, reader::LineReader};

/// Parses the reader's current line. The caller advances the reader.
pub trait Parse {
    fn can_parse(&self, r: &LineReader) -> bool;
    fn parse(&self, r: &mut LineReader, result: &mut ParseResult) -> Result<(), CommandError>;
}
