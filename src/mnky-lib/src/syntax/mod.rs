pub mod analyze;
pub mod keywords;
pub mod parse_result;
pub mod parsers;
pub mod reader;
pub mod resolve;
pub mod token;
pub mod tokenize;
pub mod variable_context;

pub use analyze::analyze;
pub use parse_result::{ParseResult, RawCommand, RawCommandBody, VariableDeclaration};
pub use resolve::substitute;
pub use tokenize::tokenize;
pub use variable_context::VariableContext;

/// Tokenizes and analyzes a configuration in one step.
pub fn parse(source: &str) -> ParseResult {
    analyze(&tokenize(source))
}
