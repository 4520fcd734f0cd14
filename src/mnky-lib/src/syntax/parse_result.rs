use crate::error::CommandError;
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDeclaration {
    pub name: String,
    pub value: String,
    pub description: String,
    /// Section the variable was declared in, `""` for the top level.
    pub scope: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawCommandBody {
    Invocation { invocation: String, value: String },
    Malformed(CommandError),
}

/// A command line before variable substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCommand {
    pub line: usize,
    pub scope: String,
    pub body: RawCommandBody,
}

impl RawCommand {
    pub fn invocation(line: usize, scope: &str, invocation: &str, value: &str) -> Self {
        Self {
            line,
            scope: scope.to_string(),
            body: RawCommandBody::Invocation {
                invocation: invocation.to_string(),
                value: value.to_string(),
            },
        }
    }

    pub fn malformed(line: usize, scope: &str, reason: CommandError) -> Self {
        Self {
            line,
            scope: scope.to_string(),
            body: RawCommandBody::Malformed(reason),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    pub options: IndexMap<String, Vec<String>>,
    pub variables: Vec<VariableDeclaration>,
    pub imports: Vec<String>,
    /// Line of each entry of `imports`; an import applies at that position.
    pub import_lines: Vec<usize>,
    pub commands: Vec<RawCommand>,
}
