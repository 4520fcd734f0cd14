use thiserror::Error;

/// Reasons a command line could not be turned into an executable command.
///
/// These never abort a configuration: the builder wraps them into an
/// [`ErrorCommand`](crate::commands::ErrorCommand) that is never applicable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Syntax error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Malformed command invocation: '{0}'")]
    MalformedInvocation(String),

    #[error("Unknown command: '{0}'")]
    UnknownCommand(String),

    #[error("Unknown namespace: '{0}'")]
    UnknownNamespace(String),

    #[error("'{name}' is a namespace, not a command")]
    NamespaceNotCallable { name: String },

    #[error("Command '{command}' requires parameter #{position} ({parameter})")]
    MissingParameter {
        command: String,
        position: usize,
        parameter: String,
    },

    #[error("Invalid parameter list: {0}")]
    InvalidParameters(String),

    #[error("Invalid regular expression '{pattern}': {reason}")]
    InvalidRegex { pattern: String, reason: String },

    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
}

/// A leaf command's side effect failed. This is the only error that leaves
/// `apply`; the scheduler contains it per configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error("Node {0} does not exist")]
    NodeNotFound(usize),

    #[error("Node {node} does not accept property '{property}'")]
    PropertyRejected { node: usize, property: String },

    #[error("Cannot remove the document root")]
    RootRemoval,

    #[error("Mutation failed: {0}")]
    Failed(String),
}
