use super::traits::{ApplyResult, Command, Target};
use crate::error::CommandError;

/// Stands in for a line that could not be built. Never applies.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorCommand {
    reason: CommandError,
}

impl ErrorCommand {
    pub fn new(reason: CommandError) -> Self {
        Self { reason }
    }

    pub fn reason(&self) -> &CommandError {
        &self.reason
    }
}

impl Command for ErrorCommand {
    fn name(&self) -> &str {
        "error"
    }

    fn is_applicable_for_group(&self, _group: &str) -> bool {
        false
    }

    fn apply(&self, _target: &mut Target<'_>) -> ApplyResult {
        Ok(None)
    }

    fn error(&self) -> Option<&CommandError> {
        Some(&self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, Tree};

    #[test]
    fn test_error_command_never_applies() {
        let command = ErrorCommand::new(CommandError::UnknownCommand("nope".into()));
        assert!(!command.is_applicable_for_group("text"));
        assert!(!command.is_applicable_for_group("document"));

        let mut tree = Tree::scratch("http://example.com", "a");
        let root = tree.root();
        let mut target = Target::node(&mut tree, root, "value");
        assert_eq!(command.apply(&mut target).unwrap(), None);
        assert_eq!(
            command.error(),
            Some(&CommandError::UnknownCommand("nope".into()))
        );
    }
}
