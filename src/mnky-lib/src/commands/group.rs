use super::traits::{ApplyResult, Command, Target};

/// Runs several commands as one.
#[derive(Debug)]
pub struct Group {
    commands: Vec<Box<dyn Command>>,
}

impl Group {
    pub fn new(commands: Vec<Box<dyn Command>>) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &[Box<dyn Command>] {
        &self.commands
    }
}

impl Command for Group {
    fn name(&self) -> &str {
        "group"
    }

    fn is_applicable_for_group(&self, group: &str) -> bool {
        self.commands
            .iter()
            .all(|command| command.is_applicable_for_group(group))
    }

    /// Every child is attempted; the group applied if any child did.
    fn apply(&self, target: &mut Target<'_>) -> ApplyResult {
        let mut undo = Vec::new();
        let mut applied = false;
        for command in &self.commands {
            if let Some(elements) = command.apply(target)? {
                applied = true;
                undo.extend(elements);
            }
        }
        Ok(applied.then_some(undo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{ErrorCommand, SearchAndReplace};
    use crate::document::{Document, Tree};
    use crate::error::CommandError;
    use crate::pattern::Pattern;

    fn replace(search: &str, value: &str) -> Box<dyn Command> {
        Box::new(SearchAndReplace::new(
            Pattern::parse(search).unwrap(),
            value,
        ))
    }

    #[test]
    fn test_group_applicability_is_conjunction() {
        let group = Group::new(vec![replace("a", "b"), replace("c", "d")]);
        assert!(group.is_applicable_for_group("text"));
        assert!(!group.is_applicable_for_group("document"));

        let mixed = Group::new(vec![
            replace("a", "b"),
            Box::new(ErrorCommand::new(CommandError::UnknownCommand("x".into()))),
        ]);
        assert!(!mixed.is_applicable_for_group("text"));
    }

    #[test]
    fn test_group_attempts_every_child() {
        let group = Group::new(vec![replace("x", "y"), replace("a", "b"), replace("c", "d")]);
        let mut tree = Tree::scratch("http://example.com", "a c");
        let root = tree.root();
        let undo = group
            .apply(&mut Target::node(&mut tree, root, "value"))
            .unwrap()
            .unwrap();
        assert_eq!(undo.len(), 2);
        assert_eq!(tree.property(root, "value").as_deref(), Some("b d"));
    }

    #[test]
    fn test_group_without_match_did_not_apply() {
        let group = Group::new(vec![replace("x", "y")]);
        let mut tree = Tree::scratch("http://example.com", "a");
        let root = tree.root();
        assert_eq!(
            group
                .apply(&mut Target::node(&mut tree, root, "value"))
                .unwrap(),
            None
        );
    }
}
