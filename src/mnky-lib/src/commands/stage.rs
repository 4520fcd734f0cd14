use super::traits::{ApplyResult, Command, Target};
use crate::pattern::location_matches;
use crate::undo::record;

/// Root property naming the demo stage the page is in.
pub const STAGE_PROPERTY: &str = "data-demo-stage";

/// Marks the document with the name of a demo stage while the page matches
/// a location and, when given, a title.
#[derive(Debug, Clone)]
pub struct Stage {
    location_filter: String,
    title: String,
    name: String,
}

impl Stage {
    pub fn new(location_filter: &str, title: &str, name: &str) -> Self {
        Self {
            location_filter: location_filter.to_string(),
            title: title.to_string(),
            name: name.to_string(),
        }
    }
}

impl Command for Stage {
    fn name(&self) -> &str {
        "stage"
    }

    fn is_applicable_for_group(&self, group: &str) -> bool {
        group == "document"
    }

    fn apply(&self, target: &mut Target<'_>) -> ApplyResult {
        if !location_matches(&self.location_filter, &target.location) {
            return Ok(None);
        }
        let Some(t) = target.as_node() else {
            return Ok(None);
        };
        let root = t.document.root();
        if !self.title.is_empty() {
            let title = t.document.property(root, "title").unwrap_or_default();
            if !title.contains(self.title.as_str()) {
                return Ok(None);
            }
        }
        Ok(record(t.document, root, STAGE_PROPERTY, &self.name)?.map(|undo| vec![undo]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandBuilder;
    use crate::document::{Document, Tree};

    #[test]
    fn test_stage_marks_matching_page() {
        let mut tree = Tree::new("http://example.com/checkout");
        let root = tree.root();
        tree.set_property(root, "title", "Checkout - Shop").unwrap();

        let command = CommandBuilder::default().build("!stage(checkout, Shop)", "Payment");
        assert!(command.is_applicable_for_group("document"));
        let undo = command
            .apply(&mut Target::node(&mut tree, root, "documentElement"))
            .unwrap()
            .unwrap();
        assert_eq!(undo.len(), 1);
        assert_eq!(tree.property(root, STAGE_PROPERTY).as_deref(), Some("Payment"));
    }

    #[test]
    fn test_stage_needs_title_and_location() {
        let mut tree = Tree::new("http://example.com/checkout");
        let root = tree.root();
        tree.set_property(root, "title", "Cart").unwrap();

        for invocation in ["!stage(checkout, Shop)", "!stage(login)"] {
            let command = CommandBuilder::default().build(invocation, "Payment");
            assert_eq!(
                command
                    .apply(&mut Target::node(&mut tree, root, "documentElement"))
                    .unwrap(),
                None
            );
        }
        assert_eq!(tree.property(root, STAGE_PROPERTY), None);
    }
}
