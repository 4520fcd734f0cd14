use super::traits::{ApplyResult, Command, Target};
use crate::document::Selector;
use crate::pattern::location_matches;

/// Applies the wrapped command only where the location filter matches the
/// current url and the selector matches the node's element.
#[derive(Debug)]
pub struct If {
    location_filter: String,
    selector: Option<Selector>,
    inner: Box<dyn Command>,
}

impl If {
    pub fn new(location_filter: &str, selector: Option<Selector>, inner: Box<dyn Command>) -> Self {
        Self {
            location_filter: location_filter.to_string(),
            selector,
            inner,
        }
    }

    fn selector_matches(&self, target: &mut Target<'_>) -> bool {
        let Some(selector) = &self.selector else {
            return true;
        };
        let Some(node_target) = target.as_node() else {
            return false;
        };
        node_target
            .document
            .element_of(node_target.node)
            .is_some_and(|element| selector.matches(&*node_target.document, element))
    }
}

impl Command for If {
    fn name(&self) -> &str {
        "if"
    }

    fn is_applicable_for_group(&self, group: &str) -> bool {
        self.inner.is_applicable_for_group(group)
    }

    fn apply(&self, target: &mut Target<'_>) -> ApplyResult {
        if !location_matches(&self.location_filter, &target.location) {
            return Ok(None);
        }
        if !self.selector_matches(target) {
            return Ok(None);
        }
        self.inner.apply(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::SearchAndReplace;
    use crate::document::{Document, Tree};
    use crate::pattern::Pattern;

    fn inner() -> Box<dyn Command> {
        Box::new(SearchAndReplace::new(Pattern::parse("a").unwrap(), "b"))
    }

    fn page() -> (Tree, crate::document::NodeId) {
        let mut tree = Tree::new("http://www.example.com/app");
        let root = tree.root();
        let body = tree.append_child(root, "body", &[]).unwrap();
        let nav = tree.append_child(body, "nav", &[("class", "menu")]).unwrap();
        let text = tree.append_text(nav, "a").unwrap();
        (tree, text)
    }

    #[test]
    fn test_location_filter() {
        let (mut tree, text) = page();
        let skipped = If::new("/other/", None, inner());
        assert_eq!(
            skipped
                .apply(&mut Target::node(&mut tree, text, "data"))
                .unwrap(),
            None
        );
        let applied = If::new("www", None, inner());
        assert!(applied
            .apply(&mut Target::node(&mut tree, text, "data"))
            .unwrap()
            .is_some());
        assert_eq!(tree.property(text, "data").as_deref(), Some("b"));
    }

    #[test]
    fn test_selector_filter_uses_parent_of_text() {
        let (mut tree, text) = page();
        let skipped = If::new("", Some(Selector::parse("footer").unwrap()), inner());
        assert_eq!(
            skipped
                .apply(&mut Target::node(&mut tree, text, "data"))
                .unwrap(),
            None
        );
        let applied = If::new("", Some(Selector::parse("nav.menu").unwrap()), inner());
        assert!(applied
            .apply(&mut Target::node(&mut tree, text, "data"))
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_applicability_follows_inner_command() {
        let command = If::new("", None, inner());
        assert!(command.is_applicable_for_group("text"));
        assert!(!command.is_applicable_for_group("url"));
    }
}
