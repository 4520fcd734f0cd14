use super::traits::{is_text_group, ApplyResult, Command, Target};
use crate::document::Selector;
use crate::pattern::{location_matches, Pattern};
use crate::undo::record;

/// Finds a text, walks up to one of its ancestors and sets the text of the
/// first element below that ancestor matching a selector.
#[derive(Debug, Clone)]
pub struct ReplaceNeighbor {
    search: Pattern,
    replace: String,
    nth_parent: usize,
    neighbor: Selector,
    location_filter: String,
    selector: Option<Selector>,
}

impl ReplaceNeighbor {
    pub fn new(search: Pattern, replace: &str, nth_parent: usize, neighbor: Selector) -> Self {
        Self {
            search,
            replace: replace.to_string(),
            nth_parent: nth_parent.max(1),
            neighbor,
            location_filter: String::new(),
            selector: None,
        }
    }

    pub fn with_filters(mut self, location_filter: &str, selector: Option<Selector>) -> Self {
        self.location_filter = location_filter.to_string();
        self.selector = selector;
        self
    }
}

impl Command for ReplaceNeighbor {
    fn name(&self) -> &str {
        "replaceNeighbor"
    }

    fn is_applicable_for_group(&self, group: &str) -> bool {
        is_text_group(group)
    }

    fn apply(&self, target: &mut Target<'_>) -> ApplyResult {
        if !location_matches(&self.location_filter, &target.location) {
            return Ok(None);
        }
        let Some(t) = target.as_node() else {
            return Ok(None);
        };
        if !t.value().is_some_and(|value| self.search.is_match(&value)) {
            return Ok(None);
        }
        let Some(element) = t.document.element_of(t.node) else {
            return Ok(None);
        };
        if let Some(selector) = &self.selector {
            if !selector.matches(&*t.document, element) {
                return Ok(None);
            }
        }
        let ancestor = t.document.ancestor(element, self.nth_parent - 1);
        let neighbor = t
            .document
            .descendants(ancestor)
            .into_iter()
            .skip(1)
            .find(|node| self.neighbor.matches(&*t.document, *node));
        let Some(neighbor) = neighbor else {
            return Ok(None);
        };
        Ok(record(t.document, neighbor, "textContent", &self.replace)?.map(|undo| vec![undo]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandBuilder;
    use crate::document::{Document, NodeId, Tree};

    fn row(tree: &mut Tree) -> (NodeId, NodeId, NodeId) {
        let root = tree.root();
        let table = tree.append_child(root, "table", &[]).unwrap();
        let tr = tree.append_child(table, "tr", &[]).unwrap();
        let name = tree.append_child(tr, "td", &[("class", "name")]).unwrap();
        let text = tree.append_text(name, "checkout").unwrap();
        let status = tree.append_child(tr, "td", &[("class", "status")]).unwrap();
        tree.append_text(status, "critical").unwrap();
        (text, name, status)
    }

    #[test]
    fn test_neighbor_of_match_is_replaced() {
        let mut tree = Tree::new("http://example.com");
        let (text, _, status) = row(&mut tree);

        let command = CommandBuilder::default().build("!replaceNeighbor(checkout, 2, .status)", "normal");
        assert!(command.error().is_none());
        let undo = command
            .apply(&mut Target::node(&mut tree, text, "data"))
            .unwrap()
            .unwrap();
        assert_eq!(undo.len(), 1);
        assert_eq!(tree.property(status, "textContent").as_deref(), Some("normal"));
    }

    #[test]
    fn test_neighbor_outside_ancestor_is_not_found() {
        let mut tree = Tree::new("http://example.com");
        let (text, name, _) = row(&mut tree);

        let command = ReplaceNeighbor::new(
            Pattern::parse("checkout").unwrap(),
            "normal",
            1,
            Selector::parse(".status").unwrap(),
        );
        assert_eq!(
            command
                .apply(&mut Target::node(&mut tree, text, "data"))
                .unwrap(),
            None
        );
        assert_eq!(tree.property(name, "textContent").as_deref(), Some("checkout"));
    }
}
