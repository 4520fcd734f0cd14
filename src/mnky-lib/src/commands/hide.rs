use super::traits::{is_text_group, ApplyResult, Command, Target};
use crate::document::{Document, NodeId, Selector};
use crate::pattern::{location_matches, Pattern};
use crate::undo::record;

/// Hides the element around a matching text.
///
/// Without a selector the element `nth_parent` levels up is hidden. With a
/// selector the nearest ancestor within `nth_parent` levels that matches it is
/// hidden, and nothing happens if there is none.
#[derive(Debug, Clone)]
pub struct Hide {
    search: Pattern,
    nth_parent: usize,
    selector: Option<Selector>,
    href_filter: String,
    hash_filter: String,
}

impl Hide {
    pub fn new(search: Pattern, nth_parent: usize, selector: Option<Selector>) -> Self {
        Self {
            search,
            nth_parent: nth_parent.max(1),
            selector,
            href_filter: String::new(),
            hash_filter: String::new(),
        }
    }

    pub fn with_filters(mut self, href_filter: &str, hash_filter: &str) -> Self {
        self.href_filter = href_filter.to_string();
        self.hash_filter = hash_filter.to_string();
        self
    }

    fn location_allowed(&self, location: &str) -> bool {
        if !location_matches(&self.href_filter, location) {
            return false;
        }
        if self.hash_filter.is_empty() {
            return true;
        }
        location
            .split_once('#')
            .is_some_and(|(_, hash)| hash.contains(self.hash_filter.as_str()))
    }

    fn pick(&self, document: &dyn Document, element: NodeId) -> Option<NodeId> {
        let Some(selector) = &self.selector else {
            return Some(document.ancestor(element, self.nth_parent - 1));
        };
        let mut current = element;
        for _ in 0..self.nth_parent {
            if selector.matches(document, current) {
                return Some(current);
            }
            current = document.parent(current)?;
        }
        None
    }
}

impl Command for Hide {
    fn name(&self) -> &str {
        "hide"
    }

    fn is_applicable_for_group(&self, group: &str) -> bool {
        is_text_group(group)
    }

    fn apply(&self, target: &mut Target<'_>) -> ApplyResult {
        if !self.location_allowed(&target.location) {
            return Ok(None);
        }
        let Some(t) = target.as_node() else {
            return Ok(None);
        };
        if !t.value().is_some_and(|value| self.search.is_match(&value)) {
            return Ok(None);
        }
        let Some(element) = t
            .document
            .element_of(t.node)
            .and_then(|element| self.pick(&*t.document, element))
        else {
            return Ok(None);
        };
        Ok(record(t.document, element, "style.display", "none")?.map(|undo| vec![undo]))
    }
}
