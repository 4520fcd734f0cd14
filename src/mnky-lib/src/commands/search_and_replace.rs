use super::traits::{is_text_group, ApplyResult, Command, Target};
use crate::document::Selector;
use crate::pattern::{location_matches, Pattern};
use crate::undo::record;

/// Replaces every match of a pattern in the targeted property, or in a named
/// attribute of the targeted node's element.
#[derive(Debug, Clone)]
pub struct SearchAndReplace {
    search: Pattern,
    replace: String,
    location_filter: String,
    selector: Option<Selector>,
    attribute: Option<String>,
}

impl SearchAndReplace {
    pub fn new(search: Pattern, replace: &str) -> Self {
        Self {
            search,
            replace: replace.to_string(),
            location_filter: String::new(),
            selector: None,
            attribute: None,
        }
    }

    pub fn with_location_filter(mut self, filter: &str) -> Self {
        self.location_filter = filter.to_string();
        self
    }

    pub fn with_selector(mut self, selector: Option<Selector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_attribute(mut self, attribute: &str) -> Self {
        if !attribute.is_empty() {
            self.attribute = Some(attribute.to_string());
        }
        self
    }
}

impl Command for SearchAndReplace {
    fn name(&self) -> &str {
        "replace"
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

        if let Some(selector) = &self.selector {
            let matched = t
                .document
                .element_of(t.node)
                .is_some_and(|element| selector.matches(&*t.document, element));
            if !matched {
                return Ok(None);
            }
        }

        let (node, property) = match &self.attribute {
            Some(attribute) => match t.document.element_of(t.node) {
                Some(element) => (element, attribute.as_str()),
                None => return Ok(None),
            },
            None => (t.node, t.property),
        };

        let Some(current) = t.document.property(node, property) else {
            return Ok(None);
        };
        if !self.search.is_match(&current) {
            return Ok(None);
        }
        let replaced = self.search.replace_all(&current, &self.replace).into_owned();
        Ok(record(t.document, node, property, &replaced)?.map(|undo| vec![undo]))
    }
}
