use super::traits::{ApplyResult, Command, Target};
use crate::document::Selector;
use crate::undo::record;

const DEFAULT_PROPERTY: &str = "textContent";

/// Sets a property on every node of the document matching a selector.
#[derive(Debug, Clone)]
pub struct QuerySelector {
    selector: Selector,
    property: String,
    value: String,
}

impl QuerySelector {
    pub fn new(selector: Selector, property: &str, value: &str) -> Self {
        let property = match property.trim() {
            "" => DEFAULT_PROPERTY,
            other => other,
        };
        Self {
            selector,
            property: property.to_string(),
            value: value.to_string(),
        }
    }
}

impl Command for QuerySelector {
    fn name(&self) -> &str {
        "querySelector"
    }

    fn is_applicable_for_group(&self, group: &str) -> bool {
        group == "document"
    }

    fn apply(&self, target: &mut Target<'_>) -> ApplyResult {
        let Some(t) = target.as_node() else {
            return Ok(None);
        };
        let mut undo = Vec::new();
        for node in t.document.query(&self.selector) {
            if let Some(element) = record(t.document, node, &self.property, &self.value)? {
                undo.push(element);
            }
        }
        Ok((!undo.is_empty()).then_some(undo))
    }
}
