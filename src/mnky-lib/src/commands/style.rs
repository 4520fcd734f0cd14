use super::traits::{is_text_group, ApplyResult, Command, Target};
use crate::pattern::Pattern;
use crate::undo::record;

/// Sets a style property on the element around a matching text, or on one of
/// its ancestors.
#[derive(Debug, Clone)]
pub struct Style {
    search: Pattern,
    property: String,
    nth_parent: usize,
    value: String,
}

impl Style {
    pub fn new(search: Pattern, property: &str, nth_parent: usize, value: &str) -> Self {
        Self {
            search,
            property: property.to_string(),
            nth_parent: nth_parent.max(1),
            value: value.to_string(),
        }
    }
}

impl Command for Style {
    fn name(&self) -> &str {
        "style"
    }

    fn is_applicable_for_group(&self, group: &str) -> bool {
        is_text_group(group)
    }

    fn apply(&self, target: &mut Target<'_>) -> ApplyResult {
        let Some(t) = target.as_node() else {
            return Ok(None);
        };
        if !t.value().is_some_and(|value| self.search.is_match(&value)) {
            return Ok(None);
        }
        let Some(element) = t.document.element_of(t.node) else {
            return Ok(None);
        };
        let element = t.document.ancestor(element, self.nth_parent - 1);
        let property = format!("style.{}", self.property);
        Ok(record(t.document, element, &property, &self.value)?.map(|undo| vec![undo]))
    }
}
