use super::traits::{is_text_group, ApplyResult, Command, Target};
use crate::document::{Document, NodeId, Selector};
use crate::pattern::{location_matches, Pattern};
use crate::undo::{record, UndoElement};

const FRAGMENT_TAG: &str = "mnky-fragment";
const INNER_HTML: &str = "innerHTML";
const POSITION: &str = "position";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    AfterBegin,
    BeforeEnd,
}

impl InsertPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsertPosition::AfterBegin => "afterbegin",
            InsertPosition::BeforeEnd => "beforeend",
        }
    }
}

/// Inserts an HTML fragment into the element around a matching text. The
/// fragment is inserted once per element.
#[derive(Debug, Clone)]
pub struct InsertHtml {
    position: InsertPosition,
    search: Pattern,
    html: String,
    nth_parent: usize,
    selector: Option<Selector>,
}

impl InsertHtml {
    pub fn new(
        position: InsertPosition,
        search: Pattern,
        html: &str,
        nth_parent: usize,
        selector: Option<Selector>,
    ) -> Self {
        Self {
            position,
            search,
            html: html.to_string(),
            nth_parent: nth_parent.max(1),
            selector,
        }
    }

    fn already_inserted(&self, document: &dyn Document, element: NodeId) -> bool {
        document.children(element).into_iter().any(|child| {
            document
                .tag_name(child)
                .is_some_and(|tag| tag.eq_ignore_ascii_case(FRAGMENT_TAG))
                && document.property(child, INNER_HTML).as_deref() == Some(self.html.as_str())
                && document.property(child, POSITION).as_deref() == Some(self.position.as_str())
        })
    }
}

impl Command for InsertHtml {
    fn name(&self) -> &str {
        match self.position {
            InsertPosition::AfterBegin => "insertBefore",
            InsertPosition::BeforeEnd => "insertAfter",
        }
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
        if let Some(selector) = &self.selector {
            if !selector.matches(&*t.document, element) {
                return Ok(None);
            }
        }
        if self.already_inserted(&*t.document, element) {
            return Ok(None);
        }
        let node = t.document.append_child(
            element,
            FRAGMENT_TAG,
            &[(INNER_HTML, self.html.as_str()), (POSITION, self.position.as_str())],
        )?;
        Ok(Some(vec![UndoElement::Insertion { node }]))
    }
}

/// Replaces the markup of the whole document or of the nodes matching a
/// selector.
#[derive(Debug, Clone)]
pub struct OverwriteHtml {
    location_filter: String,
    selector: Option<Selector>,
    html: String,
}

impl OverwriteHtml {
    pub fn new(location_filter: &str, selector: Option<Selector>, html: &str) -> Self {
        Self {
            location_filter: location_filter.to_string(),
            selector,
            html: html.to_string(),
        }
    }

    /// The markup `overwritePage` shows: a full-size frame on `url`.
    pub fn page(location_filter: &str, title: &str, url: &str) -> Self {
        let html = format!(
            "<head><title>{title}</title><style>html {{height:100%;}}</style></head>\
             <body style=\"margin:0;padding:0;width:100%;height:100%;overflow:hidden;\">\
             <iframe src=\"{url}\" style=\"width:100%;height:100%\"></body>"
        );
        Self::new(location_filter, None, &html)
    }
}

impl Command for OverwriteHtml {
    fn name(&self) -> &str {
        "overwriteHTML"
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
        let nodes = match &self.selector {
            Some(selector) => t.document.query(selector),
            None => vec![t.document.root()],
        };
        let mut undo = Vec::new();
        for node in nodes {
            if let Some(element) = record(t.document, node, INNER_HTML, &self.html)? {
                undo.push(element);
            }
        }
        Ok((!undo.is_empty()).then_some(undo))
    }
}
