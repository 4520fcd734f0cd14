use crate::configuration::Configuration;
use crate::document::{Document, NodeId, NodeKind, Selector};
use crate::error::MutationError;
use crate::undo::{record, UndoElement};
use lazy_static::lazy_static;

lazy_static! {
    static ref FLOW_MAP_TITLE: Selector = Selector::parse("svg .adsFlowMapNode > title").unwrap();
    static ref FLOW_MAP_LABEL: Selector =
        Selector::parse(".adsFlowMapTextContainer tspan").unwrap();
    static ref SVG_TEXT_TITLE: Selector = Selector::parse("svg text title").unwrap();
    static ref TSPAN: Selector = Selector::parse("tspan").unwrap();
    static ref NAMED_TSPAN: Selector = Selector::parse("svg > g text > tspan[name]").unwrap();
    static ref JOURNEY_LABEL: Selector =
        Selector::parse("eum-user-journey-map-label > div.eum-ui-user-journey-node-body").unwrap();
}

const ELLIPSIS: &str = "...";
const FULL_STRING: &str = "data-full-string";

/// Fixes up labels that a page shortens or splits while keeping the full
/// text elsewhere. Runs before the regular node groups on every tick.
pub trait CornerCases {
    fn normalize(
        &self,
        document: &mut dyn Document,
        configuration: &Configuration,
    ) -> Result<Vec<UndoElement>, MutationError>;
}

/// Turns every corner case off.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCornerCases;

impl CornerCases for NoCornerCases {
    fn normalize(
        &self,
        _document: &mut dyn Document,
        _configuration: &Configuration,
    ) -> Result<Vec<UndoElement>, MutationError> {
        Ok(Vec::new())
    }
}

/// Shortened labels of svg charts and journey maps.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShortenedLabels;

impl CornerCases for ShortenedLabels {
    fn normalize(
        &self,
        document: &mut dyn Document,
        configuration: &Configuration,
    ) -> Result<Vec<UndoElement>, MutationError> {
        let mut undo = Vec::new();
        flow_map_nodes(document, configuration, &mut undo)?;
        split_lines(document, configuration, &mut undo)?;
        truncated_titles(document, configuration, &mut undo)?;
        named_tspans(document, configuration, &mut undo)?;
        journey_labels(document, configuration, &mut undo)?;
        Ok(undo)
    }
}

fn text_of(document: &dyn Document, node: NodeId) -> String {
    document.property(node, "textContent").unwrap_or_default()
}

fn transform(
    document: &dyn Document,
    configuration: &Configuration,
    value: &str,
) -> Result<String, MutationError> {
    configuration.transform_text(document.location(), value)
}

fn is_within(document: &dyn Document, node: NodeId, ancestor: NodeId) -> bool {
    let mut current = document.parent(node);
    while let Some(parent) = current {
        if parent == ancestor {
            return true;
        }
        current = document.parent(parent);
    }
    false
}

fn prefix(value: &str, count: usize) -> String {
    value.chars().take(count).collect()
}

fn suffix(value: &str, count: usize) -> String {
    let skip = value.chars().count().saturating_sub(count);
    value.chars().skip(skip).collect()
}

fn push(undo: &mut Vec<UndoElement>, element: Option<UndoElement>) {
    undo.extend(element);
}

/// Flow map nodes cut long names with "..." but keep them in a `title`.
fn flow_map_nodes(
    document: &mut dyn Document,
    configuration: &Configuration,
    undo: &mut Vec<UndoElement>,
) -> Result<(), MutationError> {
    let labels = document.query(&FLOW_MAP_LABEL);
    for title in document.query(&FLOW_MAP_TITLE) {
        let Some(node) = document.parent(title) else {
            continue;
        };
        let full = transform(&*document, configuration, &text_of(&*document, title))?;
        let replacement = if full.chars().count() > 32 {
            format!("{}{ELLIPSIS}{}", prefix(&full, 15), suffix(&full, 15))
        } else {
            full
        };
        for label in labels.iter().copied() {
            if is_within(&*document, label, node) && text_of(&*document, label).contains(ELLIPSIS) {
                push(undo, record(document, label, "textContent", &replacement)?);
            }
        }
    }
    Ok(())
}

/// Multi-line svg labels spread the words of one text over several `tspan`s
/// next to a `title`. Every line keeps its word count; a text that grew ends
/// in "...".
fn split_lines(
    document: &mut dyn Document,
    configuration: &Configuration,
    undo: &mut Vec<UndoElement>,
) -> Result<(), MutationError> {
    for title in document.query(&SVG_TEXT_TITLE) {
        let Some(text) = document.parent(title) else {
            continue;
        };
        let tspans: Vec<NodeId> = document
            .descendants(text)
            .into_iter()
            .filter(|node| TSPAN.matches(&*document, *node))
            .collect();
        if tspans.len() < 2 {
            continue;
        }
        let lines: Vec<String> = tspans.iter().map(|t| text_of(&*document, *t)).collect();
        let counts: Vec<usize> = lines.iter().map(|line| line.split(' ').count()).collect();
        let total: usize = counts.iter().sum();

        let full = transform(&*document, configuration, &lines.join(" "))?;
        let mut words: Vec<&str> = full.split(' ').collect();
        if words.len() > total {
            words.truncate(total);
            words[total - 1] = ELLIPSIS;
        }

        let mut start = 0;
        for (tspan, count) in tspans.into_iter().zip(counts) {
            let begin = start.min(words.len());
            let end = (start + count).min(words.len());
            let line = words[begin..end].join(" ");
            push(undo, record(document, tspan, "textContent", &line)?);
            start += count;
        }
    }
    Ok(())
}

/// `<text>Lon...<title>Long Text</title></text>`
fn truncated_titles(
    document: &mut dyn Document,
    configuration: &Configuration,
    undo: &mut Vec<UndoElement>,
) -> Result<(), MutationError> {
    for title in document.query(&SVG_TEXT_TITLE) {
        let Some(text) = document.parent(title) else {
            continue;
        };
        let content = text_of(&*document, text);
        let Some((short, long)) = content.split_once(ELLIPSIS) else {
            continue;
        };
        if !long.starts_with(short) {
            continue;
        }
        let full = transform(&*document, configuration, long)?;
        let result = format!("{}{ELLIPSIS}", prefix(&full, short.chars().count()));
        let first_text = document
            .children(text)
            .into_iter()
            .find(|child| document.kind(*child) == Some(NodeKind::Text));
        if let Some(node) = first_text {
            push(undo, record(document, node, "data", &result)?);
        }
    }
    Ok(())
}

/// Boxes that cut words by space but keep the full name in `name`.
fn named_tspans(
    document: &mut dyn Document,
    configuration: &Configuration,
    undo: &mut Vec<UndoElement>,
) -> Result<(), MutationError> {
    for tspan in document.query(&NAMED_TSPAN) {
        let name = document.property(tspan, "name").unwrap_or_default();
        let full = transform(&*document, configuration, &name)?;
        let visible = text_of(&*document, tspan).chars().count();
        push(undo, record(document, tspan, "textContent", &prefix(&full, visible))?);
    }
    Ok(())
}

/// Journey map labels keep the full text in `data-full-string`.
fn journey_labels(
    document: &mut dyn Document,
    configuration: &Configuration,
    undo: &mut Vec<UndoElement>,
) -> Result<(), MutationError> {
    for node in document.query(&JOURNEY_LABEL) {
        let full_string = document.property(node, FULL_STRING).unwrap_or_default();
        let full = transform(&*document, configuration, &full_string)?;
        if full == full_string {
            continue;
        }
        let original = text_of(&*document, node);
        let (shown, wanted) = (original.chars().count(), full.chars().count());
        let replacement = if shown < wanted {
            format!("{ELLIPSIS}{}", suffix(&full, shown + 3))
        } else {
            full.clone()
        };
        push(undo, record(document, node, FULL_STRING, &full)?);
        push(undo, record(document, node, "textContent", &replacement)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Tree;

    fn svg(tree: &mut Tree) -> NodeId {
        let root = tree.root();
        let body = tree.append_child(root, "body", &[]).unwrap();
        tree.append_child(body, "svg", &[]).unwrap()
    }

    #[test]
    fn test_named_tspan_keeps_visible_length() {
        let mut tree = Tree::new("http://example.com");
        let svg = svg(&mut tree);
        let g = tree.append_child(svg, "g", &[]).unwrap();
        let text = tree.append_child(g, "text", &[]).unwrap();
        let tspan = tree
            .append_child(text, "tspan", &[("name", "Order Service")])
            .unwrap();
        tree.append_text(tspan, "Order").unwrap();

        let configuration = Configuration::new("Order = Checkout");
        let undo = ShortenedLabels.normalize(&mut tree, &configuration).unwrap();
        assert_eq!(tree.property(tspan, "textContent").as_deref(), Some("Check"));
        assert_eq!(undo.len(), 1);
    }

    #[test]
    fn test_journey_label_updates_full_string() {
        let mut tree = Tree::new("http://example.com");
        let root = tree.root();
        let label = tree
            .append_child(root, "eum-user-journey-map-label", &[])
            .unwrap();
        let body = tree
            .append_child(
                label,
                "div",
                &[
                    ("class", "eum-ui-user-journey-node-body"),
                    (FULL_STRING, "Checkout Page"),
                ],
            )
            .unwrap();
        tree.append_text(body, "Checkout Page").unwrap();

        let unchanged = Configuration::new("other = thing");
        assert!(ShortenedLabels
            .normalize(&mut tree, &unchanged)
            .unwrap()
            .is_empty());

        let configuration = Configuration::new("Checkout = Payment and Billing");
        let undo = ShortenedLabels.normalize(&mut tree, &configuration).unwrap();
        assert_eq!(
            tree.property(body, FULL_STRING).as_deref(),
            Some("Payment and Billing Page")
        );
        assert_eq!(
            tree.property(body, "textContent").as_deref(),
            Some("...and Billing Page")
        );
        assert_eq!(undo.len(), 2);
    }

    #[test]
    fn test_split_lines_keep_word_counts() {
        let mut tree = Tree::new("http://example.com");
        let svg = svg(&mut tree);
        let text = tree.append_child(svg, "text", &[]).unwrap();
        let first = tree.append_child(text, "tspan", &[]).unwrap();
        tree.append_text(first, "Order").unwrap();
        let second = tree.append_child(text, "tspan", &[]).unwrap();
        tree.append_text(second, "Service Desk").unwrap();
        let title = tree.append_child(text, "title", &[]).unwrap();
        tree.append_text(title, "Order Service Desk").unwrap();

        let configuration = Configuration::new("Service = Customer Support");
        let undo = ShortenedLabels.normalize(&mut tree, &configuration).unwrap();
        assert_eq!(tree.property(first, "textContent").as_deref(), Some("Order"));
        assert_eq!(
            tree.property(second, "textContent").as_deref(),
            Some("Customer ...")
        );
        assert_eq!(undo.len(), 1);
    }

    #[test]
    fn test_split_lines_shrink() {
        let mut tree = Tree::new("http://example.com");
        let svg = svg(&mut tree);
        let text = tree.append_child(svg, "text", &[]).unwrap();
        let first = tree.append_child(text, "tspan", &[]).unwrap();
        tree.append_text(first, "Order Service").unwrap();
        let second = tree.append_child(text, "tspan", &[]).unwrap();
        tree.append_text(second, "Desk").unwrap();
        let title = tree.append_child(text, "title", &[]).unwrap();
        tree.append_text(title, "Order Service Desk").unwrap();

        let configuration = Configuration::new("Service Desk = Helpdesk");
        ShortenedLabels.normalize(&mut tree, &configuration).unwrap();
        // "Order Service" and "Desk" join before replacing.
        assert_eq!(
            tree.property(first, "textContent").as_deref(),
            Some("Order Helpdesk")
        );
        assert_eq!(tree.property(second, "textContent").as_deref(), Some(""));
    }

    #[test]
    fn test_truncated_title() {
        let mut tree = Tree::new("http://example.com");
        let svg = svg(&mut tree);
        let text = tree.append_child(svg, "text", &[]).unwrap();
        let short = tree.append_text(text, "Lon...").unwrap();
        let title = tree.append_child(text, "title", &[]).unwrap();
        tree.append_text(title, "Long Text").unwrap();

        let configuration = Configuration::new("Long = Short");
        ShortenedLabels.normalize(&mut tree, &configuration).unwrap();
        assert_eq!(tree.property(short, "data").as_deref(), Some("Sho..."));
    }

    #[test]
    fn test_no_corner_cases() {
        let mut tree = Tree::new("http://example.com");
        let configuration = Configuration::new("a = b");
        assert!(NoCornerCases
            .normalize(&mut tree, &configuration)
            .unwrap()
            .is_empty());
    }
}
