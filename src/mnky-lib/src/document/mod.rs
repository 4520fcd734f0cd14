pub mod selector;
pub mod tree;

pub use selector::Selector;
pub use tree::{DocumentSnapshot, NodeSnapshot, Tree};

use crate::error::MutationError;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
    Other,
}

/// The mutable tree a Monkey works on.
///
/// Properties are string valued and addressed by a dotted path, e.g. `data`
/// for the content of a text node or `style.display` for a style entry.
/// `query` returns a snapshot: later mutations do not change the result.
pub trait Document {
    fn location(&self) -> &str;
    fn root(&self) -> NodeId;
    fn kind(&self, node: NodeId) -> Option<NodeKind>;
    /// Upper-cased tag name of an element, `None` for other nodes.
    fn tag_name(&self, node: NodeId) -> Option<String>;
    fn parent(&self, node: NodeId) -> Option<NodeId>;
    fn children(&self, node: NodeId) -> Vec<NodeId>;
    fn property(&self, node: NodeId, path: &str) -> Option<String>;
    fn set_property(&mut self, node: NodeId, path: &str, value: &str) -> Result<(), MutationError>;
    fn append_child(
        &mut self,
        parent: NodeId,
        tag: &str,
        properties: &[(&str, &str)],
    ) -> Result<NodeId, MutationError>;
    fn remove(&mut self, node: NodeId) -> Result<(), MutationError>;

    /// Walks `levels` parents up, stopping early at the root.
    fn ancestor(&self, node: NodeId, levels: usize) -> NodeId {
        let mut current = node;
        for _ in 0..levels {
            match self.parent(current) {
                Some(parent) => current = parent,
                None => break,
            }
        }
        current
    }

    /// Every node below `node` in document order, `node` included.
    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            result.push(current);
            let mut children = self.children(current);
            children.reverse();
            stack.extend(children);
        }
        result
    }

    fn query(&self, selector: &Selector) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|node| selector.matches(self, *node))
            .collect()
    }

    fn matches(&self, node: NodeId, selector: &Selector) -> bool {
        selector.matches(self, node)
    }

    /// The element a node belongs to: the node itself or a text node's parent.
    fn element_of(&self, node: NodeId) -> Option<NodeId> {
        match self.kind(node)? {
            NodeKind::Element => Some(node),
            NodeKind::Text => self.parent(node),
            NodeKind::Other => None,
        }
    }
}
