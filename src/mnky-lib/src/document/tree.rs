use super::{Document, NodeId, NodeKind};
use crate::error::MutationError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const DATA: &str = "data";
const TEXT_CONTENT: &str = "textContent";

#[derive(Debug, Clone)]
struct TreeNode {
    kind: NodeKind,
    tag: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    properties: BTreeMap<String, String>,
    removed: bool,
}

impl TreeNode {
    fn new(kind: NodeKind, tag: Option<String>, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            tag,
            parent,
            children: Vec::new(),
            properties: BTreeMap::new(),
            removed: false,
        }
    }
}

/// In-memory arena implementation of [`Document`].
///
/// Attributes and properties share one string map per node. Text nodes keep
/// their content under `data`; reading `textContent` of an element joins the
/// data of every text node below it.
#[derive(Debug, Clone)]
pub struct Tree {
    location: String,
    nodes: Vec<TreeNode>,
}

/// Serializable form of a node, used to load and dump documents as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub location: String,
    pub root: NodeSnapshot,
}

impl Tree {
    /// A document with an empty `HTML` root element.
    pub fn new(location: &str) -> Self {
        Self {
            location: location.to_string(),
            nodes: vec![TreeNode::new(
                NodeKind::Element,
                Some("HTML".to_string()),
                None,
            )],
        }
    }

    /// A single detached node holding `value`, used to run a configuration
    /// against a string that does not live in the document.
    pub fn scratch(location: &str, value: &str) -> Self {
        let mut node = TreeNode::new(NodeKind::Other, None, None);
        node.properties.insert("value".to_string(), value.to_string());
        Self {
            location: location.to_string(),
            nodes: vec![node],
        }
    }

    pub fn set_location(&mut self, location: &str) {
        self.location = location.to_string();
    }

    pub fn append_text(&mut self, parent: NodeId, data: &str) -> Result<NodeId, MutationError> {
        self.live(parent)?;
        let id = NodeId(self.nodes.len());
        let mut node = TreeNode::new(NodeKind::Text, None, Some(parent));
        node.properties.insert(DATA.to_string(), data.to_string());
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    pub fn from_snapshot(snapshot: &DocumentSnapshot) -> Self {
        let mut tree = Self {
            location: snapshot.location.clone(),
            nodes: Vec::new(),
        };
        tree.insert_snapshot(&snapshot.root, None);
        tree
    }

    pub fn to_snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            location: self.location.clone(),
            root: self.node_snapshot(self.root()),
        }
    }

    fn insert_snapshot(&mut self, snapshot: &NodeSnapshot, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let (kind, tag) = match (&snapshot.tag, &snapshot.text) {
            (Some(tag), _) => (NodeKind::Element, Some(tag.to_uppercase())),
            (None, Some(_)) => (NodeKind::Text, None),
            (None, None) => (NodeKind::Other, None),
        };
        let mut node = TreeNode::new(kind, tag, parent);
        node.properties = snapshot.properties.clone();
        if let (NodeKind::Text, Some(text)) = (kind, &snapshot.text) {
            node.properties.insert(DATA.to_string(), text.clone());
        }
        self.nodes.push(node);
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        for child in &snapshot.children {
            self.insert_snapshot(child, Some(id));
        }
        id
    }

    fn node_snapshot(&self, id: NodeId) -> NodeSnapshot {
        let node = &self.nodes[id.0];
        let mut properties = node.properties.clone();
        let text = match node.kind {
            NodeKind::Text => properties.remove(DATA),
            _ => None,
        };
        NodeSnapshot {
            tag: node.tag.as_ref().map(|t| t.to_lowercase()),
            text,
            properties,
            children: node
                .children
                .iter()
                .map(|child| self.node_snapshot(*child))
                .collect(),
        }
    }

    fn live(&self, id: NodeId) -> Result<&TreeNode, MutationError> {
        match self.nodes.get(id.0) {
            Some(node) if !node.removed => Ok(node),
            _ => Err(MutationError::NodeNotFound(id.0)),
        }
    }

    fn text_content(&self, id: NodeId) -> String {
        let node = &self.nodes[id.0];
        match node.kind {
            NodeKind::Text => node.properties.get(DATA).cloned().unwrap_or_default(),
            _ => node
                .children
                .iter()
                .map(|child| self.text_content(*child))
                .collect(),
        }
    }
}

impl Document for Tree {
    fn location(&self) -> &str {
        &self.location
    }

    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.live(node).ok().map(|n| n.kind)
    }

    fn tag_name(&self, node: NodeId) -> Option<String> {
        self.live(node).ok().and_then(|n| n.tag.clone())
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.live(node).ok().and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.live(node)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn property(&self, node: NodeId, path: &str) -> Option<String> {
        let entry = self.live(node).ok()?;
        match (entry.kind, path) {
            (NodeKind::Text, TEXT_CONTENT) | (NodeKind::Text, "nodeValue") => {
                entry.properties.get(DATA).cloned()
            }
            (NodeKind::Element, TEXT_CONTENT) if !entry.properties.contains_key(TEXT_CONTENT) => {
                Some(self.text_content(node))
            }
            _ => entry.properties.get(path).cloned(),
        }
    }

    fn set_property(&mut self, node: NodeId, path: &str, value: &str) -> Result<(), MutationError> {
        let kind = self.live(node)?.kind;
        match (kind, path) {
            (NodeKind::Text, TEXT_CONTENT) | (NodeKind::Text, "nodeValue") => {
                self.nodes[node.0]
                    .properties
                    .insert(DATA.to_string(), value.to_string());
            }
            (NodeKind::Element, TEXT_CONTENT) => {
                let texts: Vec<NodeId> = self.nodes[node.0]
                    .children
                    .iter()
                    .copied()
                    .filter(|c| self.nodes[c.0].kind == NodeKind::Text)
                    .collect();
                if texts.len() == 1 && texts.len() == self.nodes[node.0].children.len() {
                    self.nodes[texts[0].0]
                        .properties
                        .insert(DATA.to_string(), value.to_string());
                } else {
                    for child in self.nodes[node.0].children.clone() {
                        self.remove(child)?;
                    }
                    self.append_text(node, value)?;
                }
            }
            (NodeKind::Element, "") => {
                return Err(MutationError::PropertyRejected {
                    node: node.0,
                    property: path.to_string(),
                })
            }
            _ => {
                self.nodes[node.0]
                    .properties
                    .insert(path.to_string(), value.to_string());
            }
        }
        Ok(())
    }

    fn append_child(
        &mut self,
        parent: NodeId,
        tag: &str,
        properties: &[(&str, &str)],
    ) -> Result<NodeId, MutationError> {
        self.live(parent)?;
        let id = NodeId(self.nodes.len());
        let mut node = TreeNode::new(NodeKind::Element, Some(tag.to_uppercase()), Some(parent));
        for (key, value) in properties {
            node.properties.insert(key.to_string(), value.to_string());
        }
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    fn remove(&mut self, node: NodeId) -> Result<(), MutationError> {
        let parent = self.live(node)?.parent.ok_or(MutationError::RootRemoval)?;
        self.nodes[parent.0].children.retain(|c| *c != node);
        for descendant in self.descendants(node) {
            self.nodes[descendant.0].removed = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_content_joins_descendants() {
        let mut tree = Tree::new("http://example.com");
        let root = tree.root();
        let div = tree.append_child(root, "div", &[]).unwrap();
        tree.append_text(div, "Hello ").unwrap();
        let span = tree.append_child(div, "span", &[]).unwrap();
        tree.append_text(span, "World").unwrap();
        assert_eq!(
            tree.property(div, "textContent").as_deref(),
            Some("Hello World")
        );
    }

    #[test]
    fn test_set_text_content_on_single_text_child() {
        let mut tree = Tree::new("http://example.com");
        let root = tree.root();
        let span = tree.append_child(root, "span", &[]).unwrap();
        let text = tree.append_text(span, "old").unwrap();
        tree.set_property(span, "textContent", "new").unwrap();
        assert_eq!(tree.property(text, "data").as_deref(), Some("new"));
    }

    #[test]
    fn test_remove_detaches_subtree() {
        let mut tree = Tree::new("http://example.com");
        let root = tree.root();
        let div = tree.append_child(root, "div", &[]).unwrap();
        let text = tree.append_text(div, "gone").unwrap();
        tree.remove(div).unwrap();
        assert!(tree.children(root).is_empty());
        assert_eq!(tree.kind(text), None);
        assert_eq!(tree.remove(root), Err(MutationError::RootRemoval));
    }

    #[test]
    fn test_snapshot_round_trip_keeps_structure() {
        let json = r#"{
            "location": "http://example.com/app",
            "root": {
                "tag": "html",
                "properties": { "title": "Demo" },
                "children": [
                    { "tag": "body", "children": [
                        { "tag": "input", "properties": { "value": "Alice" } },
                        { "text": "Hello" }
                    ]}
                ]
            }
        }"#;
        let snapshot: DocumentSnapshot = serde_json::from_str(json).unwrap();
        let tree = Tree::from_snapshot(&snapshot);
        assert_eq!(tree.location(), "http://example.com/app");
        assert_eq!(tree.property(tree.root(), "title").as_deref(), Some("Demo"));
        assert_eq!(tree.to_snapshot(), snapshot);
    }
}
