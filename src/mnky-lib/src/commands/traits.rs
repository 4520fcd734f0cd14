use crate::document::{Document, NodeId};
use crate::error::MutationError;
use crate::managers::{InlineRuleManager, UrlManager};
use crate::undo::UndoElement;
use std::fmt;

/// `Ok(None)` means the command did not apply.
pub type ApplyResult = Result<Option<Vec<UndoElement>>, MutationError>;

/// What a command is applied to.
pub enum Subject<'a> {
    /// One property of one node of a document.
    Node {
        document: &'a mut dyn Document,
        node: NodeId,
        property: &'a str,
    },
    Urls(&'a mut dyn UrlManager),
    InlineRules(&'a mut dyn InlineRuleManager),
}

pub struct Target<'a> {
    pub location: String,
    pub subject: Subject<'a>,
}

pub struct NodeTarget<'s> {
    pub document: &'s mut dyn Document,
    pub node: NodeId,
    pub property: &'s str,
}

impl<'a> Target<'a> {
    pub fn node(document: &'a mut dyn Document, node: NodeId, property: &'a str) -> Self {
        Self {
            location: document.location().to_string(),
            subject: Subject::Node {
                document,
                node,
                property,
            },
        }
    }

    pub fn urls(location: &str, urls: &'a mut dyn UrlManager) -> Self {
        Self {
            location: location.to_string(),
            subject: Subject::Urls(urls),
        }
    }

    pub fn inline_rules(location: &str, rules: &'a mut dyn InlineRuleManager) -> Self {
        Self {
            location: location.to_string(),
            subject: Subject::InlineRules(rules),
        }
    }

    pub fn as_node(&mut self) -> Option<NodeTarget<'_>> {
        match &mut self.subject {
            Subject::Node {
                document,
                node,
                property,
            } => Some(NodeTarget {
                document: &mut **document,
                node: *node,
                property: *property,
            }),
            _ => None,
        }
    }
}

pub trait Command: fmt::Debug {
    fn name(&self) -> &str;

    fn is_applicable_for_group(&self, group: &str) -> bool;

    fn apply(&self, target: &mut Target<'_>) -> ApplyResult;

    /// A command to run after every other command of the configuration.
    fn release(&self) -> Option<Box<dyn Command>> {
        None
    }

    /// The reason this command could not be built, for error sentinels.
    fn error(&self) -> Option<&crate::error::CommandError> {
        None
    }
}

impl NodeTarget<'_> {
    /// Current value of the targeted property.
    pub fn value(&self) -> Option<String> {
        self.document.property(self.node, self.property)
    }
}

/// Commands that rewrite text run on free text and on input values.
pub fn is_text_group(group: &str) -> bool {
    matches!(group, "text" | "input")
}
