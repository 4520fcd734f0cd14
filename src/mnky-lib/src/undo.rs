use crate::document::{Document, NodeId};
use crate::error::MutationError;
use crate::managers::{InlineRuleManager, RuleId, UrlManager};
use serde::Serialize;

/// A recorded change that can be reverted later.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UndoElement {
    Property {
        node: NodeId,
        property: String,
        original: String,
        replacement: String,
    },
    Insertion {
        node: NodeId,
    },
    UrlRule {
        id: RuleId,
    },
    InlineRule {
        id: RuleId,
    },
}

/// Everything an undo element may need to touch when it is reverted.
pub struct UndoContext<'a> {
    pub document: &'a mut dyn Document,
    pub urls: &'a mut dyn UrlManager,
    pub inline_rules: &'a mut dyn InlineRuleManager,
}

impl UndoElement {
    /// Puts the recorded state back. A property that was changed again by
    /// someone else since it was recorded is left alone.
    pub fn revert(&self, context: &mut UndoContext<'_>) -> Result<(), MutationError> {
        match self {
            UndoElement::Property {
                node,
                property,
                original,
                replacement,
            } => {
                let current = context.document.property(*node, property);
                if current.as_deref() == Some(replacement.as_str()) {
                    context.document.set_property(*node, property, original)?;
                } else {
                    tracing::debug!("Skipping undo of {property} on {node}: value changed since");
                }
                Ok(())
            }
            UndoElement::Insertion { node } => match context.document.remove(*node) {
                Err(MutationError::NodeNotFound(_)) => Ok(()),
                other => other,
            },
            UndoElement::UrlRule { id } => {
                context.urls.remove(*id);
                Ok(())
            }
            UndoElement::InlineRule { id } => {
                context.inline_rules.remove(*id);
                Ok(())
            }
        }
    }
}

/// Sets `property` on `node` and returns the undo element for the change, or
/// `None` when the property already holds `value`.
pub fn record(
    document: &mut dyn Document,
    node: NodeId,
    property: &str,
    value: &str,
) -> Result<Option<UndoElement>, MutationError> {
    let original = document.property(node, property).unwrap_or_default();
    if original == value {
        return Ok(None);
    }
    document.set_property(node, property, value)?;
    Ok(Some(UndoElement::Property {
        node,
        property: property.to_string(),
        original,
        replacement: value.to_string(),
    }))
}
