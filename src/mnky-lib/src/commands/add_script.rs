use super::traits::{ApplyResult, Command, Target};
use crate::document::{Document, NodeId};
use crate::undo::UndoElement;

const SCRIPT: &str = "SCRIPT";

/// Adds a script element to the document head, once.
#[derive(Debug, Clone)]
pub struct AddScript {
    src: Option<String>,
    script: String,
}

impl AddScript {
    /// The first parameter, when given, is the script's `src`.
    pub fn new(parameters: &[String], script: &str) -> Self {
        Self {
            src: parameters
                .first()
                .map(|src| src.trim())
                .filter(|src| !src.is_empty())
                .map(str::to_string),
            script: script.to_string(),
        }
    }

    fn container(document: &dyn Document) -> NodeId {
        let root = document.root();
        document
            .children(root)
            .into_iter()
            .find(|child| document.tag_name(*child).as_deref() == Some("HEAD"))
            .unwrap_or(root)
    }

    fn is_present(&self, document: &dyn Document, container: NodeId) -> bool {
        document.children(container).into_iter().any(|child| {
            document.tag_name(child).as_deref() == Some(SCRIPT)
                && document.property(child, "src") == self.src
                && document.property(child, "textContent").as_deref() == Some(self.script.as_str())
        })
    }
}

impl Command for AddScript {
    fn name(&self) -> &str {
        "addScript"
    }

    fn is_applicable_for_group(&self, group: &str) -> bool {
        group == "document"
    }

    fn apply(&self, target: &mut Target<'_>) -> ApplyResult {
        let Some(t) = target.as_node() else {
            return Ok(None);
        };
        let container = Self::container(&*t.document);
        if self.is_present(&*t.document, container) {
            return Ok(None);
        }
        let mut properties = vec![
            ("type", "text/javascript"),
            ("textContent", self.script.as_str()),
        ];
        if let Some(src) = &self.src {
            properties.push(("src", src.as_str()));
        }
        let node = t.document.append_child(container, "script", &properties)?;
        Ok(Some(vec![UndoElement::Insertion { node }]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Tree;

    #[test]
    fn test_script_is_added_to_head_once() {
        let mut tree = Tree::new("http://example.com");
        let root = tree.root();
        let head = tree.append_child(root, "head", &[]).unwrap();
        tree.append_child(root, "body", &[]).unwrap();

        let command = AddScript::new(&[], "console.log('demo')");
        command
            .apply(&mut Target::node(&mut tree, root, "documentElement"))
            .unwrap()
            .unwrap();
        assert_eq!(
            command
                .apply(&mut Target::node(&mut tree, root, "documentElement"))
                .unwrap(),
            None
        );

        let scripts = tree.children(head);
        assert_eq!(scripts.len(), 1);
        assert_eq!(
            tree.property(scripts[0], "textContent").as_deref(),
            Some("console.log('demo')")
        );
    }
}
