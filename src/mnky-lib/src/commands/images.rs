use super::traits::{ApplyResult, Command, Target};
use crate::pattern::Pattern;
use crate::undo::record;

const BACKGROUND_IMAGE: &str = "style.backgroundImage";

fn is_image_group(group: &str) -> bool {
    group == "image"
}

/// Swaps image sources. Works on `src` and on background images of widgets.
#[derive(Debug, Clone)]
pub struct ReplaceImage {
    search: Vec<Pattern>,
    replacement: String,
}

impl ReplaceImage {
    pub fn new(search: Vec<Pattern>, replacement: &str) -> Self {
        Self {
            search,
            replacement: replacement.to_string(),
        }
    }
}

impl Command for ReplaceImage {
    fn name(&self) -> &str {
        "replaceImage"
    }

    fn is_applicable_for_group(&self, group: &str) -> bool {
        is_image_group(group)
    }

    fn apply(&self, target: &mut Target<'_>) -> ApplyResult {
        let Some(t) = target.as_node() else {
            return Ok(None);
        };
        let Some(current) = t.value() else {
            return Ok(None);
        };
        if !self.search.iter().any(|pattern| pattern.is_match(&current)) {
            return Ok(None);
        }
        let value = if t.property == BACKGROUND_IMAGE {
            format!("url(\"{}\")", self.replacement)
        } else {
            self.replacement.clone()
        };
        Ok(record(t.document, t.node, t.property, &value)?.map(|undo| vec![undo]))
    }
}

/// Tints matching images by setting a CSS filter on them.
#[derive(Debug, Clone)]
pub struct RecolorImage {
    search: Pattern,
    color: String,
}

impl RecolorImage {
    pub fn new(search: Pattern, color: &str) -> Self {
        Self {
            search,
            color: color.to_string(),
        }
    }

    fn filter(&self) -> String {
        format!("drop-shadow(0 0 0 {}) saturate(300%)", self.color)
    }
}

impl Command for RecolorImage {
    fn name(&self) -> &str {
        "recolorImage"
    }

    fn is_applicable_for_group(&self, group: &str) -> bool {
        is_image_group(group)
    }

    fn apply(&self, target: &mut Target<'_>) -> ApplyResult {
        let Some(t) = target.as_node() else {
            return Ok(None);
        };
        if !t.value().is_some_and(|value| self.search.is_match(&value)) {
            return Ok(None);
        }
        Ok(record(t.document, t.node, "style.filter", &self.filter())?.map(|undo| vec![undo]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, Tree};

    #[test]
    fn test_replace_image_src_and_background() {
        let mut tree = Tree::new("http://example.com");
        let root = tree.root();
        let img = tree
            .append_child(root, "img", &[("src", "/logo-acme.png")])
            .unwrap();
        let widget = tree
            .append_child(root, "div", &[(BACKGROUND_IMAGE, "url(\"/logo-acme.png\")")])
            .unwrap();
        let command = ReplaceImage::new(vec![Pattern::parse("acme").unwrap()], "/demo.png");

        command
            .apply(&mut Target::node(&mut tree, img, "src"))
            .unwrap()
            .unwrap();
        command
            .apply(&mut Target::node(&mut tree, widget, BACKGROUND_IMAGE))
            .unwrap()
            .unwrap();
        assert_eq!(tree.property(img, "src").as_deref(), Some("/demo.png"));
        assert_eq!(
            tree.property(widget, BACKGROUND_IMAGE).as_deref(),
            Some("url(\"/demo.png\")")
        );
    }

    #[test]
    fn test_recolor_matching_image() {
        let mut tree = Tree::new("http://example.com");
        let root = tree.root();
        let img = tree.append_child(root, "img", &[("src", "/icon.svg")]).unwrap();
        RecolorImage::new(Pattern::parse("icon").unwrap(), "#ff0000")
            .apply(&mut Target::node(&mut tree, img, "src"))
            .unwrap()
            .unwrap();
        assert_eq!(
            tree.property(img, "style.filter").as_deref(),
            Some("drop-shadow(0 0 0 #ff0000) saturate(300%)")
        );
    }
}
