use super::search_and_replace::SearchAndReplace;
use super::traits::{is_text_group, ApplyResult, Command, Target};
use crate::document::Selector;
use crate::pattern::Pattern;

/// Placed between the characters of a protected word so no literal search of
/// a later command matches it.
const JOINER: char = '\u{2060}';

fn guarded(word: &str) -> String {
    let mut result = String::with_capacity(word.len() * 4);
    for (i, c) in word.chars().enumerate() {
        if i > 0 {
            result.push(JOINER);
        }
        result.push(c);
    }
    result
}

/// Keeps a word out of reach of the replacements that follow it. The word is
/// restored by the command returned from [`Command::release`].
#[derive(Debug, Clone)]
pub struct Protect {
    search: String,
    location_filter: String,
    selector: Option<Selector>,
}

impl Protect {
    pub fn new(search: &str) -> Self {
        Self {
            search: search.to_string(),
            location_filter: String::new(),
            selector: None,
        }
    }

    pub fn with_location_filter(mut self, filter: &str) -> Self {
        self.location_filter = filter.to_string();
        self
    }

    pub fn with_selector(mut self, selector: Option<Selector>) -> Self {
        self.selector = selector;
        self
    }
}

impl Command for Protect {
    fn name(&self) -> &str {
        "protect"
    }

    fn is_applicable_for_group(&self, group: &str) -> bool {
        is_text_group(group)
    }

    fn apply(&self, target: &mut Target<'_>) -> ApplyResult {
        SearchAndReplace::new(Pattern::Literal(self.search.clone()), &guarded(&self.search))
            .with_location_filter(&self.location_filter)
            .with_selector(self.selector.clone())
            .apply(target)
    }

    fn release(&self) -> Option<Box<dyn Command>> {
        Some(Box::new(SearchAndReplace::new(
            Pattern::Literal(guarded(&self.search)),
            &self.search,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandBuilder;
    use crate::document::{Document, Tree};

    fn run(commands: &[Box<dyn Command>], value: &str) -> String {
        let mut tree = Tree::scratch("http://example.com", value);
        let root = tree.root();
        for command in commands {
            command
                .apply(&mut Target::node(&mut tree, root, "value"))
                .unwrap();
        }
        tree.property(root, "value").unwrap_or_default()
    }

    #[test]
    fn test_protected_word_survives_replacement() {
        let builder = CommandBuilder::default();
        let protect = builder.build("!protect(Order Service)", "");
        assert!(protect.error().is_none());
        let release = protect.release().unwrap();
        let commands = vec![
            protect,
            builder.build("Order", "Purchase"),
            release,
        ];
        assert_eq!(
            run(&commands, "Order Service handles each Order"),
            "Order Service handles each Purchase"
        );
    }

    #[test]
    fn test_location_filter_limits_protection() {
        let protect = Protect::new("Order").with_location_filter("intranet");
        let commands: Vec<Box<dyn Command>> = vec![
            Box::new(protect.clone()),
            Box::new(SearchAndReplace::new(Pattern::Literal("Order".into()), "Purchase")),
            protect.release().unwrap(),
        ];
        assert_eq!(run(&commands, "Order"), "Purchase");
    }
}
