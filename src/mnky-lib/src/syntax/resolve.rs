use super::variable_context::VariableContext;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\$\{([^}]*)\}|\$([A-Za-z_]\w*)").unwrap();
}

/// Replaces `${name}` and `$name` placeholders in one pass. `${name}` must
/// match a name exactly; a bare `$name` takes the longest known name the
/// word after `$` starts with and keeps the rest of the word. Unknown names
/// are left as written.
pub fn substitute(text: &str, scope: &str, context: &VariableContext<'_>) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures| {
            if let Some(name) = caps.get(1) {
                return match context.lookup(name.as_str().trim(), scope) {
                    Some(value) => value.to_string(),
                    None => caps[0].to_string(),
                };
            }
            let word = caps.get(2).map_or("", |m| m.as_str());
            match context.lookup_prefix(word, scope) {
                Some((name, value)) => format!("{value}{}", &word[name.len()..]),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parse_result::VariableDeclaration;
    use indexmap::IndexMap;

    fn local(name: &str, value: &str) -> VariableDeclaration {
        VariableDeclaration {
            name: name.into(),
            value: value.into(),
            description: String::new(),
            scope: String::new(),
            line: 0,
        }
    }

    #[test]
    fn test_both_placeholder_forms() {
        let values = IndexMap::new();
        let declarations = vec![local("a", "1"), local("ab", "2")];
        let context = VariableContext {
            values: &values,
            local: &declarations,
            imported: &[],
            global: &[],
        };
        assert_eq!(substitute("x${a}y $ab $a", "", &context), "x1y 2 1");
    }

    #[test]
    fn test_shared_prefix_is_not_confused() {
        let values = IndexMap::new();
        let declarations = vec![local("a", "1"), local("ab", "2")];
        let context = VariableContext {
            values: &values,
            local: &declarations,
            imported: &[],
            global: &[],
        };
        assert_eq!(substitute("$ab $abc ${ab}", "", &context), "2 2c 2");
    }

    #[test]
    fn test_bare_name_takes_longest_declared_prefix() {
        let values = IndexMap::new();
        let declarations = vec![local("a", "X")];
        let context = VariableContext {
            values: &values,
            local: &declarations,
            imported: &[],
            global: &[],
        };
        assert_eq!(substitute("$abar", "", &context), "Xbar");
        assert_eq!(substitute("${abar} $b", "", &context), "${abar} $b");
    }

    #[test]
    fn test_single_pass() {
        let values = IndexMap::new();
        let declarations = vec![local("a", "$b"), local("b", "2")];
        let context = VariableContext {
            values: &values,
            local: &declarations,
            imported: &[],
            global: &[],
        };
        assert_eq!(substitute("$a", "", &context), "$b");
    }

    #[test]
    fn test_regex_group_references_survive() {
        let values = IndexMap::new();
        let context = VariableContext {
            values: &values,
            local: &[],
            imported: &[],
            global: &[],
        };
        assert_eq!(substitute("$1 and ${1}", "", &context), "$1 and ${1}");
    }
}
