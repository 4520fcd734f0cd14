use super::parse_result::VariableDeclaration;
use crate::variable::Variable;
use indexmap::IndexMap;

/// Every source a placeholder can be resolved from, highest precedence first:
/// caller supplied values, local declarations, imported variables, globals.
#[derive(Debug, Clone, Copy)]
pub struct VariableContext<'a> {
    pub values: &'a IndexMap<String, String>,
    pub local: &'a [VariableDeclaration],
    pub imported: &'a [Variable],
    pub global: &'a [Variable],
}

impl<'a> VariableContext<'a> {
    pub fn lookup(&self, name: &str, scope: &str) -> Option<&'a str> {
        if let Some(value) = self.values.get(name) {
            return Some(value.as_str());
        }
        if let Some(declaration) = self.nearest_local(name, scope) {
            return Some(declaration.value.as_str());
        }
        self.imported
            .iter()
            .chain(self.global.iter())
            .find(|variable| variable.name == name)
            .map(|variable| variable.value.as_str())
    }

    /// The longest known name `word` starts with that resolves in `scope`,
    /// with its value. Used for bare `$name` references.
    pub fn lookup_prefix(&self, word: &str, scope: &str) -> Option<(&'a str, &'a str)> {
        let mut names: Vec<&'a str> = self
            .values
            .keys()
            .map(String::as_str)
            .chain(self.local.iter().map(|declaration| declaration.name.as_str()))
            .chain(self.imported.iter().chain(self.global.iter()).map(|v| v.name.as_str()))
            .filter(|name| !name.is_empty() && word.starts_with(name))
            .collect();
        names.sort_by_key(|name| std::cmp::Reverse(name.len()));
        names
            .into_iter()
            .find_map(|name| Some((name, self.lookup(name, scope)?)))
    }

    /// The declaration in the innermost section enclosing `scope`. Later
    /// declarations in the same section win.
    fn nearest_local(&self, name: &str, scope: &str) -> Option<&'a VariableDeclaration> {
        let mut best: Option<&'a VariableDeclaration> = None;
        for declaration in self.local {
            if declaration.name != name || !encloses(&declaration.scope, scope) {
                continue;
            }
            if best.map_or(true, |b| declaration.scope.len() >= b.scope.len()) {
                best = Some(declaration);
            }
        }
        best
    }
}

fn encloses(outer: &str, inner: &str) -> bool {
    outer.is_empty()
        || inner == outer
        || inner
            .strip_prefix(outer)
            .is_some_and(|rest| rest.starts_with('.'))
}
