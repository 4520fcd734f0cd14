use crate::commands::{Command, CommandBuilder, Subject, Target};
use crate::document::{Document, NodeId, NodeKind, Tree};
use crate::error::{CommandError, MutationError};
use crate::pattern::location_matches;
use crate::repository::Repository;
use crate::syntax::{
    self,
    keywords::{
        DEFAULT_BLOCKED_TAGS, OPTION_ALLOWLIST, OPTION_BLOCKLIST, OPTION_DEPRECATED,
        OPTION_EXCLUDE, OPTION_INCLUDE, OPTION_NAMESPACE, OPTION_TEMPLATE, OPTION_TEXT_ATTRIBUTES,
    },
    ParseResult, RawCommand, RawCommandBody, VariableContext,
};
use crate::undo::UndoElement;
use crate::variable::Variable;
use indexmap::IndexMap;
use serde::Serialize;
use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

/// A line of a configuration that did not turn into a working command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub line: usize,
    pub message: String,
}

/// A parsed configuration script.
///
/// Parsing happens once in [`Configuration::new`]. Variables, imports and
/// commands are resolved against the repository when first asked for; the
/// built command list is cached afterwards.
pub struct Configuration {
    raw: String,
    parsed: ParseResult,
    repository: Option<Repository>,
    enabled: bool,
    values: IndexMap<String, String>,
    global_variables: Vec<Variable>,
    commands: OnceCell<Vec<Box<dyn Command>>>,
}

impl Configuration {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            parsed: syntax::parse(raw),
            repository: None,
            enabled: true,
            values: IndexMap::new(),
            global_variables: Vec::new(),
            commands: OnceCell::new(),
        }
    }

    pub fn with_repository(mut self, repository: Repository) -> Self {
        self.repository = Some(repository);
        self.commands = OnceCell::new();
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Caller supplied variable values. They win over every declaration.
    pub fn with_values<I, K, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.values = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.commands = OnceCell::new();
        self
    }

    pub fn with_global_variables(mut self, variables: Vec<Variable>) -> Self {
        self.global_variables = variables;
        self.commands = OnceCell::new();
        self
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn options(&self) -> &IndexMap<String, Vec<String>> {
        &self.parsed.options
    }

    pub fn imports(&self) -> &[String] {
        &self.parsed.imports
    }

    /// Own declarations (with caller values applied) followed by variables
    /// from imports that are not declared locally.
    pub fn variables(&self) -> Vec<Variable> {
        let mut result: Vec<Variable> = self
            .declared_variables(None)
            .into_iter()
            .map(|variable| self.with_override(variable))
            .collect();
        for variable in self.imported_variables(&mut Vec::new()) {
            if !result.iter().any(|v| v.name == variable.name) {
                result.push(self.with_override(variable));
            }
        }
        result
    }

    pub fn is_enabled_for_url(&self, url: &str) -> bool {
        let include = self.rules(OPTION_INCLUDE, &mut Vec::new());
        if include.is_empty() {
            return false;
        }
        let exclude = self.rules(OPTION_EXCLUDE, &mut Vec::new());
        include.iter().any(|rule| location_matches(rule, url))
            && !exclude.iter().any(|rule| location_matches(rule, url))
    }

    /// Whether commands must leave `node` alone because of its tag. Text nodes
    /// are judged by their parent element.
    pub fn is_tag_block_listed(&self, document: &dyn Document, node: NodeId) -> bool {
        let element = match document.kind(node) {
            Some(NodeKind::Text) => document.parent(node),
            Some(NodeKind::Element) => Some(node),
            _ => None,
        };
        let Some(tag) = element.and_then(|element| document.tag_name(element)) else {
            return false;
        };
        let tag = tag.to_uppercase();
        let listed = |option: &str| {
            self.option_list(option)
                .iter()
                .any(|entry| entry.to_uppercase() == tag)
        };
        if listed(OPTION_BLOCKLIST) {
            return true;
        }
        DEFAULT_BLOCKED_TAGS.contains(&tag.as_str()) && !listed(OPTION_ALLOWLIST)
    }

    pub fn is_template(&self) -> bool {
        self.parsed.options.contains_key(OPTION_TEMPLATE)
    }

    pub fn is_deprecated(&self) -> bool {
        self.parsed.options.contains_key(OPTION_DEPRECATED)
    }

    /// Neither include nor exclude rules are set.
    pub fn is_restricted(&self) -> bool {
        self.rules(OPTION_INCLUDE, &mut Vec::new()).is_empty()
            && self.rules(OPTION_EXCLUDE, &mut Vec::new()).is_empty()
    }

    pub fn text_attributes(&self) -> Vec<String> {
        self.option_list(OPTION_TEXT_ATTRIBUTES)
    }

    /// Namespaces enabled here or in any import.
    pub fn namespaces(&self) -> Vec<String> {
        self.rules(OPTION_NAMESPACE, &mut Vec::new())
            .iter()
            .flat_map(|value| split_list(value))
            .collect()
    }

    /// The resolved command list in line order, the commands of an import
    /// taking the place of its `+Name` line. Commands that hold something back
    /// until the end, like `protect`, are followed by their release.
    pub fn commands(&self) -> &[Box<dyn Command>] {
        self.commands.get_or_init(|| {
            let builder = self.builder();
            let mut commands: Vec<Box<dyn Command>> = self
                .resolved_commands()
                .into_iter()
                .map(|(_, _, resolved)| match resolved {
                    Ok((invocation, value)) => builder.build(&invocation, &value),
                    Err(reason) => Box::new(crate::commands::ErrorCommand::new(reason)),
                })
                .collect();
            let releases: Vec<_> = commands.iter().filter_map(|c| c.release()).collect();
            commands.extend(releases);
            commands
        })
    }

    /// Every own line that is malformed or names a command that cannot be
    /// built, with the reason.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let builder = self.builder();
        self.resolved_commands()
            .into_iter()
            .filter(|(_, own, _)| *own)
            .filter_map(|(line, _, resolved)| {
                let reason = match resolved {
                    Ok((invocation, value)) => builder.try_build(&invocation, &value).err()?,
                    Err(reason) => reason,
                };
                Some(Diagnostic {
                    line,
                    message: reason.to_string(),
                })
            })
            .collect()
    }

    /// Runs every command applicable to `group` against `target` and returns
    /// the undo elements of everything that changed.
    pub fn apply(
        &self,
        target: &mut Target<'_>,
        group: &str,
    ) -> Result<Vec<UndoElement>, MutationError> {
        if let Subject::Node { document, node, .. } = &target.subject {
            if self.is_tag_block_listed(&**document, *node) {
                return Ok(Vec::new());
            }
        }
        let mut undo = Vec::new();
        for command in self.commands() {
            if !command.is_applicable_for_group(group) {
                continue;
            }
            if let Some(elements) = command.apply(target)? {
                undo.extend(elements);
            }
        }
        Ok(undo)
    }

    /// Runs the text commands over a string that is not part of a document.
    pub fn transform_text(&self, location: &str, value: &str) -> Result<String, MutationError> {
        let mut scratch = Tree::scratch(location, value);
        let root = scratch.root();
        self.apply(&mut Target::node(&mut scratch, root, "value"), "text")?;
        Ok(scratch.property(root, "value").unwrap_or_default())
    }

    fn builder(&self) -> CommandBuilder {
        CommandBuilder::new(
            self.namespaces(),
            self.rules(OPTION_INCLUDE, &mut Vec::new()),
            self.rules(OPTION_EXCLUDE, &mut Vec::new()),
        )
    }

    /// Raw commands with variables substituted, paired with their line and
    /// whether they are written in this configuration. Commands of imports
    /// resolve at the top level of this configuration.
    #[allow(clippy::type_complexity)]
    fn resolved_commands(&self) -> Vec<(usize, bool, Result<(String, String), CommandError>)> {
        let imported_variables = self.imported_variables(&mut Vec::new());
        let context = VariableContext {
            values: &self.values,
            local: &self.parsed.variables,
            imported: &imported_variables,
            global: &self.global_variables,
        };

        self.ordered_raw_commands(true, &mut Vec::new())
            .into_iter()
            .map(|(raw, own)| {
                let scope = if own { raw.scope.as_str() } else { "" };
                let resolved = match &raw.body {
                    RawCommandBody::Invocation { invocation, value } => Ok((
                        syntax::substitute(invocation, scope, &context),
                        syntax::substitute(value, scope, &context),
                    )),
                    RawCommandBody::Malformed(reason) => Err(reason.clone()),
                };
                (raw.line, own, resolved)
            })
            .collect()
    }

    fn option_list(&self, key: &str) -> Vec<String> {
        self.parsed
            .options
            .get(key)
            .map(|values| values.iter().flat_map(|value| split_list(value)).collect())
            .unwrap_or_default()
    }

    /// Option values of this configuration followed by those of its imports.
    fn rules(&self, key: &str, visited: &mut Vec<String>) -> Vec<String> {
        let mut result = self.parsed.options.get(key).cloned().unwrap_or_default();
        for (_, configuration) in self.direct_imports(visited) {
            result.extend(configuration.rules(key, visited));
        }
        result
    }

    /// Imports that exist in the repository and were not visited yet.
    fn direct_imports(&self, visited: &mut Vec<String>) -> Vec<(String, Rc<Configuration>)> {
        let mut result = Vec::new();
        for name in &self.parsed.imports {
            if visited.contains(name) {
                continue;
            }
            visited.push(name.clone());
            match self
                .repository
                .as_ref()
                .and_then(|repository| repository.find_by_name(name))
            {
                Some(configuration) => result.push((name.clone(), configuration)),
                None => tracing::warn!("Import '{name}' not found"),
            }
        }
        result
    }

    /// Own declarations collapsed by name: first position, last value.
    fn declared_variables(&self, owner: Option<&str>) -> Vec<Variable> {
        let mut result: Vec<Variable> = Vec::new();
        for declaration in &self.parsed.variables {
            let variable = match owner {
                Some(owner) => Variable::owned_by(
                    &declaration.name,
                    &declaration.value,
                    &declaration.description,
                    owner,
                ),
                None => Variable::new(&declaration.name, &declaration.value, &declaration.description),
            };
            upsert(&mut result, variable);
        }
        result
    }

    /// What this configuration contributes when imported as `owner`: its own
    /// declared defaults, then what it imports itself.
    fn exported_variables(&self, owner: &str, visited: &mut Vec<String>) -> Vec<Variable> {
        let mut result = self.declared_variables(Some(owner));
        for variable in self.imported_variables(visited) {
            if !result.iter().any(|v| v.name == variable.name) {
                result.push(variable);
            }
        }
        result
    }

    /// Variables of all imports. On a name clash the later import wins.
    fn imported_variables(&self, visited: &mut Vec<String>) -> Vec<Variable> {
        let mut merged = Vec::new();
        for (name, configuration) in self.direct_imports(visited) {
            for variable in configuration.exported_variables(&name, visited) {
                upsert(&mut merged, variable);
            }
        }
        merged
    }

    /// Raw commands in application order. Each import contributes its own
    /// flattened list at the line of its `+Name`, so nested imports come
    /// before the commands of the configuration importing them.
    fn ordered_raw_commands(&self, own: bool, visited: &mut Vec<String>) -> Vec<(RawCommand, bool)> {
        let imports: Vec<(usize, Rc<Configuration>)> = self
            .direct_imports(visited)
            .into_iter()
            .map(|(name, configuration)| (self.import_line(&name), configuration))
            .collect();
        let mut nested = imports
            .into_iter()
            .map(|(line, configuration)| (line, configuration.ordered_raw_commands(false, visited)))
            .collect::<Vec<_>>()
            .into_iter()
            .peekable();

        let mut result = Vec::new();
        for raw in &self.parsed.commands {
            while let Some((_, commands)) = nested.next_if(|(line, _)| *line < raw.line) {
                result.extend(commands);
            }
            result.push((raw.clone(), own));
        }
        result.extend(nested.flat_map(|(_, commands)| commands));
        result
    }

    fn import_line(&self, name: &str) -> usize {
        self.parsed
            .imports
            .iter()
            .position(|import| import == name)
            .and_then(|index| self.parsed.import_lines.get(index).copied())
            .unwrap_or_default()
    }

    fn with_override(&self, variable: Variable) -> Variable {
        match self.values.get(&variable.name) {
            Some(value) => variable.with_value(value),
            None => variable,
        }
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("enabled", &self.enabled)
            .field("options", &self.parsed.options)
            .field("imports", &self.parsed.imports)
            .field("values", &self.values)
            .finish()
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Replaces the value of an existing entry in place, or appends.
fn upsert(variables: &mut Vec<Variable>, variable: Variable) {
    match variables.iter_mut().find(|v| v.name == variable.name) {
        Some(existing) => *existing = variable,
        None => variables.push(variable),
    }
}
