use super::{
    error_command::ErrorCommand,
    params::split_parameters,
    registry::{self, EntryKind, Invocation, RegistryEntry},
    search_and_replace::SearchAndReplace,
    traits::Command,
};
use crate::error::CommandError;
use crate::pattern::Pattern;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref INVOCATION: Regex =
        Regex::new(r"^!\s*(?:([A-Za-z_][\w-]*)\.)?([A-Za-z_][\w-]*)\s*(?:\((.*)\))?\s*$").unwrap();
}

/// Turns `!name(params)`, `!namespace.name(params)`, `!/regex/flags` and
/// plain search strings into commands.
///
/// The builder carries the namespaces enabled by `@namespace` and the
/// include/exclude rules of the configuration it builds for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandBuilder {
    namespaces: Vec<String>,
    include_rules: Vec<String>,
    exclude_rules: Vec<String>,
}

impl CommandBuilder {
    pub fn new(namespaces: Vec<String>, include_rules: Vec<String>, exclude_rules: Vec<String>) -> Self {
        Self {
            namespaces,
            include_rules,
            exclude_rules,
        }
    }

    pub fn include_rules(&self) -> &[String] {
        &self.include_rules
    }

    pub fn exclude_rules(&self) -> &[String] {
        &self.exclude_rules
    }

    /// Like [`try_build`](Self::try_build), but a failure becomes an
    /// [`ErrorCommand`] carrying the reason.
    pub fn build(&self, invocation: &str, value: &str) -> Box<dyn Command> {
        self.try_build(invocation, value).unwrap_or_else(|reason| {
            tracing::debug!("Could not build '{invocation}': {reason}");
            Box::new(ErrorCommand::new(reason))
        })
    }

    pub fn try_build(&self, invocation: &str, value: &str) -> Result<Box<dyn Command>, CommandError> {
        let invocation = invocation.trim();

        let Some(body) = invocation.strip_prefix('!') else {
            return Ok(Box::new(SearchAndReplace::new(
                Pattern::Literal(invocation.to_string()),
                value,
            )));
        };

        if body.starts_with('/') {
            if !Pattern::is_regex_literal(body) {
                return Err(CommandError::MalformedInvocation(invocation.to_string()));
            }
            return Ok(Box::new(SearchAndReplace::new(Pattern::parse(body)?, value)));
        }

        let caps = INVOCATION
            .captures(invocation)
            .ok_or_else(|| CommandError::MalformedInvocation(invocation.to_string()))?;
        let namespace = caps.get(1).map(|m| m.as_str());
        let name = &caps[2];
        let parameters = split_parameters(caps.get(3).map_or("", |m| m.as_str()))?;

        let entry = self.resolve(namespace, name)?;
        let EntryKind::Command(factory) = &entry.kind else {
            return Err(CommandError::NamespaceNotCallable {
                name: entry.name.to_string(),
            });
        };
        if entry.deprecated {
            tracing::warn!("Command '{}' is deprecated", entry.name);
        }
        factory(
            &Invocation {
                name: entry.name,
                parameters,
                value,
            },
            self,
        )
    }

    fn resolve(&self, namespace: Option<&str>, name: &str) -> Result<&'static RegistryEntry, CommandError> {
        if let Some(namespace) = namespace {
            let entry = registry::find(namespace)
                .filter(|entry| matches!(entry.kind, EntryKind::Namespace(_)))
                .ok_or_else(|| CommandError::UnknownNamespace(namespace.to_string()))?;
            return entry
                .find(name)
                .ok_or_else(|| CommandError::UnknownCommand(format!("{namespace}.{name}")));
        }

        if let Some(entry) = registry::find(name) {
            return Ok(entry);
        }
        self.namespaces
            .iter()
            .filter_map(|namespace| registry::find(namespace))
            .find_map(|entry| entry.find(name))
            .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::Target;
    use crate::document::{Document, Tree};

    fn run(command: &dyn Command, value: &str) -> String {
        let mut tree = Tree::scratch("http://example.com", value);
        let root = tree.root();
        command
            .apply(&mut Target::node(&mut tree, root, "value"))
            .unwrap();
        tree.property(root, "value").unwrap_or_default()
    }

    #[test]
    fn test_plain_search_builds_replace() {
        let command = CommandBuilder::default().build("a", "b");
        assert_eq!(command.name(), "replace");
        assert_eq!(run(command.as_ref(), "a"), "b");
    }

    #[test]
    fn test_regex_invocation() {
        let command = CommandBuilder::default().build("!/a+/i", "b");
        assert_eq!(run(command.as_ref(), "xAAx"), "xbx");
    }

    #[test]
    fn test_invalid_regex_becomes_error_sentinel() {
        let command = CommandBuilder::default().build("!/(/", "b");
        assert!(matches!(
            command.error(),
            Some(CommandError::InvalidRegex { .. })
        ));
        assert!(!command.is_applicable_for_group("text"));
    }

    #[test]
    fn test_named_command_with_parameters() {
        let command = CommandBuilder::default().build("!replace(\"a, b\")", "c");
        assert_eq!(run(command.as_ref(), "a, b!"), "c!");
    }

    #[test]
    fn test_aliases_resolve_to_the_same_command() {
        let builder = CommandBuilder::default();
        assert_eq!(builder.build("!query(h1)", "x").name(), "querySelector");
        assert_eq!(builder.build("!querySelector(h1)", "x").name(), "querySelector");
        assert_eq!(builder.build("!recolourImage(a)", "red").name(), "recolorImage");
    }

    #[test]
    fn test_unknown_command() {
        let command = CommandBuilder::default().build("!doesNotExist(a)", "b");
        assert_eq!(
            command.error(),
            Some(&CommandError::UnknownCommand("doesNotExist".into()))
        );
    }

    #[test]
    fn test_namespaced_commands() {
        let builder = CommandBuilder::default();
        assert_eq!(builder.build("!turbonomic.hideListItem(x)", "").name(), "hide");
        assert_eq!(
            builder.build("!nope.hideListItem(x)", "").error(),
            Some(&CommandError::UnknownNamespace("nope".into()))
        );
        assert_eq!(
            builder.build("!hideListItem(x)", "").error(),
            Some(&CommandError::UnknownCommand("hideListItem".into()))
        );
        assert_eq!(
            builder.build("!turbonomic(x)", "").error(),
            Some(&CommandError::NamespaceNotCallable {
                name: "turbonomic".into()
            })
        );

        let with_namespace = CommandBuilder::new(vec!["turbonomic".into()], vec![], vec![]);
        assert_eq!(with_namespace.build("!hideListItem(x)", "").name(), "hide");
    }

    #[test]
    fn test_missing_required_parameter() {
        let command = CommandBuilder::default().build("!replace", "b");
        assert!(matches!(
            command.error(),
            Some(CommandError::MissingParameter { position: 1, .. })
        ));
    }

    #[test]
    fn test_if_builds_inner_command() {
        let builder = CommandBuilder::default();
        let command = builder.build("!if(example, , !replace(a))", "b");
        assert_eq!(command.name(), "if");
        assert!(command.is_applicable_for_group("text"));
        assert_eq!(run(command.as_ref(), "a"), "b");

        let elsewhere = builder.build("!ifLocation(other.org, !replace(a))", "b");
        assert_eq!(run(elsewhere.as_ref(), "a"), "a");
    }

    #[test]
    fn test_malformed_invocation() {
        let command = CommandBuilder::default().build("!replace(a", "b");
        assert!(command.error().is_some());
        let command = CommandBuilder::default().build("!!", "b");
        assert!(matches!(
            command.error(),
            Some(CommandError::MalformedInvocation(_))
        ));
    }
}
