use super::{
    add_script::AddScript,
    builder::CommandBuilder,
    group::Group,
    hide::Hide,
    html::{InsertHtml, InsertPosition, OverwriteHtml},
    if_command::If,
    images::{RecolorImage, ReplaceImage},
    intercept::{InterceptResponse, InterceptWebRequest},
    protect::Protect,
    query_selector::QuerySelector,
    replace_neighbor::ReplaceNeighbor,
    search_and_replace::SearchAndReplace,
    stage::Stage,
    style::Style,
    traits::Command,
};
use crate::document::Selector;
use crate::error::CommandError;
use crate::managers::UrlAction;
use crate::pattern::Pattern;
use lazy_static::lazy_static;
use serde::Serialize;

pub type Factory = fn(&Invocation<'_>, &CommandBuilder) -> Result<Box<dyn Command>, CommandError>;

/// A parsed `!name(parameters) = value` line, handed to a factory.
#[derive(Debug)]
pub struct Invocation<'a> {
    pub name: &'a str,
    pub parameters: Vec<String>,
    pub value: &'a str,
}

impl Invocation<'_> {
    /// The parameter at `index`, empty when it was not given.
    pub fn parameter(&self, index: usize) -> &str {
        self.parameters.get(index).map_or("", |p| p.as_str())
    }

    pub fn required(&self, index: usize, parameter: &str) -> Result<&str, CommandError> {
        match self.parameter(index) {
            "" => Err(CommandError::MissingParameter {
                command: self.name.to_string(),
                position: index + 1,
                parameter: parameter.to_string(),
            }),
            value => Ok(value),
        }
    }

    pub fn pattern(&self, index: usize, parameter: &str) -> Result<Pattern, CommandError> {
        Pattern::parse(self.required(index, parameter)?)
    }

    pub fn selector(&self, index: usize) -> Result<Option<Selector>, CommandError> {
        match self.parameter(index).trim() {
            "" => Ok(None),
            source => Selector::parse(source).map(Some),
        }
    }

    pub fn number(&self, index: usize, default: usize) -> Result<usize, CommandError> {
        match self.parameter(index).trim() {
            "" => Ok(default),
            source => source.parse().map_err(|_| {
                CommandError::InvalidParameters(format!(
                    "{}: expected a number at position {}, got '{source}'",
                    self.name,
                    index + 1
                ))
            }),
        }
    }

    /// Parameters from `index` on, joined back into an invocation for
    /// commands that wrap another command.
    pub fn rest(&self, index: usize) -> String {
        self.parameters
            .get(index..)
            .map(|rest| rest.join(","))
            .unwrap_or_default()
    }
}

pub enum EntryKind {
    Command(Factory),
    Namespace(Vec<RegistryEntry>),
}

impl std::fmt::Debug for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Command(_) => f.write_str("Command"),
            EntryKind::Namespace(entries) => f.debug_tuple("Namespace").field(entries).finish(),
        }
    }
}

#[derive(Debug)]
pub struct RegistryEntry {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    /// Documentation only.
    pub signature: &'static str,
    pub deprecated: bool,
    pub kind: EntryKind,
}

impl RegistryEntry {
    fn command(name: &'static str, aliases: &'static [&'static str], signature: &'static str, factory: Factory) -> Self {
        Self {
            name,
            aliases,
            signature,
            deprecated: false,
            kind: EntryKind::Command(factory),
        }
    }

    fn namespace(name: &'static str, entries: Vec<RegistryEntry>) -> Self {
        Self {
            name,
            aliases: &[],
            signature: "",
            deprecated: false,
            kind: EntryKind::Namespace(entries),
        }
    }

    fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name == name || self.aliases.contains(&name)
    }

    /// Looks up a command inside a namespace entry.
    pub fn find(&self, name: &str) -> Option<&RegistryEntry> {
        match &self.kind {
            EntryKind::Namespace(entries) => entries.iter().find(|entry| entry.is_named(name)),
            EntryKind::Command(_) => None,
        }
    }
}

/// Flat view of a registry entry for listings.
#[derive(Debug, Clone, Serialize)]
pub struct CommandInfo {
    pub name: String,
    pub aliases: Vec<String>,
    pub signature: String,
    pub deprecated: bool,
}

lazy_static! {
    static ref REGISTRY: Vec<RegistryEntry> = vec![
        RegistryEntry::command("addScript", &[], "(${1}) = ${3}", |i, _| {
            Ok(Box::new(AddScript::new(&i.parameters, i.value)))
        }),
        RegistryEntry::command(
            "replaceAjaxResponse",
            &["replaceAjax", "replaceResponse"],
            "(${1}, ${2}) = ${3}",
            |i, _| {
                let search = Some(i.parameter(1)).filter(|s| !s.is_empty());
                Ok(Box::new(InterceptResponse::replace(i.required(0, "url")?, search, i.value)))
            }
        ),
        RegistryEntry::command(
            "patchAjaxResponse",
            &["patchAjax", "patchResponse"],
            "(${1}) = ${3}",
            |i, _| Ok(Box::new(InterceptResponse::patch(i.required(0, "url")?, i.value)))
        ),
        RegistryEntry::command("if", &[], "(${1}, ${2}, ${3}) = ${4}", |i, builder| {
            let inner = builder.try_build(&i.rest(2), i.value)?;
            Ok(Box::new(If::new(i.parameter(0), i.selector(1)?, inner)))
        }),
        RegistryEntry::command("ifLocation", &[], "(${1}, ${2}) = ${3}", |i, builder| {
            let inner = builder.try_build(&i.rest(1), i.value)?;
            Ok(Box::new(If::new(i.parameter(0), None, inner)))
        }),
        RegistryEntry::command(
            "ifSelector",
            &["ifQuery", "ifCss"],
            "(${1}, ${2}) = ${3}",
            |i, builder| {
                let inner = builder.try_build(&i.rest(1), i.value)?;
                Ok(Box::new(If::new("", i.selector(0)?, inner)))
            }
        ),
        RegistryEntry::command("replace", &[], "(${1}, ${2}, ${3}, ${4}) = ${5}", |i, _| {
            Ok(Box::new(
                SearchAndReplace::new(i.pattern(0, "search")?, i.value)
                    .with_location_filter(i.parameter(1))
                    .with_selector(i.selector(2)?)
                    .with_attribute(i.parameter(3)),
            ))
        }),
        RegistryEntry::command(
            "replaceAttribute",
            &[],
            "(${1}, ${2}, ${3}, ${4}) = ${5}",
            |i, _| {
                Ok(Box::new(
                    SearchAndReplace::new(i.pattern(0, "search")?, i.value)
                        .with_attribute(i.required(1, "attribute")?)
                        .with_location_filter(i.parameter(2))
                        .with_selector(i.selector(3)?),
                ))
            }
        ),
        RegistryEntry::command("protect", &[], "(${1}, ${2}, ${3})", |i, _| {
            Ok(Box::new(
                Protect::new(i.required(0, "search")?)
                    .with_location_filter(i.parameter(1))
                    .with_selector(i.selector(2)?),
            ))
        }),
        RegistryEntry::command(
            "replaceNeighbor",
            &[],
            "(${1}, ${2}, ${3}, ${4}, ${5}) = ${6}",
            |i, _| {
                let neighbor = Selector::parse(i.required(2, "selector")?)?;
                Ok(Box::new(
                    ReplaceNeighbor::new(i.pattern(0, "search")?, i.value, i.number(1, 1)?, neighbor)
                        .with_filters(i.parameter(3), i.selector(4)?),
                ))
            }
        ),
        RegistryEntry::command("insertBefore", &[], "(${1}, ${2}, ${3}) = ${4}", |i, _| {
            insert_html(i, InsertPosition::AfterBegin)
        }),
        RegistryEntry::command("insertAfter", &[], "(${1}, ${2}, ${3}) = ${4}", |i, _| {
            insert_html(i, InsertPosition::BeforeEnd)
        }),
        RegistryEntry::command("style", &[], "(${1}, ${2}, ${3}) = ${4}", |i, _| {
            Ok(Box::new(Style::new(
                i.pattern(0, "search")?,
                i.required(1, "property")?,
                i.number(2, 1)?,
                i.value,
            )))
        }),
        RegistryEntry::command("querySelector", &["query"], "(${1}, ${2}) = ${3}", |i, _| {
            let selector = Selector::parse(i.required(0, "selector")?)?;
            Ok(Box::new(QuerySelector::new(selector, i.parameter(1), i.value)))
        }),
        RegistryEntry::command("hide", &[], "(${1}, ${2}, ${3}, ${4})", |i, _| {
            Ok(Box::new(
                Hide::new(i.pattern(0, "search")?, i.number(1, 1)?, i.selector(2)?)
                    .with_filters(i.parameter(3), i.parameter(4)),
            ))
        }),
        RegistryEntry::command("replaceImage", &[], "(${1}) = ${2}", |i, _| {
            i.required(0, "search")?;
            let search = i
                .parameters
                .iter()
                .filter(|p| !p.is_empty())
                .map(|p| Pattern::parse(p))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Box::new(ReplaceImage::new(search, i.value)))
        }),
        RegistryEntry::command("recolorImage", &["recolourImage"], "(${1}) = ${2}", |i, _| {
            Ok(Box::new(RecolorImage::new(i.pattern(0, "search")?, i.value)))
        }),
        RegistryEntry::command("replaceLink", &[], "(${1}) = ${2}", |i, _| {
            let href = i.required(0, "href")?.replace('"', "\\\"");
            let selector = Selector::parse(&format!("a[href=\"{href}\"]"))?;
            Ok(Box::new(QuerySelector::new(selector, "href", i.value)))
        })
        .deprecated(),
        RegistryEntry::command("blockUrl", &[], "(${1})", |i, builder| {
            intercept(i, builder, UrlAction::Block)
        }),
        RegistryEntry::command("delayUrl", &[], "(${1}) = ${2}", |i, builder| {
            intercept(i, builder, UrlAction::Delay)
        }),
        RegistryEntry::command("replaceUrl", &["redirectUrl"], "(${1}) = ${2}", |i, builder| {
            intercept(i, builder, UrlAction::Replace)
        }),
        RegistryEntry::command("stage", &[], "(${1}, ${2}) = ${3}", |i, _| {
            Ok(Box::new(Stage::new(i.parameter(0), i.parameter(1), i.value)))
        }),
        RegistryEntry::command("overwriteHTML", &["overwrite"], "(${1}, ${2}) = ${3}", |i, _| {
            Ok(Box::new(OverwriteHtml::new(i.parameter(0), i.selector(1)?, i.value)))
        }),
        RegistryEntry::command("overwritePage", &[], "(${1}, ${2}) = ${3}", |i, _| {
            Ok(Box::new(OverwriteHtml::page(i.parameter(0), i.parameter(1), i.value)))
        }),
        RegistryEntry::namespace(
            "turbonomic",
            vec![RegistryEntry::command("hideListItem", &[], "(${1})", |i, _| {
                let selector = Selector::parse(".list-group-item")?;
                Ok(Box::new(Hide::new(i.pattern(0, "search")?, 17, Some(selector))))
            })]
        ),
        RegistryEntry::namespace(
            "segment",
            vec![
                RegistryEntry::command("analyticsLoad", &[], "(${1})", |i, _| {
                    let key = match i.value.trim() {
                        "" => i.required(0, "write key")?,
                        value => value,
                    };
                    let load = format!(
                        "analytics.load({});\nanalytics.page();",
                        serde_json::Value::String(key.to_string())
                    );
                    Ok(Box::new(Group::new(vec![
                        Box::new(AddScript::new(&[], SEGMENT_SNIPPET)),
                        Box::new(AddScript::new(&[], &load)),
                    ])))
                }),
                RegistryEntry::command("analyticsIdentify", &[], "(${1}, ${2}, ${3})", |i, _| {
                    let traits = serde_json::json!({
                        "name": i.parameter(1),
                        "email": i.parameter(2),
                    });
                    let script = format!(
                        "analytics.identify({}, {traits});",
                        serde_json::Value::String(i.required(0, "user id")?.to_string())
                    );
                    Ok(Box::new(AddScript::new(&[], &script)))
                }),
                RegistryEntry::command("analyticsTrack", &[], "(${1}) = ${2}", |i, _| {
                    let script = format!(
                        "analytics.track({}, {});",
                        serde_json::Value::String(i.required(0, "event")?.to_string()),
                        serde_json::Value::String(i.value.to_string())
                    );
                    Ok(Box::new(AddScript::new(&[], &script)))
                }),
            ]
        ),
    ];
}

const SEGMENT_SNIPPET: &str = "!function(){var analytics=window.analytics=window.analytics||[];\
if(!analytics.initialize&&!analytics.invoked){analytics.invoked=!0;\
analytics.load=function(key){var t=document.createElement(\"script\");t.async=!0;\
t.src=\"https://cdn.segment.com/analytics.js/v1/\"+key+\"/analytics.min.js\";\
document.head.appendChild(t)};}}();";

fn insert_html(i: &Invocation<'_>, position: InsertPosition) -> Result<Box<dyn Command>, CommandError> {
    Ok(Box::new(InsertHtml::new(
        position,
        i.pattern(0, "search")?,
        i.value,
        i.number(1, 1)?,
        i.selector(2)?,
    )))
}

fn intercept(
    i: &Invocation<'_>,
    builder: &CommandBuilder,
    action: UrlAction,
) -> Result<Box<dyn Command>, CommandError> {
    Ok(Box::new(InterceptWebRequest::new(
        action,
        i.required(0, "url")?,
        i.value,
        Some(i.parameter(1)),
        builder.include_rules(),
        builder.exclude_rules(),
    )))
}

pub fn entries() -> &'static [RegistryEntry] {
    &REGISTRY
}

/// Looks up a top-level entry by name or alias.
pub fn find(name: &str) -> Option<&'static RegistryEntry> {
    REGISTRY.iter().find(|entry| entry.is_named(name))
}

/// Every callable command, namespaced ones as `namespace.name`.
pub fn describe() -> Vec<CommandInfo> {
    let mut result = Vec::new();
    for entry in REGISTRY.iter() {
        match &entry.kind {
            EntryKind::Command(_) => result.push(info(entry, None)),
            EntryKind::Namespace(entries) => {
                result.extend(entries.iter().map(|nested| info(nested, Some(entry.name))))
            }
        }
    }
    result
}

fn info(entry: &RegistryEntry, namespace: Option<&str>) -> CommandInfo {
    CommandInfo {
        name: match namespace {
            Some(namespace) => format!("{namespace}.{}", entry.name),
            None => entry.name.to_string(),
        },
        aliases: entry.aliases.iter().map(|a| a.to_string()).collect(),
        signature: entry.signature.to_string(),
        deprecated: entry.deprecated,
    }
}
