use super::{Document, NodeId, NodeKind};
use crate::error::CommandError;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG: Regex = Regex::new(r"^(\*|[A-Za-z][\w-]*)").unwrap();
    static ref PART: Regex = Regex::new(
        r#"^(?:#([\w-]+)|\.([\w-]+)|\[\s*([\w:.-]+)\s*(?:([*^$~]?=)\s*(?:"([^"]*)"|'([^']*)'|([^\]\s]*)))?\s*\])"#
    )
    .unwrap();
}

/// Structural selector used to pick node groups out of a [`Document`].
///
/// `Text` picks every non-blank text node below `body`. `Css` supports a
/// practical subset of CSS: type, `#id`, `.class` and attribute filters
/// (`[a]`, `[a=v]`, `[a*=v]`, `[a^=v]`, `[a$=v]`, `[a~=v]`), combined with the
/// descendant and `>` child combinators and `,` alternatives.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    Text,
    Css(Vec<Complex>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Complex(Vec<(Combinator, Compound)>);

#[derive(Debug, Clone, PartialEq, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttributeFilter>,
}

#[derive(Debug, Clone, PartialEq)]
enum AttributeFilter {
    Present(String),
    Equals(String, String),
    Contains(String, String),
    Prefix(String, String),
    Suffix(String, String),
    Word(String, String),
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, CommandError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(invalid(source, "empty selector"));
        }
        let mut alternatives = Vec::new();
        for part in split_outside_brackets(source, ',') {
            alternatives.push(parse_complex(part.trim(), source)?);
        }
        Ok(Selector::Css(alternatives))
    }

    pub fn matches<D: Document + ?Sized>(&self, document: &D, node: NodeId) -> bool {
        match self {
            Selector::Text => {
                document.kind(node) == Some(NodeKind::Text)
                    && document
                        .property(node, "data")
                        .is_some_and(|data| !data.trim().is_empty())
                    && has_ancestor_tag(document, node, "BODY")
            }
            Selector::Css(alternatives) => alternatives
                .iter()
                .any(|complex| matches_from(document, node, &complex.0)),
        }
    }
}

fn invalid(selector: &str, reason: &str) -> CommandError {
    CommandError::InvalidSelector {
        selector: selector.to_string(),
        reason: reason.to_string(),
    }
}

fn has_ancestor_tag<D: Document + ?Sized>(document: &D, node: NodeId, tag: &str) -> bool {
    let mut current = document.parent(node);
    while let Some(parent) = current {
        if document.tag_name(parent).as_deref() == Some(tag) {
            return true;
        }
        current = document.parent(parent);
    }
    false
}

fn split_outside_brackets(source: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, ch) in source.char_indices() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(ch),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, c) if c == separator && depth == 0 => {
                parts.push(&source[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&source[start..]);
    parts
}

fn parse_complex(part: &str, source: &str) -> Result<Complex, CommandError> {
    let mut result = Vec::new();
    let mut combinator = Combinator::Descendant;
    let mut rest = part;
    while !rest.is_empty() {
        let trimmed = rest.trim_start();
        if let Some(after) = trimmed.strip_prefix('>') {
            if result.is_empty() {
                return Err(invalid(source, "selector starts with '>'"));
            }
            combinator = Combinator::Child;
            rest = after;
            continue;
        }
        if trimmed.is_empty() {
            break;
        }
        let (compound, consumed) = parse_compound(trimmed, source)?;
        result.push((combinator, compound));
        combinator = Combinator::Descendant;
        rest = &trimmed[consumed..];
    }
    if result.is_empty() {
        return Err(invalid(source, "empty selector"));
    }
    Ok(Complex(result))
}

fn parse_compound(input: &str, source: &str) -> Result<(Compound, usize), CommandError> {
    let mut compound = Compound::default();
    let mut pos = 0;
    if let Some(m) = TAG.find(input) {
        if m.as_str() != "*" {
            compound.tag = Some(m.as_str().to_uppercase());
        }
        pos = m.end();
    }
    while pos < input.len() {
        let remaining = &input[pos..];
        if remaining.starts_with(char::is_whitespace) || remaining.starts_with('>') {
            break;
        }
        let caps = PART
            .captures(remaining)
            .ok_or_else(|| invalid(source, &format!("unexpected '{remaining}'")))?;
        if let Some(id) = caps.get(1) {
            compound.id = Some(id.as_str().to_string());
        } else if let Some(class) = caps.get(2) {
            compound.classes.push(class.as_str().to_string());
        } else if let Some(name) = caps.get(3) {
            let name = name.as_str().to_string();
            let value = caps
                .get(5)
                .or_else(|| caps.get(6))
                .or_else(|| caps.get(7))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            let filter = match caps.get(4).map(|m| m.as_str()) {
                None => AttributeFilter::Present(name),
                Some("=") => AttributeFilter::Equals(name, value),
                Some("*=") => AttributeFilter::Contains(name, value),
                Some("^=") => AttributeFilter::Prefix(name, value),
                Some("$=") => AttributeFilter::Suffix(name, value),
                Some(_) => AttributeFilter::Word(name, value),
            };
            compound.attributes.push(filter);
        }
        pos += caps[0].len();
    }
    if pos == 0 {
        return Err(invalid(source, &format!("unexpected '{input}'")));
    }
    Ok((compound, pos))
}

fn matches_from<D: Document + ?Sized>(
    document: &D,
    node: NodeId,
    parts: &[(Combinator, Compound)],
) -> bool {
    let Some(((combinator, last), rest)) = parts.split_last() else {
        return true;
    };
    if !last.matches(document, node) {
        return false;
    }
    if rest.is_empty() {
        return true;
    }
    match combinator {
        Combinator::Child => document
            .parent(node)
            .is_some_and(|parent| matches_from(document, parent, rest)),
        Combinator::Descendant => {
            let mut current = document.parent(node);
            while let Some(parent) = current {
                if matches_from(document, parent, rest) {
                    return true;
                }
                current = document.parent(parent);
            }
            false
        }
    }
}

impl Compound {
    fn matches<D: Document + ?Sized>(&self, document: &D, node: NodeId) -> bool {
        if document.kind(node) != Some(NodeKind::Element) {
            return false;
        }
        if let Some(tag) = &self.tag {
            if document.tag_name(node).as_deref() != Some(tag.as_str()) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if document.property(node, "id").as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.is_empty() {
            let class_list = document.property(node, "class").unwrap_or_default();
            let present: Vec<&str> = class_list.split_whitespace().collect();
            if !self.classes.iter().all(|c| present.contains(&c.as_str())) {
                return false;
            }
        }
        self.attributes.iter().all(|filter| filter.matches(document, node))
    }
}

impl AttributeFilter {
    fn matches<D: Document + ?Sized>(&self, document: &D, node: NodeId) -> bool {
        let (name, expected) = match self {
            AttributeFilter::Present(name) => return document.property(node, name).is_some(),
            AttributeFilter::Equals(n, v)
            | AttributeFilter::Contains(n, v)
            | AttributeFilter::Prefix(n, v)
            | AttributeFilter::Suffix(n, v)
            | AttributeFilter::Word(n, v) => (n, v),
        };
        let Some(actual) = document.property(node, name) else {
            return false;
        };
        match self {
            AttributeFilter::Equals(..) => actual == *expected,
            AttributeFilter::Contains(..) => actual.contains(expected.as_str()),
            AttributeFilter::Prefix(..) => actual.starts_with(expected.as_str()),
            AttributeFilter::Suffix(..) => actual.ends_with(expected.as_str()),
            AttributeFilter::Word(..) => actual.split_whitespace().any(|w| w == expected.as_str()),
            AttributeFilter::Present(_) => true,
        }
    }
}
