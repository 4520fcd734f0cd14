use crate::error::CommandError;
use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;

lazy_static! {
    static ref REGEX_LITERAL: Regex = Regex::new(r"^/(.+)/([gimsu]*)$").unwrap();
}

/// A search term as written in a configuration: either a `/pattern/flags`
/// literal or plain text matched as a substring.
#[derive(Debug, Clone)]
pub enum Pattern {
    Literal(String),
    Regex(Regex),
}

impl Pattern {
    pub fn parse(source: &str) -> Result<Self, CommandError> {
        match REGEX_LITERAL.captures(source) {
            Some(caps) => compile(&caps[1], &caps[2]).map(Pattern::Regex),
            None => Ok(Pattern::Literal(source.to_string())),
        }
    }

    pub fn is_regex_literal(source: &str) -> bool {
        REGEX_LITERAL.is_match(source)
    }

    pub fn is_match(&self, subject: &str) -> bool {
        match self {
            Pattern::Literal(needle) => !needle.is_empty() && subject.contains(needle.as_str()),
            Pattern::Regex(re) => re.is_match(subject),
        }
    }

    pub fn replace_all<'s>(&self, subject: &'s str, replacement: &str) -> Cow<'s, str> {
        match self {
            Pattern::Literal(needle) if needle.is_empty() => Cow::Borrowed(subject),
            Pattern::Literal(needle) => {
                if subject.contains(needle.as_str()) {
                    Cow::Owned(subject.replace(needle.as_str(), replacement))
                } else {
                    Cow::Borrowed(subject)
                }
            }
            Pattern::Regex(re) => re.replace_all(subject, replacement),
        }
    }
}

/// Compiles a pattern with JavaScript-style flags. `g` and `u` are accepted and
/// ignored since every replacement is global and patterns are always unicode.
pub fn compile(pattern: &str, flags: &str) -> Result<Regex, CommandError> {
    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'g' | 'u' => {}
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            other => {
                return Err(CommandError::InvalidRegex {
                    pattern: format!("/{pattern}/{flags}"),
                    reason: format!("unsupported flag '{other}'"),
                })
            }
        }
    }
    builder.build().map_err(|e| CommandError::InvalidRegex {
        pattern: format!("/{pattern}/{flags}"),
        reason: e.to_string(),
    })
}

/// Matches a location filter or include/exclude rule against a url.
/// An empty rule matches everything; a rule that fails to compile matches nothing.
pub fn location_matches(rule: &str, location: &str) -> bool {
    let rule = rule.trim();
    if rule.is_empty() {
        return true;
    }
    match Pattern::parse(rule) {
        Ok(pattern) => pattern.is_match(location),
        Err(e) => {
            tracing::warn!("Ignoring location rule: {e}");
            false
        }
    }
}
