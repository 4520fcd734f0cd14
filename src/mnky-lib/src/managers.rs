//! Collaborators that hold state outside the document: network interception
//! rules and inline response rewrites.

use indexmap::IndexMap;
use serde::Serialize;

pub type RuleId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlAction {
    Block,
    Delay,
    Replace,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UrlRule {
    pub action: UrlAction,
    pub url: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_types: Option<String>,
    pub include_rules: Vec<String>,
    pub exclude_rules: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InlineAction {
    Replace,
    Patch,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineRule {
    pub action: InlineAction,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub value: String,
}

pub trait UrlManager {
    fn add(&mut self, rule: UrlRule) -> RuleId;
    fn remove(&mut self, id: RuleId);
    fn clear(&mut self);
}

pub trait InlineRuleManager {
    fn add(&mut self, rule: InlineRule) -> RuleId;
    fn remove(&mut self, id: RuleId);
    /// Rewrites a response body for `url` with every matching rule, in the
    /// order the rules were added.
    fn run(&mut self, url: &str, body: &str) -> String;
    fn clear(&mut self);
}

/// Keeps URL rules in memory, keyed by the id handed out on `add`.
#[derive(Debug, Default)]
pub struct UrlRules {
    rules: IndexMap<RuleId, UrlRule>,
    next_id: RuleId,
}

impl UrlRules {
    pub fn rules(&self) -> impl Iterator<Item = &UrlRule> {
        self.rules.values()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl UrlManager for UrlRules {
    fn add(&mut self, rule: UrlRule) -> RuleId {
        self.next_id += 1;
        self.rules.insert(self.next_id, rule);
        self.next_id
    }

    fn remove(&mut self, id: RuleId) {
        self.rules.shift_remove(&id);
    }

    fn clear(&mut self) {
        self.rules.clear();
    }
}

#[derive(Debug, Default)]
pub struct InlineRules {
    rules: IndexMap<RuleId, InlineRule>,
    next_id: RuleId,
}

impl InlineRules {
    pub fn rules(&self) -> impl Iterator<Item = &InlineRule> {
        self.rules.values()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl InlineRuleManager for InlineRules {
    fn add(&mut self, rule: InlineRule) -> RuleId {
        self.next_id += 1;
        self.rules.insert(self.next_id, rule);
        self.next_id
    }

    fn remove(&mut self, id: RuleId) {
        self.rules.shift_remove(&id);
    }

    fn run(&mut self, url: &str, body: &str) -> String {
        let mut result = body.to_string();
        for rule in self.rules.values() {
            if !crate::pattern::location_matches(&rule.url, url) {
                continue;
            }
            result = match (rule.action, &rule.search) {
                (InlineAction::Replace, Some(search)) if !search.is_empty() => {
                    match crate::pattern::Pattern::parse(search) {
                        Ok(pattern) => pattern.replace_all(&result, &rule.value).into_owned(),
                        Err(e) => {
                            tracing::warn!("Skipping inline rule for '{}': {e}", rule.url);
                            result
                        }
                    }
                }
                (InlineAction::Replace, _) => rule.value.clone(),
                (InlineAction::Patch, _) => merge_patch(&result, &rule.value),
            };
        }
        result
    }

    fn clear(&mut self) {
        self.rules.clear();
    }
}

/// Applies `patch` to `body` as a JSON merge patch. Bodies or patches that are
/// not JSON leave the body untouched.
fn merge_patch(body: &str, patch: &str) -> String {
    let (Ok(mut target), Ok(patch)) = (
        serde_json::from_str::<serde_json::Value>(body),
        serde_json::from_str::<serde_json::Value>(patch),
    ) else {
        tracing::warn!("Ignoring patch rule: body or patch is not JSON");
        return body.to_string();
    };
    merge(&mut target, &patch);
    target.to_string()
}

fn merge(target: &mut serde_json::Value, patch: &serde_json::Value) {
    use serde_json::Value;
    match patch {
        Value::Object(entries) => {
            if !target.is_object() {
                *target = Value::Object(serde_json::Map::new());
            }
            if let Value::Object(map) = target {
                for (key, value) in entries {
                    if value.is_null() {
                        map.remove(key);
                    } else {
                        merge(map.entry(key.clone()).or_insert(Value::Null), value);
                    }
                }
            }
        }
        other => *target = other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(action: InlineAction, url: &str, search: Option<&str>, value: &str) -> InlineRule {
        InlineRule {
            action,
            url: url.to_string(),
            search: search.map(str::to_string),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_url_rules_add_and_remove() {
        let mut rules = UrlRules::default();
        let id = rules.add(UrlRule {
            action: UrlAction::Block,
            url: "*://tracker/*".to_string(),
            value: String::new(),
            resource_types: None,
            include_rules: vec![],
            exclude_rules: vec![],
        });
        assert_eq!(rules.len(), 1);
        rules.remove(id);
        assert!(rules.is_empty());
    }

    #[test]
    fn test_inline_replace_with_search() {
        let mut rules = InlineRules::default();
        rules.add(rule(InlineAction::Replace, "/api/", Some("Acme"), "Demo"));
        assert_eq!(
            rules.run("http://host/api/users", r#"{"name":"Acme"}"#),
            r#"{"name":"Demo"}"#
        );
        assert_eq!(rules.run("http://host/other", "Acme"), "Acme");
    }

    #[test]
    fn test_inline_replace_whole_body() {
        let mut rules = InlineRules::default();
        rules.add(rule(InlineAction::Replace, "api", None, "[]"));
        assert_eq!(rules.run("http://host/api", "[1,2]"), "[]");
    }

    #[test]
    fn test_inline_patch_merges_json() {
        let mut rules = InlineRules::default();
        rules.add(rule(
            InlineAction::Patch,
            "api",
            None,
            r#"{"status":"ok","debug":null}"#,
        ));
        let patched = rules.run("http://host/api", r#"{"status":"error","debug":true,"id":1}"#);
        let value: serde_json::Value = serde_json::from_str(&patched).unwrap();
        assert_eq!(value, serde_json::json!({"status": "ok", "id": 1}));
    }
}
