use super::traits::{ApplyResult, Command, Subject, Target};
use crate::managers::{InlineAction, InlineRule, UrlAction, UrlRule};
use crate::undo::UndoElement;

/// Blocks, delays or redirects requests through the url manager.
#[derive(Debug, Clone)]
pub struct InterceptWebRequest {
    rule: UrlRule,
}

impl InterceptWebRequest {
    pub fn new(
        action: UrlAction,
        url: &str,
        value: &str,
        resource_types: Option<&str>,
        include_rules: &[String],
        exclude_rules: &[String],
    ) -> Self {
        Self {
            rule: UrlRule {
                action,
                url: url.to_string(),
                value: value.to_string(),
                resource_types: resource_types
                    .filter(|types| !types.trim().is_empty())
                    .map(str::to_string),
                include_rules: include_rules.to_vec(),
                exclude_rules: exclude_rules.to_vec(),
            },
        }
    }
}

impl Command for InterceptWebRequest {
    fn name(&self) -> &str {
        match self.rule.action {
            UrlAction::Block => "blockUrl",
            UrlAction::Delay => "delayUrl",
            UrlAction::Replace => "replaceUrl",
        }
    }

    fn is_applicable_for_group(&self, group: &str) -> bool {
        group == "url"
    }

    fn apply(&self, target: &mut Target<'_>) -> ApplyResult {
        let Subject::Urls(urls) = &mut target.subject else {
            return Ok(None);
        };
        let id = urls.add(self.rule.clone());
        Ok(Some(vec![UndoElement::UrlRule { id }]))
    }
}

/// Rewrites responses to in-page requests through the inline rule manager.
#[derive(Debug, Clone)]
pub struct InterceptResponse {
    rule: InlineRule,
}

impl InterceptResponse {
    pub fn replace(url: &str, search: Option<&str>, value: &str) -> Self {
        Self {
            rule: InlineRule {
                action: InlineAction::Replace,
                url: url.to_string(),
                search: search.map(str::to_string),
                value: value.to_string(),
            },
        }
    }

    pub fn patch(url: &str, patch: &str) -> Self {
        Self {
            rule: InlineRule {
                action: InlineAction::Patch,
                url: url.to_string(),
                search: None,
                value: patch.to_string(),
            },
        }
    }
}

impl Command for InterceptResponse {
    fn name(&self) -> &str {
        match self.rule.action {
            InlineAction::Replace => "replaceAjaxResponse",
            InlineAction::Patch => "patchAjaxResponse",
        }
    }

    fn is_applicable_for_group(&self, group: &str) -> bool {
        group == "ajax"
    }

    fn apply(&self, target: &mut Target<'_>) -> ApplyResult {
        let Subject::InlineRules(rules) = &mut target.subject else {
            return Ok(None);
        };
        let id = rules.add(self.rule.clone());
        Ok(Some(vec![UndoElement::InlineRule { id }]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::managers::{InlineRuleManager, InlineRules, UrlRules};

    #[test]
    fn test_block_url_registers_rule() {
        let command = InterceptWebRequest::new(UrlAction::Block, "*://ads/*", "", None, &[], &[]);
        let mut urls = UrlRules::default();
        let undo = command
            .apply(&mut Target::urls("http://example.com", &mut urls))
            .unwrap()
            .unwrap();
        assert!(matches!(undo[..], [UndoElement::UrlRule { .. }]));
        assert_eq!(urls.len(), 1);
        assert_eq!(urls.rules().next().map(|r| r.action), Some(UrlAction::Block));
    }

    #[test]
    fn test_response_rule_rewrites_body() {
        let command = InterceptResponse::replace("/api/", Some("Acme"), "Demo");
        let mut rules = InlineRules::default();
        command
            .apply(&mut Target::inline_rules("http://example.com", &mut rules))
            .unwrap()
            .unwrap();
        assert_eq!(rules.run("http://host/api/x", "Acme Corp"), "Demo Corp");
    }

    #[test]
    fn test_network_commands_ignore_nodes() {
        let command = InterceptResponse::patch("/api/", "{}");
        assert!(command.is_applicable_for_group("ajax"));
        assert!(!command.is_applicable_for_group("text"));
    }
}
