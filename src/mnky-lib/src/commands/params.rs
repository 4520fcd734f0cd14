use crate::error::CommandError;

/// Splits a parameter list on commas.
///
/// Commas inside quotes, after a backslash or inside nested parentheses do not
/// split. Top-level quotes and escapes are removed; text inside nested
/// parentheses is kept verbatim so it can be built as a command again.
pub fn split_parameters(source: &str) -> Result<Vec<String>, CommandError> {
    if source.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut parts = Vec::new();
    let mut current = Part::default();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut chars = source.chars();

    while let Some(ch) = chars.next() {
        if depth > 0 {
            current.push(ch);
            match (quote, ch) {
                (_, '\\') => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                }
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"') | (None, '\'') => quote = Some(ch),
                (None, '(') => depth += 1,
                (None, ')') => depth -= 1,
                _ => {}
            }
            continue;
        }
        match (quote, ch) {
            (_, '\\') => match chars.next() {
                Some(next) => current.push(next),
                None => current.push('\\'),
            },
            (Some(q), c) if c == q => {
                quote = None;
                current.protect();
            }
            (Some(_), c) => current.push(c),
            (None, '"') | (None, '\'') => {
                quote = Some(ch);
                current.quoted = true;
            }
            (None, ',') => parts.push(std::mem::take(&mut current).finish()),
            (None, '(') => {
                depth += 1;
                current.push(ch);
            }
            (None, ')') => {
                return Err(CommandError::InvalidParameters(format!(
                    "unbalanced ')' in '{source}'"
                )))
            }
            (None, c) if c.is_whitespace() && current.is_blank() => {}
            (None, c) => current.push(c),
        }
    }

    if quote.is_some() {
        return Err(CommandError::InvalidParameters(format!(
            "unclosed quote in '{source}'"
        )));
    }
    if depth > 0 {
        return Err(CommandError::InvalidParameters(format!(
            "unclosed '(' in '{source}'"
        )));
    }
    parts.push(current.finish());
    Ok(parts)
}

#[derive(Default)]
struct Part {
    text: String,
    quoted: bool,
    protected: usize,
}

impl Part {
    fn push(&mut self, ch: char) {
        self.text.push(ch);
    }

    fn is_blank(&self) -> bool {
        self.text.is_empty() && !self.quoted
    }

    fn protect(&mut self) {
        self.protected = self.text.len();
    }

    fn finish(self) -> String {
        let (kept, rest) = self.text.split_at(self.protected);
        format!("{kept}{}", rest.trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_parameters_are_trimmed() {
        assert_eq!(split_parameters("a, b ,c").unwrap(), vec!["a", "b", "c"]);
        assert!(split_parameters("  ").unwrap().is_empty());
    }

    #[test]
    fn test_quoted_commas_do_not_split() {
        assert_eq!(
            split_parameters(r#""a, b", ' c '"#).unwrap(),
            vec!["a, b", " c "]
        );
    }

    #[test]
    fn test_escaped_commas_do_not_split() {
        assert_eq!(split_parameters(r"a\, b, c").unwrap(), vec!["a, b", "c"]);
    }

    #[test]
    fn test_nested_invocations_are_kept_verbatim() {
        assert_eq!(
            split_parameters(r#"www, .nav, !replace("x, y", 2)"#).unwrap(),
            vec!["www", ".nav", r#"!replace("x, y", 2)"#]
        );
    }

    #[test]
    fn test_empty_parameters_are_kept() {
        assert_eq!(split_parameters("a,,b").unwrap(), vec!["a", "", "b"]);
    }

    #[test]
    fn test_unbalanced_input_is_rejected() {
        assert!(split_parameters("\"open").is_err());
        assert!(split_parameters("(a, b").is_err());
        assert!(split_parameters("a)").is_err());
    }
}
