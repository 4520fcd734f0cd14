use super::token::{Line, LineType};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LINE_BREAK: Regex = Regex::new(r"\r\n|\r|\n").unwrap();
    static ref LINE_PATTERNS: Vec<(Regex, LineType)> = vec![
        (Regex::new(r"^$").unwrap(), LineType::Blank),
        (Regex::new(r"^[#;]").unwrap(), LineType::Comment),
        (Regex::new(r"^\[[^\]]*\]$").unwrap(), LineType::Section),
        (Regex::new(r"^@").unwrap(), LineType::Option),
        (Regex::new(r"^\$").unwrap(), LineType::Variable),
        (Regex::new(r"^\+").unwrap(), LineType::Import),
        (Regex::new(r"^!").unwrap(), LineType::Command),
        (Regex::new(r"=").unwrap(), LineType::Assignment),
    ];
    static ref REGEX_KEY: Regex = Regex::new(r"^!/.+/[gimsu]*$").unwrap();
}

/// Splits a configuration into classified lines. Any of `\r\n`, `\r` and
/// `\n` ends a line.
pub fn tokenize(input: &str) -> Vec<Line> {
    LINE_BREAK
        .split(input)
        .enumerate()
        .map(|(index, raw)| {
            let text = raw.trim();
            let line_type = LINE_PATTERNS
                .iter()
                .find(|(pattern, _)| pattern.is_match(text))
                .map_or(LineType::Text, |(_, line_type)| *line_type);
            Line {
                line_type,
                number: index + 1,
                text: text.to_string(),
            }
        })
        .collect()
}

/// Splits `key = value` at the first `=` that belongs to neither the key's
/// parameter list nor its regex literal. `\=` in the key is a literal `=`.
pub fn split_assignment(text: &str) -> (String, Option<String>) {
    if text.starts_with("!/") {
        for (i, _) in text.match_indices('=') {
            let key = text[..i].trim();
            if REGEX_KEY.is_match(key) {
                return (key.to_string(), Some(text[i + 1..].trim().to_string()));
            }
        }
    }

    let command = text.starts_with('!');
    let mut key = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = text.char_indices();

    while let Some((i, ch)) = chars.next() {
        match (quote, ch) {
            (_, '\\') => match chars.next() {
                Some((_, '=')) if quote.is_none() && depth == 0 => key.push('='),
                Some((_, next)) => {
                    key.push('\\');
                    key.push(next);
                }
                None => key.push('\\'),
            },
            (Some(q), c) if c == q => {
                quote = None;
                key.push(c);
            }
            (None, '"') | (None, '\'') if depth > 0 => {
                quote = Some(ch);
                key.push(ch);
            }
            (None, '(') if command => {
                depth += 1;
                key.push(ch);
            }
            (None, ')') if command => {
                depth = depth.saturating_sub(1);
                key.push(ch);
            }
            (None, '=') if depth == 0 => {
                return (key.trim().to_string(), Some(text[i + 1..].trim().to_string()));
            }
            (_, c) => key.push(c),
        }
    }
    (key.trim().to_string(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types(input: &str) -> Vec<LineType> {
        tokenize(input).into_iter().map(|l| l.line_type).collect()
    }

    #[test]
    fn test_classifies_every_line_kind() {
        assert_eq!(
            types("[Section]\n@include = a\n$x = 1\n+Other\n!hide(a)\na = b\n# note\n; note\n\nwords"),
            vec![
                LineType::Section,
                LineType::Option,
                LineType::Variable,
                LineType::Import,
                LineType::Command,
                LineType::Assignment,
                LineType::Comment,
                LineType::Comment,
                LineType::Blank,
                LineType::Text,
            ]
        );
    }

    #[test]
    fn test_all_line_breaks_split() {
        let lines = tokenize("a = b\rc = d\r\ne = f\ng = h");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3].number, 4);
        assert_eq!(lines[1].text, "c = d");
    }

    #[test]
    fn test_split_plain_assignment() {
        assert_eq!(
            split_assignment("hello = world = again"),
            ("hello".to_string(), Some("world = again".to_string()))
        );
        assert_eq!(split_assignment("x\\=y = z"), ("x=y".to_string(), Some("z".to_string())));
        assert_eq!(split_assignment("don't = do not").1.as_deref(), Some("do not"));
    }

    #[test]
    fn test_split_command_assignment() {
        assert_eq!(
            split_assignment("!replace(\"a=b\", x) = c"),
            ("!replace(\"a=b\", x)".to_string(), Some("c".to_string()))
        );
        assert_eq!(split_assignment("!blockUrl(ads)"), ("!blockUrl(ads)".to_string(), None));
    }

    #[test]
    fn test_split_regex_assignment() {
        assert_eq!(
            split_assignment("!/a=(\\d+)/gi = b$1"),
            ("!/a=(\\d+)/gi".to_string(), Some("b$1".to_string()))
        );
    }
}
