use super::{
    parse_result::{ParseResult, RawCommand},
    parsers::{CommandParser, ImportParser, OptionParser, Parse, SectionParser, VariableParser},
    reader::LineReader,
    token::Line,
};

/// Builds the declarations of a configuration from its lines.
///
/// Never fails: a line no parser accepts, or one a parser rejects, is kept as
/// a malformed command so the rest of the configuration still works.
pub fn analyze(lines: &[Line]) -> ParseResult {
    let mut r = LineReader::new(lines.to_vec());
    let mut result = ParseResult::default();

    let parsers: Vec<Box<dyn Parse>> = vec![
        Box::new(SectionParser),
        Box::new(OptionParser),
        Box::new(VariableParser),
        Box::new(ImportParser),
        Box::new(CommandParser),
    ];

    while !r.is_end() {
        r.skip_ignorable();
        let Some(line) = r.cur().cloned() else {
            break;
        };

        let outcome = match parsers.iter().find(|parser| parser.can_parse(&r)) {
            Some(parser) => parser.parse(&mut r, &mut result),
            None => Err(r.create_error(format!("Unexpected line '{}'", line.text))),
        };
        if let Err(e) = outcome {
            tracing::debug!("{e}");
            result
                .commands
                .push(RawCommand::malformed(line.number, r.scope(), e));
        }
        r.advance();
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CommandError;
    use crate::syntax::{parse_result::RawCommandBody, tokenize::tokenize};

    #[test]
    fn test_empty_source() {
        assert_eq!(analyze(&tokenize("")), ParseResult::default());
    }

    #[test]
    fn test_options_accumulate_in_order() {
        let result = analyze(&tokenize(
            "@include[] = a\n@exclude = c\n@include[] = b\n@template",
        ));
        assert_eq!(result.options["include"], vec!["a", "b"]);
        assert_eq!(result.options["exclude"], vec!["c"]);
        assert!(result.options["template"].is_empty());
        assert_eq!(
            result.options.keys().collect::<Vec<_>>(),
            vec!["include", "exclude", "template"]
        );
    }

    #[test]
    fn test_variables_carry_scope_and_description() {
        let result = analyze(&tokenize(
            "$x = 1\n[Section]\n[Section.Sub]\n$y = 2 // Set y",
        ));
        assert_eq!(result.variables.len(), 2);
        assert_eq!(result.variables[0].scope, "");
        assert_eq!(result.variables[1].name, "y");
        assert_eq!(result.variables[1].value, "2");
        assert_eq!(result.variables[1].description, "Set y");
        assert_eq!(result.variables[1].scope, "Section.Sub");
        assert_eq!(result.variables[1].line, 4);
    }

    #[test]
    fn test_imports_are_deduplicated() {
        let result = analyze(&tokenize("+A\n+B\n+A"));
        assert_eq!(result.imports, vec!["A", "B"]);
        assert_eq!(result.import_lines, vec![1, 2]);
    }

    #[test]
    fn test_commands_are_kept_raw() {
        let result = analyze(&tokenize("[S]\n!replace($x) = $z\na = b"));
        assert_eq!(
            result.commands,
            vec![
                RawCommand::invocation(2, "S", "!replace($x)", "$z"),
                RawCommand::invocation(3, "S", "a", "b"),
            ]
        );
    }

    #[test]
    fn test_malformed_lines_do_not_stop_parsing() {
        let result = analyze(&tokenize("garbage\n$1bad = x\na = b"));
        assert_eq!(result.commands.len(), 3);
        assert!(matches!(
            result.commands[0].body,
            RawCommandBody::Malformed(CommandError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            result.commands[1].body,
            RawCommandBody::Malformed(CommandError::Parse { line: 2, .. })
        ));
        assert_eq!(result.commands[2], RawCommand::invocation(3, "", "a", "b"));
    }
}
