//! Tagged command parser.
//!
//! Scans arbitrary comment text for commands introduced by a tag and parses
//! each into a generic [`Command`] tree through recursive descent:
//!
//! ```text
//! Command   := Identifier Arguments? Body?
//! Arguments := '(' (Identifier (',' Identifier)*)? ')'
//! Body      := '{' Command* '}'
//! ```
//!
//! The tag is an explicit parameter; parsing is a pure function of
//! `(text, tag)`.

pub mod ast;
mod scanner;

use crate::error::ParseError;

use self::ast::{Command, TaggedCommand};
use self::scanner::Scanner;

/// Parses every tagged command out of a comment fragment.
///
/// Text before, between, and after tagged commands is ignored; a tag only
/// matches when preceded by the start of the fragment or whitespace. A
/// fragment without any tag parses to an empty list.
///
/// # Errors
///
/// Returns a [`ParseError`] with a character offset if a matched tag is not
/// followed by a well-formed command.
pub fn parse(text: &str, tag: &str) -> Result<Vec<TaggedCommand>, ParseError> {
    let mut scanner = Scanner::new(text);
    let mut commands = Vec::new();

    while scanner.skip_until_tag(tag) {
        scanner.skip_trivia();
        commands.push(TaggedCommand {
            tag: tag.to_owned(),
            command: parse_command(&mut scanner)?,
        });
    }

    Ok(commands)
}

fn parse_command(scanner: &mut Scanner<'_>) -> Result<Command, ParseError> {
    let name = scanner.expect_identifier("command name")?;
    scanner.skip_trivia();
    let arguments = parse_arguments(scanner)?;
    let body = parse_body(scanner)?;
    Ok(Command {
        name,
        arguments,
        body,
    })
}

fn parse_arguments(scanner: &mut Scanner<'_>) -> Result<Vec<String>, ParseError> {
    if scanner.peek() != Some('(') {
        return Ok(Vec::new());
    }

    scanner.expect_char('(')?;
    scanner.skip_trivia();

    if scanner.peek() == Some(')') {
        scanner.expect_char(')')?;
        scanner.skip_trivia();
        return Ok(Vec::new());
    }

    let mut arguments = Vec::new();

    loop {
        arguments.push(scanner.expect_identifier("argument")?);
        scanner.skip_trivia();

        if scanner.peek() == Some(',') {
            scanner.expect_char(',')?;
            scanner.skip_trivia();
        } else {
            break;
        }
    }

    scanner.expect_char(')')?;
    scanner.skip_trivia();
    Ok(arguments)
}

fn parse_body(scanner: &mut Scanner<'_>) -> Result<Vec<Command>, ParseError> {
    if scanner.peek() != Some('{') {
        return Ok(Vec::new());
    }

    scanner.expect_char('{')?;
    scanner.skip_trivia();

    let mut commands = Vec::new();

    while scanner.peek() != Some('}') {
        if scanner.peek().is_none() {
            return Err(ParseError::CharacterMismatch {
                expected: '}',
                found: None,
                offset: scanner.offset(),
            });
        }
        commands.push(parse_command(scanner)?);
    }

    scanner.expect_char('}')?;
    scanner.skip_trivia();
    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAG: &str = "wiring:";

    fn parse_one(text: &str) -> Command {
        let mut commands = parse(text, TAG).expect("should parse");
        assert_eq!(commands.len(), 1, "expected exactly one tagged command");
        commands.remove(0).command
    }

    #[test]
    fn untagged_text_parses_to_nothing() {
        let commands = parse("an ordinary doc comment", TAG).expect("should parse");
        assert!(commands.is_empty());
    }

    #[test]
    fn bare_command_has_no_arguments_or_body() {
        let command = parse_one("wiring: inject");
        assert_eq!(command.name, "inject");
        assert!(command.arguments.is_empty());
        assert!(command.body.is_empty());
    }

    #[test]
    fn command_with_single_argument() {
        let command = parse_one("wiring: container(AppContainer)");
        assert_eq!(command.name, "container");
        assert_eq!(command.arguments, vec!["AppContainer"]);
    }

    #[test]
    fn command_with_multiple_arguments() {
        let command = parse_one("wiring: bind(PrintLogger, Logger)");
        assert_eq!(command.arguments, vec!["PrintLogger", "Logger"]);
    }

    #[test]
    fn empty_argument_list_is_allowed() {
        let command = parse_one("wiring: inject()");
        assert!(command.arguments.is_empty());
    }

    #[test]
    fn command_with_body_of_commands() {
        let command = parse_one(
            "wiring: container(AppContainer) {
                bind(PrintLogger, Logger)
                singleton(SessionManager)
            }",
        );
        assert_eq!(command.body.len(), 2);
        assert_eq!(command.body[0].name, "bind");
        assert_eq!(command.body[1].name, "singleton");
    }

    #[test]
    fn nested_bodies_parse() {
        let command = parse_one(
            "wiring: container(AppContainer) {
                bind(PrintLogger, Logger) {
                    name(primary)
                    access(public)
                }
            }",
        );
        let bind = &command.body[0];
        assert_eq!(bind.body.len(), 2);
        assert_eq!(bind.body[0].name, "name");
        assert_eq!(bind.body[0].arguments, vec!["primary"]);
        assert_eq!(bind.body[1].arguments, vec!["public"]);
    }

    #[test]
    fn whitespace_and_comments_between_tokens_are_skipped() {
        let command = parse_one(
            "wiring: container ( AppContainer ) // trailing note
            {
                // a comment on its own line
                instance ( PrintLogger ) // another
            }",
        );
        assert_eq!(command.arguments, vec!["AppContainer"]);
        assert_eq!(command.body.len(), 1);
        assert_eq!(command.body[0].name, "instance");
    }

    #[test]
    fn surrounding_prose_is_ignored() {
        let command = parse_one(
            "This view model drives the login screen.\n wiring: inject \n More prose after.",
        );
        assert_eq!(command.name, "inject");
    }

    #[test]
    fn multiple_tagged_commands_all_parse() {
        let commands = parse("wiring: inject\nwiring: dependency", TAG).expect("should parse");
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].command.name, "inject");
        assert_eq!(commands[1].command.name, "dependency");
    }

    #[test]
    fn partial_token_does_not_start_a_command() {
        let commands = parse("see rewiring: inject", TAG).expect("should parse");
        assert!(commands.is_empty());
    }

    #[test]
    fn custom_tag_is_honoured() {
        let commands = parse("di: inject", "di:").expect("should parse");
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].tag, "di:");
    }

    #[test]
    fn missing_command_name_after_tag_fails() {
        let err = parse("wiring: (", TAG).unwrap_err();
        assert!(matches!(
            err,
            ParseError::IdentifierExpected {
                description: "command name",
                ..
            }
        ));
    }

    #[test]
    fn unclosed_argument_list_fails() {
        let err = parse("wiring: container(App", TAG).unwrap_err();
        assert_eq!(
            err,
            ParseError::CharacterMismatch {
                expected: ')',
                found: None,
                offset: 21,
            }
        );
    }

    #[test]
    fn unclosed_body_fails() {
        let err = parse("wiring: container(App) { bind(A, B)", TAG).unwrap_err();
        assert!(matches!(
            err,
            ParseError::CharacterMismatch { expected: '}', .. }
        ));
    }

    #[test]
    fn missing_argument_after_comma_fails() {
        let err = parse("wiring: bind(A, )", TAG).unwrap_err();
        assert!(matches!(
            err,
            ParseError::IdentifierExpected {
                description: "argument",
                ..
            }
        ));
    }
}
