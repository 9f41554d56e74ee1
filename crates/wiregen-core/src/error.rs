//! Error types for the command parser and the resolution engine.
//!
//! Errors are layered the way the pipeline is: [`ParseError`] carries a
//! character offset into one comment fragment, [`CommandError`] covers the
//! semantic command checks, and [`WiringErrorKind`] the collection and
//! resolution checks. [`WiringError`] is the top-level type and attaches the
//! source location of the offending declaration wherever one exists.

use thiserror::Error;
use wiregen_common::types::{
    BindingName, ClassOrFunctionName, ContainerName, DependencyIdentifier, SourceLocation,
};

/// Syntax error in raw command text.
///
/// Offsets are counted in characters from the start of the comment fragment
/// handed to the parser, not from the start of the source file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A specific character was required and something else was found.
    #[error("expected '{expected}', found {} at offset {offset}", found_description(.found))]
    CharacterMismatch {
        /// Character the grammar required.
        expected: char,
        /// Character actually present, or `None` at end of input.
        found: Option<char>,
        /// Character offset of the mismatch.
        offset: usize,
    },

    /// An identifier was required and none starts at this position.
    #[error("{description} expected at offset {offset}")]
    IdentifierExpected {
        /// What the identifier would have been (command name, argument).
        description: &'static str,
        /// Character offset where the identifier was expected.
        offset: usize,
    },
}

fn found_description(found: &Option<char>) -> String {
    found.map_or_else(|| "end of input".to_owned(), |c| format!("'{c}'"))
}

/// Semantic error while interpreting a parsed command tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The comment text itself failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// More than one tagged command appeared in a single comment block.
    #[error("multiple wiring commands in one comment block")]
    MultipleCommands,

    /// The command name is not part of the wiring command set.
    #[error("unrecognized command: `{0}`")]
    UnrecognizedCommand(String),

    /// The argument count falls outside the command's allowed range.
    #[error("command `{command}` expects {} argument(s), got {found}", range_description(.min, .max))]
    InvalidArgumentCount {
        /// Command being verified.
        command: &'static str,
        /// Minimum allowed argument count.
        min: usize,
        /// Maximum allowed argument count.
        max: usize,
        /// Argument count actually supplied.
        found: usize,
    },

    /// A body was supplied to a command that takes none.
    #[error("command `{command}` does not take a body")]
    UnexpectedBody {
        /// Command being verified.
        command: &'static str,
    },

    /// A command that requires a body was given none.
    #[error("command `{command}` requires a body")]
    MissingBody {
        /// Command being verified.
        command: &'static str,
    },

    /// The argument of an `access(...)` command is not a known level.
    #[error("unknown access level: `{0}`")]
    UnknownAccessLevel(String),

    /// The same modifier appeared twice in one command body.
    #[error("modifier `{modifier}` given more than once for command `{command}`")]
    DuplicateModifier {
        /// Command whose body holds the repeated modifier.
        command: &'static str,
        /// The repeated modifier.
        modifier: &'static str,
    },
}

fn range_description(min: &usize, max: &usize) -> String {
    if min == max {
        min.to_string()
    } else {
        format!("{min} to {max}")
    }
}

/// Collection and resolution errors, reported together with the source
/// location of the declaration that caused them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WiringErrorKind {
    /// A wiring comment failed command parsing or verification.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// A container declares no bindings at all.
    #[error("container declares no bindings")]
    MissingBindings,

    /// Two bindings in one container share a dependency identifier.
    #[error("multiple bindings found for {identifier}")]
    DuplicateBinding {
        /// The identifier declared twice.
        identifier: DependencyIdentifier,
    },

    /// A container body holds more than one `access(...)` command.
    #[error("container access level given more than once")]
    DuplicateAccessCommand,

    /// Two injectables share the same (binding, name) pair.
    #[error("injectable `{existing}` already registered under binding `{binding}`")]
    DuplicateInjectable {
        /// Binding under which the clash occurred.
        binding: BindingName,
        /// The injectable registered first.
        existing: ClassOrFunctionName,
    },

    /// Two containers share a name.
    #[error("container `{name}` already exists")]
    DuplicateContainer {
        /// The duplicated container name.
        name: ContainerName,
    },

    /// A declared dependency matches no known injectable.
    #[error("no injectable `{class_or_function}` found for binding `{binding}`")]
    MissingInjectable {
        /// Declared class or function name.
        class_or_function: ClassOrFunctionName,
        /// Declared binding name.
        binding: BindingName,
    },

    /// A singleton's injectable takes plain parameters and cannot be cached.
    #[error("singleton `{name}` cannot have parameters")]
    SingletonWithParameters {
        /// The offending injectable.
        name: ClassOrFunctionName,
    },

    /// An internal edge points into an injectable with plain parameters.
    #[error("`{name}` requires parameters and cannot be an internal dependency")]
    DependsOnParameterizedInjectable {
        /// The parameterized injectable being depended upon.
        name: ClassOrFunctionName,
    },

    /// The internal dependency graph contains a cycle.
    #[error("dependency cycle detected: {path}")]
    DependencyCycle {
        /// The offending path, first and last element equal.
        path: String,
    },

    /// Two distinct identifiers map to the same generated name.
    #[error("multiple generated items named `{name}`")]
    MultipleItemsNamed {
        /// The colliding generated name.
        name: String,
    },
}

impl WiringErrorKind {
    /// Attaches a source location, producing the top-level error.
    #[must_use]
    pub fn at(self, location: SourceLocation) -> WiringError {
        WiringError::Input {
            location,
            kind: self,
        }
    }
}

/// Top-level error type of the resolution pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WiringError {
    /// An error tied to a specific declaration.
    #[error("{location}: {kind}")]
    Input {
        /// Location of the offending declaration.
        location: SourceLocation,
        /// What went wrong.
        kind: WiringErrorKind,
    },

    /// The resolver was given no input sources at all.
    #[error("no input sources provided")]
    MissingSources,

    /// The input sources declare no container.
    #[error("no container declarations found")]
    MissingContainers,
}

impl WiringError {
    /// Returns the error kind when the error is tied to a declaration.
    #[must_use]
    pub fn kind(&self) -> Option<&WiringErrorKind> {
        match self {
            Self::Input { kind, .. } => Some(kind),
            Self::MissingSources | Self::MissingContainers => None,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WiringError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_mismatch_reports_end_of_input() {
        let err = ParseError::CharacterMismatch {
            expected: ')',
            found: None,
            offset: 14,
        };
        assert_eq!(err.to_string(), "expected ')', found end of input at offset 14");
    }

    #[test]
    fn argument_count_reports_range() {
        let err = CommandError::InvalidArgumentCount {
            command: "dependency",
            min: 0,
            max: 1,
            found: 3,
        };
        assert_eq!(
            err.to_string(),
            "command `dependency` expects 0 to 1 argument(s), got 3"
        );
    }

    #[test]
    fn located_error_prefixes_location() {
        let err = WiringErrorKind::MissingBindings
            .at(SourceLocation::new("App.wire", 3, 1));
        assert_eq!(err.to_string(), "App.wire:3:1: container declares no bindings");
    }
}
