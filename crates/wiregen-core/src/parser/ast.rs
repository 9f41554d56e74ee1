//! Generic parse tree for tagged wiring commands.
//!
//! The parser knows nothing about the wiring command set; it produces this
//! generic `{name, arguments, body}` tree and leaves interpretation to the
//! command resolver.

/// A single parsed command node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Command name.
    pub name: String,
    /// Ordered argument identifiers.
    pub arguments: Vec<String>,
    /// Ordered nested commands; empty when no body was given.
    pub body: Vec<Command>,
}

/// A command together with the tag that introduced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedCommand {
    /// The tag that matched, verbatim.
    pub tag: String,
    /// The parsed command.
    pub command: Command,
}
