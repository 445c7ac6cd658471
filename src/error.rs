//! Error types returned by [`crate::render`] and friends.

use thiserror::Error;

/// Everything that can make a `render` call fail.
///
/// Unknown tokens, unknown arrow styles and unparseable lines are never
/// errors — they are silently skipped so forward-compatible input still
/// renders. Only the cases below abort the call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    /// The source string, after comment stripping, was empty.
    #[error("empty mermaid source")]
    EmptySource,

    /// The sequence engine was selected but the first meaningful line is
    /// not `sequenceDiagram`.
    #[error("expected \"sequenceDiagram\" as the first line")]
    MissingSequenceKeyword,

    /// A sequence diagram declared zero participants and defined zero
    /// messages (so no participant could be inferred either).
    #[error("sequence diagram has no participants")]
    NoParticipants,

    /// An `end` was found with no matching `subgraph` on the stack.
    #[error("unmatched \"end\" with no open subgraph")]
    MalformedSubgraph,

    /// `renderGraph`/`renderSequenceDiagram` was called with source that
    /// parses as the other diagram family.
    #[error("source is a {found} diagram, not the {expected} diagram this function renders")]
    WrongDiagramType {
        expected: &'static str,
        found: &'static str,
    },
}
