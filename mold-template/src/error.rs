use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unterminated tag <{tag}")]
    UnterminatedTag { tag: String },
    #[error("unterminated comment")]
    UnterminatedComment,
    #[error("closing tag </{found}> has no open element")]
    UnexpectedClose { found: String },
    #[error("closing tag </{found}> does not match open <{expected}>")]
    MismatchedClose { expected: String, found: String },
    #[error("element <{tag}> is never closed")]
    Unclosed { tag: String },
}

/// Markup the parser could not turn into a forest. `offset` is a byte index
/// into the source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (at byte {offset})")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("failed to parse template: {0}")]
    Parse(#[from] ParseError),
    #[error("template was already materialized; create() may only be called once")]
    AlreadyCreated,
}
