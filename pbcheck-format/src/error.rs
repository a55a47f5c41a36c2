use thiserror::Error;

/// Errors produced while tokenising an OPB model or a VeriPB proof line.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("line {line}: malformed OPB constraint: {text}")]
    MalformedConstraint { line: usize, text: String },

    #[error("line {line}: unrecognised proof step kind {kind:?}")]
    UnknownStepKind { line: usize, kind: char },

    #[error("line {line}: malformed polish expression: {text}")]
    MalformedPolish { line: usize, text: String },

    #[error("line {line}: expected an integer, found {text:?}")]
    ExpectedInteger { line: usize, text: String },

    #[error("line {line}: expected a literal token, found {text:?}")]
    ExpectedLiteral { line: usize, text: String },

    #[error("line {line}: unexpected end of input")]
    UnexpectedEof { line: usize },
}
