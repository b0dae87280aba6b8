use super::Rule;
use pest::error::{Error as PestError, LineColLocation};
use thiserror::Error;

/// Errors raised while reading source text into AST nodes
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Invalid integer literal '{text}': {reason}")]
    InvalidInteger { text: String, reason: String },

    #[error("Unexpected rule {rule:?} while building the AST")]
    UnexpectedRule { rule: String },

    #[error("Empty input: expected an expression")]
    Empty,

    #[error("Expected a single expression, found {extra} more after it")]
    TrailingInput { extra: usize },
}

impl From<PestError<Rule>> for ParseError {
    fn from(err: PestError<Rule>) -> Self {
        let (line, column) = match err.line_col {
            LineColLocation::Pos(pos) => pos,
            LineColLocation::Span(start, _) => start,
        };
        ParseError::Syntax {
            line,
            column,
            message: err.variant.message().to_string(),
        }
    }
}
