// Error handling for the DIY Lisp runtime

use crate::ast::Symbol;
use thiserror::Error;

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Runtime errors. Every variant aborts the evaluation in progress.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// No binding for the symbol anywhere in the scope chain
    #[error("Unbound symbol: {0}")]
    UnboundSymbol(Symbol),

    /// `define` of a name already bound in the current frame
    #[error("Duplicate definition: {0} is already defined in this scope")]
    DuplicateDefinition(Symbol),

    /// Wrong number of operands to a special form or arguments to a closure
    #[error("Arity mismatch in {form}: expected {expected}, got {actual}")]
    ArityMismatch {
        form: String,
        expected: usize,
        actual: usize,
    },

    #[error("Illegal definition target: {0}")]
    IllegalDefinitionTarget(String),

    #[error("Type error in {operation}: expected {expected}, got {actual}")]
    TypeError {
        expected: String,
        actual: String,
        operation: String,
    },

    #[error("Empty list: {operation} requires a non-empty list")]
    EmptyList { operation: String },

    #[error("Not callable: {0}")]
    NotCallable(String),

    #[error("Malformed {form}: {reason}")]
    MalformedForm { form: String, reason: String },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Integer overflow in {operation}")]
    IntegerOverflow { operation: String },

    #[error("Stack overflow: recursion depth exceeded {depth}")]
    StackOverflow { depth: usize },
}

impl RuntimeError {
    pub fn arity(form: &str, expected: usize, actual: usize) -> Self {
        RuntimeError::ArityMismatch {
            form: form.to_string(),
            expected,
            actual,
        }
    }

    pub fn type_error(operation: &str, expected: &str, actual: &str) -> Self {
        RuntimeError::TypeError {
            expected: expected.to_string(),
            actual: actual.to_string(),
            operation: operation.to_string(),
        }
    }

    /// The failure raised when a math operator sees a non-integer operand.
    pub fn operator_requires_integers(operator: &str, actual: &str) -> Self {
        RuntimeError::TypeError {
            expected: "integers".to_string(),
            actual: actual.to_string(),
            operation: format!("{} (operator requires integers)", operator),
        }
    }

    pub fn empty_list(operation: &str) -> Self {
        RuntimeError::EmptyList {
            operation: operation.to_string(),
        }
    }

    pub fn malformed(form: &str, reason: impl Into<String>) -> Self {
        RuntimeError::MalformedForm {
            form: form.to_string(),
            reason: reason.into(),
        }
    }
}
