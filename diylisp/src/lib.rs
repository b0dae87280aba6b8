// DIY Lisp Library
// Reader, evaluator and interpreter driver for a small Lisp
pub mod ast;
pub mod config;
pub mod input_handling;
pub mod interpreter;
pub mod parser;
pub mod runtime;

// Re-export the main parsing functions, the AST and the runtime entry points.
pub use ast::{Node, Symbol};
pub use config::{ConfigError, InterpreterConfig};
pub use interpreter::{Interpreter, InterpreterError};
pub use parser::{parse, parse_multiple, ParseError};
pub use runtime::{evaluate, Environment, Evaluator, RuntimeError, RuntimeResult, Value};
