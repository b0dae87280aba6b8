//! Program driver: owns the top-level environment and runs source text through the
//! parser and evaluator.

use crate::ast::Node;
use crate::config::InterpreterConfig;
use crate::input_handling::{read_input_content, InputConfig, InputError};
use crate::parser::{parse_multiple, ParseError};
use crate::runtime::{Environment, Evaluator, RuntimeError, RuntimeResult, Value};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// The built-in prelude, evaluated into every new interpreter unless disabled.
pub const PRELUDE: &str = include_str!("prelude.diy");

#[derive(Error, Debug)]
pub enum InterpreterError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Failed to load prelude from {source_name}: {message}")]
    Prelude { source_name: String, message: String },
}

pub struct Interpreter {
    env: Environment,
    evaluator: Evaluator,
    config: InterpreterConfig,
}

impl Interpreter {
    /// Creates an interpreter with a fresh top-level environment, loading the prelude if the
    /// configuration asks for it.
    pub fn new(config: InterpreterConfig) -> Result<Self, InterpreterError> {
        let interpreter = Interpreter {
            env: Environment::new(),
            evaluator: Evaluator::with_max_recursion_depth(config.max_recursion_depth),
            config,
        };
        if interpreter.config.load_prelude {
            interpreter.load_prelude()?;
        } else {
            warn!("prelude disabled; only the core special forms are available");
        }
        Ok(interpreter)
    }

    /// An interpreter with no prelude and default limits.
    pub fn bare() -> Self {
        Interpreter {
            env: Environment::new(),
            evaluator: Evaluator::new(),
            config: InterpreterConfig {
                load_prelude: false,
                ..InterpreterConfig::default()
            },
        }
    }

    fn load_prelude(&self) -> Result<(), InterpreterError> {
        let (source_name, source) = match &self.config.prelude_path {
            Some(path) => {
                let content = read_input_content(&InputConfig::from_file(path.clone()))?;
                (content.source_name, content.content)
            }
            None => ("<built-in prelude>".to_string(), PRELUDE.to_string()),
        };
        debug!(source = %source_name, "loading prelude");

        let nodes = parse_multiple(&source).map_err(|e| InterpreterError::Prelude {
            source_name: source_name.clone(),
            message: e.to_string(),
        })?;
        for node in &nodes {
            self.evaluate(node).map_err(|e| InterpreterError::Prelude {
                source_name: source_name.clone(),
                message: e.to_string(),
            })?;
        }
        debug!(definitions = nodes.len(), "prelude loaded");
        Ok(())
    }

    /// Parses `source` and evaluates every top-level form in order, returning the value of
    /// the last one. The first failure stops the program.
    pub fn interpret(&self, source: &str) -> Result<Value, InterpreterError> {
        let nodes = parse_multiple(source)?;
        let mut result = None;
        for node in &nodes {
            result = Some(self.evaluate(node)?);
        }
        result.ok_or(InterpreterError::Parse(ParseError::Empty))
    }

    pub fn interpret_file(&self, path: &Path) -> Result<Value, InterpreterError> {
        let content = read_input_content(&InputConfig::from_file(path.to_path_buf()))?;
        debug!(source = %content.source_name, "interpreting file");
        self.interpret(&content.content)
    }

    /// Evaluates one node in the top-level environment.
    pub fn evaluate(&self, node: &Node) -> RuntimeResult<Value> {
        self.evaluator.evaluate(node, &self.env)
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }
}
