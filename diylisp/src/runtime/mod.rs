//! DIY Lisp Runtime System
//!
//! The evaluator, its environment model and the runtime value system. Parsing lives in
//! [`crate::parser`]; driving whole programs lives in [`crate::interpreter`].

pub mod environment;
pub mod error;
pub mod evaluator;
pub mod special_forms;
pub mod stack;
pub mod values;

pub use environment::Environment;
pub use error::{RuntimeError, RuntimeResult};
pub use evaluator::{evaluate, Evaluator, DEFAULT_MAX_RECURSION_DEPTH};
pub use special_forms::{Keyword, Operator, SpecialForm};
pub use values::{Closure, List, Value};
