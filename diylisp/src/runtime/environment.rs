// Environment for variable bindings and scope management

use crate::ast::Symbol;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::values::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A lexical scope: one frame of bindings plus an optional parent scope.
///
/// Cloning an `Environment` clones the handle, not the frame. Closures keep such a handle to
/// the scope they were created in, so a later `define` in that frame (for example the
/// closure's own name) is visible when the closure runs.
#[derive(Clone)]
pub struct Environment {
    frame: Rc<Frame>,
}

struct Frame {
    bindings: RefCell<HashMap<Symbol, Value>>,
    parent: Option<Environment>,
}

impl Environment {
    /// Creates a new, empty root environment.
    pub fn new() -> Self {
        Environment {
            frame: Rc::new(Frame {
                bindings: RefCell::new(HashMap::new()),
                parent: None,
            }),
        }
    }

    /// Looks up a symbol by searching the current frame and then its parents.
    pub fn lookup(&self, name: &Symbol) -> RuntimeResult<Value> {
        let mut env = self;
        loop {
            if let Some(value) = env.frame.bindings.borrow().get(name) {
                return Ok(value.clone());
            }
            match &env.frame.parent {
                Some(parent) => env = parent,
                None => return Err(RuntimeError::UnboundSymbol(name.clone())),
            }
        }
    }

    /// Binds `name` in the current frame. Ancestor frames are never touched, so shadowing
    /// a parent's binding is allowed while rebinding within one frame is not.
    pub fn define(&self, name: Symbol, value: Value) -> RuntimeResult<()> {
        let mut bindings = self.frame.bindings.borrow_mut();
        if bindings.contains_key(&name) {
            return Err(RuntimeError::DuplicateDefinition(name));
        }
        bindings.insert(name, value);
        Ok(())
    }

    /// Creates a child frame holding `bindings`, parented by this environment.
    pub fn extend<I>(&self, bindings: I) -> Environment
    where
        I: IntoIterator<Item = (Symbol, Value)>,
    {
        Environment {
            frame: Rc::new(Frame {
                bindings: RefCell::new(bindings.into_iter().collect()),
                parent: Some(self.clone()),
            }),
        }
    }

    /// Check if a symbol is defined in this frame (not parent frames)
    pub fn contains(&self, name: &Symbol) -> bool {
        self.frame.bindings.borrow().contains_key(name)
    }

    pub fn parent(&self) -> Option<&Environment> {
        self.frame.parent.as_ref()
    }

    /// Number of frames from this one up to the root, inclusive.
    pub fn depth(&self) -> usize {
        1 + self.parent().map_or(0, Environment::depth)
    }

    /// Every visible name, sorted and deduplicated.
    pub fn symbol_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .frame
            .bindings
            .borrow()
            .keys()
            .map(|s| s.0.clone())
            .collect();
        if let Some(parent) = self.parent() {
            names.extend(parent.symbol_names());
        }
        names.sort();
        names.dedup();
        names
    }

    /// True if both handles point at the same frame.
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.frame, &other.frame)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<String> = self
            .frame
            .bindings
            .borrow()
            .keys()
            .map(|s| s.0.clone())
            .collect();
        names.sort();
        f.debug_struct("Environment")
            .field("bindings", &names)
            .field("depth", &self.depth())
            .finish()
    }
}
