// Runtime value system for DIY Lisp
// Represents values during execution (different from the AST, which represents parsed code)

use crate::ast::{Node, Symbol};
use crate::runtime::environment::Environment;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use im::Vector;
use std::fmt;
use std::rc::Rc;

/// Persistent list storage. Cloning, `cons` and `tail` share structure with the source.
pub type List = Vector<Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Symbol(Symbol),
    List(List),
    Closure(Rc<Closure>),
}

/// An unapplied function: the scope it was created in, its parameters and its body.
pub struct Closure {
    pub env: Environment,
    pub params: Vec<Symbol>,
    pub body: Node,
}

impl Closure {
    pub fn new(env: Environment, params: Vec<Symbol>, body: Node) -> Self {
        Closure { env, params, body }
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Fails with an arity mismatch unless exactly `actual` arguments were supplied.
    pub fn check_arity(&self, actual: usize) -> RuntimeResult<()> {
        if actual == self.arity() {
            return Ok(());
        }
        Err(RuntimeError::arity(
            &format!("<closure/{}>", self.arity()),
            self.arity(),
            actual,
        ))
    }
}

// The captured environment usually contains the closure itself, so it is left out.
impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("params", &self.params)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

// Closures compare by identity.
impl PartialEq for Closure {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Value {
    pub fn symbol(name: &str) -> Self {
        Value::Symbol(Symbol::new(name))
    }

    pub fn list<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::List(items.into_iter().collect())
    }

    pub fn empty_list() -> Self {
        Value::List(Vector::new())
    }

    pub fn closure(closure: Closure) -> Self {
        Value::Closure(Rc::new(closure))
    }

    /// Booleans, integers, symbols and the empty list.
    pub fn is_atom(&self) -> bool {
        match self {
            Value::Boolean(_) | Value::Integer(_) | Value::Symbol(_) => true,
            Value::List(items) => items.is_empty(),
            Value::Closure(_) => false,
        }
    }

    /// `#f`, `0` and `()` are false; everything else is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Boolean(b) => *b,
            Value::Integer(n) => *n != 0,
            Value::List(items) => !items.is_empty(),
            Value::Symbol(_) | Value::Closure(_) => true,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_closure(&self) -> Option<&Rc<Closure>> {
        match self {
            Value::Closure(c) => Some(c),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Symbol(_) => "symbol",
            Value::List(_) => "list",
            Value::Closure(_) => "closure",
        }
    }
}

impl From<&Node> for Value {
    fn from(node: &Node) -> Self {
        match node {
            Node::Boolean(b) => Value::Boolean(*b),
            Node::Integer(n) => Value::Integer(*n),
            Node::Symbol(s) => Value::Symbol(s.clone()),
            Node::List(items) => Value::List(items.iter().map(Value::from).collect()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(true) => write!(f, "#t"),
            Value::Boolean(false) => write!(f, "#f"),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Symbol(s) => write!(f, "{}", s),
            Value::List(items) => {
                if items.len() == 2 {
                    if let Some(Value::Symbol(head)) = items.front() {
                        if head.as_str() == "quote" {
                            return write!(f, "'{}", items[1]);
                        }
                    }
                }
                let items: Vec<String> = items.iter().map(|item| item.to_string()).collect();
                write!(f, "({})", items.join(" "))
            }
            Value::Closure(c) => write!(f, "<closure/{}>", c.arity()),
        }
    }
}
