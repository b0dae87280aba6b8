// Abstract syntax for DIY Lisp
// Nodes are produced by the parser and consumed read-only by the evaluator

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, PartialEq, Clone, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(pub String);

impl Symbol {
    pub fn new(s: &str) -> Self {
        Symbol(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::new(s)
    }
}

/// A parsed program node. Lists keep their elements in source order.
#[derive(Debug, PartialEq, Clone, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Node {
    Boolean(bool),
    Integer(i64),
    Symbol(Symbol),
    List(Vec<Node>),
}

impl Node {
    pub fn symbol(name: &str) -> Self {
        Node::Symbol(Symbol::new(name))
    }

    pub fn list(items: Vec<Node>) -> Self {
        Node::List(items)
    }

    /// `(quote node)`
    pub fn quoted(node: Node) -> Self {
        Node::List(vec![Node::symbol("quote"), node])
    }

    /// Booleans, integers, symbols and the empty list.
    pub fn is_atom(&self) -> bool {
        match self {
            Node::Boolean(_) | Node::Integer(_) | Node::Symbol(_) => true,
            Node::List(items) => items.is_empty(),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Node::List(_))
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Node::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }

    /// The quoted operand if this node is a well-formed `(quote x)`.
    pub fn quoted_operand(&self) -> Option<&Node> {
        match self {
            Node::List(items) if items.len() == 2 => match &items[0] {
                Node::Symbol(head) if head.as_str() == "quote" => Some(&items[1]),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::Boolean(_) => "boolean",
            Node::Integer(_) => "integer",
            Node::Symbol(_) => "symbol",
            Node::List(_) => "list",
        }
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Boolean(b)
    }
}

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        Node::Integer(n)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(operand) = self.quoted_operand() {
            return write!(f, "'{}", operand);
        }
        match self {
            Node::Boolean(true) => write!(f, "#t"),
            Node::Boolean(false) => write!(f, "#f"),
            Node::Integer(n) => write!(f, "{}", n),
            Node::Symbol(s) => write!(f, "{}", s),
            Node::List(items) => {
                let items: Vec<String> = items.iter().map(|item| item.to_string()).collect();
                write!(f, "({})", items.join(" "))
            }
        }
    }
}
