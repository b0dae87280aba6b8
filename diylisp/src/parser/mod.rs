use crate::ast::{Node, Symbol};
use crate::runtime::stack::ensure_sufficient_stack;
use pest::iterators::Pair;
use pest::Parser;

pub mod errors;

pub use errors::ParseError;

// Define the parser struct using the grammar file
#[derive(pest_derive::Parser)]
#[grammar = "parser/diylisp.pest"] // Path relative to src/
pub struct DiyLispParser;

/// Parse a full program (zero or more top-level expressions)
pub fn parse_multiple(source: &str) -> Result<Vec<Node>, ParseError> {
    let mut pairs = DiyLispParser::parse(Rule::program, source)?;
    let program = match pairs.next() {
        Some(program) => program,
        None => return Ok(Vec::new()),
    };

    program
        .into_inner()
        .filter(|p| p.as_rule() != Rule::EOI)
        .map(build_node)
        .collect()
}

/// Parse exactly one expression (useful for the REPL or simple evaluation)
pub fn parse(source: &str) -> Result<Node, ParseError> {
    let mut nodes = parse_multiple(source)?;
    match nodes.len() {
        0 => Err(ParseError::Empty),
        1 => Ok(nodes.remove(0)),
        n => Err(ParseError::TrailingInput { extra: n - 1 }),
    }
}

fn build_node(pair: Pair<Rule>) -> Result<Node, ParseError> {
    ensure_sufficient_stack(|| build_node_inner(pair))
}

fn build_node_inner(pair: Pair<Rule>) -> Result<Node, ParseError> {
    match pair.as_rule() {
        Rule::boolean => Ok(Node::Boolean(pair.as_str() == "#t")),
        Rule::integer => build_integer(pair.as_str()),
        Rule::symbol => Ok(Node::Symbol(Symbol::new(pair.as_str()))),
        Rule::list => Ok(Node::List(
            pair.into_inner()
                .map(build_node)
                .collect::<Result<Vec<_>, _>>()?,
        )),
        Rule::quoted => {
            let inner = pair
                .into_inner()
                .next()
                .ok_or_else(|| ParseError::UnexpectedRule {
                    rule: "quoted (missing operand)".to_string(),
                })?;
            Ok(Node::quoted(build_node(inner)?))
        }
        other => Err(ParseError::UnexpectedRule {
            rule: format!("{:?}", other),
        }),
    }
}

fn build_integer(text: &str) -> Result<Node, ParseError> {
    text.parse::<i64>()
        .map(Node::Integer)
        .map_err(|e| ParseError::InvalidInteger {
            text: text.to_string(),
            reason: e.to_string(),
        })
}
