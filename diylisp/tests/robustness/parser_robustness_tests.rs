// DIY Lisp Parser Robustness Tests
// Malformed input is reported as a ParseError, never a panic

use diylisp::{parse, parse_multiple, Node, ParseError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn test_unclosed_list() {
    let result = parse("(define x 5");
    assert!(matches!(result, Err(ParseError::Syntax { .. })));
}

#[test]
fn test_unexpected_close_paren() {
    assert!(matches!(parse("(+ 1 2))"), Err(ParseError::Syntax { .. })));
    assert!(matches!(parse(")"), Err(ParseError::Syntax { .. })));
}

#[test]
fn test_syntax_error_position() {
    let err = parse_multiple("(define x 1)\n(foo))").unwrap_err();
    match err {
        ParseError::Syntax { line, column, .. } => {
            assert_eq!(line, 2);
            assert_eq!(column, 6);
        }
        other => panic!("Expected syntax error, got {:?}", other),
    }
}

#[test]
fn test_dangling_quote() {
    assert!(parse("'").is_err());
    assert!(parse("(a ')").is_err());
}

#[test]
fn test_integer_out_of_range() {
    let err = parse("99999999999999999999").unwrap_err();
    assert!(matches!(err, ParseError::InvalidInteger { .. }));
    assert!(err.to_string().contains("99999999999999999999"));
}

#[test]
fn test_empty_and_trailing_input() {
    assert_eq!(parse(""), Err(ParseError::Empty));
    assert_eq!(parse("   ; just a comment\n"), Err(ParseError::Empty));
    assert_eq!(parse("1 2 3"), Err(ParseError::TrailingInput { extra: 2 }));
    assert_eq!(parse_multiple("").unwrap(), Vec::<Node>::new());
}

#[test]
fn test_comments_and_whitespace() {
    let source = r#"
        ; leading comment
        (define x   ; trailing comment
            42)
        	x ; tab before
    "#;
    let nodes = parse_multiple(source).unwrap();
    assert_eq!(
        nodes,
        vec![
            Node::list(vec![Node::symbol("define"), Node::symbol("x"), Node::Integer(42)]),
            Node::symbol("x"),
        ]
    );
}

#[test]
fn test_symbol_edge_cases() {
    assert_eq!(parse("#tx").unwrap(), Node::symbol("#tx"));
    assert_eq!(parse("1+").unwrap(), Node::symbol("1+"));
    assert_eq!(parse("-abc").unwrap(), Node::symbol("-abc"));
    assert_eq!(parse("->").unwrap(), Node::symbol("->"));
    assert_eq!(parse("λ").unwrap(), Node::symbol("λ"));
}

#[test]
fn test_nested_quotes() {
    assert_eq!(
        parse("''x").unwrap(),
        Node::quoted(Node::quoted(Node::symbol("x")))
    );
    assert_eq!(parse("''x").unwrap().to_string(), "''x");
}

#[test]
fn test_deep_nesting() {
    let depth = 200;
    let source = format!("{}x{}", "(".repeat(depth), ")".repeat(depth));
    let mut node = parse(&source).unwrap();
    for _ in 0..depth {
        node = match node {
            Node::List(mut items) => {
                assert_eq!(items.len(), 1);
                items.remove(0)
            }
            other => panic!("Expected list, got {:?}", other),
        };
    }
    assert_eq!(node, Node::symbol("x"));
}

proptest! {
    #[test]
    fn prop_parse_never_panics(source in "[()'#a-z0-9 +\\-;\n]{0,40}") {
        let _ = parse_multiple(&source);
    }

    #[test]
    fn prop_integers_read_back(n in any::<i64>()) {
        prop_assert_eq!(parse(&n.to_string()), Ok(Node::Integer(n)));
    }
}
