// Property tests for integer arithmetic through the evaluator

use diylisp::runtime::{Environment, Evaluator, Value};
use diylisp::Node;
use proptest::prelude::*;

fn apply(op: &str, a: i64, b: i64) -> Value {
    let node = Node::list(vec![Node::symbol(op), Node::Integer(a), Node::Integer(b)]);
    Evaluator::new()
        .evaluate(&node, &Environment::new())
        .expect("arithmetic on small integers should succeed")
}

fn small() -> impl Strategy<Value = i64> {
    -1_000_000i64..1_000_000
}

fn nonzero() -> impl Strategy<Value = i64> {
    small().prop_filter("divisor must be non-zero", |b| *b != 0)
}

proptest! {
    #[test]
    fn prop_division_floors(a in small(), b in nonzero()) {
        let expected = (a as f64 / b as f64).floor() as i64;
        prop_assert_eq!(apply("/", a, b), Value::Integer(expected));
    }

    #[test]
    fn prop_modulo_takes_sign_of_divisor(a in small(), b in nonzero()) {
        let m = match apply("mod", a, b) {
            Value::Integer(m) => m,
            other => return Err(TestCaseError::fail(format!("expected integer, got {}", other))),
        };
        prop_assert!(m == 0 || (m < 0) == (b < 0));
        prop_assert!(m.abs() < b.abs());
    }

    #[test]
    fn prop_division_and_modulo_agree(a in small(), b in nonzero()) {
        let (q, m) = match (apply("/", a, b), apply("mod", a, b)) {
            (Value::Integer(q), Value::Integer(m)) => (q, m),
            other => return Err(TestCaseError::fail(format!("expected integers, got {:?}", other))),
        };
        prop_assert_eq!(b * q + m, a);
    }

    #[test]
    fn prop_comparisons_match_rust(a in small(), b in small()) {
        prop_assert_eq!(apply(">", a, b), Value::Boolean(a > b));
        prop_assert_eq!(apply("<", a, b), Value::Boolean(a < b));
        prop_assert_eq!(apply("=", a, b), Value::Boolean(a == b));
    }
}
