// DIY Lisp Runtime Error Handling Tests
// Every failure kind is reported as a RuntimeError and aborts the evaluation

use diylisp::parse;
use diylisp::runtime::{Environment, Evaluator, RuntimeError, Value};
use diylisp::{Interpreter, InterpreterConfig, InterpreterError, Symbol};

/// Test runner for runtime error tests
struct RuntimeErrorTestRunner {
    evaluator: Evaluator,
    env: Environment,
}

impl RuntimeErrorTestRunner {
    fn new() -> Self {
        Self {
            evaluator: Evaluator::with_max_recursion_depth(64),
            env: Environment::new(),
        }
    }

    fn eval(&self, source: &str) -> Result<Value, RuntimeError> {
        let ast = parse(source).unwrap_or_else(|e| panic!("Parse error in {}: {}", source, e));
        self.evaluator.evaluate(&ast, &self.env)
    }

    fn run_error_test(&self, source: &str, expected_error_contains: &str) -> Result<(), String> {
        match self.eval(source) {
            Ok(result) => Err(format!(
                "Expected error containing '{}', but got success: {}",
                expected_error_contains, result
            )),
            Err(error) => {
                let error_string = error.to_string();
                if error_string.contains(expected_error_contains) {
                    Ok(())
                } else {
                    Err(format!(
                        "Expected error containing '{}', but got: {}",
                        expected_error_contains, error_string
                    ))
                }
            }
        }
    }
}

#[test]
fn test_unbound_symbol_names_the_symbol() {
    let runner = RuntimeErrorTestRunner::new();
    assert_eq!(
        runner.eval("my-undefined-var"),
        Err(RuntimeError::UnboundSymbol(Symbol::new("my-undefined-var")))
    );
    runner
        .run_error_test("(+ 1 nope)", "Unbound symbol: nope")
        .unwrap();
}

#[test]
fn test_duplicate_definition() {
    let runner = RuntimeErrorTestRunner::new();
    runner.eval("(define x 1)").unwrap();
    assert_eq!(
        runner.eval("(define x 2)"),
        Err(RuntimeError::DuplicateDefinition(Symbol::new("x")))
    );
}

#[test]
fn test_special_form_arity() {
    let runner = RuntimeErrorTestRunner::new();
    for (source, form, expected, actual) in [
        ("(define x)", "define", 2, 1),
        ("(define x 1 2)", "define", 2, 3),
        ("(lambda (x))", "lambda", 2, 1),
        ("(if #t 1)", "if", 3, 2),
        ("(quote)", "quote", 1, 0),
        ("(cons 1)", "cons", 2, 1),
        ("(head '(1) '(2))", "head", 1, 2),
        ("(atom)", "atom", 1, 0),
        ("(eq 1)", "eq", 2, 1),
        ("(+ 1)", "+", 2, 1),
        ("(- 1 2 3)", "-", 2, 3),
    ] {
        assert_eq!(
            runner.eval(source),
            Err(RuntimeError::arity(form, expected, actual)),
            "{}",
            source
        );
    }
}

#[test]
fn test_closure_arity_reports_expected_and_actual() {
    let runner = RuntimeErrorTestRunner::new();
    runner.eval("(define f (lambda (a b c) a))").unwrap();
    runner
        .run_error_test("(f 1 2)", "expected 3, got 2")
        .unwrap();
    runner
        .run_error_test("(f 1 2 3 4)", "expected 3, got 4")
        .unwrap();
}

#[test]
fn test_illegal_definition_targets() {
    let runner = RuntimeErrorTestRunner::new();
    for source in [
        "(define 42 1)",
        "(define (x) 1)",
        "(define #t 1)",
        "(lambda x x)",
        "(lambda (x 1) x)",
        "(lambda (x x) x)",
        "(defn 7 (x) x)",
    ] {
        assert!(
            matches!(runner.eval(source), Err(RuntimeError::IllegalDefinitionTarget(_))),
            "{}",
            source
        );
    }
}

#[test]
fn test_operators_require_integers() {
    let runner = RuntimeErrorTestRunner::new();
    for source in ["(+ 1 #t)", "(- 'a 1)", "(* '() 2)", "(< 1 '(2))", "(= #f #f)"] {
        runner
            .run_error_test(source, "operator requires integers")
            .unwrap();
    }
}

#[test]
fn test_list_primitives_require_lists() {
    let runner = RuntimeErrorTestRunner::new();
    for source in ["(cons 1 2)", "(head 1)", "(tail #t)", "(empty 'x)"] {
        assert!(
            matches!(runner.eval(source), Err(RuntimeError::TypeError { .. })),
            "{}",
            source
        );
    }
}

#[test]
fn test_empty_list_errors() {
    let runner = RuntimeErrorTestRunner::new();
    runner.run_error_test("(head '())", "head").unwrap();
    runner.run_error_test("(tail '())", "tail").unwrap();
}

#[test]
fn test_not_callable() {
    let runner = RuntimeErrorTestRunner::new();
    runner.eval("(define n 5)").unwrap();
    for source in ["(1 2 3)", "(#t 1)", "()", "(n 1)", "((quote x) 1)"] {
        assert!(
            matches!(runner.eval(source), Err(RuntimeError::NotCallable(_))),
            "{}",
            source
        );
    }
}

#[test]
fn test_arithmetic_failures() {
    let runner = RuntimeErrorTestRunner::new();
    assert_eq!(runner.eval("(/ 1 0)"), Err(RuntimeError::DivisionByZero));
    assert_eq!(runner.eval("(mod 1 0)"), Err(RuntimeError::DivisionByZero));
    assert!(matches!(
        runner.eval("(+ 9223372036854775807 1)"),
        Err(RuntimeError::IntegerOverflow { .. })
    ));
    assert!(matches!(
        runner.eval("(/ -9223372036854775808 -1)"),
        Err(RuntimeError::IntegerOverflow { .. })
    ));
    assert_eq!(
        runner.eval("(mod -9223372036854775808 -1)"),
        Ok(Value::Integer(0))
    );
}

#[test]
fn test_malformed_derived_forms() {
    let runner = RuntimeErrorTestRunner::new();
    for source in ["(let x 1)", "(let ((x)) x)", "(let ((1 2)) 3)", "(cond 1)", "(cond ((#t)))"] {
        assert!(
            matches!(runner.eval(source), Err(RuntimeError::MalformedForm { .. })),
            "{}",
            source
        );
    }
}

#[test]
fn test_runaway_recursion_is_a_stack_overflow() {
    let runner = RuntimeErrorTestRunner::new();
    runner.eval("(define loop (lambda (n) (loop (+ n 1))))").unwrap();
    assert_eq!(
        runner.eval("(loop 0)"),
        Err(RuntimeError::StackOverflow { depth: 64 })
    );
    // The depth counter is restored after the failure
    runner.eval("(define id (lambda (x) x))").unwrap();
    assert_eq!(runner.eval("(id 7)"), Ok(Value::Integer(7)));
}

#[test]
fn test_error_stops_argument_evaluation() {
    let runner = RuntimeErrorTestRunner::new();
    runner.eval("(define f (lambda (a b) a))").unwrap();
    assert!(runner.eval("(f undefined-first (define later 1))").is_err());
    assert!(runner.eval("later").is_err());
}

#[test]
fn test_default_recursion_limit_on_a_small_thread() {
    let handle = std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(|| {
            let interpreter = Interpreter::new(InterpreterConfig::default()).unwrap();
            interpreter
                .interpret("(defn count (n) (if (= n 0) 0 (+ 1 (count (- n 1)))))")
                .unwrap();
            let run = |source: &str| interpreter.interpret(source).map(|v| v.to_string());
            (run("(count 150)"), run("(count 510)"), run("(count 100000)"))
        })
        .unwrap();

    let (shallow, near_limit, runaway) = handle.join().unwrap();
    assert_eq!(shallow.unwrap(), "150");
    assert_eq!(near_limit.unwrap(), "510");
    assert!(matches!(
        runaway,
        Err(InterpreterError::Runtime(RuntimeError::StackOverflow { depth: 512 }))
    ));
}
