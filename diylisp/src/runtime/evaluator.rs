// DIY Lisp Evaluator - Executes parsed AST nodes

use crate::ast::{Node, Symbol};
use crate::runtime::environment::Environment;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::special_forms::{is_reserved, lookup_keyword, Keyword, Operator, SpecialForm};
use crate::runtime::stack::ensure_sufficient_stack;
use crate::runtime::values::{Closure, Value};
use std::cell::Cell;
use tracing::{debug, trace, warn};

pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 512;

/// Tree-walking evaluator.
///
/// The evaluator itself holds no bindings; every call receives the environment to evaluate
/// in. Its only state is the closure-application depth used to report runaway recursion as
/// [`RuntimeError::StackOverflow`] before the native stack runs out.
#[derive(Debug)]
pub struct Evaluator {
    recursion_depth: Cell<usize>,
    max_recursion_depth: usize,
}

/// Evaluates `node` in `env` with a default evaluator.
pub fn evaluate(node: &Node, env: &Environment) -> RuntimeResult<Value> {
    Evaluator::new().evaluate(node, env)
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_max_recursion_depth(DEFAULT_MAX_RECURSION_DEPTH)
    }

    pub fn with_max_recursion_depth(max_recursion_depth: usize) -> Self {
        Evaluator {
            recursion_depth: Cell::new(0),
            max_recursion_depth,
        }
    }

    pub fn max_recursion_depth(&self) -> usize {
        self.max_recursion_depth
    }

    /// Evaluate an expression in a given environment.
    ///
    /// The native stack grows as needed, so only `max_recursion_depth` limits how deep a
    /// program may recurse.
    pub fn evaluate(&self, node: &Node, env: &Environment) -> RuntimeResult<Value> {
        trace!(kind = node.kind(), "evaluate");
        ensure_sufficient_stack(|| match node {
            Node::Boolean(b) => Ok(Value::Boolean(*b)),
            Node::Integer(n) => Ok(Value::Integer(*n)),
            Node::Symbol(sym) => env.lookup(sym),
            Node::List(items) => self.eval_list(items, env),
        })
    }

    fn eval_list(&self, items: &[Node], env: &Environment) -> RuntimeResult<Value> {
        let (head, operands) = match items.split_first() {
            Some(split) => split,
            None => return Err(RuntimeError::NotCallable("() is not a function".to_string())),
        };

        match head {
            Node::Symbol(sym) => {
                if let Some(keyword) = lookup_keyword(sym.as_str()) {
                    return self.eval_keyword(keyword, operands, env);
                }
                let callee = env.lookup(sym)?;
                self.call(callee, operands, env)
            }
            Node::List(_) => {
                let callee = self.evaluate(head, env)?;
                self.call(callee, operands, env)
            }
            _ => Err(RuntimeError::NotCallable(format!("{} is not a function", head))),
        }
    }

    fn call(&self, callee: Value, args: &[Node], env: &Environment) -> RuntimeResult<Value> {
        match callee {
            Value::Closure(closure) => self.apply_closure(&closure, args, env),
            other => Err(RuntimeError::NotCallable(format!("{} is not a function", other))),
        }
    }

    fn eval_keyword(
        &self,
        keyword: Keyword,
        operands: &[Node],
        env: &Environment,
    ) -> RuntimeResult<Value> {
        match keyword {
            Keyword::Operator(op) => self.eval_operator(op, operands, env),
            Keyword::Form(form) => {
                let expected = form.form_length() - 1;
                if operands.len() != expected {
                    return Err(RuntimeError::arity(form.name(), expected, operands.len()));
                }
                self.eval_special_form(form, operands, env)
            }
        }
    }

    fn eval_special_form(
        &self,
        form: SpecialForm,
        operands: &[Node],
        env: &Environment,
    ) -> RuntimeResult<Value> {
        match form {
            SpecialForm::Quote => Ok(Value::from(&operands[0])),
            SpecialForm::Atom => {
                let value = self.evaluate(&operands[0], env)?;
                Ok(Value::Boolean(value.is_atom()))
            }
            SpecialForm::Eq => {
                let a = self.evaluate(&operands[0], env)?;
                let b = self.evaluate(&operands[1], env)?;
                Ok(Value::Boolean(a.is_atom() && b.is_atom() && a == b))
            }
            SpecialForm::If => self.eval_if(&operands[0], &operands[1], &operands[2], env),
            SpecialForm::Define => {
                let value = self.evaluate(&operands[1], env)?;
                self.define(&operands[0], value, env)
            }
            SpecialForm::Lambda => self.make_closure(&operands[0], &operands[1], env),
            SpecialForm::Cons => self.eval_cons(&operands[0], &operands[1], env),
            SpecialForm::Head => {
                let list = self.eval_list_operand("head", &operands[0], env)?;
                list.front()
                    .cloned()
                    .ok_or_else(|| RuntimeError::empty_list("head"))
            }
            SpecialForm::Tail => {
                let list = self.eval_list_operand("tail", &operands[0], env)?;
                if list.is_empty() {
                    return Err(RuntimeError::empty_list("tail"));
                }
                Ok(Value::List(list.skip(1)))
            }
            SpecialForm::Empty => {
                let list = self.eval_list_operand("empty", &operands[0], env)?;
                Ok(Value::Boolean(list.is_empty()))
            }
            SpecialForm::Let => self.eval_let(&operands[0], &operands[1], env),
            SpecialForm::Defn => {
                let closure = self.make_closure(&operands[1], &operands[2], env)?;
                self.define(&operands[0], closure, env)
            }
            SpecialForm::Cond => self.eval_cond(&operands[0], env),
        }
    }

    fn eval_operator(&self, op: Operator, operands: &[Node], env: &Environment) -> RuntimeResult<Value> {
        if operands.len() != 2 {
            return Err(RuntimeError::arity(op.name(), 2, operands.len()));
        }
        let a = self.evaluate(&operands[0], env)?;
        let b = self.evaluate(&operands[1], env)?;
        op.apply_values(&a, &b)
    }

    fn eval_if(
        &self,
        condition: &Node,
        consequent: &Node,
        alternative: &Node,
        env: &Environment,
    ) -> RuntimeResult<Value> {
        if self.evaluate(condition, env)?.is_truthy() {
            self.evaluate(consequent, env)
        } else {
            self.evaluate(alternative, env)
        }
    }

    fn define(&self, target: &Node, value: Value, env: &Environment) -> RuntimeResult<Value> {
        let name = target.as_symbol().ok_or_else(|| {
            RuntimeError::IllegalDefinitionTarget(format!("{} is not a symbol", target))
        })?;
        if is_reserved(name.as_str()) {
            warn!(name = %name, "binding shadows a keyword; calls still dispatch to the keyword");
        }
        debug!(name = %name, kind = value.type_name(), "define");
        env.define(name.clone(), value)?;
        Ok(Value::Symbol(name.clone()))
    }

    fn make_closure(&self, params: &Node, body: &Node, env: &Environment) -> RuntimeResult<Value> {
        let param_nodes = params.as_list().ok_or_else(|| {
            RuntimeError::IllegalDefinitionTarget(format!(
                "lambda parameters must be a list, got {}",
                params
            ))
        })?;

        let mut names: Vec<Symbol> = Vec::with_capacity(param_nodes.len());
        for param in param_nodes {
            let name = param.as_symbol().ok_or_else(|| {
                RuntimeError::IllegalDefinitionTarget(format!("parameter {} is not a symbol", param))
            })?;
            if names.contains(name) {
                return Err(RuntimeError::IllegalDefinitionTarget(format!(
                    "duplicate parameter {}",
                    name
                )));
            }
            names.push(name.clone());
        }

        Ok(Value::closure(Closure::new(env.clone(), names, body.clone())))
    }

    fn eval_cons(&self, head: &Node, tail: &Node, env: &Environment) -> RuntimeResult<Value> {
        let head = self.evaluate(head, env)?;
        let mut list = self.eval_list_operand("cons", tail, env)?;
        list.push_front(head);
        Ok(Value::List(list))
    }

    /// Evaluates `node` and requires a list, returning a shared handle to it.
    fn eval_list_operand(
        &self,
        operation: &str,
        node: &Node,
        env: &Environment,
    ) -> RuntimeResult<im::Vector<Value>> {
        match self.evaluate(node, env)? {
            Value::List(list) => Ok(list),
            other => Err(RuntimeError::type_error(operation, "list", other.type_name())),
        }
    }

    fn eval_let(&self, bindings: &Node, body: &Node, env: &Environment) -> RuntimeResult<Value> {
        let bindings = bindings
            .as_list()
            .ok_or_else(|| RuntimeError::malformed("let", format!("bindings must be a list, got {}", bindings)))?;

        let mut scope = env.clone();
        for binding in bindings {
            let (name, expr) = match binding.as_list() {
                Some([Node::Symbol(name), expr]) => (name, expr),
                _ => {
                    return Err(RuntimeError::malformed(
                        "let",
                        format!("binding {} must be a (name value) pair", binding),
                    ))
                }
            };
            let value = self.evaluate(expr, &scope)?;
            scope = scope.extend([(name.clone(), value)]);
        }
        self.evaluate(body, &scope)
    }

    fn eval_cond(&self, clauses: &Node, env: &Environment) -> RuntimeResult<Value> {
        let clauses = clauses
            .as_list()
            .ok_or_else(|| RuntimeError::malformed("cond", format!("clauses must be a list, got {}", clauses)))?;

        for clause in clauses {
            match clause.as_list() {
                Some([test, expr]) => {
                    if self.evaluate(test, env)?.is_truthy() {
                        return self.evaluate(expr, env);
                    }
                }
                _ => {
                    return Err(RuntimeError::malformed(
                        "cond",
                        format!("clause {} must be a (test expression) pair", clause),
                    ))
                }
            }
        }
        Ok(Value::Boolean(false))
    }

    /// Applies `closure` to unevaluated argument expressions.
    ///
    /// Arguments are evaluated left to right in the caller's environment `env`; the body runs
    /// in a fresh frame extending the closure's captured environment.
    pub fn apply_closure(
        &self,
        closure: &Closure,
        args: &[Node],
        env: &Environment,
    ) -> RuntimeResult<Value> {
        closure.check_arity(args.len())?;
        let values = args
            .iter()
            .map(|arg| self.evaluate(arg, env))
            .collect::<RuntimeResult<Vec<_>>>()?;
        self.apply(closure, values)
    }

    /// Applies `closure` to already evaluated arguments.
    pub fn apply(&self, closure: &Closure, args: Vec<Value>) -> RuntimeResult<Value> {
        closure.check_arity(args.len())?;

        let depth = self.recursion_depth.get();
        if depth >= self.max_recursion_depth {
            return Err(RuntimeError::StackOverflow {
                depth: self.max_recursion_depth,
            });
        }
        debug!(arity = closure.arity(), depth, "apply closure");

        let call_env = closure.env.extend(closure.params.iter().cloned().zip(args));
        self.recursion_depth.set(depth + 1);
        let result = self.evaluate(&closure.body, &call_env);
        self.recursion_depth.set(depth);
        result
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
