// Keyword table: maps reserved head symbols to special forms and math operators

use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::values::Value;
use lazy_static::lazy_static;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecialForm {
    Quote,
    Atom,
    Eq,
    If,
    Define,
    Lambda,
    Cons,
    Head,
    Tail,
    Empty,
    Let,
    Defn,
    Cond,
}

impl SpecialForm {
    pub fn name(&self) -> &'static str {
        match self {
            SpecialForm::Quote => "quote",
            SpecialForm::Atom => "atom",
            SpecialForm::Eq => "eq",
            SpecialForm::If => "if",
            SpecialForm::Define => "define",
            SpecialForm::Lambda => "lambda",
            SpecialForm::Cons => "cons",
            SpecialForm::Head => "head",
            SpecialForm::Tail => "tail",
            SpecialForm::Empty => "empty",
            SpecialForm::Let => "let",
            SpecialForm::Defn => "defn",
            SpecialForm::Cond => "cond",
        }
    }

    /// Length of a well-formed form, head included.
    pub fn form_length(&self) -> usize {
        match self {
            SpecialForm::Quote
            | SpecialForm::Atom
            | SpecialForm::Head
            | SpecialForm::Tail
            | SpecialForm::Empty
            | SpecialForm::Cond => 2,
            SpecialForm::Eq
            | SpecialForm::Define
            | SpecialForm::Lambda
            | SpecialForm::Cons
            | SpecialForm::Let => 3,
            SpecialForm::If | SpecialForm::Defn => 4,
        }
    }
}

/// Binary integer operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Gt,
    Lt,
    NumEq,
}

impl Operator {
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Mod => "mod",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::NumEq => "=",
        }
    }

    /// Applies the operator. `/` rounds toward negative infinity and `mod` takes the sign
    /// of the divisor, so `a == b * (a / b) + (a mod b)` always holds.
    pub fn apply(&self, a: i64, b: i64) -> RuntimeResult<Value> {
        if self.checks_divisor() && b == 0 {
            return Err(RuntimeError::DivisionByZero);
        }
        let overflow = || RuntimeError::IntegerOverflow {
            operation: self.name().to_string(),
        };
        let value = match self {
            Operator::Add => Value::Integer(a.checked_add(b).ok_or_else(overflow)?),
            Operator::Sub => Value::Integer(a.checked_sub(b).ok_or_else(overflow)?),
            Operator::Mul => Value::Integer(a.checked_mul(b).ok_or_else(overflow)?),
            Operator::Div => Value::Integer(floor_div(a, b).ok_or_else(overflow)?),
            Operator::Mod => Value::Integer(floor_mod(a, b)),
            Operator::Gt => Value::Boolean(a > b),
            Operator::Lt => Value::Boolean(a < b),
            Operator::NumEq => Value::Boolean(a == b),
        };
        Ok(value)
    }

    fn checks_divisor(&self) -> bool {
        matches!(self, Operator::Div | Operator::Mod)
    }

    /// Type-checks both operands and applies the operator.
    pub fn apply_values(&self, a: &Value, b: &Value) -> RuntimeResult<Value> {
        let (a, b) = match (a, b) {
            (Value::Integer(a), Value::Integer(b)) => (*a, *b),
            (Value::Integer(_), other) | (other, _) => {
                return Err(RuntimeError::operator_requires_integers(
                    self.name(),
                    other.type_name(),
                ))
            }
        };
        self.apply(a, b)
    }
}

fn floor_div(a: i64, b: i64) -> Option<i64> {
    let q = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        Some(q - 1)
    } else {
        Some(q)
    }
}

// `b` is non-zero here; `i64::MIN mod -1` wraps to the correct 0.
fn floor_mod(a: i64, b: i64) -> i64 {
    let r = a.wrapping_rem(b);
    if r != 0 && ((r < 0) != (b < 0)) {
        r + b
    } else {
        r
    }
}

/// What a reserved head symbol means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Form(SpecialForm),
    Operator(Operator),
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, Keyword> = {
        let mut table = HashMap::new();
        for form in [
            SpecialForm::Quote,
            SpecialForm::Atom,
            SpecialForm::Eq,
            SpecialForm::If,
            SpecialForm::Define,
            SpecialForm::Lambda,
            SpecialForm::Cons,
            SpecialForm::Head,
            SpecialForm::Tail,
            SpecialForm::Empty,
            SpecialForm::Let,
            SpecialForm::Defn,
            SpecialForm::Cond,
        ] {
            table.insert(form.name(), Keyword::Form(form));
        }
        for op in [
            Operator::Add,
            Operator::Sub,
            Operator::Mul,
            Operator::Div,
            Operator::Mod,
            Operator::Gt,
            Operator::Lt,
            Operator::NumEq,
        ] {
            table.insert(op.name(), Keyword::Operator(op));
        }
        table
    };
}

pub fn lookup_keyword(name: &str) -> Option<Keyword> {
    KEYWORDS.get(name).copied()
}

pub fn is_reserved(name: &str) -> bool {
    KEYWORDS.contains_key(name)
}
