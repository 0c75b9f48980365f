//! Binary and unary operator implementations.

use core::cmp::Ordering;

use serde_json::Value;

use crate::{
    evaluator::EvalErrorKind,
    parser::{ArithmeticOp, ComparisonOp},
    values::{self, Numeric, ValueKind},
};

/// Apply an arithmetic operator.
///
/// `string + string` concatenates. Two integers stay integers, except that
/// `^` with a non-positive exponent falls back to floats; any other numeric
/// mix is computed in floating point. `%` is integer-only.
pub(super) fn arithmetic(
    op: ArithmeticOp,
    left: &Value,
    right: &Value,
) -> Result<Value, EvalErrorKind> {
    if let (ArithmeticOp::Add, Value::String(a), Value::String(b)) = (op, left, right) {
        let mut joined = String::with_capacity(a.len() + b.len());
        joined.push_str(a);
        joined.push_str(b);
        return Ok(Value::String(joined));
    }

    let (Some(l), Some(r)) = (Numeric::from_value(left), Numeric::from_value(right)) else {
        return Err(mismatch(op, left, right));
    };
    let result = match (l, r) {
        (Numeric::Int(a), Numeric::Int(b)) => eval_binary_int(op, a, b)?,
        _ if op == ArithmeticOp::Mod => return Err(mismatch(op, left, right)),
        (a, b) => Numeric::Float(eval_binary_float(op, a.as_f64(), b.as_f64())),
    };
    result
        .to_value()
        .ok_or_else(|| EvalErrorKind::NonFiniteNumber { op: op.to_string() })
}

/// Evaluate a binary operation on two integers.
///
/// Uses wrapping arithmetic to prevent panics on overflow.
/// Division by zero returns an error.
pub(super) fn eval_binary_int(
    op: ArithmeticOp,
    left: i64,
    right: i64,
) -> Result<Numeric, EvalErrorKind> {
    let value = match op {
        ArithmeticOp::Add => left.wrapping_add(right),
        ArithmeticOp::Sub => left.wrapping_sub(right),
        ArithmeticOp::Mul => left.wrapping_mul(right),
        ArithmeticOp::Div | ArithmeticOp::Mod if right == 0 => {
            return Err(EvalErrorKind::DivisionByZero);
        }
        // Wrapping handles i64::MIN / -1.
        ArithmeticOp::Div => left.wrapping_div(right),
        ArithmeticOp::Mod => left.wrapping_rem(right),
        ArithmeticOp::Pow if right > 0 => wrapping_pow(left, right),
        ArithmeticOp::Pow => return Ok(Numeric::Float((left as f64).powf(right as f64))),
    };
    Ok(Numeric::Int(value))
}

/// Evaluate a binary operation on two floats.
///
/// Follows IEEE 754 semantics; the caller rejects non-finite results.
pub(super) fn eval_binary_float(op: ArithmeticOp, left: f64, right: f64) -> f64 {
    match op {
        ArithmeticOp::Add => left + right,
        ArithmeticOp::Sub => left - right,
        ArithmeticOp::Mul => left * right,
        ArithmeticOp::Div => left / right,
        ArithmeticOp::Mod => left % right,
        ArithmeticOp::Pow => left.powf(right),
    }
}

/// Exponentiation by squaring over the full `i64` exponent range.
fn wrapping_pow(mut base: i64, mut exp: i64) -> i64 {
    let mut acc: i64 = 1;
    while exp > 0 {
        if exp & 1 == 1 {
            acc = acc.wrapping_mul(base);
        }
        exp >>= 1;
        if exp > 0 {
            base = base.wrapping_mul(base);
        }
    }
    acc
}

fn mismatch(op: ArithmeticOp, left: &Value, right: &Value) -> EvalErrorKind {
    EvalErrorKind::TypeMismatch {
        op: op.to_string(),
        left: ValueKind::of(left),
        right: ValueKind::of(right),
    }
}

/// Apply a comparison operator using loose equality and the total value
/// order.
pub(super) fn comparison(op: ComparisonOp, left: &Value, right: &Value) -> bool {
    match op {
        ComparisonOp::Eq => values::loose_eq(left, right),
        ComparisonOp::Ne => !values::loose_eq(left, right),
        ComparisonOp::Gt => values::compare(left, right) == Ordering::Greater,
        ComparisonOp::Ge => values::compare(left, right) != Ordering::Less,
        ComparisonOp::Lt => values::compare(left, right) == Ordering::Less,
        ComparisonOp::Le => values::compare(left, right) != Ordering::Greater,
    }
}
