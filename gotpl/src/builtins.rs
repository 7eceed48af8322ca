//! The builtin function catalog.
//!
//! Dispatch is by name over a fully-evaluated argument list; there is no
//! lazy evaluation, so `and`/`or` choose among already-computed values.
//! Control-flow keywords are recognized here so they fail with a clear
//! "not implemented" rather than an unknown-function error.

use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::value::{self, sprint, Value};

/// Control-flow keywords the grammar reserves but the interpreter does
/// not support.
pub(crate) fn is_reserved(name: &str) -> bool {
    matches!(
        name,
        "call" | "printf" | "if" | "else" | "range" | "block" | "define" | "template" | "break"
            | "continue"
    )
}

fn want(name: &str, args: &[Value], n: usize) -> Result<()> {
    if args.len() != n {
        return Err(Error::arity(name, n, args.len()));
    }
    Ok(())
}

fn want_at_least(name: &str, args: &[Value], n: usize) -> Result<()> {
    if args.len() < n {
        return Err(Error::arity_at_least(name, n, args.len()));
    }
    Ok(())
}

fn ordered(name: &str, args: &[Value]) -> Result<Ordering> {
    want(name, args, 2)?;
    value::compare(&args[0], &args[1])
}

/// Call the builtin `name` with `args`.
pub(crate) fn call_builtin(name: &str, args: Vec<Value>) -> Result<Value> {
    match name {
        "eq" => {
            want_at_least(name, &args, 2)?;
            // Multi-way: true when any later operand equals the first.
            // Mismatched categories compare unequal rather than failing.
            Ok(Value::Bool(args[1..].iter().any(|arg| *arg == args[0])))
        }
        "ne" => {
            want(name, &args, 2)?;
            if !args[0].same_kind(&args[1]) {
                return Err(Error::TypeMismatch(
                    "incompatible types for comparison".into(),
                ));
            }
            Ok(Value::Bool(args[0] != args[1]))
        }
        "lt" => Ok(Value::Bool(ordered(name, &args)? == Ordering::Less)),
        "le" => Ok(Value::Bool(ordered(name, &args)? != Ordering::Greater)),
        "gt" => Ok(Value::Bool(ordered(name, &args)? == Ordering::Greater)),
        "ge" => Ok(Value::Bool(ordered(name, &args)? != Ordering::Less)),
        "and" => {
            want_at_least(name, &args, 1)?;
            // First empty operand wins, else the last.
            let mut iter = args.into_iter();
            let mut acc = iter.next().ok_or_else(|| Error::arity("and", 1, 0))?;
            for arg in iter {
                if !acc.is_empty() {
                    acc = arg;
                }
            }
            Ok(acc)
        }
        "or" => {
            want_at_least(name, &args, 1)?;
            // First non-empty operand wins, else the last.
            let mut iter = args.into_iter();
            let mut acc = iter.next().ok_or_else(|| Error::arity("or", 1, 0))?;
            for arg in iter {
                if acc.is_empty() {
                    acc = arg;
                }
            }
            Ok(acc)
        }
        "print" => Ok(Value::Str(sprint(&args))),
        "println" => Ok(Value::Str(sprint(&args) + "\n")),
        "not" => {
            want(name, &args, 1)?;
            Ok(Value::Bool(args[0].is_empty()))
        }
        "len" => {
            want(name, &args, 1)?;
            match &args[0] {
                Value::Str(s) => Ok(Value::Num(s.chars().count() as f64)),
                other => Err(Error::TypeMismatch(format!("len of type {}", other.kind()))),
            }
        }
        _ if is_reserved(name) => Err(Error::NotImplemented(name.to_owned())),
        _ => Err(Error::UndefinedFunction(name.to_owned())),
    }
}
