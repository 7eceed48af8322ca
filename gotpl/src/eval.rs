//! Pipeline evaluation.
//!
//! A pipeline is a `|`-separated sequence of commands.  Each command leaves
//! its result in the current frame's accumulator; `|` threads that value
//! into the next command as its final trailing argument.  Argument
//! collection for a function call is greedy: everything up to the next
//! symbol that cannot start an argument belongs to the call.

use tracing::trace;

use crate::builtins;
use crate::error::{Error, Result};
use crate::lex::{Token, Tokens};
use crate::scope::ScopeStack;
use crate::template::Template;
use crate::value::{Data, Value};

/// Evaluate a full pipeline, leaving the result in the accumulator.
pub(crate) fn evaluate_pipeline(
    tokens: &mut Tokens,
    scopes: &mut ScopeStack,
    tmpl: &Template,
) -> Result<()> {
    loop {
        if !evaluate_arg(tokens, scopes, tmpl)? {
            return Err(Error::Syntax("unexpected end of pipeline".into()));
        }
        match tokens.peek() {
            Some(Token::Pipe) => {
                tokens.next();
            }
            _ => return Ok(()),
        }
    }
}

/// Evaluate one argument.  Returns `false` without consuming anything when
/// the next token cannot start an argument (or the stream is exhausted).
fn evaluate_arg(tokens: &mut Tokens, scopes: &mut ScopeStack, tmpl: &Template) -> Result<bool> {
    let Some(token) = tokens.next() else {
        return Ok(false);
    };
    match token {
        Token::Literal(value) => {
            scopes.set_acc(value);
            Ok(true)
        }
        Token::Var(name) => evaluate_var(&name, tokens, scopes, tmpl),
        Token::Dot(select) => {
            match resolve_dot(&select, scopes)? {
                Some(value) => scopes.set_acc(value),
                None => scopes.clear_acc(),
            }
            Ok(true)
        }
        Token::Ident(name) => evaluate_ident(&name, tokens, scopes, tmpl),
        Token::LParen => {
            evaluate_pipeline(tokens, scopes, tmpl)?;
            match tokens.next() {
                Some(Token::RParen) => Ok(true),
                _ => Err(Error::Syntax("unclosed left paren".into())),
            }
        }
        Token::RParen | Token::Declare | Token::Assign | Token::Pipe | Token::Comma => {
            tokens.backup();
            Ok(false)
        }
    }
}

fn evaluate_var(
    name: &str,
    tokens: &mut Tokens,
    scopes: &mut ScopeStack,
    tmpl: &Template,
) -> Result<bool> {
    match tokens.peek() {
        Some(Token::Assign) => {
            // Assignment requires the name to exist somewhere in the
            // chain, but the new binding still lands in the innermost
            // frame, shadowing the outer one until the block ends.
            scopes.lookup(name)?;
            tokens.next();
            bind(name, tokens, scopes, tmpl)
        }
        Some(Token::Declare) => {
            tokens.next();
            bind(name, tokens, scopes, tmpl)
        }
        _ => {
            let value = scopes.lookup(name)?;
            scopes.set_acc(value);
            Ok(true)
        }
    }
}

/// Evaluate the right-hand pipeline of `:=`/`=` and bind the result.
fn bind(name: &str, tokens: &mut Tokens, scopes: &mut ScopeStack, tmpl: &Template) -> Result<bool> {
    evaluate_pipeline(tokens, scopes, tmpl)?;
    let value = scopes
        .acc()
        .cloned()
        .ok_or_else(|| Error::Syntax("missing value in assignment".into()))?;
    scopes.declare(name, value);
    Ok(true)
}

fn evaluate_ident(
    name: &str,
    tokens: &mut Tokens,
    scopes: &mut ScopeStack,
    tmpl: &Template,
) -> Result<bool> {
    match name {
        "nil" => {
            scopes.set_acc(Value::Nil);
            Ok(true)
        }
        "true" => {
            scopes.set_acc(Value::Bool(true));
            Ok(true)
        }
        "false" => {
            scopes.set_acc(Value::Bool(false));
            Ok(true)
        }
        "with" => {
            // The new frame opens before its argument is evaluated, so a
            // `$x := ...` argument binds inside the block.  Its starting
            // context is the accumulator flowing in from the left.
            let starting = scopes.acc().cloned().map(Data::Leaf);
            scopes.push(starting);
            if !evaluate_arg(tokens, scopes, tmpl)? {
                return Err(Error::Syntax("missing value for with".into()));
            }
            let data = scopes.acc().cloned().map(Data::Leaf);
            scopes.set_data(data);
            scopes.clear_acc();
            Ok(true)
        }
        "end" => {
            scopes.pop()?;
            Ok(true)
        }
        _ => call_function(name, tokens, scopes, tmpl),
    }
}

fn call_function(
    name: &str,
    tokens: &mut Tokens,
    scopes: &mut ScopeStack,
    tmpl: &Template,
) -> Result<bool> {
    // Reserved keywords fail before any arguments are consumed, so
    // `range .` reports the keyword rather than a stray argument.
    if tmpl.user_fn(name).is_none() && builtins::is_reserved(name) {
        return Err(Error::NotImplemented(name.to_owned()));
    }
    // The piped-in value, if any.  It stays visible in the accumulator
    // while the argument list is collected.
    let prior = scopes.acc().cloned();
    let mut args = Vec::new();
    while evaluate_arg(tokens, scopes, tmpl)? {
        let value = scopes
            .acc()
            .cloned()
            .ok_or_else(|| Error::Syntax("missing value for argument".into()))?;
        args.push(value);
    }
    if let Some(prior) = prior {
        args.push(prior);
    }
    trace!(function = name, argc = args.len(), "dispatch");
    let result = match tmpl.user_fn(name) {
        Some(func) => func.call(name, args)?,
        None => builtins::call_builtin(name, args)?,
    };
    scopes.set_acc(result);
    Ok(true)
}

/// Walk a dotted selector against the innermost data context.
///
/// `Ok(None)` means the bare `.` resolved to an absent context, which
/// renders as nothing rather than failing.
fn resolve_dot(select: &str, scopes: &ScopeStack) -> Result<Option<Value>> {
    let data = scopes.data();
    if select.is_empty() {
        return match data {
            None => Ok(None),
            Some(Data::Leaf(value)) => Ok(Some(value.clone())),
            Some(Data::Map(_)) => {
                Err(Error::TypeMismatch("composite value in scalar context".into()))
            }
        };
    }
    let mut node = match data {
        Some(node) => node,
        None => {
            let first = select.split('.').next().unwrap_or(select);
            return Err(Error::UndefinedField(first.to_owned()));
        }
    };
    for segment in select.split('.') {
        node = match node {
            Data::Map(entries) => entries
                .get(segment)
                .ok_or_else(|| Error::UndefinedField(segment.to_owned()))?,
            Data::Leaf(_) => {
                return Err(Error::TypeMismatch(format!(
                    "can't evaluate field \"{segment}\" in scalar value"
                )))
            }
        };
    }
    match node {
        Data::Leaf(value) => Ok(Some(value.clone())),
        Data::Map(_) => Err(Error::TypeMismatch("composite value in scalar context".into())),
    }
}
