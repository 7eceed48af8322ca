//! Template driver: action discovery, function registration, execution.

use std::collections::HashMap;
use std::mem;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::eval;
use crate::lex;
use crate::scope::ScopeStack;
use crate::value::{Data, Value};

/// Matches one action.  Plain `{{`/`}}` delimiters leave surrounding text
/// alone; the `{{- ` and ` -}}` variants swallow the adjacent whitespace.
static ACTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\{\{|\s*\{\{\-\s)(.+?)(?:\}\}|\s\-\}\}\s*)")
        .unwrap_or_else(|e| panic!("action pattern: {e}"))
});

// ── Registered functions ──────────────────────────────────────────────────────

/// A user-registered function of fixed arity (up to three arguments).
///
/// Functions are infallible and total over [`Value`]; arity is checked at
/// call time against the number of collected arguments.
pub enum TemplateFn {
    Arity0(Box<dyn Fn() -> Value + Send + Sync>),
    Arity1(Box<dyn Fn(Value) -> Value + Send + Sync>),
    Arity2(Box<dyn Fn(Value, Value) -> Value + Send + Sync>),
    Arity3(Box<dyn Fn(Value, Value, Value) -> Value + Send + Sync>),
}

impl TemplateFn {
    pub fn arity(&self) -> usize {
        match self {
            TemplateFn::Arity0(_) => 0,
            TemplateFn::Arity1(_) => 1,
            TemplateFn::Arity2(_) => 2,
            TemplateFn::Arity3(_) => 3,
        }
    }

    pub(crate) fn call(&self, name: &str, mut args: Vec<Value>) -> Result<Value> {
        let got = args.len();
        match (self, args.as_mut_slice()) {
            (TemplateFn::Arity0(f), []) => Ok(f()),
            (TemplateFn::Arity1(f), [a]) => Ok(f(mem::take(a))),
            (TemplateFn::Arity2(f), [a, b]) => Ok(f(mem::take(a), mem::take(b))),
            (TemplateFn::Arity3(f), [a, b, c]) => {
                Ok(f(mem::take(a), mem::take(b), mem::take(c)))
            }
            _ => Err(Error::arity(name, self.arity(), got)),
        }
    }
}

impl std::fmt::Debug for TemplateFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TemplateFn/{}", self.arity())
    }
}

// ── Template ──────────────────────────────────────────────────────────────────

/// A named collection of registered functions that can execute template
/// text against an optional data context.
#[derive(Debug, Default)]
pub struct Template {
    name: Option<String>,
    funcs: HashMap<String, TemplateFn>,
}

impl Template {
    pub fn new() -> Self {
        Template::default()
    }

    pub fn with_name(name: impl Into<String>) -> Self {
        Template {
            name: Some(name.into()),
            funcs: HashMap::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Register `func` under `name`.  Registered names shadow builtins;
    /// the keywords (`nil`, `true`, `false`, `with`, `end`) cannot be
    /// shadowed.
    pub fn register_fn(&mut self, name: impl Into<String>, func: TemplateFn) -> &mut Self {
        self.funcs.insert(name.into(), func);
        self
    }

    pub(crate) fn user_fn(&self, name: &str) -> Option<&TemplateFn> {
        self.funcs.get(name)
    }

    /// Render `source`, copying text outside actions verbatim and
    /// replacing each action with its pipeline's stringified result.
    ///
    /// The first error aborts execution; no partial output is returned.
    pub fn execute(&self, source: &str, data: Option<Data>) -> Result<String> {
        let mut scopes = ScopeStack::new(data);
        let mut out = String::new();
        let mut copied = 0;
        for caps in ACTION_RE.captures_iter(source) {
            let (Some(whole), Some(action)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            out.push_str(&source[copied..whole.start()]);
            copied = whole.end();
            debug!(action = action.as_str(), "evaluate");
            scopes.clear_acc();
            let mut tokens = lex::tokenize(action.as_str())?;
            eval::evaluate_pipeline(&mut tokens, &mut scopes, self)?;
            if let Some(leftover) = tokens.peek() {
                return Err(Error::Syntax(leftover.kind_str().to_owned()));
            }
            if let Some(value) = scopes.acc() {
                out.push_str(&value.to_string());
            }
        }
        out.push_str(&source[copied..]);
        if scopes.depth() > 1 {
            return Err(Error::Syntax("unclosed {{with}}".into()));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        let out = Template::new().execute("no actions here", None).unwrap();
        assert_eq!(out, "no actions here");
    }

    #[test]
    fn trim_markers_swallow_whitespace() {
        let out = Template::new().execute("{{23 -}} < {{- 45}}", None).unwrap();
        assert_eq!(out, "23<45");
    }

    #[test]
    fn empty_action_is_copied_verbatim() {
        // `{{}}` has no pipeline and is not treated as an action.
        let out = Template::new().execute("a{{}}b", None).unwrap();
        assert_eq!(out, "a{{}}b");
    }

    #[test]
    fn leftover_tokens_are_rejected() {
        assert_eq!(
            Template::new().execute("{{1 2}}", None),
            Err(Error::Syntax("literal".into()))
        );
    }

    #[test]
    fn unterminated_with_is_rejected() {
        assert_eq!(
            Template::new().execute(r#"{{with "x"}}inside"#, None),
            Err(Error::Syntax("unclosed {{with}}".into()))
        );
    }

    #[test]
    fn registered_function_arity_is_checked() {
        let mut tmpl = Template::new();
        tmpl.register_fn("id", TemplateFn::Arity1(Box::new(|v| v)));
        assert_eq!(
            tmpl.execute(r#"{{id "a" "b"}}"#, None),
            Err(Error::arity("id", 1, 2))
        );
    }

    #[test]
    fn registered_function_shadows_builtin() {
        let mut tmpl = Template::new();
        tmpl.register_fn(
            "len",
            TemplateFn::Arity1(Box::new(|_| Value::Str("shadowed".into()))),
        );
        assert_eq!(
            tmpl.execute(r#"{{len "foo"}}"#, None).unwrap(),
            "shadowed"
        );
    }
}
