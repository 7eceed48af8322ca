//! An interpreter for a Go `text/template`-style action language.
//!
//! Templates are plain text with embedded actions delimited by `{{` and
//! `}}` (or the whitespace-trimming `{{- `/` -}}` variants).  Each action
//! holds a pipeline: commands joined by `|`, where the result of one
//! command becomes the final argument of the next.  `with`/`end` open and
//! close scopes, `$name := ...` declares variables, and dotted selectors
//! read from the data context.
//!
//! ```
//! use gotpl::{Data, Template, TemplateFn, Value};
//!
//! let mut tmpl = Template::new();
//! tmpl.register_fn(
//!     "shout",
//!     TemplateFn::Arity1(Box::new(|v| Value::Str(v.to_string().to_uppercase()))),
//! );
//!
//! let data = Data::map([("name", Data::from("world"))]);
//! let out = tmpl
//!     .execute("hello, {{.name | shout}}!", Some(data))
//!     .unwrap();
//! assert_eq!(out, "hello, WORLD!");
//! ```

pub mod error;
pub mod fmt;
pub mod lex;
pub mod template;
pub mod value;

mod builtins;
mod eval;
mod scope;

pub use error::{Error, Result};
pub use template::{Template, TemplateFn};
pub use value::{sprint, Data, Value};
