//! Scope frames for `with` blocks.
//!
//! Each frame owns its data context, its declared variables, and the
//! pipeline accumulator.  `with` pushes a frame, `end` pops it; the root
//! frame is always present.  Keeping frames in a `Vec` makes the chain walk
//! for variable lookup a plain reverse iteration.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::value::{Data, Value};

#[derive(Debug, Default)]
struct Frame {
    data: Option<Data>,
    vars: HashMap<String, Value>,
    acc: Option<Value>,
}

#[derive(Debug)]
pub(crate) struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    pub fn new(data: Option<Data>) -> Self {
        ScopeStack {
            frames: vec![Frame {
                data,
                ..Frame::default()
            }],
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    fn top(&self) -> &Frame {
        // The root frame is never popped.
        self.frames.last().unwrap_or_else(|| unreachable!())
    }

    fn top_mut(&mut self) -> &mut Frame {
        self.frames.last_mut().unwrap_or_else(|| unreachable!())
    }

    /// Open a `with` frame whose data context is `data`.
    pub fn push(&mut self, data: Option<Data>) {
        self.frames.push(Frame {
            data,
            ..Frame::default()
        });
    }

    /// Close the innermost `with` frame.
    pub fn pop(&mut self) -> Result<()> {
        if self.frames.len() == 1 {
            return Err(Error::Syntax("unexpected {{end}}".into()));
        }
        self.frames.pop();
        Ok(())
    }

    /// Resolve `$name`, walking innermost to outermost.
    pub fn lookup(&self, name: &str) -> Result<Value> {
        for frame in self.frames.iter().rev() {
            if let Some(value) = frame.vars.get(name) {
                return Ok(value.clone());
            }
        }
        Err(Error::UndefinedVariable(name.to_owned()))
    }

    /// Bind `$name` in the innermost frame.
    pub fn declare(&mut self, name: &str, value: Value) {
        self.top_mut().vars.insert(name.to_owned(), value);
    }

    pub fn data(&self) -> Option<&Data> {
        self.top().data.as_ref()
    }

    pub fn set_data(&mut self, data: Option<Data>) {
        self.top_mut().data = data;
    }

    pub fn acc(&self) -> Option<&Value> {
        self.top().acc.as_ref()
    }

    pub fn set_acc(&mut self, value: Value) {
        self.top_mut().acc = Some(value);
    }

    pub fn clear_acc(&mut self) {
        self.top_mut().acc = None;
    }
}
