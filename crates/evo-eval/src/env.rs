//! Lexically scoped environment frames.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use evo_types::Span;

use crate::error::{EvalError, EvalResult};
use crate::value::Value;

/// Bindings of one frame, as captured by [`Environment::snapshot`].
pub type Bindings = BTreeMap<String, Value>;

/// A handle to one frame in a chain of frames.
///
/// Cloning the handle shares the frame. A function value holds a handle to
/// the frame it was defined in, keeping that frame alive.
#[derive(Clone)]
pub struct Environment {
    inner: Rc<RefCell<Frame>>,
}

struct Frame {
    bindings: Bindings,
    parent: Option<Environment>,
}

impl Environment {
    /// A root frame with no bindings.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Frame {
                bindings: BTreeMap::new(),
                parent: None,
            })),
        }
    }

    /// A new empty frame whose parent is this one.
    pub fn child(&self) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Frame {
                bindings: BTreeMap::new(),
                parent: Some(self.clone()),
            })),
        }
    }

    /// Bind `name` in this frame, replacing any existing binding here.
    /// Ancestor frames are never touched.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.inner.borrow_mut().bindings.insert(name.into(), value);
    }

    /// The nearest binding of `name`, walking outward.
    pub fn get(&self, name: &str) -> Option<Value> {
        let mut current = Rc::clone(&self.inner);
        loop {
            let parent = {
                let frame = current.borrow();
                if let Some(value) = frame.bindings.get(name) {
                    return Some(value.clone());
                }
                let parent = frame.parent.as_ref()?;
                Rc::clone(&parent.inner)
            };
            current = parent;
        }
    }

    /// Like [`get`](Self::get), failing with `UnboundSymbol` at `span`.
    pub fn lookup(&self, name: &str, span: Span) -> EvalResult<Value> {
        self.get(name).ok_or_else(|| EvalError::UnboundSymbol {
            name: name.to_string(),
            span,
        })
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of frames from this one to the root, inclusive.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self.inner.borrow().parent.clone();
        while let Some(env) = current {
            depth += 1;
            current = env.inner.borrow().parent.clone();
        }
        depth
    }

    /// Number of live handles on this frame.
    #[cfg(test)]
    pub(crate) fn handle_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }

    /// Returns `true` if both handles refer to the same frame.
    pub fn ptr_eq(&self, other: &Environment) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // ── Rollback ──────────────────────────────────────────────────────────────

    /// Copy of this frame's own bindings.
    pub fn snapshot(&self) -> Bindings {
        self.inner.borrow().bindings.clone()
    }

    /// Replace this frame's own bindings with a snapshot.
    pub fn restore(&self, bindings: Bindings) {
        let discarded = std::mem::replace(&mut self.inner.borrow_mut().bindings, bindings);
        drop(discarded);
    }

    /// Drop every binding in this frame.
    ///
    /// A function bound in the frame it captured forms an `Rc` cycle; clearing
    /// the frame breaks it.
    pub fn clear(&self) {
        let discarded = std::mem::take(&mut self.inner.borrow_mut().bindings);
        drop(discarded);
    }

    /// Clear this frame if nothing can reach it any more except through this
    /// handle and the functions bound in it that captured it.
    ///
    /// A frame still reachable from elsewhere (a returned function, a child
    /// frame kept alive by a closure) is left untouched. Returns `true` if
    /// the frame was cleared.
    pub fn release(&self) -> bool {
        let self_captures = {
            let frame = self.inner.borrow();
            let mut count = 0;
            for value in frame.bindings.values() {
                if let Value::Function(closure) = value {
                    if closure.env.ptr_eq(self) {
                        if Rc::strong_count(closure) > 1 {
                            return false;
                        }
                        count += 1;
                    }
                }
            }
            count
        };
        if Rc::strong_count(&self.inner) != self_captures + 1 {
            return false;
        }
        self.clear();
        true
    }
}

impl Drop for Frame {
    // Unlinks a long parent chain iteratively.
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(env) = next {
            next = match Rc::try_unwrap(env.inner) {
                Ok(cell) => cell.into_inner().parent.take(),
                Err(_) => None,
            };
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Environment {
    // Names only: values may hold this same frame.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.inner.borrow();
        f.debug_struct("Environment")
            .field("bindings", &frame.bindings.keys().collect::<Vec<_>>())
            .field("depth", &self.depth())
            .finish()
    }
}
