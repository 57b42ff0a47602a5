//! Stack growth for the recursive parser, evaluator and tree walks.
//!
//! Nesting depth is bounded by memory, not by the native stack: every
//! recursive step goes through [`ensure_sufficient_stack`], which moves onto
//! a freshly allocated segment when the current one runs low.
//!
//! On `wasm32` this is a plain call; the host engine owns the stack and
//! reports exhaustion as a catchable trap.

/// Grow when less than this much stack remains (100KB).
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, first switching to a new stack segment if the current one is
/// nearly exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
