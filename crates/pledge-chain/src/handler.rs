//! Continuation kinds accepted by the chaining operations.
//!
//! A handler supplied to `then`/`then_resolve`/`then_reject` is either a
//! plain callback applied to the settlement payload, or another `Settlable`
//! whose own outcome the derived instance adopts ("thenable forwarding").
//! The variant is selected by pattern match at settlement time.

use std::fmt;

use crate::settlable::Settlable;

/// A continuation for one settlement branch.
///
/// `In` is the payload of the branch it handles, `Out` the payload of the
/// derived instance it settles, `E` the shared rejection channel.
pub enum Handler<In, Out, E> {
    /// Apply a callback; its return value settles the derived instance.
    Call(Box<dyn FnOnce(In) -> Out>),
    /// Discard the triggering payload and defer the derived instance to
    /// this forwarded target's own settlement.
    Adopt(Settlable<Out, E>),
}

impl<In, Out, E> Handler<In, Out, E> {
    /// Wrap a plain callback.
    pub fn call(callback: impl FnOnce(In) -> Out + 'static) -> Self {
        Self::Call(Box::new(callback))
    }

    /// Forward to another `Settlable` (clones the handle).
    pub fn adopt(target: &Settlable<Out, E>) -> Self {
        Self::Adopt(target.clone())
    }
}

impl<In, Out, E> fmt::Debug for Handler<In, Out, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Call(_) => f.write_str("Handler::Call(..)"),
            Self::Adopt(_) => f.write_str("Handler::Adopt(..)"),
        }
    }
}
