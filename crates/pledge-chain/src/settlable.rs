//! The `Settlable` deferred-value core.
//!
//! A `Settlable<T, E>` starts PENDING, settles exactly once (resolve with a
//! `T` or reject with an `E`), and runs the queued continuations of the
//! matching branch synchronously, in FIFO registration order, at the moment
//! of settlement. Continuations registered after settlement fire
//! immediately; continuations for the branch that did not occur are
//! discarded.
//!
//! Cloning a `Settlable` clones the *handle*, not the instance: both
//! handles settle and observe the same underlying cell. The continuation
//! queue is drained and the cell borrow released before any continuation
//! runs, so a continuation may freely call `resolve`, `reject`, or `then`
//! on any instance, including the one that is currently settling.

use std::cell::RefCell;
use std::fmt;
use std::mem;
use std::rc::Rc;

use pledge_types::{Outcome, PledgeError, Result, SettleState};

use crate::handler::Handler;

/// Continuation queued on the resolve branch.
pub(crate) type ResolveFn<T> = Box<dyn FnOnce(T)>;
/// Continuation queued on the reject branch.
pub(crate) type RejectFn<E> = Box<dyn FnOnce(E)>;

/// The one-shot settlement cell. Keeping the payload inside the enum makes
/// value and reason mutually exclusive by construction.
enum Settlement<T, E> {
    Pending,
    Resolved(T),
    Rejected(E),
}

impl<T, E> Settlement<T, E> {
    fn state(&self) -> SettleState {
        match self {
            Self::Pending => SettleState::Pending,
            Self::Resolved(_) => SettleState::Resolved,
            Self::Rejected(_) => SettleState::Rejected,
        }
    }
}

/// Shared instance state behind every handle.
struct Inner<T, E> {
    settlement: Settlement<T, E>,
    /// Resolve continuations in registration order. Drained on settlement.
    on_resolve: Vec<ResolveFn<T>>,
    /// Reject continuations in registration order. Drained on settlement.
    on_reject: Vec<RejectFn<E>>,
}

/// A settable, chainable placeholder for a value that is not yet known.
///
/// Each queued continuation receives its own clone of the settlement
/// payload, hence the `Clone` bounds on `T` and `E`.
pub struct Settlable<T, E> {
    inner: Rc<RefCell<Inner<T, E>>>,
}

impl<T, E> Clone for Settlable<T, E> {
    /// Clones the handle. Both handles refer to the same instance.
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T, E> fmt::Debug for Settlable<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Settlable")
            .field("state", &inner.settlement.state())
            .field("queued", &(inner.on_resolve.len() + inner.on_reject.len()))
            .finish()
    }
}

impl<T, E> Default for Settlable<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Settlable<T, E>
where
    T: Clone + 'static,
    E: Clone + 'static,
{
    /// Create a new instance in PENDING state with empty queues.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                settlement: Settlement::Pending,
                on_resolve: Vec::new(),
                on_reject: Vec::new(),
            })),
        }
    }

    /// The current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SettleState {
        self.inner.borrow().settlement.state()
    }

    /// Whether the instance has not yet settled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state() == SettleState::Pending
    }

    /// Whether the instance has made its one-shot transition.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.state().is_terminal()
    }

    /// A clone of the resolve value, if resolved.
    #[must_use]
    pub fn value(&self) -> Option<T> {
        match &self.inner.borrow().settlement {
            Settlement::Resolved(value) => Some(value.clone()),
            Settlement::Pending | Settlement::Rejected(_) => None,
        }
    }

    /// A clone of the reject reason, if rejected.
    #[must_use]
    pub fn reason(&self) -> Option<E> {
        match &self.inner.borrow().settlement {
            Settlement::Rejected(reason) => Some(reason.clone()),
            Settlement::Pending | Settlement::Resolved(_) => None,
        }
    }

    /// The terminal outcome.
    ///
    /// # Errors
    /// Returns [`PledgeError::StillPending`] while the instance is pending.
    pub fn try_outcome(&self) -> Result<Outcome<T, E>> {
        match &self.inner.borrow().settlement {
            Settlement::Pending => Err(PledgeError::StillPending),
            Settlement::Resolved(value) => Ok(Outcome::Resolved(value.clone())),
            Settlement::Rejected(reason) => Ok(Outcome::Rejected(reason.clone())),
        }
    }

    /// Number of continuations currently queued across both branches.
    ///
    /// Always 0 once settled: the fired branch is drained and the other
    /// discarded. A chained registration (`then*`) contributes one entry on
    /// each branch.
    #[must_use]
    pub fn pending_continuations(&self) -> usize {
        let inner = self.inner.borrow();
        inner.on_resolve.len() + inner.on_reject.len()
    }

    /// Settle as RESOLVED with `value`.
    ///
    /// If pending: stores the value, discards the reject queue, then
    /// invokes every queued resolve continuation in FIFO order, each with
    /// its own clone of the value, before returning. If already settled:
    /// silent no-op.
    pub fn resolve(&self, value: T) {
        let queue = {
            let mut cell = self.inner.borrow_mut();
            let inner = &mut *cell;
            if !matches!(inner.settlement, Settlement::Pending) {
                return;
            }
            inner.settlement = Settlement::Resolved(value.clone());
            inner.on_reject.clear();
            mem::take(&mut inner.on_resolve)
        };
        tracing::debug!(continuations = queue.len(), "Settled as RESOLVED");
        for continuation in queue {
            continuation(value.clone());
        }
    }

    /// Settle as REJECTED with `reason`.
    ///
    /// Mirror of [`Settlable::resolve`] on the reject branch.
    pub fn reject(&self, reason: E) {
        let queue = {
            let mut cell = self.inner.borrow_mut();
            let inner = &mut *cell;
            if !matches!(inner.settlement, Settlement::Pending) {
                return;
            }
            inner.settlement = Settlement::Rejected(reason.clone());
            inner.on_resolve.clear();
            mem::take(&mut inner.on_reject)
        };
        tracing::debug!(continuations = queue.len(), "Settled as REJECTED");
        for continuation in queue {
            continuation(reason.clone());
        }
    }

    /// Like [`Settlable::resolve`], but reports an attempted double
    /// settlement instead of silently ignoring it.
    ///
    /// # Errors
    /// Returns [`PledgeError::AlreadySettled`] if the instance has settled.
    pub fn try_resolve(&self, value: T) -> Result<()> {
        let state = self.state();
        if state.is_terminal() {
            return Err(PledgeError::AlreadySettled { state });
        }
        self.resolve(value);
        Ok(())
    }

    /// Like [`Settlable::reject`], but reports an attempted double
    /// settlement instead of silently ignoring it.
    ///
    /// # Errors
    /// Returns [`PledgeError::AlreadySettled`] if the instance has settled.
    pub fn try_reject(&self, reason: E) -> Result<()> {
        let state = self.state();
        if state.is_terminal() {
            return Err(PledgeError::AlreadySettled { state });
        }
        self.reject(reason);
        Ok(())
    }

    /// Derive a new instance from handlers for both branches.
    ///
    /// - Receiver resolves with `v`, `on_resolve` is [`Handler::Call`]:
    ///   the derived instance resolves with the callback's return value.
    /// - Receiver rejects with `r`, `on_reject` is [`Handler::Call`]: the
    ///   derived instance **resolves** with the callback's return value;
    ///   supplying a reject handler means recovery.
    /// - Either handler is [`Handler::Adopt`]: the triggering payload is
    ///   discarded and the derived instance adopts the forwarded target's
    ///   own eventual outcome (resolve → resolve, reject → reject). An
    ///   already-settled target fires through immediately.
    ///
    /// Each `then*` call produces its own independent derived instance and
    /// its own queue entries, in registration order.
    pub fn then<U>(
        &self,
        on_resolve: Handler<T, U, E>,
        on_reject: Handler<E, U, E>,
    ) -> Settlable<U, E>
    where
        U: Clone + 'static,
    {
        let derived = Settlable::new();
        self.subscribe_resolve(resolve_arm(on_resolve, &derived));
        self.subscribe_reject(reject_arm(on_reject, &derived));
        derived
    }

    /// [`Settlable::then`] with the reject handler omitted: a rejection
    /// forwards its reason unchanged into the derived instance.
    pub fn then_resolve<U>(&self, on_resolve: Handler<T, U, E>) -> Settlable<U, E>
    where
        U: Clone + 'static,
    {
        let derived = Settlable::new();
        self.subscribe_resolve(resolve_arm(on_resolve, &derived));
        let down = derived.clone();
        self.subscribe_reject(Box::new(move |reason| down.reject(reason)));
        derived
    }

    /// [`Settlable::then`] with the resolve handler omitted: a resolution
    /// forwards its value unchanged into the derived instance.
    pub fn then_reject(&self, on_reject: Handler<E, T, E>) -> Settlable<T, E> {
        let derived = Settlable::new();
        let down = derived.clone();
        self.subscribe_resolve(Box::new(move |value| down.resolve(value)));
        self.subscribe_reject(reject_arm(on_reject, &derived));
        derived
    }

    /// [`Settlable::then`] with both handlers omitted: the derived instance
    /// mirrors this instance's eventual outcome on both branches.
    pub fn then_forward(&self) -> Settlable<T, E> {
        let derived = Settlable::new();
        self.forward_into(&derived);
        derived
    }

    /// Adoption wiring: settle `downstream` with whatever outcome this
    /// instance eventually carries.
    pub(crate) fn forward_into(&self, downstream: &Settlable<T, E>) {
        let down = downstream.clone();
        self.subscribe_resolve(Box::new(move |value| down.resolve(value)));
        let down = downstream.clone();
        self.subscribe_reject(Box::new(move |reason| down.reject(reason)));
    }

    /// Queue a resolve continuation, or fire it immediately if already
    /// resolved. Discarded if already rejected.
    pub(crate) fn subscribe_resolve(&self, continuation: ResolveFn<T>) {
        let value = {
            let mut cell = self.inner.borrow_mut();
            let inner = &mut *cell;
            match &inner.settlement {
                Settlement::Pending => {
                    inner.on_resolve.push(continuation);
                    return;
                }
                Settlement::Resolved(value) => Some(value.clone()),
                Settlement::Rejected(_) => None,
            }
        };
        if let Some(value) = value {
            continuation(value);
        }
    }

    /// Queue a reject continuation, or fire it immediately if already
    /// rejected. Discarded if already resolved.
    pub(crate) fn subscribe_reject(&self, continuation: RejectFn<E>) {
        let reason = {
            let mut cell = self.inner.borrow_mut();
            let inner = &mut *cell;
            match &inner.settlement {
                Settlement::Pending => {
                    inner.on_reject.push(continuation);
                    return;
                }
                Settlement::Rejected(reason) => Some(reason.clone()),
                Settlement::Resolved(_) => None,
            }
        };
        if let Some(reason) = reason {
            continuation(reason);
        }
    }
}

/// Build the resolve-branch continuation for a derived instance.
fn resolve_arm<T, U, E>(handler: Handler<T, U, E>, derived: &Settlable<U, E>) -> ResolveFn<T>
where
    T: Clone + 'static,
    U: Clone + 'static,
    E: Clone + 'static,
{
    let derived = derived.clone();
    match handler {
        Handler::Call(callback) => Box::new(move |value| derived.resolve(callback(value))),
        Handler::Adopt(target) => Box::new(move |_value| target.forward_into(&derived)),
    }
}

/// Build the reject-branch continuation for a derived instance. A plain
/// callback here recovers: its return value resolves the chain.
fn reject_arm<U, E>(handler: Handler<E, U, E>, derived: &Settlable<U, E>) -> RejectFn<E>
where
    U: Clone + 'static,
    E: Clone + 'static,
{
    let derived = derived.clone();
    match handler {
        Handler::Call(callback) => Box::new(move |reason| derived.resolve(callback(reason))),
        Handler::Adopt(target) => Box::new(move |_reason| target.forward_into(&derived)),
    }
}
