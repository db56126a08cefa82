//! # pledge-chain
//!
//! **Settlement core for Pledge.**
//!
//! [`Settlable`] is a placeholder for a value that is not yet known. It has:
//!
//! - **One-shot settlement**: exactly one PENDING → RESOLVED/REJECTED
//!   transition; later settlement attempts are silent no-ops
//! - **Synchronous continuations**: queued callbacks run inline at
//!   settlement time, in FIFO registration order
//! - **Chaining**: `then` derives a new instance whose outcome is the
//!   chosen [`Handler`] applied to the receiver's eventual settlement,
//!   including thenable adoption of a forwarded instance
//! - **AND-join**: [`join`] composes many instances into one that resolves
//!   when all resolve and rejects on the first rejection
//!
//! Everything here is single-threaded and purely synchronous: no scheduler,
//! no event loop, no suspension point. Settlement runs every pending
//! continuation before returning control to the caller.

pub mod handler;
pub mod join;
pub mod settlable;

pub use handler::Handler;
pub use join::join;
pub use settlable::Settlable;
