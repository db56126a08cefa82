//! Settlement lifecycle tag for a `Settlable`.
//!
//! Every instance starts in PENDING and makes exactly one transition:
//! **PENDING → RESOLVED** or **PENDING → REJECTED**. There is no way back;
//! the terminal states absorb all further settlement attempts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The three lifecycle states of a `Settlable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettleState {
    /// Not yet settled; continuations queue up for later.
    Pending,
    /// Settled with a value; resolve continuations have fired.
    Resolved,
    /// Settled with a reason; reject continuations have fired.
    Rejected,
}

impl fmt::Display for SettleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Resolved => write!(f, "RESOLVED"),
            Self::Rejected => write!(f, "REJECTED"),
        }
    }
}

impl SettleState {
    /// Whether this state is terminal (RESOLVED or REJECTED).
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}
