//! Terminal outcome of a settled `Settlable`.
//!
//! An `Outcome` pairs the terminal branch with the payload it carried.
//! Storing the payload inside the enum keeps value and reason mutually
//! exclusive by construction.

use serde::{Deserialize, Serialize};

use crate::SettleState;

/// The payload-carrying terminal outcome of a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome<T, E> {
    /// The instance resolved with a value.
    Resolved(T),
    /// The instance rejected with a reason.
    Rejected(E),
}

impl<T, E> Outcome<T, E> {
    /// The lifecycle tag this outcome corresponds to.
    #[must_use]
    pub fn state(&self) -> SettleState {
        match self {
            Self::Resolved(_) => SettleState::Resolved,
            Self::Rejected(_) => SettleState::Rejected,
        }
    }

    /// Whether this outcome is a resolution.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Whether this outcome is a rejection.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }

    /// Convert into a standard `Result`, mapping resolution to `Ok` and
    /// rejection to `Err`.
    pub fn into_result(self) -> std::result::Result<T, E> {
        match self {
            Self::Resolved(value) => Ok(value),
            Self::Rejected(reason) => Err(reason),
        }
    }

    /// The resolve value, if this outcome is a resolution.
    pub fn value(self) -> Option<T> {
        match self {
            Self::Resolved(value) => Some(value),
            Self::Rejected(_) => None,
        }
    }

    /// The reject reason, if this outcome is a rejection.
    pub fn reason(self) -> Option<E> {
        match self {
            Self::Resolved(_) => None,
            Self::Rejected(reason) => Some(reason),
        }
    }
}
