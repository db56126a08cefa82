//! Error types for the Pledge settlement core.
//!
//! All errors use the `PL_ERR_` prefix convention for easy grepping in
//! logs. Error codes are grouped by subsystem:
//! - 1xx: Settlement errors
//!
//! Note that rejection is NOT an error of the machinery: a rejected
//! `Settlable` carries its reason on the typed `E` channel. `PledgeError`
//! covers only the fallible `try_*` surface.

use thiserror::Error;

use crate::SettleState;

/// Central error enum for all Pledge operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PledgeError {
    // =================================================================
    // Settlement Errors (1xx)
    // =================================================================
    /// The instance has already made its one-shot transition.
    #[error("PL_ERR_100: already settled as {state}")]
    AlreadySettled {
        /// The terminal state the instance settled into.
        state: SettleState,
    },

    /// The instance has not settled yet; there is no outcome to read.
    #[error("PL_ERR_101: still pending")]
    StillPending,
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, PledgeError>;
