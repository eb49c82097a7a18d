//! Error types for ladder commands.

use thiserror::Error;

use crate::model::PlayerId;
use crate::store::StoreError;

/// Top-level error returned by [`Ladder::apply`](super::Ladder::apply).
#[derive(Debug, Error)]
pub enum LadderError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),

    #[error("ladder is no longer accepting commands")]
    Closed,
}

/// A command was rejected before touching the ledger.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid result '{0}', expected W or L")]
    InvalidResult(String),

    #[error("player {0} reported a match against themselves")]
    SelfMatch(PlayerId),

    #[error("player {0} is not registered")]
    NotRegistered(PlayerId),

    #[error("player {0} has reached the maximum recordable count")]
    CounterOverflow(PlayerId),
}
