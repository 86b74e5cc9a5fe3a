//! Shared error types.
//!
//! The core's failure taxonomy is narrow by design: out-of-range indices
//! and similar contract violations are fatal (assertions, not errors);
//! numeric edge cases are clamped silently. Only *expected absence* is
//! reported through these enums.

use std::error::Error;
use std::fmt;

use crate::id::SnapshotSlot;

/// Errors from the snapshot store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnapshotError {
    /// The slot was never saved. The live world is left untouched.
    NotFound {
        /// The empty slot that was requested.
        slot: SnapshotSlot,
    },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { slot } => write!(f, "snapshot slot {slot} was never saved"),
        }
    }
}

impl Error for SnapshotError {}

/// Errors submitting an intent to the updater task.
#[derive(Debug, PartialEq, Eq)]
pub enum SubmitError {
    /// The updater has shut down.
    Shutdown,
    /// The intent channel is full (back-pressure).
    ChannelFull,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shutdown => write!(f, "updater task has shut down"),
            Self::ChannelFull => write!(f, "intent channel full"),
        }
    }
}

impl Error for SubmitError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_error_names_the_slot() {
        let err = SnapshotError::NotFound {
            slot: SnapshotSlot::new(3).unwrap(),
        };
        assert_eq!(err.to_string(), "snapshot slot 3 was never saved");
    }

    #[test]
    fn submit_errors_display() {
        assert_eq!(SubmitError::Shutdown.to_string(), "updater task has shut down");
        assert_eq!(SubmitError::ChannelFull.to_string(), "intent channel full");
    }
}
