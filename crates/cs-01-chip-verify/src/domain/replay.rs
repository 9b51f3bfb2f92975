//! # Replay Guard
//!
//! Monotonic counter parsing and the acceptance rule. A presented counter
//! is accepted only when strictly greater than the stored value; equal or
//! lesser values signal a replayed capture or a cloned chip.
//!
//! The decision here is pure. The accept-and-advance side effect is the
//! registry's atomic conditional update (`advance_counter`), invoked by the
//! orchestrator so that two concurrent scans can never both advance from
//! the same stored value.

use crate::domain::errors::VerifyError;

/// Decision on a presented counter relative to the stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayDecision {
    /// Strictly newer than the stored value; eligible for acceptance.
    Fresh {
        /// The value the chip counter will advance to on acceptance.
        presented: u64,
    },
    /// Equal or older: a replay or counter-rollback signal.
    Replayed {
        /// Last-accepted counter on record.
        stored: u64,
        /// The stale value the caller presented.
        presented: u64,
    },
}

/// Parse the raw counter string as a non-negative integer.
///
/// Failure is a client error (`BadCounter`), distinct from the replay
/// case: an unparseable counter says nothing about chip authenticity.
pub fn parse_counter(raw: &str) -> Result<u64, VerifyError> {
    raw.parse::<u64>().map_err(|_| VerifyError::BadCounter)
}

/// Apply the strict-increase acceptance rule.
#[must_use]
pub fn check_counter(stored: u64, presented: u64) -> ReplayDecision {
    if presented > stored {
        ReplayDecision::Fresh { presented }
    } else {
        ReplayDecision::Replayed { stored, presented }
    }
}
