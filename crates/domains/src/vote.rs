//! Vote tally arithmetic.
//!
//! A user holds at most one vote per thread. The thread's `votes` column is a
//! running sum of those votes, so every cast changes it by the difference
//! between the new voice and the one previously stored.

use crate::error::{DomainError, Result};

/// Rejects anything other than `+1` or `-1`.
pub fn validate_voice(voice: i32) -> Result<()> {
    match voice {
        1 | -1 => Ok(()),
        other => Err(DomainError::BadRequest(format!(
            "voice must be 1 or -1, got {other}"
        ))),
    }
}

/// Amount to add to a thread's tally when `voice` is cast by a user whose
/// stored vote is `previous`.
pub fn vote_delta(previous: Option<i32>, voice: i32) -> i32 {
    match previous {
        None => voice,
        Some(old) if old == voice => 0,
        Some(old) => voice - old,
    }
}
