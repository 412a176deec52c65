//! Listing moderation state machine.
//!
//! A listing is born `PENDING` and an administrator moves it to `APPROVED`
//! or `REJECTED` exactly once. Terminal states accept no further
//! transitions; re-review requires a new submission.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Moderation status of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ListingStatus {
    Pending,
    Approved,
    Rejected,
}

impl ListingStatus {
    /// The canonical value stored in the `businesses.status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            ListingStatus::Pending => "PENDING",
            ListingStatus::Approved => "APPROVED",
            ListingStatus::Rejected => "REJECTED",
        }
    }

    /// Parse a stored or submitted status value.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "PENDING" => Ok(ListingStatus::Pending),
            "APPROVED" => Ok(ListingStatus::Approved),
            "REJECTED" => Ok(ListingStatus::Rejected),
            other => Err(CoreError::Validation(format!("unknown status: {other}"))),
        }
    }

    /// Whether this status accepts no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, ListingStatus::Approved | ListingStatus::Rejected)
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check that moving `current` to `target` is a legal transition.
///
/// The only legal transitions are `PENDING -> APPROVED` and
/// `PENDING -> REJECTED`. A request that targets `PENDING` itself is a
/// validation error; a request against a row that already left `PENDING`
/// is a conflict (the row state the caller saw is stale).
pub fn verify_transition(current: ListingStatus, target: ListingStatus) -> Result<(), CoreError> {
    if target == ListingStatus::Pending {
        return Err(CoreError::Validation(
            "a listing cannot be moved back to PENDING".into(),
        ));
    }
    if current.is_terminal() {
        return Err(CoreError::Conflict(format!(
            "listing is already {current}, no further transition is allowed"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn status_round_trips() {
        for status in [
            ListingStatus::Pending,
            ListingStatus::Approved,
            ListingStatus::Rejected,
        ] {
            assert_eq!(ListingStatus::parse(status.as_str()).unwrap(), status);
        }
        assert_matches!(ListingStatus::parse("LIMBO"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn pending_can_move_to_either_terminal_state() {
        assert!(verify_transition(ListingStatus::Pending, ListingStatus::Approved).is_ok());
        assert!(verify_transition(ListingStatus::Pending, ListingStatus::Rejected).is_ok());
    }

    #[test]
    fn terminal_states_accept_no_transition() {
        for current in [ListingStatus::Approved, ListingStatus::Rejected] {
            for target in [ListingStatus::Approved, ListingStatus::Rejected] {
                assert_matches!(
                    verify_transition(current, target),
                    Err(CoreError::Conflict(_))
                );
            }
        }
    }

    #[test]
    fn nothing_transitions_back_to_pending() {
        for current in [
            ListingStatus::Pending,
            ListingStatus::Approved,
            ListingStatus::Rejected,
        ] {
            assert_matches!(
                verify_transition(current, ListingStatus::Pending),
                Err(CoreError::Validation(_))
            );
        }
    }

    #[test]
    fn status_serializes_screaming() {
        assert_eq!(
            serde_json::to_string(&ListingStatus::Pending).unwrap(),
            "\"PENDING\""
        );
    }
}
