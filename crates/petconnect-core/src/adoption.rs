//! The adoption-request state machine.
//!
//! A pet moves between three statuses through four actions. The store
//! applies each action as one conditional update keyed on the expected
//! prior status (a compare-and-swap), so a transition either observes the
//! state it requires or fails with a conflict; two racing callers can never
//! both win.
//!
//! | From | Action | To | Side effect |
//! |------|--------|----|-------------|
//! | `not_adopted` | request | `requested` | stamp `requested_at`, store requester details |
//! | `requested` | accept | `adopted` | stamp `adopted_at`, requester retained |
//! | `requested` | reject | `not_adopted` | clear requester details and `requested_at` |
//! | `requested`, `adopted` | cancel | `not_adopted` | clear requester details and both timestamps |

use serde::{Deserialize, Serialize};

use crate::pet::AdoptionStatus;

/// One of the four lifecycle actions a caller can take against a pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdoptionAction {
  Request,
  Accept,
  Reject,
  Cancel,
}

impl AdoptionAction {
  /// The statuses this action may proceed from. The store turns this list
  /// into the conditional part of its compare-and-swap update.
  pub fn allowed_from(self) -> &'static [AdoptionStatus] {
    match self {
      Self::Request => &[AdoptionStatus::NotAdopted],
      Self::Accept | Self::Reject => &[AdoptionStatus::Requested],
      Self::Cancel => &[AdoptionStatus::Requested, AdoptionStatus::Adopted],
    }
  }

  /// The status a pet lands in after this action succeeds.
  pub fn target(self) -> AdoptionStatus {
    match self {
      Self::Request => AdoptionStatus::Requested,
      Self::Accept => AdoptionStatus::Adopted,
      Self::Reject | Self::Cancel => AdoptionStatus::NotAdopted,
    }
  }

  /// Whether this action may be applied to a pet currently in `status`.
  pub fn permits(self, status: AdoptionStatus) -> bool {
    self.allowed_from().contains(&status)
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Request => "request",
      Self::Accept => "accept",
      Self::Reject => "reject",
      Self::Cancel => "cancel",
    }
  }
}

impl std::fmt::Display for AdoptionAction {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}
