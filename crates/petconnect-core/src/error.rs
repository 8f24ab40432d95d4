//! Error types for `petconnect-core`.
//!
//! Variants group into four classes: missing/malformed input, missing
//! records, lifecycle conflicts, and backend failures. The HTTP layer maps
//! each class to a status code; the store backend converts its internal
//! failures into [`Error::Store`].

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::{
  adoption::AdoptionAction, campaign::CampaignStatus, pet::AdoptionStatus,
};

#[derive(Debug, Error)]
pub enum Error {
  #[error("missing required field: {0}")]
  MissingField(&'static str),

  #[error("amount must be positive, got {0}")]
  InvalidAmount(Decimal),

  /// A field-edit request carried no fields at all.
  #[error("no fields to update")]
  EmptyUpdate,

  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("pet not found: {0}")]
  PetNotFound(Uuid),

  #[error("campaign not found: {0}")]
  CampaignNotFound(Uuid),

  #[error("donation not found: {0}")]
  DonationNotFound(Uuid),

  #[error("email already registered: {0}")]
  EmailTaken(String),

  /// A lifecycle action was attempted against a pet whose current status
  /// does not permit it. "Nothing to reject" and friends all land here.
  #[error("cannot {action}: pet is {status}")]
  InvalidTransition {
    action: AdoptionAction,
    status: AdoptionStatus,
  },

  /// Pause/resume attempted against a campaign whose status forbids it.
  #[error("campaign is {status}")]
  CampaignStateConflict { status: CampaignStatus },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  /// The persistence backend failed. The message carries the backend's own
  /// description; nothing about the request was applied.
  #[error("store error: {0}")]
  Store(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
