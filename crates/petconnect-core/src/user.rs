//! User: a registered account on the marketplace.
//!
//! Registration is authentication-free; the role field is recorded for
//! display purposes and never enforced by the core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// The role a user registered under. Informational only.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
  #[default]
  Adopter,
  Owner,
  Admin,
}

impl UserRole {
  /// The string stored in the `role` column.
  /// Must match the `rename_all = "lowercase"` serde tags above.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Adopter => "adopter",
      Self::Owner => "owner",
      Self::Admin => "admin",
    }
  }

  /// Inverse of [`Self::as_str`]. `None` for unrecognised input.
  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "adopter" => Some(Self::Adopter),
      "owner" => Some(Self::Owner),
      "admin" => Some(Self::Admin),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub user_id:    Uuid,
  pub name:       String,
  /// Unique across the store; registration against a taken email fails.
  pub email:      String,
  pub role:       UserRole,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::MarketplaceStore::register_user`].
/// `user_id` and `created_at` are always assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub name:  String,
  pub email: String,
  pub role:  UserRole,
}

impl NewUser {
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::MissingField("name"));
    }
    if self.email.trim().is_empty() {
      return Err(Error::MissingField("email"));
    }
    Ok(())
  }
}
