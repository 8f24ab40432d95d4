//! Pet: the adoptable-animal record.
//!
//! The adoption status and the embedded requester snapshot are mutated only
//! through the lifecycle actions in [`crate::adoption`]; every other field
//! is a plain attribute editable by the owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Adoption status ─────────────────────────────────────────────────────────

/// Where a pet sits in the adoption lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdoptionStatus {
  NotAdopted,
  Requested,
  Adopted,
}

impl AdoptionStatus {
  /// The string stored in the `status` column.
  /// Must match the `rename_all = "snake_case"` serde tags above.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::NotAdopted => "not_adopted",
      Self::Requested => "requested",
      Self::Adopted => "adopted",
    }
  }

  /// Inverse of [`Self::as_str`]. `None` for unrecognised input.
  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "not_adopted" => Some(Self::NotAdopted),
      "requested" => Some(Self::Requested),
      "adopted" => Some(Self::Adopted),
      _ => None,
    }
  }
}

impl std::fmt::Display for AdoptionStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Requester details ───────────────────────────────────────────────────────

/// Contact snapshot captured at request time. Embedded in the pet record
/// while a request is pending (and retained after acceptance); cleared
/// whenever the status resets to `not_adopted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequesterDetails {
  pub name:    String,
  pub email:   String,
  pub contact: String,
  pub address: String,
}

impl RequesterDetails {
  /// All four contact fields are required to open a request.
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::MissingField("requester name"));
    }
    if self.email.trim().is_empty() {
      return Err(Error::MissingField("requester email"));
    }
    if self.contact.trim().is_empty() {
      return Err(Error::MissingField("requester contact"));
    }
    if self.address.trim().is_empty() {
      return Err(Error::MissingField("requester address"));
    }
    Ok(())
  }
}

// ─── Pet ─────────────────────────────────────────────────────────────────────

/// One adoptable animal.
///
/// Invariant: `requester` and `requested_at` are both set while the status
/// is `requested` or `adopted`, and both cleared when it is `not_adopted`.
/// `adopted_at` is set exactly while the status is `adopted`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pet {
  pub pet_id:       Uuid,
  pub name:         String,
  /// Free-text species/kind, e.g. "dog". Matched case-insensitively in
  /// listing filters.
  pub category:     String,
  pub owner_email:  String,
  pub status:       AdoptionStatus,
  pub requester:    Option<RequesterDetails>,
  pub age:          Option<String>,
  pub location:     Option<String>,
  pub description:  Option<String>,
  pub image_url:    Option<String>,
  pub created_at:   DateTime<Utc>,
  pub requested_at: Option<DateTime<Utc>>,
  pub adopted_at:   Option<DateTime<Utc>>,
}

// ─── NewPet ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::MarketplaceStore::add_pet`].
/// Id, status, and timestamps are always assigned by the store; a new pet
/// starts out `not_adopted` with no requester.
#[derive(Debug, Clone)]
pub struct NewPet {
  pub name:        String,
  pub category:    String,
  pub owner_email: String,
  pub age:         Option<String>,
  pub location:    Option<String>,
  pub description: Option<String>,
  pub image_url:   Option<String>,
}

impl NewPet {
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::MissingField("name"));
    }
    if self.category.trim().is_empty() {
      return Err(Error::MissingField("category"));
    }
    if self.owner_email.trim().is_empty() {
      return Err(Error::MissingField("owner email"));
    }
    Ok(())
  }
}

// ─── PetUpdate ───────────────────────────────────────────────────────────────

/// A direct field edit. Only the attributes listed here are editable this
/// way; status, requester, and timestamps move exclusively through the
/// lifecycle actions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PetUpdate {
  pub name:        Option<String>,
  pub category:    Option<String>,
  pub age:         Option<String>,
  pub location:    Option<String>,
  pub description: Option<String>,
  pub image_url:   Option<String>,
}

impl PetUpdate {
  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.category.is_none()
      && self.age.is_none()
      && self.location.is_none()
      && self.description.is_none()
      && self.image_url.is_none()
  }
}
