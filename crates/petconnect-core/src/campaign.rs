//! Campaign: a fundraising goal and its derived donation aggregate.
//!
//! The running total and the donor list are projections of the donation
//! ledger, folded in by the store as each donation commits. The donation
//! records themselves (see [`crate::donation`]) stay authoritative.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Status ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
  Active,
  Paused,
  Completed,
}

impl CampaignStatus {
  /// The string stored in the `status` column.
  /// Must match the `rename_all = "lowercase"` serde tags above.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Active => "active",
      Self::Paused => "paused",
      Self::Completed => "completed",
    }
  }

  /// Inverse of [`Self::as_str`]. `None` for unrecognised input.
  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "active" => Some(Self::Active),
      "paused" => Some(Self::Paused),
      "completed" => Some(Self::Completed),
      _ => None,
    }
  }

  /// The status after the running total moves to `new_total` against
  /// `target`. Completion triggers the moment the total reaches or exceeds
  /// the target and never reverts, regardless of pause state or later
  /// target edits.
  pub fn after_donation(self, new_total: Decimal, target: Decimal) -> Self {
    if self == Self::Completed || new_total >= target {
      Self::Completed
    } else {
      self
    }
  }
}

impl std::fmt::Display for CampaignStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Donor list ──────────────────────────────────────────────────────────────

/// One entry in a campaign's append-only donor projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorEntry {
  pub donor_email: String,
  pub amount:      Decimal,
  pub donated_at:  DateTime<Utc>,
}

// ─── Campaign ────────────────────────────────────────────────────────────────

/// A fundraising goal.
///
/// Invariant: `donated_amount` equals the sum of all recorded donations
/// against this campaign, and the status is `completed` exactly from the
/// first moment that sum reaches `max_donation_amount`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
  pub campaign_id:         Uuid,
  pub title:               String,
  pub description:         Option<String>,
  pub organizer_email:     String,
  /// The fundraising target.
  pub max_donation_amount: Decimal,
  /// Running total of every donation recorded against this campaign.
  pub donated_amount:      Decimal,
  pub status:              CampaignStatus,
  /// Ordered append-only projection of the donation ledger.
  pub donors:              Vec<DonorEntry>,
  pub created_at:          DateTime<Utc>,
}

// ─── NewCampaign ─────────────────────────────────────────────────────────────

/// Input to [`crate::store::MarketplaceStore::create_campaign`].
/// A new campaign starts `active` with a zero total and an empty donor list.
#[derive(Debug, Clone)]
pub struct NewCampaign {
  pub title:               String,
  pub description:         Option<String>,
  pub organizer_email:     String,
  pub max_donation_amount: Decimal,
}

impl NewCampaign {
  pub fn validate(&self) -> Result<()> {
    if self.title.trim().is_empty() {
      return Err(Error::MissingField("title"));
    }
    if self.organizer_email.trim().is_empty() {
      return Err(Error::MissingField("organizer email"));
    }
    if self.max_donation_amount <= Decimal::ZERO {
      return Err(Error::InvalidAmount(self.max_donation_amount));
    }
    Ok(())
  }
}

// ─── CampaignUpdate ──────────────────────────────────────────────────────────

/// A direct field edit. Lowering the target below the current total
/// completes the campaign (the completion rule is evaluated on every
/// target change).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignUpdate {
  pub title:               Option<String>,
  pub description:         Option<String>,
  pub max_donation_amount: Option<Decimal>,
}

impl CampaignUpdate {
  pub fn is_empty(&self) -> bool {
    self.title.is_none()
      && self.description.is_none()
      && self.max_donation_amount.is_none()
  }

  pub fn validate(&self) -> Result<()> {
    if let Some(target) = self.max_donation_amount {
      if target <= Decimal::ZERO {
        return Err(Error::InvalidAmount(target));
      }
    }
    Ok(())
  }
}
