//! Donation: one immutable row in the donation ledger.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, campaign::Campaign};

/// A single confirmed donation. Ledger rows are never edited or deleted,
/// even when the campaign they belong to is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Donation {
  pub donation_id:  Uuid,
  pub donor_email:  String,
  pub amount:       Decimal,
  pub campaign_id:  Uuid,
  /// Payment-processor reference, when the donation went through one.
  pub external_ref: Option<String>,
  pub donated_at:   DateTime<Utc>,
}

/// Input to [`crate::store::MarketplaceStore::record_donation`].
#[derive(Debug, Clone)]
pub struct NewDonation {
  pub donor_email:  String,
  pub amount:       Decimal,
  pub campaign_id:  Uuid,
  pub external_ref: Option<String>,
  /// Defaults to the store clock when absent.
  pub donated_at:   Option<DateTime<Utc>>,
}

impl NewDonation {
  pub fn validate(&self) -> Result<()> {
    if self.donor_email.trim().is_empty() {
      return Err(Error::MissingField("donor email"));
    }
    if self.amount <= Decimal::ZERO {
      return Err(Error::InvalidAmount(self.amount));
    }
    Ok(())
  }
}

/// What a successful donation hands back: the ledger row plus the campaign
/// as it stands after the aggregate update, from the same transaction.
#[derive(Debug, Clone, Serialize)]
pub struct DonationReceipt {
  pub donation: Donation,
  pub campaign: Campaign,
}
