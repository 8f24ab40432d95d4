//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Monetary amounts are stored
//! as exact decimal strings, never floats. Structured fields (requester
//! details, donor lists) are stored as compact JSON, with amounts inside the
//! JSON kept as strings too. UUIDs are stored as hyphenated lowercase
//! strings.

use chrono::{DateTime, Utc};
use petconnect_core::{
  campaign::{Campaign, CampaignStatus, DonorEntry},
  donation::Donation,
  pet::{AdoptionStatus, Pet, RequesterDetails},
  user::{User, UserRole},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Timestamps ──────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Amounts ─────────────────────────────────────────────────────────────────

pub fn encode_amount(amount: Decimal) -> String { amount.to_string() }

pub fn decode_amount(s: &str) -> Result<Decimal> {
  s.parse().map_err(|e: rust_decimal::Error| {
    Error::DecimalParse(format!("{e} (in {s:?})"))
  })
}

// ─── Status columns ──────────────────────────────────────────────────────────
//
// The encode direction is `as_str()` on the core enums; only decoding
// lives here.

pub fn decode_adoption_status(s: &str) -> Result<AdoptionStatus> {
  AdoptionStatus::parse(s).ok_or_else(|| Error::UnknownVariant(s.to_owned()))
}

pub fn decode_campaign_status(s: &str) -> Result<CampaignStatus> {
  CampaignStatus::parse(s).ok_or_else(|| Error::UnknownVariant(s.to_owned()))
}

pub fn decode_user_role(s: &str) -> Result<UserRole> {
  UserRole::parse(s).ok_or_else(|| Error::UnknownVariant(s.to_owned()))
}

// ─── Requester details ───────────────────────────────────────────────────────

pub fn encode_requester(r: &RequesterDetails) -> Result<String> {
  Ok(serde_json::to_string(r)?)
}

pub fn decode_requester(s: &str) -> Result<RequesterDetails> {
  Ok(serde_json::from_str(s)?)
}

// ─── Donor list ──────────────────────────────────────────────────────────────

/// JSON shape of one donor-list entry as stored in the `donors` column.
/// Amounts stay strings inside the column so they survive round-trips
/// exactly.
#[derive(Serialize, Deserialize)]
struct RawDonorEntry {
  donor_email: String,
  amount:      String,
  donated_at:  String,
}

pub fn encode_donors(donors: &[DonorEntry]) -> Result<String> {
  let raws: Vec<RawDonorEntry> = donors
    .iter()
    .map(|d| RawDonorEntry {
      donor_email: d.donor_email.clone(),
      amount:      encode_amount(d.amount),
      donated_at:  encode_dt(d.donated_at),
    })
    .collect();
  Ok(serde_json::to_string(&raws)?)
}

pub fn decode_donors(s: &str) -> Result<Vec<DonorEntry>> {
  let raws: Vec<RawDonorEntry> = serde_json::from_str(s)?;
  raws
    .into_iter()
    .map(|raw| {
      Ok(DonorEntry {
        donor_email: raw.donor_email,
        amount:      decode_amount(&raw.amount)?,
        donated_at:  decode_dt(&raw.donated_at)?,
      })
    })
    .collect()
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:    String,
  pub name:       String,
  pub email:      String,
  pub role:       String,
  pub created_at: String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:    decode_uuid(&self.user_id)?,
      name:       self.name,
      email:      self.email,
      role:       decode_user_role(&self.role)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `pets` row.
pub struct RawPet {
  pub pet_id:       String,
  pub name:         String,
  pub category:     String,
  pub owner_email:  String,
  pub status:       String,
  pub requester:    Option<String>,
  pub age:          Option<String>,
  pub location:     Option<String>,
  pub description:  Option<String>,
  pub image_url:    Option<String>,
  pub created_at:   String,
  pub requested_at: Option<String>,
  pub adopted_at:   Option<String>,
}

impl RawPet {
  pub fn into_pet(self) -> Result<Pet> {
    Ok(Pet {
      pet_id:       decode_uuid(&self.pet_id)?,
      name:         self.name,
      category:     self.category,
      owner_email:  self.owner_email,
      status:       decode_adoption_status(&self.status)?,
      requester:    self
        .requester
        .as_deref()
        .map(decode_requester)
        .transpose()?,
      age:          self.age,
      location:     self.location,
      description:  self.description,
      image_url:    self.image_url,
      created_at:   decode_dt(&self.created_at)?,
      requested_at: self
        .requested_at
        .as_deref()
        .map(decode_dt)
        .transpose()?,
      adopted_at:   self.adopted_at.as_deref().map(decode_dt).transpose()?,
    })
  }
}

/// Raw strings read directly from a `campaigns` row.
pub struct RawCampaign {
  pub campaign_id:         String,
  pub title:               String,
  pub description:         Option<String>,
  pub organizer_email:     String,
  pub max_donation_amount: String,
  pub donated_amount:      String,
  pub status:              String,
  pub donors:              String,
  pub created_at:          String,
}

impl RawCampaign {
  pub fn into_campaign(self) -> Result<Campaign> {
    Ok(Campaign {
      campaign_id:         decode_uuid(&self.campaign_id)?,
      title:               self.title,
      description:         self.description,
      organizer_email:     self.organizer_email,
      max_donation_amount: decode_amount(&self.max_donation_amount)?,
      donated_amount:      decode_amount(&self.donated_amount)?,
      status:              decode_campaign_status(&self.status)?,
      donors:              decode_donors(&self.donors)?,
      created_at:          decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `donations` row.
pub struct RawDonation {
  pub donation_id:  String,
  pub donor_email:  String,
  pub amount:       String,
  pub campaign_id:  String,
  pub external_ref: Option<String>,
  pub donated_at:   String,
}

impl RawDonation {
  pub fn into_donation(self) -> Result<Donation> {
    Ok(Donation {
      donation_id:  decode_uuid(&self.donation_id)?,
      donor_email:  self.donor_email,
      amount:       decode_amount(&self.amount)?,
      campaign_id:  decode_uuid(&self.campaign_id)?,
      external_ref: self.external_ref,
      donated_at:   decode_dt(&self.donated_at)?,
    })
  }
}
