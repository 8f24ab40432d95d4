//! Listing parameters and the paginated result envelope.

use serde::Serialize;
use uuid::Uuid;

use crate::{campaign::CampaignStatus, pet::AdoptionStatus};

// ─── Pagination ──────────────────────────────────────────────────────────────

pub const DEFAULT_PER_PAGE: u32 = 20;
pub const MAX_PER_PAGE: u32 = 100;

/// A 1-based page selector. Out-of-range inputs clamp rather than error,
/// so a hand-typed `?per_page=9999` degrades to the cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
  pub page:     u32,
  pub per_page: u32,
}

impl Default for PageParams {
  fn default() -> Self {
    Self { page: 1, per_page: DEFAULT_PER_PAGE }
  }
}

impl PageParams {
  pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
    Self {
      page:     page.unwrap_or(1).max(1),
      per_page: per_page
        .unwrap_or(DEFAULT_PER_PAGE)
        .clamp(1, MAX_PER_PAGE),
    }
  }

  pub fn limit(&self) -> i64 { i64::from(self.per_page) }

  pub fn offset(&self) -> i64 {
    i64::from(self.page - 1) * i64::from(self.per_page)
  }
}

/// One page of results plus the total row count for the whole query.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
  pub items:    Vec<T>,
  pub total:    u64,
  pub page:     u32,
  pub per_page: u32,
}

impl<T> Page<T> {
  pub fn new(items: Vec<T>, total: u64, params: PageParams) -> Self {
    Self {
      items,
      total,
      page: params.page,
      per_page: params.per_page,
    }
  }
}

// ─── Filters ─────────────────────────────────────────────────────────────────

/// Pet listing filters. All fields are conjunctive; an empty query lists
/// everything.
#[derive(Debug, Clone, Default)]
pub struct PetQuery {
  /// Case-insensitive exact category match.
  pub category:      Option<String>,
  /// Empty means any status.
  pub statuses:      Vec<AdoptionStatus>,
  pub owner_email:   Option<String>,
  /// Case-insensitive substring match on the pet's name.
  pub name_contains: Option<String>,
  pub page:          PageParams,
}

#[derive(Debug, Clone, Default)]
pub struct CampaignQuery {
  pub organizer_email: Option<String>,
  /// Empty means any status.
  pub statuses:        Vec<CampaignStatus>,
  /// Case-insensitive substring match on the campaign title.
  pub title_contains:  Option<String>,
  pub page:            PageParams,
}

#[derive(Debug, Clone, Default)]
pub struct DonationQuery {
  pub donor_email: Option<String>,
  pub campaign_id: Option<Uuid>,
  pub page:        PageParams,
}
