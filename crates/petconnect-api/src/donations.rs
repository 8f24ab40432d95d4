//! Handlers for `/donations` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/donations` | Body: [`NewDonationBody`]; returns 201 + `{success, donation_id, message}` |
//! | `GET`  | `/donations` | Optional `donor`, `campaign_id`; paginated |
//! | `GET`  | `/donations/{id}` | Single ledger entry |
//!
//! Recording a donation also folds it into the campaign's running total,
//! donor list and completion status; the two writes land atomically or not
//! at all.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use petconnect_core::{
  donation::{Donation, NewDonation},
  query::{DonationQuery, Page, PageParams},
  store::MarketplaceStore,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /donations`.
#[derive(Debug, Deserialize)]
pub struct NewDonationBody {
  pub donor_email:  String,
  /// Major-unit amount; must be positive.
  pub amount:       Decimal,
  pub campaign_id:  Uuid,
  /// Upstream payment reference (e.g. a payment-intent id), if any.
  pub external_ref: Option<String>,
  /// Ledger timestamp override; defaults to the store clock.
  pub donated_at:   Option<DateTime<Utc>>,
}

impl From<NewDonationBody> for NewDonation {
  fn from(b: NewDonationBody) -> Self {
    NewDonation {
      donor_email:  b.donor_email,
      amount:       b.amount,
      campaign_id:  b.campaign_id,
      external_ref: b.external_ref,
      donated_at:   b.donated_at,
    }
  }
}

/// Response envelope for `POST /donations`.
#[derive(Debug, Serialize)]
pub struct DonationResponse {
  pub success:     bool,
  pub donation_id: Uuid,
  pub message:     String,
}

/// `POST /donations` — appends to the ledger, updates the campaign, returns
/// 201 + the envelope.
pub async fn create<S, P>(
  State(state): State<AppState<S, P>>,
  Json(body): Json<NewDonationBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MarketplaceStore,
{
  let receipt = state
    .store
    .record_donation(NewDonation::from(body))
    .await?;
  Ok((
    StatusCode::CREATED,
    Json(DonationResponse {
      success:     true,
      donation_id: receipt.donation.donation_id,
      message:     format!(
        "donation of {} recorded against campaign {}",
        receipt.donation.amount, receipt.campaign.campaign_id
      ),
    }),
  ))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  /// Donor email equality.
  pub donor:       Option<String>,
  /// Restrict to one campaign's ledger slice.
  pub campaign_id: Option<Uuid>,
  pub page:        Option<u32>,
  pub per_page:    Option<u32>,
}

/// `GET /donations[?donor=...][&campaign_id=...][&page=N][&per_page=N]`
pub async fn list<S, P>(
  State(state): State<AppState<S, P>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Page<Donation>>, ApiError>
where
  S: MarketplaceStore,
{
  let query = DonationQuery {
    donor_email: params.donor,
    campaign_id: params.campaign_id,
    page:        PageParams::new(params.page, params.per_page),
  };
  let page = state.store.list_donations(&query).await?;
  Ok(Json(page))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /donations/{id}`
pub async fn get_one<S, P>(
  State(state): State<AppState<S, P>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Donation>, ApiError>
where
  S: MarketplaceStore,
{
  let donation = state
    .store
    .get_donation(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("donation {id} not found")))?;
  Ok(Json(donation))
}
