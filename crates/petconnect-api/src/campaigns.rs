//! Handlers for `/campaigns` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/campaigns` | Body: [`NewCampaignBody`]; returns 201 + stored campaign |
//! | `GET`    | `/campaigns` | Optional `organizer`, `status` (comma-separated), `title_contains`; paginated |
//! | `GET`    | `/campaigns/{id}` | Single campaign |
//! | `PATCH`  | `/campaigns/{id}` | Body: [`CampaignUpdateBody`]; at least one field |
//! | `DELETE` | `/campaigns/{id}` | Removes the campaign; its ledger rows survive |
//! | `POST`   | `/campaigns/{id}/pause` | `active` → `paused` |
//! | `POST`   | `/campaigns/{id}/resume` | `paused` → `active` |
//!
//! Pause/resume from any other state is a 409. A `completed` campaign can
//! never be paused or resumed, but it still accepts donations.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use petconnect_core::{
  campaign::{Campaign, CampaignStatus, CampaignUpdate, NewCampaign},
  query::{CampaignQuery, Page, PageParams},
  store::MarketplaceStore,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /campaigns`.
#[derive(Debug, Deserialize)]
pub struct NewCampaignBody {
  pub title:               String,
  pub description:         Option<String>,
  pub organizer_email:     String,
  /// Fundraising target in major units; must be positive.
  pub max_donation_amount: Decimal,
}

impl From<NewCampaignBody> for NewCampaign {
  fn from(b: NewCampaignBody) -> Self {
    NewCampaign {
      title:               b.title,
      description:         b.description,
      organizer_email:     b.organizer_email,
      max_donation_amount: b.max_donation_amount,
    }
  }
}

/// `POST /campaigns` — returns 201 + the stored [`Campaign`].
pub async fn create<S, P>(
  State(state): State<AppState<S, P>>,
  Json(body): Json<NewCampaignBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MarketplaceStore,
{
  let campaign = state
    .store
    .create_campaign(NewCampaign::from(body))
    .await?;
  Ok((StatusCode::CREATED, Json(campaign)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  /// Organizer email equality.
  pub organizer:      Option<String>,
  /// Comma-separated status filter, e.g. `active,paused`.
  pub status:         Option<String>,
  /// Case-insensitive title substring.
  pub title_contains: Option<String>,
  pub page:           Option<u32>,
  pub per_page:       Option<u32>,
}

fn parse_statuses(raw: &str) -> Result<Vec<CampaignStatus>, ApiError> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(|t| {
      CampaignStatus::parse(t)
        .ok_or_else(|| ApiError::BadRequest(format!("unknown status {t:?}")))
    })
    .collect()
}

/// `GET /campaigns[?organizer=...][&status=a,b][&title_contains=...][&page=N][&per_page=N]`
pub async fn list<S, P>(
  State(state): State<AppState<S, P>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Page<Campaign>>, ApiError>
where
  S: MarketplaceStore,
{
  let query = CampaignQuery {
    organizer_email: params.organizer,
    statuses:        params
      .status
      .as_deref()
      .map(parse_statuses)
      .transpose()?
      .unwrap_or_default(),
    title_contains:  params.title_contains,
    page:            PageParams::new(params.page, params.per_page),
  };
  let page = state.store.list_campaigns(&query).await?;
  Ok(Json(page))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /campaigns/{id}`
pub async fn get_one<S, P>(
  State(state): State<AppState<S, P>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Campaign>, ApiError>
where
  S: MarketplaceStore,
{
  let campaign = state
    .store
    .get_campaign(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("campaign {id} not found")))?;
  Ok(Json(campaign))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `PATCH /campaigns/{id}`. All fields optional; a
/// body with none set is rejected. Lowering the target below the running
/// total completes the campaign on the spot.
#[derive(Debug, Deserialize)]
pub struct CampaignUpdateBody {
  pub title:               Option<String>,
  pub description:         Option<String>,
  pub max_donation_amount: Option<Decimal>,
}

impl From<CampaignUpdateBody> for CampaignUpdate {
  fn from(b: CampaignUpdateBody) -> Self {
    CampaignUpdate {
      title:               b.title,
      description:         b.description,
      max_donation_amount: b.max_donation_amount,
    }
  }
}

/// `PATCH /campaigns/{id}` — edits title/description/target, returns the
/// updated campaign.
pub async fn update_one<S, P>(
  State(state): State<AppState<S, P>>,
  Path(id): Path<Uuid>,
  Json(body): Json<CampaignUpdateBody>,
) -> Result<Json<Campaign>, ApiError>
where
  S: MarketplaceStore,
{
  let campaign = state
    .store
    .update_campaign(id, CampaignUpdate::from(body))
    .await?;
  Ok(Json(campaign))
}

// ─── Pause / resume ───────────────────────────────────────────────────────────

/// `POST /campaigns/{id}/pause`
pub async fn pause_one<S, P>(
  State(state): State<AppState<S, P>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Campaign>, ApiError>
where
  S: MarketplaceStore,
{
  let campaign = state.store.pause_campaign(id).await?;
  Ok(Json(campaign))
}

/// `POST /campaigns/{id}/resume`
pub async fn resume_one<S, P>(
  State(state): State<AppState<S, P>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Campaign>, ApiError>
where
  S: MarketplaceStore,
{
  let campaign = state.store.resume_campaign(id).await?;
  Ok(Json(campaign))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /campaigns/{id}` — the donation ledger keeps its rows.
pub async fn delete_one<S, P>(
  State(state): State<AppState<S, P>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError>
where
  S: MarketplaceStore,
{
  state.store.delete_campaign(id).await?;
  Ok(Json(json!({ "success": true, "message": "campaign deleted" })))
}
