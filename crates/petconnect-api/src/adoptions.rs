//! Handlers for the adoption lifecycle and the request inboxes.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/pets/{id}/request` | Body: [`RequestBody`]; returns the updated pet |
//! | `POST` | `/pets/{id}/accept` | `{success, message, pet}` |
//! | `POST` | `/pets/{id}/reject` | `{success, message, pet}` |
//! | `POST` | `/pets/{id}/cancel` | `{success, message, pet}` |
//! | `GET`  | `/adoptions/incoming?owner=EMAIL` | Pets of `owner` with a pending or accepted request |
//! | `GET`  | `/adoptions/outgoing?requester=EMAIL` | Pets `requester` has requested or adopted |
//!
//! A transition from the wrong state comes back as 409 with
//! `{"success": false, "error": "..."}`; a missing pet as 404.

use axum::{
  Json,
  extract::{Path, Query, State},
};
use petconnect_core::{
  pet::{Pet, RequesterDetails},
  store::MarketplaceStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── Request ──────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /pets/{id}/request`: the requester's contact
/// snapshot, embedded in the pet for the lifetime of the request.
#[derive(Debug, Deserialize)]
pub struct RequestBody {
  pub name:    String,
  pub email:   String,
  pub contact: String,
  pub address: String,
}

impl From<RequestBody> for RequesterDetails {
  fn from(b: RequestBody) -> Self {
    RequesterDetails {
      name:    b.name,
      email:   b.email,
      contact: b.contact,
      address: b.address,
    }
  }
}

/// `POST /pets/{id}/request` — attaches the requester, returns the updated
/// pet in `requested` state.
pub async fn request_one<S, P>(
  State(state): State<AppState<S, P>>,
  Path(id): Path<Uuid>,
  Json(body): Json<RequestBody>,
) -> Result<Json<Pet>, ApiError>
where
  S: MarketplaceStore,
{
  let pet = state
    .store
    .request_adoption(id, RequesterDetails::from(body))
    .await?;
  Ok(Json(pet))
}

// ─── Transitions ──────────────────────────────────────────────────────────────

/// Response envelope for accept/reject/cancel.
#[derive(Debug, Serialize)]
pub struct TransitionResponse {
  pub success: bool,
  pub message: String,
  pub pet:     Pet,
}

/// `POST /pets/{id}/accept` — `requested` → `adopted`.
pub async fn accept_one<S, P>(
  State(state): State<AppState<S, P>>,
  Path(id): Path<Uuid>,
) -> Result<Json<TransitionResponse>, ApiError>
where
  S: MarketplaceStore,
{
  let pet = state.store.accept_request(id).await?;
  Ok(Json(TransitionResponse {
    success: true,
    message: "adoption request accepted".to_owned(),
    pet,
  }))
}

/// `POST /pets/{id}/reject` — `requested` → `not_adopted`, requester cleared.
pub async fn reject_one<S, P>(
  State(state): State<AppState<S, P>>,
  Path(id): Path<Uuid>,
) -> Result<Json<TransitionResponse>, ApiError>
where
  S: MarketplaceStore,
{
  let pet = state.store.reject_request(id).await?;
  Ok(Json(TransitionResponse {
    success: true,
    message: "adoption request rejected".to_owned(),
    pet,
  }))
}

/// `POST /pets/{id}/cancel` — `requested` or `adopted` → `not_adopted`.
pub async fn cancel_one<S, P>(
  State(state): State<AppState<S, P>>,
  Path(id): Path<Uuid>,
) -> Result<Json<TransitionResponse>, ApiError>
where
  S: MarketplaceStore,
{
  let pet = state.store.cancel_adoption(id).await?;
  Ok(Json(TransitionResponse {
    success: true,
    message: "adoption cancelled".to_owned(),
    pet,
  }))
}

// ─── Inboxes ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct IncomingParams {
  pub owner: Option<String>,
}

/// `GET /adoptions/incoming?owner=EMAIL` — the owner's view: every pet of
/// theirs carrying a pending or accepted request, oldest request first.
pub async fn incoming<S, P>(
  State(state): State<AppState<S, P>>,
  Query(params): Query<IncomingParams>,
) -> Result<Json<Vec<Pet>>, ApiError>
where
  S: MarketplaceStore,
{
  let owner = params.owner.ok_or_else(|| {
    ApiError::BadRequest("owner query parameter is required".to_owned())
  })?;
  let pets = state.store.incoming_requests(&owner).await?;
  Ok(Json(pets))
}

#[derive(Debug, Deserialize)]
pub struct OutgoingParams {
  pub requester: Option<String>,
}

/// `GET /adoptions/outgoing?requester=EMAIL` — the requester's view: every
/// pet they have requested or adopted, whoever owns it.
pub async fn outgoing<S, P>(
  State(state): State<AppState<S, P>>,
  Query(params): Query<OutgoingParams>,
) -> Result<Json<Vec<Pet>>, ApiError>
where
  S: MarketplaceStore,
{
  let requester = params.requester.ok_or_else(|| {
    ApiError::BadRequest("requester query parameter is required".to_owned())
  })?;
  let pets = state.store.outgoing_requests(&requester).await?;
  Ok(Json(pets))
}
