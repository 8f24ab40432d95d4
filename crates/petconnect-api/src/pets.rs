//! Handlers for `/pets` CRUD endpoints.
//!
//! Lifecycle transitions (`/pets/{id}/request` and friends) live in
//! [`crate::adoptions`]; the `PATCH` here edits descriptive fields only and
//! never touches adoption state.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/pets` | Body: [`NewPetBody`]; returns 201 + stored pet |
//! | `GET`    | `/pets` | Optional `category`, `status` (comma-separated), `owner`, `name_contains`; paginated |
//! | `GET`    | `/pets/{id}` | Single pet |
//! | `PATCH`  | `/pets/{id}` | Body: [`PetUpdateBody`]; at least one field |
//! | `DELETE` | `/pets/{id}` | Removes the listing outright |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use petconnect_core::{
  pet::{AdoptionStatus, NewPet, Pet, PetUpdate},
  query::{Page, PageParams, PetQuery},
  store::MarketplaceStore,
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /pets`.
#[derive(Debug, Deserialize)]
pub struct NewPetBody {
  pub name:        String,
  pub category:    String,
  pub owner_email: String,
  pub age:         Option<String>,
  pub location:    Option<String>,
  pub description: Option<String>,
  pub image_url:   Option<String>,
}

impl From<NewPetBody> for NewPet {
  fn from(b: NewPetBody) -> Self {
    NewPet {
      name:        b.name,
      category:    b.category,
      owner_email: b.owner_email,
      age:         b.age,
      location:    b.location,
      description: b.description,
      image_url:   b.image_url,
    }
  }
}

/// `POST /pets` — returns 201 + the stored [`Pet`].
pub async fn create<S, P>(
  State(state): State<AppState<S, P>>,
  Json(body): Json<NewPetBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MarketplaceStore,
{
  let pet = state.store.add_pet(NewPet::from(body)).await?;
  Ok((StatusCode::CREATED, Json(pet)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  /// Case-insensitive category equality, e.g. `dog`.
  pub category:      Option<String>,
  /// Comma-separated status filter, e.g. `requested,adopted`.
  pub status:        Option<String>,
  /// Owner email equality.
  pub owner:         Option<String>,
  /// Case-insensitive name substring.
  pub name_contains: Option<String>,
  pub page:          Option<u32>,
  pub per_page:      Option<u32>,
}

fn parse_statuses(raw: &str) -> Result<Vec<AdoptionStatus>, ApiError> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(|t| {
      AdoptionStatus::parse(t)
        .ok_or_else(|| ApiError::BadRequest(format!("unknown status {t:?}")))
    })
    .collect()
}

/// `GET /pets[?category=...][&status=a,b][&owner=...][&name_contains=...][&page=N][&per_page=N]`
pub async fn list<S, P>(
  State(state): State<AppState<S, P>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Page<Pet>>, ApiError>
where
  S: MarketplaceStore,
{
  let query = PetQuery {
    category:      params.category,
    statuses:      params
      .status
      .as_deref()
      .map(parse_statuses)
      .transpose()?
      .unwrap_or_default(),
    owner_email:   params.owner,
    name_contains: params.name_contains,
    page:          PageParams::new(params.page, params.per_page),
  };
  let page = state.store.list_pets(&query).await?;
  Ok(Json(page))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /pets/{id}`
pub async fn get_one<S, P>(
  State(state): State<AppState<S, P>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Pet>, ApiError>
where
  S: MarketplaceStore,
{
  let pet = state
    .store
    .get_pet(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("pet {id} not found")))?;
  Ok(Json(pet))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `PATCH /pets/{id}`. All fields optional; a body
/// with none set is rejected.
#[derive(Debug, Deserialize)]
pub struct PetUpdateBody {
  pub name:        Option<String>,
  pub category:    Option<String>,
  pub age:         Option<String>,
  pub location:    Option<String>,
  pub description: Option<String>,
  pub image_url:   Option<String>,
}

impl From<PetUpdateBody> for PetUpdate {
  fn from(b: PetUpdateBody) -> Self {
    PetUpdate {
      name:        b.name,
      category:    b.category,
      age:         b.age,
      location:    b.location,
      description: b.description,
      image_url:   b.image_url,
    }
  }
}

/// `PATCH /pets/{id}` — edits descriptive fields, returns the updated pet.
pub async fn update_one<S, P>(
  State(state): State<AppState<S, P>>,
  Path(id): Path<Uuid>,
  Json(body): Json<PetUpdateBody>,
) -> Result<Json<Pet>, ApiError>
where
  S: MarketplaceStore,
{
  let pet = state.store.update_pet(id, PetUpdate::from(body)).await?;
  Ok(Json(pet))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /pets/{id}`
pub async fn delete_one<S, P>(
  State(state): State<AppState<S, P>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError>
where
  S: MarketplaceStore,
{
  state.store.delete_pet(id).await?;
  Ok(Json(json!({ "success": true, "message": "pet deleted" })))
}
