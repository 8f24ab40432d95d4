//! Handlers for `/users` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `POST`  | `/users` | Body: [`NewUserBody`]; returns 201 + stored user |
//! | `GET`   | `/users` | Paginated listing |
//! | `GET`   | `/users/{id}` | Single user |
//! | `PATCH` | `/users/{id}` | Body: `{"role":"owner"}`; replaces the role |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use petconnect_core::{
  query::{Page, PageParams},
  store::MarketplaceStore,
  user::{NewUser, User, UserRole},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /users`.
#[derive(Debug, Deserialize)]
pub struct NewUserBody {
  pub name:  String,
  pub email: String,
  /// Defaults to `adopter` when absent.
  #[serde(default)]
  pub role:  UserRole,
}

impl From<NewUserBody> for NewUser {
  fn from(b: NewUserBody) -> Self {
    NewUser {
      name:  b.name,
      email: b.email,
      role:  b.role,
    }
  }
}

/// `POST /users` — returns 201 + the stored [`User`].
pub async fn create<S, P>(
  State(state): State<AppState<S, P>>,
  Json(body): Json<NewUserBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MarketplaceStore,
{
  let user = state.store.register_user(NewUser::from(body)).await?;
  Ok((StatusCode::CREATED, Json(user)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  pub page:     Option<u32>,
  pub per_page: Option<u32>,
}

/// `GET /users[?page=N][&per_page=N]`
pub async fn list<S, P>(
  State(state): State<AppState<S, P>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Page<User>>, ApiError>
where
  S: MarketplaceStore,
{
  let page = state
    .store
    .list_users(PageParams::new(params.page, params.per_page))
    .await?;
  Ok(Json(page))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /users/{id}`
pub async fn get_one<S, P>(
  State(state): State<AppState<S, P>>,
  Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError>
where
  S: MarketplaceStore,
{
  let user = state
    .store
    .get_user(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))?;
  Ok(Json(user))
}

// ─── Set role ─────────────────────────────────────────────────────────────────

/// JSON body accepted by `PATCH /users/{id}`.
#[derive(Debug, Deserialize)]
pub struct SetRoleBody {
  pub role: UserRole,
}

/// `PATCH /users/{id}` — replaces the role, returns the updated user.
pub async fn set_role<S, P>(
  State(state): State<AppState<S, P>>,
  Path(id): Path<Uuid>,
  Json(body): Json<SetRoleBody>,
) -> Result<Json<User>, ApiError>
where
  S: MarketplaceStore,
{
  let user = state.store.set_user_role(id, body.role).await?;
  Ok(Json(user))
}
