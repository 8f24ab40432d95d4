//! JSON REST API for PetConnect.
//!
//! Exposes an axum [`Router`] backed by any
//! [`petconnect_core::store::MarketplaceStore`] plus a
//! [`petconnect_payments::PaymentAuthorizer`]. Auth, TLS, and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = petconnect_api::api_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod adoptions;
pub mod campaigns;
pub mod donations;
pub mod error;
pub mod payments;
pub mod pets;
pub mod users;


use std::sync::Arc;

use axum::{
  Json, Router,
  routing::{get, post},
};
use petconnect_core::store::MarketplaceStore;
use petconnect_payments::PaymentAuthorizer;
use serde_json::{Value, json};

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S, P> {
  pub store:    Arc<S>,
  pub payments: Arc<P>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, P>(state: AppState<S, P>) -> Router<()>
where
  S: MarketplaceStore + Clone + 'static,
  P: PaymentAuthorizer + Clone + 'static,
{
  Router::new()
    // Users
    .route(
      "/users",
      get(users::list::<S, P>).post(users::create::<S, P>),
    )
    .route(
      "/users/{id}",
      get(users::get_one::<S, P>).patch(users::set_role::<S, P>),
    )
    // Pets
    .route("/pets", get(pets::list::<S, P>).post(pets::create::<S, P>))
    .route(
      "/pets/{id}",
      get(pets::get_one::<S, P>)
        .patch(pets::update_one::<S, P>)
        .delete(pets::delete_one::<S, P>),
    )
    // Adoption lifecycle
    .route("/pets/{id}/request", post(adoptions::request_one::<S, P>))
    .route("/pets/{id}/accept", post(adoptions::accept_one::<S, P>))
    .route("/pets/{id}/reject", post(adoptions::reject_one::<S, P>))
    .route("/pets/{id}/cancel", post(adoptions::cancel_one::<S, P>))
    .route("/adoptions/incoming", get(adoptions::incoming::<S, P>))
    .route("/adoptions/outgoing", get(adoptions::outgoing::<S, P>))
    // Campaigns
    .route(
      "/campaigns",
      get(campaigns::list::<S, P>).post(campaigns::create::<S, P>),
    )
    .route(
      "/campaigns/{id}",
      get(campaigns::get_one::<S, P>)
        .patch(campaigns::update_one::<S, P>)
        .delete(campaigns::delete_one::<S, P>),
    )
    .route("/campaigns/{id}/pause", post(campaigns::pause_one::<S, P>))
    .route("/campaigns/{id}/resume", post(campaigns::resume_one::<S, P>))
    // Donations
    .route(
      "/donations",
      get(donations::list::<S, P>).post(donations::create::<S, P>),
    )
    .route("/donations/{id}", get(donations::get_one::<S, P>))
    // Payments
    .route("/payments/intent", post(payments::create_intent::<S, P>))
    // Liveness
    .route("/health", get(health))
    .with_state(state)
}

// ─── Health ───────────────────────────────────────────────────────────────────

/// `GET /health` — liveness probe.
async fn health() -> Json<Value> {
  Json(json!({ "status": "ok" }))
}
