//! Handler for `POST /payments/intent`.
//!
//! Converts a major-unit decimal amount into integer minor units and asks
//! the configured [`PaymentAuthorizer`] for a client secret. Nothing about
//! the intent is persisted here; clients pass the returned `intent_id` back
//! as a donation's `external_ref` if they want the link recorded.

use axum::{Json, extract::State};
use petconnect_payments::{PaymentAuthorizer, PaymentIntent};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{AppState, error::ApiError};

/// JSON body accepted by `POST /payments/intent`.
#[derive(Debug, Deserialize)]
pub struct IntentBody {
  /// Major-unit amount, e.g. `12.50` for $12.50.
  pub amount:   Decimal,
  /// ISO 4217 code; defaults to `"usd"`.
  pub currency: Option<String>,
}

/// Convert a major-unit amount to integer minor units (cents).
///
/// The upstream API only accepts whole minor units, so fractional-cent
/// amounts are rejected rather than rounded.
fn to_minor_units(amount: Decimal) -> Result<i64, ApiError> {
  use rust_decimal::prelude::ToPrimitive;

  if amount <= Decimal::ZERO {
    return Err(ApiError::BadRequest(format!(
      "amount must be positive, got {amount}"
    )));
  }
  let minor = amount * Decimal::ONE_HUNDRED;
  if minor.normalize().scale() != 0 {
    return Err(ApiError::BadRequest(format!(
      "amount {amount} has fractional cents"
    )));
  }
  minor
    .to_i64()
    .ok_or_else(|| ApiError::BadRequest(format!("amount {amount} out of range")))
}

/// `POST /payments/intent` — body: `{"amount": 12.5[, "currency": "usd"]}`.
pub async fn create_intent<S, P>(
  State(state): State<AppState<S, P>>,
  Json(body): Json<IntentBody>,
) -> Result<Json<PaymentIntent>, ApiError>
where
  P: PaymentAuthorizer,
{
  let minor = to_minor_units(body.amount)?;
  let currency = body.currency.as_deref().unwrap_or("usd");
  let intent = state.payments.create_intent(minor, currency).await?;
  Ok(Json(intent))
}
