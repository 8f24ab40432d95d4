//! Payment authorization for PetConnect donations.
//!
//! A donation may optionally be backed by a card payment: the API asks this
//! crate for a payment intent, hands the client secret to the browser, and
//! records the donation with the intent id as its external reference. This
//! crate only creates intents; settlement and reconciliation live with the
//! payment provider.

use std::future::Future;

use serde::Serialize;

mod stripe;

pub mod error;

pub use error::{Error, Result};
pub use stripe::{DEFAULT_BASE_URL, StripeClient, StripeConfig};

/// A freshly created payment intent.
///
/// `client_secret` is what a browser-side payment form needs to collect the
/// card details; `intent_id` is the provider's reference, recorded on the
/// donation.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentIntent {
  pub intent_id:     String,
  pub client_secret: String,
}

/// Abstraction over a payment provider that can authorise a charge.
///
/// Amounts are in minor currency units (cents); the conversion from decimal
/// amounts happens at the API boundary so this trait never sees fractional
/// values.
pub trait PaymentAuthorizer: Send + Sync {
  fn create_intent<'a>(
    &'a self,
    amount_minor: i64,
    currency: &'a str,
  ) -> impl Future<Output = Result<PaymentIntent>> + Send + 'a;
}
