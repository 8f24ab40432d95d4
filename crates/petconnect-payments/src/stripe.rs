//! Stripe-shaped payment client.
//!
//! Speaks the payment-intent subset of the Stripe HTTP API: form-encoded
//! request, bearer-key auth, JSON response. The base URL is configurable so
//! tests can point the client at a local stand-in.

use std::time::Duration;

use serde::Deserialize;

use crate::{Error, PaymentAuthorizer, PaymentIntent, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.stripe.com";

/// Connection settings for the payment provider.
#[derive(Debug, Clone)]
pub struct StripeConfig {
  pub secret_key: String,
  pub base_url:   String,
}

/// Async client for the payment-intent endpoint.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct StripeClient {
  client: reqwest::Client,
  config: StripeConfig,
}

impl StripeClient {
  pub fn new(config: StripeConfig) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{path}", self.config.base_url.trim_end_matches('/'))
  }
}

/// The subset of the provider's intent object we care about.
#[derive(Deserialize)]
struct RawIntent {
  id:            String,
  client_secret: String,
}

impl PaymentAuthorizer for StripeClient {
  async fn create_intent(
    &self,
    amount_minor: i64,
    currency: &str,
  ) -> Result<PaymentIntent> {
    let resp = self
      .client
      .post(self.url("/v1/payment_intents"))
      .bearer_auth(&self.config.secret_key)
      .form(&[
        ("amount", amount_minor.to_string()),
        ("currency", currency.to_string()),
      ])
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      return Err(Error::Api { status, body });
    }

    let raw: RawIntent = resp.json().await?;
    Ok(PaymentIntent {
      intent_id:     raw.id,
      client_secret: raw.client_secret,
    })
  }
}
