use crate::error::{Error, Result};
use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::warn;

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Thin Stripe client: checkout session creation and retrieval, plus
/// webhook signature verification. Everything beyond the signature check is
/// trusted as-is.
#[derive(Debug, Clone)]
pub struct BillingService {
    secret_key: String,
    webhook_secret: String,
    http_client: Client,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
    #[serde(default)]
    pub payment_status: String,
}

impl BillingService {
    pub fn new(secret_key: String, webhook_secret: String, http_client: Client) -> Self {
        Self {
            secret_key,
            webhook_secret,
            http_client,
        }
    }

    /// Create a subscription checkout session and return its redirect URL.
    /// `client_reference` ties the session back to the local user so the
    /// completion webhook can activate the right account.
    pub async fn create_checkout_session(
        &self,
        price_id: &str,
        client_reference: &str,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<CheckoutSession> {
        let params = [
            ("mode", "subscription"),
            ("line_items[0][price]", price_id),
            ("line_items[0][quantity]", "1"),
            ("client_reference_id", client_reference),
            ("success_url", success_url),
            ("cancel_url", cancel_url),
        ];
        let response = self
            .http_client
            .post(format!("{STRIPE_API_BASE}/checkout/sessions"))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body, "Stripe checkout session creation failed");
            return Err(Error::Internal("Checkout session creation failed".into()));
        }
        Ok(response.json().await?)
    }

    /// Fetch a checkout session to confirm its payment status after the
    /// success redirect.
    pub async fn retrieve_checkout_session(&self, session_id: &str) -> Result<CheckoutSession> {
        let response = self
            .http_client
            .get(format!("{STRIPE_API_BASE}/checkout/sessions/{session_id}"))
            .basic_auth(&self.secret_key, None::<&str>)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::BadRequest("Unknown checkout session".into()));
        }
        Ok(response.json().await?)
    }

    /// Verify a `Stripe-Signature` header (`t=<ts>,v1=<hmac>`) against the
    /// raw payload. Constant-time comparison on the digest.
    pub fn verify_webhook_signature(&self, payload: &str, signature_header: &str) -> bool {
        let mut timestamp = None;
        let mut candidates = Vec::new();
        for part in signature_header.split(',') {
            match part.trim().split_once('=') {
                Some(("t", value)) => timestamp = Some(value),
                Some(("v1", value)) => candidates.push(value),
                _ => {}
            }
        }
        let Some(timestamp) = timestamp else {
            return false;
        };
        if candidates.is_empty() {
            return false;
        }

        let signed_payload = format!("{timestamp}.{payload}");
        let mut mac = match Hmac::<Sha256>::new_from_slice(self.webhook_secret.as_bytes()) {
            Ok(mac) => mac,
            Err(_) => return false,
        };
        mac.update(signed_payload.as_bytes());
        let expected = hex::encode(mac.finalize().into_bytes());

        candidates.iter().any(|candidate| {
            candidate.as_bytes().ct_eq(expected.as_bytes()).into()
        })
    }
}
