use std::future::Future;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::metro::Metro;

use super::domain::NormalizedDraft;

/// Path the payment collaborator exposes for session creation.
pub const CHECKOUT_PATH: &str = "/create-checkout";

const GENERIC_REJECTION: &str = "Checkout failed. Please try again.";

/// Failures raised while initiating a checkout session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    #[error("payments endpoint is misconfigured")]
    MisconfiguredEndpoint,
    #[error("{0}")]
    Rejected(String),
    #[error("Checkout URL missing. Please try again.")]
    MalformedResponse,
}

/// Wire payload for session creation: the normalized draft plus the metro
/// binding, in the exact snake_case shape the collaborator consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub metro_slug: String,
    pub city: String,
    pub state: String,
    pub cafe_name: String,
    pub role: String,
    pub pay: String,
    pub hours: Option<String>,
    pub neighborhood: Option<String>,
    pub apply_url: Option<String>,
    pub apply_email: Option<String>,
    pub description: Option<String>,
    pub contact_email: Option<String>,
    pub requested_pinned: bool,
}

impl CheckoutRequest {
    pub fn new(metro: &Metro, draft: &NormalizedDraft) -> Self {
        Self {
            metro_slug: metro.slug.clone(),
            city: metro.city.clone(),
            state: metro.state.clone(),
            cafe_name: draft.cafe_name.clone(),
            role: draft.role.clone(),
            pay: draft.pay.clone(),
            hours: draft.hours.clone(),
            neighborhood: draft.neighborhood.clone(),
            apply_url: draft.apply_url.clone(),
            apply_email: draft.apply_email.clone(),
            description: draft.description.clone(),
            contact_email: draft.contact_email.clone(),
            requested_pinned: draft.requested_pinned,
        }
    }
}

/// A created checkout session. The caller owns the actual redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub url: String,
}

/// Trim, strip trailing slashes, and require a syntactically valid absolute
/// URL. A failure here is a deployment error and must be reported before
/// any network I/O is attempted.
pub fn checkout_base_url(raw: &str) -> Result<String, CheckoutError> {
    let cleaned = raw.trim().trim_end_matches('/');
    if cleaned.is_empty() {
        return Err(CheckoutError::MisconfiguredEndpoint);
    }
    Url::parse(cleaned).map_err(|_| CheckoutError::MisconfiguredEndpoint)?;
    Ok(cleaned.to_string())
}

#[derive(Debug, Default, Deserialize)]
struct CheckoutResponseBody {
    url: Option<String>,
    error: Option<String>,
}

/// Map a collaborator response to a session or a typed failure. Non-success
/// responses use the collaborator's message when it sent one; a success
/// without a redirect URL is malformed.
fn interpret(success: bool, body: CheckoutResponseBody) -> Result<CheckoutSession, CheckoutError> {
    if !success {
        let message = body
            .error
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| GENERIC_REJECTION.to_string());
        return Err(CheckoutError::Rejected(message));
    }

    match body.url {
        Some(url) if !url.trim().is_empty() => Ok(CheckoutSession { url }),
        _ => Err(CheckoutError::MalformedResponse),
    }
}

/// Outbound seam to the payment collaborator, so the service and router can
/// be exercised without a live payments worker.
pub trait PaymentGateway: Send + Sync {
    fn create_checkout(
        &self,
        request: CheckoutRequest,
    ) -> impl Future<Output = Result<CheckoutSession, CheckoutError>> + Send;
}

/// reqwest-backed gateway. One attempt per call, no retry; a network-level
/// failure is reported as a rejection with the generic message.
#[derive(Debug, Clone)]
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPaymentGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl PaymentGateway for HttpPaymentGateway {
    async fn create_checkout(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession, CheckoutError> {
        let base = checkout_base_url(&self.base_url)?;

        let response = self
            .client
            .post(format!("{base}{CHECKOUT_PATH}"))
            .json(&request)
            .send()
            .await
            .map_err(|_| CheckoutError::Rejected(GENERIC_REJECTION.to_string()))?;

        let success = response.status().is_success();
        let body: CheckoutResponseBody = response.json().await.unwrap_or_default();
        interpret(success, body)
    }
}
