//! HTTP client for the repair service REST API.
//!
//! One method per backend operation. Each call is a single request: no
//! retries, no timeouts, no caching. Reads always hit the backend.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become [`ApiError::Api`] carrying the backend's
//! `message` field when the body has one, else the operation's fixed
//! fallback text. Transport failures become [`ApiError::Transport`].

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{ClientConfig, normalize_base_url};
use crate::error::ApiError;
use crate::types::{
    Appointment, AppointmentUpdate, AuthSession, Credentials, MessageResponse, NewAppointment, NewPayment,
    NewRepairRequest, NewReview, NewService, Payment, RepairRequest, RepairUpdate, Review, Service, Status,
    StatusUpdate,
};

const JSON: &str = "application/json";

/// Repair service API client.
///
/// Cloning is cheap; clones share the underlying connection pool. The
/// bearer token is fixed per instance, see [`ApiClient::with_token`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl ApiClient {
    /// Build an anonymous client against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the URL is not a usable http(s) base.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let normalized = normalize_base_url(base_url)?;
        let base = Url::parse(&normalized).map_err(|e| ApiError::Config(format!("invalid base URL: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::Config(format!("invalid base URL: {normalized}")));
        }
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiError::Config(format!("HTTP client build failed: {e}")))?;
        Ok(Self { http, base, token: None })
    }

    /// # Errors
    ///
    /// See [`ApiClient::new`].
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(&config.base_url)
    }

    /// A clone of this client that authenticates as `token`, or anonymously.
    #[must_use]
    pub fn with_token(&self, token: Option<&str>) -> Self {
        Self { token: token.map(str::to_owned), ..self.clone() }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    // =========================================================================
    // AUTH
    // =========================================================================

    /// `POST /auth/register`
    ///
    /// # Errors
    ///
    /// Backend message or "Registration failed".
    pub async fn register(&self, credentials: &Credentials) -> Result<MessageResponse, ApiError> {
        self.send_message(Method::POST, &["auth", "register"], Some(credentials), "Registration failed")
            .await
    }

    /// `POST /auth/login`
    ///
    /// # Errors
    ///
    /// Backend message or "Login failed".
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthSession, ApiError> {
        self.send_json(Method::POST, &["auth", "login"], credentials, "Login failed")
            .await
    }

    // =========================================================================
    // SERVICES
    // =========================================================================

    /// `GET /services`
    ///
    /// # Errors
    ///
    /// Backend message or "Failed to fetch services".
    pub async fn list_services(&self) -> Result<Vec<Service>, ApiError> {
        self.get(&["services"], "Failed to fetch services").await
    }

    /// `GET /services/{id}`
    ///
    /// # Errors
    ///
    /// Backend message or "Failed to fetch service".
    pub async fn get_service(&self, id: &str) -> Result<Service, ApiError> {
        self.get(&["services", id], "Failed to fetch service").await
    }

    /// `POST /services` (admin).
    ///
    /// # Errors
    ///
    /// Backend message or "Failed to create service".
    pub async fn create_service(&self, service: &NewService) -> Result<Service, ApiError> {
        self.send_json(Method::POST, &["services"], service, "Failed to create service")
            .await
    }

    /// `DELETE /services/{id}` (admin).
    ///
    /// # Errors
    ///
    /// Backend message or "Failed to delete service".
    pub async fn delete_service(&self, id: &str) -> Result<MessageResponse, ApiError> {
        self.send_message::<()>(Method::DELETE, &["services", id], None, "Failed to delete service")
            .await
    }

    // =========================================================================
    // REPAIRS
    // =========================================================================

    /// `GET /repairs`
    ///
    /// # Errors
    ///
    /// Backend message or "Failed to fetch repair requests".
    pub async fn list_repairs(&self) -> Result<Vec<RepairRequest>, ApiError> {
        self.get(&["repairs"], "Failed to fetch repair requests").await
    }

    /// `GET /repairs/{id}`
    ///
    /// # Errors
    ///
    /// Backend message or "Failed to fetch repair request".
    pub async fn get_repair(&self, id: &str) -> Result<RepairRequest, ApiError> {
        self.get(&["repairs", id], "Failed to fetch repair request").await
    }

    /// `POST /repairs`
    ///
    /// # Errors
    ///
    /// Backend message or "Failed to submit repair request".
    pub async fn create_repair(&self, repair: &NewRepairRequest) -> Result<RepairRequest, ApiError> {
        self.send_json(Method::POST, &["repairs"], repair, "Failed to submit repair request")
            .await
    }

    /// `PUT /repairs/{id}`
    ///
    /// # Errors
    ///
    /// Backend message or "Failed to update repair request".
    pub async fn update_repair(&self, id: &str, update: &RepairUpdate) -> Result<RepairRequest, ApiError> {
        self.send_json(Method::PUT, &["repairs", id], update, "Failed to update repair request")
            .await
    }

    /// `PUT /repairs/{id}/status` (admin).
    ///
    /// # Errors
    ///
    /// Backend message or "Failed to update repair status".
    pub async fn update_repair_status(&self, id: &str, status: Status) -> Result<RepairRequest, ApiError> {
        let body = StatusUpdate { status };
        self.send_json(Method::PUT, &["repairs", id, "status"], &body, "Failed to update repair status")
            .await
    }

    // =========================================================================
    // PAYMENTS
    // =========================================================================

    /// `GET /payments`
    ///
    /// # Errors
    ///
    /// Backend message or "Failed to fetch payments".
    pub async fn list_payments(&self) -> Result<Vec<Payment>, ApiError> {
        self.get(&["payments"], "Failed to fetch payments").await
    }

    /// `GET /payments/{id}`
    ///
    /// # Errors
    ///
    /// Backend message or "Failed to fetch payment".
    pub async fn get_payment(&self, id: &str) -> Result<Payment, ApiError> {
        self.get(&["payments", id], "Failed to fetch payment").await
    }

    /// `POST /payments`
    ///
    /// # Errors
    ///
    /// Backend message or "Failed to process payment".
    pub async fn create_payment(&self, payment: &NewPayment) -> Result<Payment, ApiError> {
        self.send_json(Method::POST, &["payments"], payment, "Failed to process payment")
            .await
    }

    // =========================================================================
    // APPOINTMENTS
    // =========================================================================

    /// `GET /appointments`
    ///
    /// # Errors
    ///
    /// Backend message or "Failed to fetch appointments".
    pub async fn list_appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        self.get(&["appointments"], "Failed to fetch appointments").await
    }

    /// `POST /appointments`
    ///
    /// # Errors
    ///
    /// Backend message or "Failed to schedule appointment".
    pub async fn create_appointment(&self, appointment: &NewAppointment) -> Result<Appointment, ApiError> {
        self.send_json(Method::POST, &["appointments"], appointment, "Failed to schedule appointment")
            .await
    }

    /// `PUT /appointments/{id}`
    ///
    /// # Errors
    ///
    /// Backend message or "Failed to update appointment".
    pub async fn update_appointment(&self, id: &str, update: &AppointmentUpdate) -> Result<Appointment, ApiError> {
        self.send_json(Method::PUT, &["appointments", id], update, "Failed to update appointment")
            .await
    }

    /// `DELETE /appointments/{id}`
    ///
    /// # Errors
    ///
    /// Backend message or "Failed to cancel appointment".
    pub async fn cancel_appointment(&self, id: &str) -> Result<MessageResponse, ApiError> {
        self.send_message::<()>(Method::DELETE, &["appointments", id], None, "Failed to cancel appointment")
            .await
    }

    // =========================================================================
    // REVIEWS
    // =========================================================================

    /// `GET /reviews`
    ///
    /// # Errors
    ///
    /// Backend message or "Failed to fetch reviews".
    pub async fn list_reviews(&self) -> Result<Vec<Review>, ApiError> {
        self.get(&["reviews"], "Failed to fetch reviews").await
    }

    /// `GET /reviews/{serviceId}`
    ///
    /// # Errors
    ///
    /// Backend message or "Failed to fetch reviews".
    pub async fn list_service_reviews(&self, service_id: &str) -> Result<Vec<Review>, ApiError> {
        self.get(&["reviews", service_id], "Failed to fetch reviews").await
    }

    /// `POST /reviews`
    ///
    /// # Errors
    ///
    /// Backend message or "Failed to submit review".
    pub async fn create_review(&self, review: &NewReview) -> Result<Review, ApiError> {
        self.send_json(Method::POST, &["reviews"], review, "Failed to submit review")
            .await
    }

    // =========================================================================
    // TRANSPORT
    // =========================================================================

    /// Base URL joined with percent-encoded path segments.
    pub(crate) fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// JSON content headers, plus `Authorization` only when a token is set.
    pub(crate) fn headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));
        if let Some(token) = &self.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ApiError::Config("bearer token contains invalid header characters".to_owned()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        let url = self.url(segments);
        tracing::debug!(%method, path = url.path(), authorized = self.token.is_some(), "api request");
        Ok(self.http.request(method, url).headers(self.headers()?))
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str], fallback: &str) -> Result<T, ApiError> {
        let request = self.request(Method::GET, segments)?;
        execute(request, fallback).await
    }

    async fn send_json<B, T>(&self, method: Method, segments: &[&str], body: &B, fallback: &str) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(method, segments)?.json(body);
        execute(request, fallback).await
    }

    /// Operations answering `{ "message": ... }`, or nothing at all.
    async fn send_message<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
        fallback: &str,
    ) -> Result<MessageResponse, ApiError> {
        let mut request = self.request(method, segments)?;
        if let Some(body) = body {
            request = request.json(body);
        }
        let response: Option<MessageResponse> = execute(request, fallback).await?;
        Ok(response.unwrap_or_default())
    }
}

async fn execute<T: DeserializeOwned>(request: RequestBuilder, fallback: &str) -> Result<T, ApiError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        // An unreadable error body still yields the status and fallback.
        let text = response.text().await.unwrap_or_default();
        let message = error_message(&text, fallback);
        tracing::warn!(status = status.as_u16(), %message, "api request failed");
        return Err(ApiError::Api { status: status.as_u16(), message });
    }

    let text = response.text().await?;
    decode_body(&text)
}

/// Parse a success body; an empty body reads as JSON `null`.
pub(crate) fn decode_body<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}

/// The backend's `message` field, or `fallback` when absent or unparsable.
pub(crate) fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("message").and_then(Value::as_str).map(str::to_owned))
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| fallback.to_owned())
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
