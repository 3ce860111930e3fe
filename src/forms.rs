//! Client-side validation for user-submitted forms.
//!
//! Each form holds raw field text as a user typed it. `validate` turns it
//! into the typed request payload or rejects it with a user-facing message;
//! the `submit_*` helpers validate before touching the network, so rejected
//! input never produces a request.

use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::session::{AuthState, SessionStore};
use crate::types::{
    Appointment, AuthSession, Credentials, MessageResponse, NewAppointment, NewPayment, NewRepairRequest, NewReview,
    Payment, PaymentMethod, RepairRequest, Review,
};

pub const MSG_LOGIN_REQUIRED: &str = "Please log in to continue";
pub const MSG_CREDENTIALS: &str = "Please enter your email and password";
pub const MSG_EMAIL: &str = "Please enter a valid email address";
pub const MSG_REPAIR_FIELDS: &str = "Please fill out all required fields";
pub const MSG_APPOINTMENT_FIELDS: &str = "Please select a repair request and appointment date";
pub const MSG_REVIEW_FIELDS: &str = "Please fill out all fields";
pub const MSG_PAYMENT_REPAIR: &str = "Please select a repair request";
pub const MSG_PAYMENT_METHOD: &str = "Please select a payment method";

fn reject(message: impl Into<String>) -> ApiError {
    ApiError::Validation(message.into())
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Non-negative finite amount; an empty field reads as zero.
fn parse_amount(raw: &str, field: &str) -> Result<f64, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0.0);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(reject(format!("{field} must be a non-negative number"))),
    }
}

/// Accept RFC 3339 or a bare `YYYY-MM-DD`; emit UTC with millisecond precision.
pub fn normalize_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight).to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn require_login(client: &ApiClient) -> Result<(), ApiError> {
    if client.is_authenticated() { Ok(()) } else { Err(reject(MSG_LOGIN_REQUIRED)) }
}

// =============================================================================
// CREDENTIALS
// =============================================================================

/// Login and registration both take an email and password.
#[derive(Debug, Clone, Default)]
pub struct CredentialsForm {
    pub email: String,
    pub password: String,
}

impl CredentialsForm {
    /// # Errors
    ///
    /// [`ApiError::Validation`] for a blank field or an email without `@`.
    pub fn validate(&self) -> Result<Credentials, ApiError> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            return Err(reject(MSG_CREDENTIALS));
        }
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => return Err(reject(MSG_EMAIL)),
        }
        Ok(Credentials { email: email.to_owned(), password: self.password.clone() })
    }
}

/// # Errors
///
/// Validation failure, or the backend's registration error.
pub async fn submit_registration(client: &ApiClient, form: &CredentialsForm) -> Result<MessageResponse, ApiError> {
    let credentials = form.validate()?;
    client.register(&credentials).await
}

/// Validate then log in through `auth`.
///
/// # Errors
///
/// Validation failure, or whatever [`AuthState::login`] returns.
pub async fn submit_login<'a, S: SessionStore>(
    auth: &'a mut AuthState<S>,
    client: &ApiClient,
    form: &CredentialsForm,
) -> Result<&'a AuthSession, ApiError> {
    let credentials = form.validate()?;
    auth.login(client, &credentials.email, &credentials.password).await
}

// =============================================================================
// REPAIR REQUEST
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct RepairForm {
    pub service_id: String,
    pub description: String,
    /// Optional; empty means zero.
    pub estimated_cost: String,
}

impl RepairForm {
    /// # Errors
    ///
    /// [`ApiError::Validation`] when service or description is blank, or the
    /// cost is not a non-negative number.
    pub fn validate(&self) -> Result<NewRepairRequest, ApiError> {
        if blank(&self.service_id) || blank(&self.description) {
            return Err(reject(MSG_REPAIR_FIELDS));
        }
        Ok(NewRepairRequest {
            service_id: self.service_id.trim().to_owned(),
            description: self.description.trim().to_owned(),
            estimated_cost: parse_amount(&self.estimated_cost, "Estimated cost")?,
        })
    }
}

/// # Errors
///
/// Login/validation failure before any request, or the backend's error.
pub async fn submit_repair(client: &ApiClient, form: &RepairForm) -> Result<RepairRequest, ApiError> {
    require_login(client)?;
    let body = form.validate()?;
    client.create_repair(&body).await
}

// =============================================================================
// APPOINTMENT
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct AppointmentForm {
    pub repair_id: String,
    /// `YYYY-MM-DD` or RFC 3339.
    pub date: String,
    pub notes: String,
}

impl AppointmentForm {
    /// # Errors
    ///
    /// [`ApiError::Validation`] when repair or date is missing or the date
    /// does not parse.
    pub fn validate(&self) -> Result<NewAppointment, ApiError> {
        if blank(&self.repair_id) || blank(&self.date) {
            return Err(reject(MSG_APPOINTMENT_FIELDS));
        }
        let scheduled_date_time = normalize_date(&self.date)
            .ok_or_else(|| reject("Appointment date must be YYYY-MM-DD or an RFC 3339 timestamp"))?;
        let notes = Some(self.notes.trim().to_owned()).filter(|n| !n.is_empty());
        Ok(NewAppointment { repair_request_id: self.repair_id.trim().to_owned(), scheduled_date_time, notes })
    }
}

/// # Errors
///
/// Login/validation failure before any request, or the backend's error.
pub async fn submit_appointment(client: &ApiClient, form: &AppointmentForm) -> Result<Appointment, ApiError> {
    require_login(client)?;
    let body = form.validate()?;
    client.create_appointment(&body).await
}

// =============================================================================
// REVIEW
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct ReviewForm {
    pub service_id: String,
    pub rating: String,
    pub comment: String,
}

impl ReviewForm {
    /// # Errors
    ///
    /// [`ApiError::Validation`] for a blank field or a rating outside 1–5.
    pub fn validate(&self) -> Result<NewReview, ApiError> {
        if blank(&self.service_id) || blank(&self.rating) || blank(&self.comment) {
            return Err(reject(MSG_REVIEW_FIELDS));
        }
        let rating = match self.rating.trim().parse::<u8>() {
            Ok(r @ 1..=5) => r,
            _ => return Err(reject("Rating must be a whole number from 1 to 5")),
        };
        Ok(NewReview {
            service_id: self.service_id.trim().to_owned(),
            rating,
            comment: self.comment.trim().to_owned(),
        })
    }
}

/// # Errors
///
/// Login/validation failure before any request, or the backend's error.
pub async fn submit_review(client: &ApiClient, form: &ReviewForm) -> Result<Review, ApiError> {
    require_login(client)?;
    let body = form.validate()?;
    client.create_review(&body).await
}

// =============================================================================
// PAYMENT
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct PaymentForm {
    pub repair_id: String,
    pub amount: String,
    pub method: String,
}

impl PaymentForm {
    /// Pre-filled from a repair: pays its final cost, or the estimate.
    #[must_use]
    pub fn for_repair(repair: &RepairRequest, method: &str) -> Self {
        Self { repair_id: repair.id.clone(), amount: repair.amount_due().to_string(), method: method.to_owned() }
    }

    /// # Errors
    ///
    /// [`ApiError::Validation`] for a missing repair, a missing or unknown
    /// method, or a negative amount.
    pub fn validate(&self) -> Result<NewPayment, ApiError> {
        if blank(&self.repair_id) {
            return Err(reject(MSG_PAYMENT_REPAIR));
        }
        if blank(&self.method) {
            return Err(reject(MSG_PAYMENT_METHOD));
        }
        let payment_method = self.method.parse::<PaymentMethod>().map_err(reject)?;
        Ok(NewPayment {
            repair_id: self.repair_id.trim().to_owned(),
            amount: parse_amount(&self.amount, "Amount")?,
            payment_method,
        })
    }
}

/// # Errors
///
/// Login/validation failure before any request, or the backend's error.
pub async fn submit_payment(client: &ApiClient, form: &PaymentForm) -> Result<Payment, ApiError> {
    require_login(client)?;
    let body = form.validate()?;
    client.create_payment(&body).await
}

#[cfg(test)]
#[path = "forms_test.rs"]
mod tests;
