//! Wire types mirrored from the repair service's JSON.
//!
//! The backend uses Mongo-style `_id` keys and is not consistent about
//! field names across endpoints (`service` vs `serviceId`, `active` vs
//! `isActive`, `scheduledDate` vs `scheduledDateTime`), so records accept
//! every spelling seen in practice via serde aliases.
//!
//! STATUS VALUES
//! =============
//! Status enumerations differ between endpoints (`in-progress` vs
//! `in_progress`, different sets per resource). [`Status`] keeps the raw
//! string untouched and only normalizes it for [`Status::tone`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// REFERENCES
// =============================================================================

/// Anything with a backend `_id`.
pub trait Identified {
    fn id(&self) -> &str;
}

/// A related record that is either a bare id or populated inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ref<T> {
    Id(String),
    Record(Box<T>),
}

impl<T: Identified> Ref<T> {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Record(record) => record.id(),
        }
    }

    /// The populated record, if the backend sent one.
    #[must_use]
    pub fn record(&self) -> Option<&T> {
        match self {
            Self::Id(_) => None,
            Self::Record(record) => Some(record),
        }
    }
}

// =============================================================================
// STATUS
// =============================================================================

/// Display classification of a status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    /// Waiting on someone (`pending`).
    Waiting,
    /// Work underway or booked (`in-progress`, `diagnosed`, `scheduled`).
    Working,
    /// Finished successfully (`completed`, `delivered`, `paid`).
    Done,
    /// Stopped or owed (`cancelled`, `unpaid`, `refunded`).
    Problem,
    /// Anything unrecognized.
    Neutral,
}

impl StatusTone {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Working => "working",
            Self::Done => "done",
            Self::Problem => "problem",
            Self::Neutral => "neutral",
        }
    }
}

/// A backend status value, preserved verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Status(String);

impl Status {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased with `-`, `_` and spaces collapsed to `_`.
    #[must_use]
    pub fn normalized(&self) -> String {
        self.0
            .trim()
            .chars()
            .map(|c| if c == '-' || c == ' ' { '_' } else { c.to_ascii_lowercase() })
            .collect()
    }

    #[must_use]
    pub fn tone(&self) -> StatusTone {
        match self.normalized().as_str() {
            "pending" => StatusTone::Waiting,
            "in_progress" | "diagnosed" | "scheduled" => StatusTone::Working,
            "completed" | "delivered" | "paid" => StatusTone::Done,
            "cancelled" | "canceled" | "unpaid" | "refunded" => StatusTone::Problem,
            _ => StatusTone::Neutral,
        }
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.normalized() == "completed"
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// PAYMENT METHOD
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Paypal,
    Cash,
    /// A method this client does not know about, kept as sent.
    Other(String),
}

impl PaymentMethod {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
            Self::Paypal => "paypal",
            Self::Cash => "cash",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for PaymentMethod {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "credit_card" => Self::CreditCard,
            "debit_card" => Self::DebitCard,
            "paypal" => Self::Paypal,
            "cash" => Self::Cash,
            _ => Self::Other(raw),
        }
    }
}

impl From<PaymentMethod> for String {
    fn from(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    /// Strict parse for user input: only the four known methods.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::from(s.trim().to_owned()) {
            Self::Other(raw) => Err(format!(
                "unknown payment method '{raw}' (expected credit_card, debit_card, paypal or cash)"
            )),
            known => Ok(known),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// RECORDS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl Identified for User {
    fn id(&self) -> &str {
        &self.id
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    /// Minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default = "default_true", alias = "isActive")]
    pub active: bool,
}

impl Identified for Service {
    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairRequest {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, alias = "userId", skip_serializing_if = "Option::is_none")]
    pub user: Option<Ref<User>>,
    #[serde(default, alias = "serviceId", skip_serializing_if = "Option::is_none")]
    pub service: Option<Ref<Service>>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub estimated_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Identified for RepairRequest {
    fn id(&self) -> &str {
        &self.id
    }
}

impl RepairRequest {
    /// Name of the requested service when the backend populated it.
    #[must_use]
    pub fn service_name(&self) -> Option<&str> {
        self.service
            .as_ref()
            .and_then(Ref::record)
            .map(|s| s.name.as_str())
    }

    /// Final cost once known, else the estimate.
    #[must_use]
    pub fn amount_due(&self) -> f64 {
        self.final_cost.unwrap_or(self.estimated_cost)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, alias = "repairId", skip_serializing_if = "Option::is_none")]
    pub repair: Option<Ref<RepairRequest>>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default, alias = "paymentMethod", skip_serializing_if = "Option::is_none")]
    pub method: Option<PaymentMethod>,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, alias = "repairRequestId", skip_serializing_if = "Option::is_none")]
    pub repair: Option<Ref<RepairRequest>>,
    #[serde(default, alias = "scheduledDate")]
    pub scheduled_date_time: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Service name through a populated repair reference.
fn repair_service_name(repair: Option<&Ref<RepairRequest>>) -> Option<&str> {
    repair
        .and_then(Ref::record)
        .and_then(RepairRequest::service_name)
}

impl Appointment {
    #[must_use]
    pub fn service_name(&self) -> Option<&str> {
        repair_service_name(self.repair.as_ref())
    }
}

impl Payment {
    #[must_use]
    pub fn service_name(&self) -> Option<&str> {
        repair_service_name(self.repair.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, alias = "userId", skip_serializing_if = "Option::is_none")]
    pub user: Option<Ref<User>>,
    #[serde(default, alias = "serviceId", skip_serializing_if = "Option::is_none")]
    pub service: Option<Ref<Service>>,
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Login response and the persisted session record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

/// `{ "message": ... }` acknowledgements (register, deletes).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

// =============================================================================
// REQUEST PAYLOADS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewService {
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Minutes.
    pub duration: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRepairRequest {
    pub service_id: String,
    pub description: String,
    pub estimated_cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_cost: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub repair_id: String,
    pub amount: f64,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub repair_request_id: String,
    pub scheduled_date_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub service_id: String,
    pub rating: u8,
    pub comment: String,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
