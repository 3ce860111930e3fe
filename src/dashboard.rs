//! Signed-in user's overview: repairs, appointments and payments.
//!
//! The three reads run concurrently and independently. Each section keeps
//! its own `Result`, so one failing endpoint leaves the others visible.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::{Appointment, Payment, RepairRequest, Status, User};

#[derive(Debug)]
pub struct Dashboard {
    pub repairs: Result<Vec<RepairRequest>, ApiError>,
    pub appointments: Result<Vec<Appointment>, ApiError>,
    pub payments: Result<Vec<Payment>, ApiError>,
}

/// Fetch all three sections with `client`'s credentials.
pub async fn load(client: &ApiClient) -> Dashboard {
    let (repairs, appointments, payments) =
        tokio::join!(client.list_repairs(), client.list_appointments(), client.list_payments());
    Dashboard { repairs, appointments, payments }
}

impl Dashboard {
    /// True when every section was rejected for a missing or stale token.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        fn rejected<T>(section: &Result<T, ApiError>) -> bool {
            section.as_ref().err().is_some_and(ApiError::is_unauthorized)
        }
        rejected(&self.repairs) && rejected(&self.appointments) && rejected(&self.payments)
    }

    /// Plain-text summary.
    #[must_use]
    pub fn render(&self, user: Option<&User>) -> String {
        let mut out = String::new();
        if let Some(user) = user {
            let _ = writeln!(out, "Welcome back, {}", user.email);
            out.push('\n');
        }

        section(&mut out, "Repair requests", &self.repairs, "You don't have any repair requests.", |out, r| {
            let name = r.service_name().unwrap_or("Repair");
            let _ = writeln!(out, "  {name} {}", badge(&r.status));
            if !r.description.is_empty() {
                let _ = writeln!(out, "    {}", r.description);
            }
            let created = r.created_at.as_deref().map_or_else(String::new, format_date);
            let _ = writeln!(out, "    {created}  ${:.2}  id {}", r.estimated_cost, r.id);
        });

        section(
            &mut out,
            "Appointments",
            &self.appointments,
            "You don't have any appointments scheduled.",
            |out, a| {
                let name = a.service_name().unwrap_or("Appointment");
                let _ = writeln!(out, "  {name} {}", badge(&a.status));
                let notes = a.notes.as_deref().filter(|n| !n.is_empty()).unwrap_or("No additional notes.");
                let _ = writeln!(out, "    {notes}");
                let _ = writeln!(out, "    {}", format_date_time(&a.scheduled_date_time));
            },
        );

        section(&mut out, "Payments", &self.payments, "You don't have any payments yet.", |out, p| {
            let name = p.service_name().unwrap_or("Payment");
            let _ = writeln!(out, "  {name} {}", badge(&p.status));
            let method = p.method.as_ref().map_or("unknown method", |m| m.as_str());
            let created = p.created_at.as_deref().map_or_else(String::new, format_date);
            let _ = writeln!(out, "    ${:.2} via {method}  {created}", p.amount);
        });

        out
    }
}

fn section<T>(
    out: &mut String,
    title: &str,
    items: &Result<Vec<T>, ApiError>,
    empty: &str,
    mut row: impl FnMut(&mut String, &T),
) {
    let _ = writeln!(out, "{title}");
    match items {
        Err(e) => {
            let _ = writeln!(out, "  error: {e}");
        }
        Ok(items) if items.is_empty() => {
            let _ = writeln!(out, "  {empty}");
        }
        Ok(items) => {
            for item in items {
                row(out, item);
            }
        }
    }
    out.push('\n');
}

fn badge(status: &Status) -> String {
    if status.as_str().is_empty() {
        return String::new();
    }
    format!("[{status} · {}]", status.tone().label())
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// `May 1, 2024`; unparsable input is returned unchanged.
#[must_use]
pub fn format_date(raw: &str) -> String {
    parse_timestamp(raw).map_or_else(|| raw.to_owned(), |ts| ts.format("%b %-d, %Y").to_string())
}

/// `May 1, 2024, 10:00 AM` (UTC); unparsable input is returned unchanged.
#[must_use]
pub fn format_date_time(raw: &str) -> String {
    parse_timestamp(raw).map_or_else(|| raw.to_owned(), |ts| ts.format("%b %-d, %Y, %I:%M %p").to_string())
}

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;
