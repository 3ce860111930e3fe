use axum::http::Method as StubMethod;
use serde_json::json;

use super::*;
use crate::test_support::Stub;

#[test]
fn format_date_matches_short_month_style() {
    assert_eq!(format_date("2024-05-01T10:00:00Z"), "May 1, 2024");
    assert_eq!(format_date("2024-12-31T23:59:59.000+00:00"), "Dec 31, 2024");
}

#[test]
fn format_date_time_includes_clock() {
    assert_eq!(format_date_time("2024-05-01T14:05:00Z"), "May 1, 2024, 02:05 PM");
}

#[test]
fn format_date_passes_through_unparsable() {
    assert_eq!(format_date("tomorrow"), "tomorrow");
}

#[tokio::test]
async fn load_collects_all_sections() {
    let stub = Stub::new()
        .json(
            StubMethod::GET,
            "/api/repairs",
            200,
            json!([{
                "_id": "r1",
                "serviceId": { "_id": "s1", "name": "Screen replacement" },
                "status": "in-progress",
                "description": "cracked screen",
                "estimatedCost": 120,
                "createdAt": "2024-05-01T10:00:00Z"
            }]),
        )
        .json(StubMethod::GET, "/api/appointments", 200, json!([]))
        .json(
            StubMethod::GET,
            "/api/payments",
            200,
            json!([{ "_id": "p1", "amount": 120, "paymentMethod": "cash", "status": "paid" }]),
        )
        .spawn()
        .await;
    let client = ApiClient::new(&stub.base_url).unwrap().with_token(Some("t"));

    let dashboard = load(&client).await;
    assert_eq!(dashboard.repairs.as_ref().unwrap().len(), 1);
    assert!(dashboard.appointments.as_ref().unwrap().is_empty());
    assert_eq!(dashboard.payments.as_ref().unwrap().len(), 1);
    assert_eq!(stub.hits(), 3);
    assert!(stub.seen().iter().all(|s| s.authorization.as_deref() == Some("Bearer t")));

    let user = User { id: "u1".into(), email: "user@example.com".into(), is_admin: false };
    let text = dashboard.render(Some(&user));
    assert!(text.starts_with("Welcome back, user@example.com"));
    assert!(text.contains("Screen replacement [in-progress · working]"));
    assert!(text.contains("May 1, 2024  $120.00  id r1"));
    assert!(text.contains("You don't have any appointments scheduled."));
    assert!(text.contains("$120.00 via cash"));
}

#[tokio::test]
async fn one_failing_section_does_not_hide_others() {
    let stub = Stub::new()
        .json(StubMethod::GET, "/api/repairs", 200, json!([]))
        .json(StubMethod::GET, "/api/appointments", 500, json!({ "message": "Database unavailable" }))
        .json(StubMethod::GET, "/api/payments", 200, json!([]))
        .spawn()
        .await;
    let client = ApiClient::new(&stub.base_url).unwrap().with_token(Some("t"));

    let dashboard = load(&client).await;
    assert!(dashboard.repairs.is_ok());
    assert!(dashboard.payments.is_ok());
    assert!(!dashboard.is_unauthorized());

    let text = dashboard.render(None);
    assert!(text.contains("error: Database unavailable"));
    assert!(text.contains("You don't have any repair requests."));
}

#[tokio::test]
async fn all_sections_unauthorized_is_detected() {
    let stub = Stub::new()
        .json(StubMethod::GET, "/api/repairs", 401, json!({ "message": "No token" }))
        .json(StubMethod::GET, "/api/appointments", 401, json!({ "message": "No token" }))
        .json(StubMethod::GET, "/api/payments", 401, json!({ "message": "No token" }))
        .spawn()
        .await;
    let client = ApiClient::new(&stub.base_url).unwrap();

    assert!(load(&client).await.is_unauthorized());
}
