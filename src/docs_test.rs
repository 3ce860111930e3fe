use std::collections::HashSet;

use super::*;

const BASE: &str = "https://be.naars.knileshh.com/api";

#[test]
fn every_endpoint_belongs_to_a_known_category() {
    for endpoint in endpoints() {
        assert!(category(endpoint.category).is_some(), "{} has unknown category", endpoint.id);
    }
}

#[test]
fn every_category_has_endpoints() {
    for c in categories() {
        assert!(endpoints_in(c.id).next().is_some(), "{} is empty", c.id);
    }
}

#[test]
fn endpoint_ids_are_unique() {
    let ids: HashSet<_> = endpoints().iter().map(|e| e.id).collect();
    assert_eq!(ids.len(), endpoints().len());
}

#[test]
fn catalog_size() {
    assert_eq!(categories().len(), 6);
    assert_eq!(endpoints().len(), 16);
}

#[test]
fn find_login() {
    let login = find("login").unwrap();
    assert_eq!(login.method, HttpMethod::Post);
    assert_eq!(login.path, "/auth/login");
    assert!(!login.authentication);
    assert!(find("nope").is_none());
}

#[test]
fn admin_operations_require_auth() {
    for id in ["create-service", "delete-service", "update-repair-status"] {
        assert!(find(id).unwrap().authentication, "{id} should require auth");
    }
}

#[test]
fn path_params_are_extracted() {
    assert_eq!(find("get-repair").unwrap().path_params(), vec!["id"]);
    assert_eq!(find("get-reviews").unwrap().path_params(), vec!["serviceId"]);
    assert!(find("get-services").unwrap().path_params().is_empty());
}

#[test]
fn full_url_joins_base_and_path() {
    assert_eq!(full_url(&format!("{BASE}/"), find("get-services").unwrap()), format!("{BASE}/services"));
}

#[test]
fn request_example_preserves_field_order() {
    let example = request_example(find("create-repair").unwrap());
    assert_eq!(
        example,
        "{\n  \"serviceId\": \"string\",\n  \"description\": \"string\",\n  \"estimatedCost\": \"number\"\n}"
    );
    let parsed: serde_json::Value = serde_json::from_str(&example).unwrap();
    assert_eq!(parsed["estimatedCost"], "number");
}

#[test]
fn request_example_empty_without_body() {
    assert_eq!(request_example(find("get-appointments").unwrap()), "");
}

#[test]
fn response_examples_are_json() {
    for endpoint in endpoints() {
        assert!(
            serde_json::from_str::<serde_json::Value>(endpoint.response_example).is_ok(),
            "{} response example is not JSON",
            endpoint.id
        );
    }
}

#[test]
fn render_endpoint_shows_auth_and_fields() {
    let text = render_endpoint(BASE, find("create-appointment").unwrap());
    assert!(text.contains("POST   Create Appointment  [auth required]"));
    assert!(text.contains(&format!("POST {BASE}/appointments")));
    assert!(text.contains("Authorization: Bearer <token>"));
    assert!(text.contains("- repairRequestId: string (required): ID of the repair request"));
    assert!(text.contains("- notes: string: Additional notes"));
    assert!(text.contains("Response: 201 Created"));
}

#[test]
fn render_endpoint_public_has_no_auth_block() {
    let text = render_endpoint(BASE, find("get-services").unwrap());
    assert!(!text.contains("Authorization"));
    assert!(!text.contains("Request body"));
}

#[test]
fn render_category_lists_its_endpoints_only() {
    let text = render_category(BASE, category("payments").unwrap());
    assert!(text.starts_with("Payments\n"));
    assert!(text.contains("Process Payment"));
    assert!(text.contains("Get Payment Details"));
    assert!(!text.contains("Submit Review"));
}

#[test]
fn render_index_marks_authenticated_endpoints() {
    let text = render_index(BASE);
    assert!(text.starts_with(&format!("Base URL: {BASE}\n")));
    assert!(text.contains("DELETE /appointments/:id"));
    assert!(text.lines().any(|l| l.contains("cancel-appointment") && l.ends_with('*')));
    assert!(text.lines().any(|l| l.contains("get-services") && !l.ends_with('*')));
}
