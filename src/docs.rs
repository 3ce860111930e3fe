//! Endpoint documentation catalog.
//!
//! Static description of every documented backend operation, grouped by
//! category, plus plain-text rendering for the `docs` command. The catalog
//! is data only; [`crate::client::ApiClient`] is the executable side.

use std::fmt::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

/// One request-body field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// JSON type name: `string`, `number`, `boolean`.
    pub kind: &'static str,
    pub required: bool,
    pub description: &'static str,
}

const fn field(name: &'static str, kind: &'static str, required: bool, description: &'static str) -> FieldSpec {
    FieldSpec { name, kind, required, description }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub id: &'static str,
    pub category: &'static str,
    pub title: &'static str,
    pub method: HttpMethod,
    /// Relative to the API base; `:name` marks a path parameter.
    pub path: &'static str,
    pub description: &'static str,
    /// Requires `Authorization: Bearer <token>`.
    pub authentication: bool,
    pub request_body: &'static [FieldSpec],
    pub response_status: &'static str,
    pub response_example: &'static str,
}

impl Endpoint {
    /// Names of the `:param` segments in `path`, in order.
    #[must_use]
    pub fn path_params(&self) -> Vec<&'static str> {
        self.path
            .split('/')
            .filter_map(|segment| segment.strip_prefix(':'))
            .collect()
    }
}

static CATEGORIES: &[Category] = &[
    Category {
        id: "authentication",
        title: "Authentication",
        description: "API endpoints for user registration and authentication.",
    },
    Category {
        id: "services",
        title: "Services",
        description: "API endpoints to manage repair services offered.",
    },
    Category {
        id: "repairs",
        title: "Repair Requests",
        description: "API endpoints for creating and managing repair requests.",
    },
    Category {
        id: "payments",
        title: "Payments",
        description: "API endpoints for processing and managing payments.",
    },
    Category {
        id: "reviews",
        title: "Reviews",
        description: "API endpoints for managing customer reviews.",
    },
    Category {
        id: "appointments",
        title: "Appointments",
        description: "API endpoints for scheduling and managing appointments.",
    },
];

static ENDPOINTS: &[Endpoint] = &[
    Endpoint {
        id: "register",
        category: "authentication",
        title: "Register User",
        method: HttpMethod::Post,
        path: "/auth/register",
        description: "Create a new user account.",
        authentication: false,
        request_body: &[
            field("email", "string", true, "User's email address"),
            field("password", "string", true, "User's password"),
        ],
        response_status: "201 Created",
        response_example: r#"{
  "message": "User created successfully"
}"#,
    },
    Endpoint {
        id: "login",
        category: "authentication",
        title: "Login",
        method: HttpMethod::Post,
        path: "/auth/login",
        description: "Authenticate a user and get a JWT token.",
        authentication: false,
        request_body: &[
            field("email", "string", true, "User's email address"),
            field("password", "string", true, "User's password"),
        ],
        response_status: "200 OK",
        response_example: r#"{
  "token": "string",
  "user": {
    "_id": "string",
    "email": "string",
    "isAdmin": "boolean"
  }
}"#,
    },
    Endpoint {
        id: "get-services",
        category: "services",
        title: "Get All Services",
        method: HttpMethod::Get,
        path: "/services",
        description: "Retrieve a list of all available repair services.",
        authentication: false,
        request_body: &[],
        response_status: "200 OK",
        response_example: r#"[
  {
    "_id": "string",
    "name": "string",
    "description": "string",
    "price": "number",
    "duration": "number",
    "active": "boolean"
  }
]"#,
    },
    Endpoint {
        id: "create-service",
        category: "services",
        title: "Create Service",
        method: HttpMethod::Post,
        path: "/services",
        description: "Create a new repair service (Admin only).",
        authentication: true,
        request_body: &[
            field("name", "string", true, "Service name"),
            field("description", "string", true, "Service description"),
            field("price", "number", true, "Service price"),
            field("duration", "number", true, "Service duration in minutes"),
        ],
        response_status: "201 Created",
        response_example: r#"{
  "_id": "string",
  "name": "string",
  "description": "string",
  "price": "number",
  "duration": "number",
  "active": "boolean"
}"#,
    },
    Endpoint {
        id: "delete-service",
        category: "services",
        title: "Delete Service",
        method: HttpMethod::Delete,
        path: "/services/:id",
        description: "Delete a repair service by ID (Admin only).",
        authentication: true,
        request_body: &[],
        response_status: "200 OK",
        response_example: r#"{
  "message": "Service deleted successfully"
}"#,
    },
    Endpoint {
        id: "create-repair",
        category: "repairs",
        title: "Create Repair Request",
        method: HttpMethod::Post,
        path: "/repairs",
        description: "Create a new repair request.",
        authentication: true,
        request_body: &[
            field("serviceId", "string", true, "ID of the service requested"),
            field("description", "string", true, "Description of the repair needed"),
            field("estimatedCost", "number", true, "Estimated cost of the repair"),
        ],
        response_status: "201 Created",
        response_example: r#"{
  "_id": "string",
  "userId": "string",
  "serviceId": "string",
  "status": "string",
  "description": "string",
  "estimatedCost": "number",
  "createdAt": "string"
}"#,
    },
    Endpoint {
        id: "get-repair",
        category: "repairs",
        title: "Get Specific Repair",
        method: HttpMethod::Get,
        path: "/repairs/:id",
        description: "Get details of a specific repair request.",
        authentication: true,
        request_body: &[],
        response_status: "200 OK",
        response_example: r#"{
  "_id": "string",
  "userId": {
    "_id": "string",
    "email": "string"
  },
  "serviceId": {
    "_id": "string",
    "name": "string",
    "description": "string",
    "price": "number"
  },
  "status": "string",
  "description": "string",
  "estimatedCost": "number",
  "createdAt": "string"
}"#,
    },
    Endpoint {
        id: "update-repair-status",
        category: "repairs",
        title: "Update Repair Status",
        method: HttpMethod::Put,
        path: "/repairs/:id/status",
        description: "Update the status of a repair request (Admin only).",
        authentication: true,
        request_body: &[
            field("status", "string", true, "'pending' | 'in-progress' | 'completed' | 'cancelled'"),
        ],
        response_status: "200 OK",
        response_example: r#"{
  "_id": "string",
  "status": "string",
  "// ...": "other repair details"
}"#,
    },
    Endpoint {
        id: "process-payment",
        category: "payments",
        title: "Process Payment",
        method: HttpMethod::Post,
        path: "/payments",
        description: "Process a payment for a repair request.",
        authentication: true,
        request_body: &[
            field("repairId", "string", true, "ID of the repair being paid for"),
            field("amount", "number", true, "Payment amount"),
            field("paymentMethod", "string", true, "Method of payment"),
        ],
        response_status: "201 Created",
        response_example: r#"{
  "_id": "string",
  "repairId": "string",
  "userId": "string",
  "amount": "number",
  "status": "string",
  "paymentMethod": "string",
  "transactionId": "string",
  "createdAt": "string"
}"#,
    },
    Endpoint {
        id: "get-payment",
        category: "payments",
        title: "Get Payment Details",
        method: HttpMethod::Get,
        path: "/payments/:id",
        description: "Get details of a specific payment.",
        authentication: true,
        request_body: &[],
        response_status: "200 OK",
        response_example: r#"{
  "_id": "string",
  "repairId": {
    "_id": "string",
    "// ...": "repair details"
  },
  "userId": {
    "_id": "string",
    "email": "string"
  },
  "amount": "number",
  "status": "string",
  "paymentMethod": "string",
  "transactionId": "string",
  "createdAt": "string"
}"#,
    },
    Endpoint {
        id: "submit-review",
        category: "reviews",
        title: "Submit Review",
        method: HttpMethod::Post,
        path: "/reviews",
        description: "Submit a review for a repair service.",
        authentication: true,
        request_body: &[
            field("serviceId", "string", true, "ID of the service being reviewed"),
            field("rating", "number", true, "Rating from 1-5"),
            field("comment", "string", true, "Review comment"),
        ],
        response_status: "201 Created",
        response_example: r#"{
  "_id": "string",
  "userId": "string",
  "serviceId": "string",
  "rating": "number",
  "comment": "string",
  "createdAt": "string"
}"#,
    },
    Endpoint {
        id: "get-reviews",
        category: "reviews",
        title: "Get Service Reviews",
        method: HttpMethod::Get,
        path: "/reviews/:serviceId",
        description: "Get all reviews for a specific service.",
        authentication: false,
        request_body: &[],
        response_status: "200 OK",
        response_example: r#"[
  {
    "_id": "string",
    "userId": {
      "_id": "string",
      "email": "string"
    },
    "serviceId": "string",
    "rating": "number",
    "comment": "string",
    "createdAt": "string"
  }
]"#,
    },
    Endpoint {
        id: "create-appointment",
        category: "appointments",
        title: "Create Appointment",
        method: HttpMethod::Post,
        path: "/appointments",
        description: "Create a new appointment for a repair request.",
        authentication: true,
        request_body: &[
            field("repairRequestId", "string", true, "ID of the repair request"),
            field("scheduledDateTime", "string", true, "ISO date string"),
            field("notes", "string", false, "Additional notes"),
        ],
        response_status: "201 Created",
        response_example: r#"{
  "_id": "string",
  "repairRequestId": "string",
  "userId": "string",
  "scheduledDateTime": "string",
  "status": "string",
  "notes": "string"
}"#,
    },
    Endpoint {
        id: "get-appointments",
        category: "appointments",
        title: "Get User Appointments",
        method: HttpMethod::Get,
        path: "/appointments",
        description: "Get all appointments for the authenticated user.",
        authentication: true,
        request_body: &[],
        response_status: "200 OK",
        response_example: r#"[
  {
    "_id": "string",
    "repairRequestId": {
      "_id": "string",
      "// ...": "repair details"
    },
    "userId": {
      "_id": "string",
      "email": "string"
    },
    "scheduledDateTime": "string",
    "status": "string",
    "notes": "string"
  }
]"#,
    },
    Endpoint {
        id: "update-appointment",
        category: "appointments",
        title: "Update Appointment",
        method: HttpMethod::Put,
        path: "/appointments/:id",
        description: "Update an existing appointment.",
        authentication: true,
        request_body: &[
            field("scheduledDateTime", "string", false, "ISO date string"),
            field("status", "string", false, "Appointment status"),
            field("notes", "string", false, "Additional notes"),
        ],
        response_status: "200 OK",
        response_example: r#"{
  "// ...": "Updated appointment details"
}"#,
    },
    Endpoint {
        id: "cancel-appointment",
        category: "appointments",
        title: "Cancel Appointment",
        method: HttpMethod::Delete,
        path: "/appointments/:id",
        description: "Cancel an existing appointment.",
        authentication: true,
        request_body: &[],
        response_status: "200 OK",
        response_example: r#"{
  "message": "Appointment canceled successfully"
}"#,
    },
];

#[must_use]
pub fn categories() -> &'static [Category] {
    CATEGORIES
}

#[must_use]
pub fn endpoints() -> &'static [Endpoint] {
    ENDPOINTS
}

#[must_use]
pub fn category(id: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.id == id)
}

pub fn endpoints_in(category: &str) -> impl Iterator<Item = &'static Endpoint> + '_ {
    ENDPOINTS.iter().filter(move |e| e.category == category)
}

#[must_use]
pub fn find(id: &str) -> Option<&'static Endpoint> {
    ENDPOINTS.iter().find(|e| e.id == id)
}

#[must_use]
pub fn full_url(base_url: &str, endpoint: &Endpoint) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), endpoint.path)
}

/// Example request body mapping each field to its type, fields in declared
/// order. Empty when the endpoint takes no body.
#[must_use]
pub fn request_example(endpoint: &Endpoint) -> String {
    if endpoint.request_body.is_empty() {
        return String::new();
    }
    let lines: Vec<String> = endpoint
        .request_body
        .iter()
        .map(|f| format!("  {}: {}", quote(f.name), quote(f.kind)))
        .collect();
    format!("{{\n{}\n}}", lines.join(",\n"))
}

fn quote(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

fn indent_block(out: &mut String, block: &str) {
    for line in block.lines() {
        let _ = writeln!(out, "      {line}");
    }
}

/// Full text for one endpoint.
#[must_use]
pub fn render_endpoint(base_url: &str, endpoint: &Endpoint) -> String {
    let mut out = String::new();
    let lock = if endpoint.authentication { "  [auth required]" } else { "" };
    let _ = writeln!(out, "  {:<6} {}{lock}", endpoint.method, endpoint.title);
    let _ = writeln!(out, "    {}", endpoint.description);
    let _ = writeln!(out, "    {} {}", endpoint.method, full_url(base_url, endpoint));

    if endpoint.authentication {
        out.push_str("    Authentication:\n      Authorization: Bearer <token>\n");
    }

    if !endpoint.request_body.is_empty() {
        out.push_str("    Request body (application/json):\n");
        indent_block(&mut out, &request_example(endpoint));
        for f in endpoint.request_body {
            let required = if f.required { " (required)" } else { "" };
            let _ = write!(out, "      - {}: {}{required}", f.name, f.kind);
            if !f.description.is_empty() {
                let _ = write!(out, ": {}", f.description);
            }
            out.push('\n');
        }
    }

    let _ = writeln!(out, "    Response: {}", endpoint.response_status);
    indent_block(&mut out, endpoint.response_example);
    out
}

/// Category heading followed by each of its endpoints.
#[must_use]
pub fn render_category(base_url: &str, category: &Category) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", category.title);
    let _ = writeln!(out, "{}", category.description);
    for endpoint in endpoints_in(category.id) {
        out.push('\n');
        out.push_str(&render_endpoint(base_url, endpoint));
    }
    out
}

/// One line per endpoint, grouped by category.
#[must_use]
pub fn render_index(base_url: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Base URL: {}", base_url.trim_end_matches('/'));
    for category in CATEGORIES {
        out.push('\n');
        let _ = writeln!(out, "{} ({})", category.title, category.id);
        for e in endpoints_in(category.id) {
            let lock = if e.authentication { " *" } else { "" };
            let _ = writeln!(out, "  {:<6} {:<24} {}{lock}", e.method.as_str(), e.path, e.id);
        }
    }
    out.push_str("\n* requires authentication\n");
    out
}

#[cfg(test)]
#[path = "docs_test.rs"]
mod tests;
