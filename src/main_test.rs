use std::path::PathBuf;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use serde_json::json;

use super::*;
use repairdesk::SessionStore;
use repairdesk::types::{AuthSession, User};

fn temp_session_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!("repairdesk-cli-test-{}-{name}", std::process::id()))
        .join("session.json")
}

async fn spawn_backend(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

fn unauthorized(message: &'static str) -> (StatusCode, axum::Json<serde_json::Value>) {
    (StatusCode::UNAUTHORIZED, axum::Json(json!({ "message": message })))
}

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("repairdesk").chain(args.iter().copied())).unwrap()
}

// =============================================================================
// error mapping
// =============================================================================

#[test]
fn api_errors_convert_unchanged() {
    let err = CliError::from(ApiError::Api { status: 401, message: "Invalid credentials".into() });
    assert!(matches!(err, CliError::Api(_)));
    assert_eq!(err.to_string(), "Invalid credentials");
}

#[test]
fn for_session_flags_only_unauthorized() {
    let stale = CliError::from(ApiError::Api { status: 401, message: "Token expired".into() }).for_session();
    assert!(matches!(stale, CliError::SessionRejected(ref m) if m == "Token expired"));

    let server = CliError::from(ApiError::Api { status: 500, message: "boom".into() }).for_session();
    assert_eq!(server.to_string(), "boom");

    assert!(matches!(CliError::NotLoggedIn.for_session(), CliError::NotLoggedIn));
}

#[tokio::test]
async fn wrong_password_surfaces_backend_message() {
    let app = Router::new().route("/api/auth/login", post(|| async { unauthorized("Invalid credentials") }));
    let base = spawn_backend(app).await;
    let session = temp_session_path("wrong-password");

    let cli = parse(&[
        "--base-url",
        &base,
        "--session-file",
        session.to_str().unwrap(),
        "login",
        "--email",
        "user@example.com",
        "--password",
        "wrong",
    ]);
    let err = run(cli).await.unwrap_err();
    assert!(matches!(err, CliError::Api(_)));
    assert_eq!(err.to_string(), "Invalid credentials");
    assert!(!session.exists());
}

#[tokio::test]
async fn stale_session_is_reported_as_rejected() {
    let app = Router::new().route("/api/repairs", get(|| async { unauthorized("Token expired") }));
    let base = spawn_backend(app).await;
    let session = temp_session_path("stale");
    let store = FileSessionStore::new(&session);
    store
        .save(&AuthSession {
            token: "old".into(),
            user: User { id: "u1".into(), email: "user@example.com".into(), is_admin: false },
        })
        .unwrap();

    let cli = parse(&["--base-url", &base, "--session-file", session.to_str().unwrap(), "repairs", "list"]);
    let err = run(cli).await.unwrap_err();
    assert!(matches!(err, CliError::SessionRejected(ref m) if m == "Token expired"));

    store.clear().unwrap();
}

// =============================================================================
// configuration
// =============================================================================

#[test]
fn resolve_config_prefers_flag_values() {
    let config = resolve_config(Some("http://127.0.0.1:1/api/"), Some(PathBuf::from("/tmp/s.json"))).unwrap();
    assert_eq!(config.base_url, "http://127.0.0.1:1/api");
    assert_eq!(config.session_file, PathBuf::from("/tmp/s.json"));
}

#[test]
fn resolve_config_defaults_without_flags() {
    let config = resolve_config(None, None).unwrap();
    assert_eq!(config.base_url, repairdesk::config::DEFAULT_BASE_URL);
    assert!(config.session_file.ends_with(".repairdesk/session.json"));
}

#[test]
fn resolve_config_rejects_bad_flag() {
    assert!(matches!(resolve_config(Some("ftp://bad"), None), Err(CliError::Api(ApiError::Config(_)))));
}

#[tokio::test]
async fn base_url_flag_overrides_bad_env() {
    // Only this test touches the variable; every other test passes --base-url.
    unsafe { std::env::set_var(BASE_URL_ENV, "ftp://bad") };

    let cli = parse(&["--base-url", "http://127.0.0.1:1/api", "docs"]);
    assert_eq!(cli.base_url.as_deref(), Some("http://127.0.0.1:1/api"));
    let result = run(cli).await;

    unsafe { std::env::remove_var(BASE_URL_ENV) };
    assert!(result.is_ok(), "{result:?}");
}
