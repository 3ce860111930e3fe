use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn from_lookup_defaults() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[("HOME", "/home/tester")])).unwrap();
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    assert_eq!(cfg.session_file, PathBuf::from("/home/tester/.repairdesk/session.json"));
}

#[test]
fn from_lookup_without_home_uses_relative_path() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg.session_file, PathBuf::from(".repairdesk/session.json"));
}

#[test]
fn from_lookup_overrides() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[
        (BASE_URL_ENV, "http://127.0.0.1:4000/api/"),
        (SESSION_FILE_ENV, "/tmp/rd.json"),
    ]))
    .unwrap();
    assert_eq!(cfg.base_url, "http://127.0.0.1:4000/api");
    assert_eq!(cfg.session_file, PathBuf::from("/tmp/rd.json"));
}

#[test]
fn from_lookup_blank_values_fall_back() {
    let cfg = ClientConfig::from_lookup(lookup_from(&[(BASE_URL_ENV, "  "), (SESSION_FILE_ENV, "")])).unwrap();
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
}

#[test]
fn from_lookup_rejects_non_http_scheme() {
    let err = ClientConfig::from_lookup(lookup_from(&[(BASE_URL_ENV, "ftp://example.test")]))
        .unwrap_err()
        .to_string();
    assert!(err.contains("invalid REPAIRDESK_BASE_URL"));
}

#[test]
fn normalize_base_url_trims_slashes_and_whitespace() {
    assert_eq!(normalize_base_url(" https://api.test/v1// ").unwrap(), "https://api.test/v1");
}

#[test]
fn from_env_reads_process_env() {
    unsafe {
        std::env::set_var(BASE_URL_ENV, "https://env.example.test/api/");
        std::env::set_var(SESSION_FILE_ENV, "/tmp/repairdesk-env-test.json");
    }

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, "https://env.example.test/api");
    assert_eq!(cfg.session_file, PathBuf::from("/tmp/repairdesk-env-test.json"));

    unsafe {
        std::env::remove_var(BASE_URL_ENV);
        std::env::remove_var(SESSION_FILE_ENV);
    }
}
