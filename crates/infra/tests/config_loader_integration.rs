//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;

use tempfile::NamedTempFile;
use tenantform_domain::{HostedPagesApi, ReconcileError, TemplateGroupsApi};
use tenantform_infra::config;

#[test]
fn test_load_config_from_toml_file() {
    let toml_content = r#"
host = "https://acme.example.com/"
client_id = "terraform"
client_secret = "s3cr3t"
timeout_secs = 12

[api]
hosted_pages = "legacy"
template_groups = "notifications"
"#;

    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(toml_content.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("toml");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let config = config::load_from_file(Some(path.clone())).expect("config loads");

    assert_eq!(config.base_url(), "https://acme.example.com");
    assert_eq!(config.client_id, "terraform");
    assert_eq!(config.timeout().as_secs(), 12);
    assert_eq!(config.api.hosted_pages, HostedPagesApi::Legacy);
    assert_eq!(config.api.template_groups, TemplateGroupsApi::Notifications);

    let debug = format!("{config:?}");
    assert!(!debug.contains("s3cr3t"));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_load_config_rejects_unknown_api_version() {
    let json_content = r#"{
        "host": "https://acme.example.com",
        "client_id": "terraform",
        "client_secret": "s3cr3t",
        "api": { "template_groups": "v9" }
    }"#;

    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file.write_all(json_content.as_bytes()).expect("Failed to write to temp file");

    let path = temp_file.path().with_extension("json");
    std::fs::copy(temp_file.path(), &path).expect("Failed to copy file");

    let result = config::load_from_file(Some(path.clone()));
    assert!(matches!(result, Err(ReconcileError::Config(_))));

    std::fs::remove_file(path).ok();
}
