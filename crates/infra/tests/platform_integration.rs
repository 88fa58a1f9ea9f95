//! Integration tests for the authenticated session and platform facade
//!
//! Runs the reconcilers end to end against a wiremock platform.

use std::sync::Arc;

use serde_json::json;
use tenantform_core::{HttpMethod, PlatformTransport, ResourceReconciler};
use tenantform_domain::{
    ApiVersions, AppPlan, HostedPage, HostedPageGroupPlan, HostedPagesApi, PasswordPolicy,
    PlatformConfig, ReconcileError,
};
use tenantform_infra::{AuthenticatedSession, Platform};
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "tok-abc";

fn config_for(server: &MockServer) -> PlatformConfig {
    PlatformConfig::new(server.uri(), "client", "secret")
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token-srv/token"))
        .and(body_json(json!({
            "grant_type": "client_credentials",
            "client_id": "client",
            "client_secret": "secret"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": TOKEN,
            "token_type": "Bearer",
            "expires_in": 86400
        })))
        .expect(1)
        .mount(server)
        .await;
}

// ============================================================================
// Session
// ============================================================================

#[tokio::test]
async fn test_authenticate_refused_credentials_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token-srv/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
        .mount(&server)
        .await;

    let err = AuthenticatedSession::authenticate(&config_for(&server)).await.unwrap_err();

    match err {
        ReconcileError::Auth(message) => assert!(message.contains("invalid_client")),
        other => panic!("expected auth error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_authenticate_undecodable_token_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token-srv/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = AuthenticatedSession::authenticate(&config_for(&server)).await.unwrap_err();

    assert!(matches!(err, ReconcileError::Auth(_)));
}

#[tokio::test]
async fn test_execute_attaches_bearer_and_content_type() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("PUT"))
        .and(path("/apps-srv/clients"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": true})))
        .expect(1)
        .mount(&server)
        .await;

    let session = AuthenticatedSession::authenticate(&config_for(&server)).await.unwrap();
    let response = session
        .execute(HttpMethod::Put, "/apps-srv/clients", Some(b"{}".to_vec()))
        .await
        .unwrap();

    assert_eq!(response.status, 201);
    assert!(!response.is_empty());
}

#[tokio::test]
async fn test_execute_classifies_statuses() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/conflict"))
        .respond_with(ResponseTemplate::new(409).set_body_string("duplicate"))
        .expect(1)
        .mount(&server)
        .await;

    let session = AuthenticatedSession::authenticate(&config_for(&server)).await.unwrap();

    let deleted = session.execute(HttpMethod::Delete, "/gone", None).await.unwrap();
    assert_eq!(deleted.status, 204);
    assert!(deleted.body.is_empty());

    let err = session.execute(HttpMethod::Get, "/conflict", None).await.unwrap_err();
    assert_eq!(err, ReconcileError::Request { status: 409, body: "duplicate".into() });
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let config = PlatformConfig::new(format!("http://{addr}"), "client", "secret");

    let err = AuthenticatedSession::authenticate(&config).await.unwrap_err();

    assert!(matches!(err, ReconcileError::Transport(_)));
}

// ============================================================================
// Platform
// ============================================================================

#[tokio::test]
async fn test_app_create_normalizes_null_scopes() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/apps-srv/clients"))
        .and(body_partial_json(json!({"client_name": "demo"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 200,
            "data": {
                "id": "app-1",
                "client_id": "c-1",
                "client_secret": "generated",
                "client_name": "demo",
                "client_type": "SINGLE_PAGE",
                "allowed_scopes": null
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let platform = Platform::connect(&config_for(&server)).await.unwrap();
    let plan = AppPlan {
        client_name: "demo".into(),
        client_type: "SINGLE_PAGE".into(),
        ..AppPlan::default()
    };

    let outcome = platform.apps().create(&plan).await;

    assert!(outcome.is_success(), "{:?}", outcome.diagnostics);
    let app = outcome.value.unwrap();
    assert_eq!(app.client_secret, "generated");
    assert!(app.settings.allowed_scopes.is_empty());
}

#[tokio::test]
async fn test_delete_accepts_no_content() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/password-policy-srv/policy/p-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let platform = Platform::connect(&config_for(&server)).await.unwrap();
    let prior = PasswordPolicy { id: "p-1".into(), ..PasswordPolicy::default() };

    assert!(platform.password_policies().delete(&prior).await.is_empty());
}

#[tokio::test]
async fn test_legacy_hosted_pages_partial_failure() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("POST"))
        .and(path("/hosted-srv/hostedgroup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/hosted-srv/hosted"))
        .and(body_partial_json(json!({"hosted_page_id": "b"})))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/hosted-srv/hosted"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": true})))
        .expect(2)
        .mount(&server)
        .await;

    let mut config = config_for(&server);
    config.api.hosted_pages = HostedPagesApi::Legacy;
    let platform = Platform::connect(&config).await.unwrap();
    let plan = HostedPageGroupPlan {
        id: "brand".into(),
        default_locale: "en-us".into(),
        group_owner: None,
        pages: vec![
            HostedPage::new("a", "url1"),
            HostedPage::new("b", "url2"),
            HostedPage::new("c", "url3"),
        ],
    };

    let outcome = platform.hosted_pages().create(&plan).await;

    let group = outcome.value.as_ref().unwrap();
    assert_eq!(group.page_ids(), ["a", "c"]);
    let errors: Vec<_> = outcome.diagnostics.errors().collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].summary.contains('b'));
}

#[tokio::test]
async fn test_platform_over_shared_transport_reports_versions() {
    let server = MockServer::start().await;
    mount_token(&server).await;

    let session = AuthenticatedSession::authenticate(&config_for(&server)).await.unwrap();
    let platform = Platform::new(Arc::new(session), ApiVersions::default());

    assert_eq!(platform.api().hosted_pages, HostedPagesApi::V3);
    assert_eq!(platform.hosted_pages().resource(), "hosted_page_group");
}

#[tokio::test]
async fn test_lookup_reads_tenant_info() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    Mock::given(method("GET"))
        .and(path("/public-srv/tenantinfo/basic"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"tenant_key": "acme", "tenant_name": "Acme"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/providers-srv/multi/providers/list"))
        .and(query_param("provider_name", "google"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&server)
        .await;

    let platform = Platform::connect(&config_for(&server)).await.unwrap();

    let info = platform.lookups().tenant_info().await.unwrap();
    assert_eq!(info.tenant_name, "Acme");
    let err = platform.lookups().social_provider("google", "work").await.unwrap_err();
    assert!(err.is_not_found());
}
