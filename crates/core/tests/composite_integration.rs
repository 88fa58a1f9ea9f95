//! Integration tests for composite hosted page groups
//!
//! The legacy hosted pages service stores one record per page, so a group
//! apply is a parent call followed by one call per page.

mod support;

use serde_json::json;
use support::{remote, ScriptedTransport};
use tenantform_core::{
    CompositeOrchestrator, CompositeStatus, HostedPageGroupReconciler, HttpMethod,
    LegacyHostedPages, ResourceReconciler,
};
use tenantform_domain::{HostedPage, HostedPageGroup, HostedPageGroupPlan};

const GROUP_PATH: &str = "/hosted-srv/hostedgroup";
const PAGE_PATH: &str = "/hosted-srv/hosted";

fn pages() -> Vec<HostedPage> {
    vec![HostedPage::new("a", "url1"), HostedPage::new("b", "url2"), HostedPage::new("c", "url3")]
}

fn plan() -> HostedPageGroupPlan {
    HostedPageGroupPlan {
        id: "brand".into(),
        default_locale: "en-us".into(),
        group_owner: None,
        pages: pages(),
    }
}

fn group() -> HostedPageGroup {
    HostedPageGroup::from_plan(&plan(), None)
}

fn ok() -> serde_json::Value {
    json!({"status": 200, "data": true})
}

#[tokio::test]
async fn failed_page_is_left_out_and_reported() {
    let transport = ScriptedTransport::new();
    transport.respond(HttpMethod::Post, GROUP_PATH, ok());
    transport
        .respond(HttpMethod::Post, PAGE_PATH, ok())
        .fail(HttpMethod::Post, PAGE_PATH, 500)
        .respond(HttpMethod::Post, PAGE_PATH, ok());
    let orchestrator = CompositeOrchestrator::new(remote(&transport), LegacyHostedPages::default());

    let result = orchestrator.apply(&group(), &pages()).await;

    assert_eq!(result.status, CompositeStatus::PartiallyDone);
    let ids: Vec<&str> = result.children.iter().map(|page| page.id.as_str()).collect();
    assert_eq!(ids, ["a", "c"]);
    let errors: Vec<_> = result.diagnostics.errors().collect();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].summary.contains('b'));
    assert_eq!(transport.calls_to(HttpMethod::Post, PAGE_PATH).len(), 3);
}

#[tokio::test]
async fn pages_are_sent_in_declaration_order_after_the_group() {
    let transport = ScriptedTransport::new();
    transport.respond(HttpMethod::Post, GROUP_PATH, ok());
    transport.respond(HttpMethod::Post, PAGE_PATH, ok());
    let orchestrator = CompositeOrchestrator::new(remote(&transport), LegacyHostedPages::default());

    let result = orchestrator.apply(&group(), &pages()).await;

    assert_eq!(result.status, CompositeStatus::Done);
    assert!(result.diagnostics.is_empty());
    let calls = transport.calls();
    assert_eq!(calls[0].path, GROUP_PATH);
    assert_eq!(calls[0].body.as_ref().unwrap()["hosted_page_group"], "brand");
    let sent: Vec<_> = calls[1..]
        .iter()
        .map(|call| call.body.clone().unwrap()["hosted_page_id"].clone())
        .collect();
    assert_eq!(sent, [json!("a"), json!("b"), json!("c")]);
    assert_eq!(calls[1].body.as_ref().unwrap()["locale"], "en-us");
}

#[tokio::test]
async fn parent_failure_skips_every_page() {
    let transport = ScriptedTransport::new();
    transport.fail(HttpMethod::Post, GROUP_PATH, 500);
    let orchestrator = CompositeOrchestrator::new(remote(&transport), LegacyHostedPages::default());

    let result = orchestrator.apply(&group(), &pages()).await;

    assert_eq!(result.status, CompositeStatus::Failed);
    assert!(result.parent.is_none());
    assert_eq!(result.diagnostics.errors().count(), 1);
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn reconciler_records_partial_state_with_errors() {
    let transport = ScriptedTransport::new();
    transport.respond(HttpMethod::Post, GROUP_PATH, ok());
    transport
        .respond(HttpMethod::Post, PAGE_PATH, ok())
        .fail(HttpMethod::Post, PAGE_PATH, 500)
        .respond(HttpMethod::Post, PAGE_PATH, ok());
    let reconciler = HostedPageGroupReconciler::<LegacyHostedPages>::new(remote(&transport));

    let outcome = reconciler.create(&plan()).await;

    let state = outcome.value.as_ref().unwrap();
    assert_eq!(state.page_ids(), ["a", "c"]);
    assert_eq!(outcome.diagnostics.errors().count(), 1);
    // Page ids outside the catalogue only warn.
    assert_eq!(outcome.diagnostics.warnings().count(), 3);
}

#[tokio::test]
async fn every_page_failing_still_records_the_group() {
    let transport = ScriptedTransport::new();
    transport.respond(HttpMethod::Post, GROUP_PATH, ok());
    transport.fail(HttpMethod::Post, PAGE_PATH, 502);
    let reconciler = HostedPageGroupReconciler::<LegacyHostedPages>::new(remote(&transport));

    let outcome = reconciler.create(&plan()).await;

    let state = outcome.value.unwrap();
    assert_eq!(state.id, "brand");
    assert!(state.pages.is_empty());
    assert_eq!(outcome.diagnostics.errors().count(), 3);
}

#[tokio::test]
async fn parent_failure_records_no_state() {
    let transport = ScriptedTransport::new();
    transport.fail(HttpMethod::Post, GROUP_PATH, 500);
    let reconciler = HostedPageGroupReconciler::<LegacyHostedPages>::new(remote(&transport));

    let outcome = reconciler.create(&plan()).await;

    assert!(outcome.value.is_none());
    let entry = outcome.diagnostics.errors().next().unwrap();
    assert_eq!(entry.summary, "Failed to upsert `brand`");
}

#[tokio::test]
async fn legacy_read_reassembles_the_group_page_by_page() {
    let transport = ScriptedTransport::new();
    transport.respond(
        HttpMethod::Get,
        "/hosted-srv/hosted/availablepages",
        json!({"data": ["a", "b", "c"]}),
    );
    transport
        .respond(
            HttpMethod::Post,
            "/hosted-srv/hosted/bylang",
            json!({"data": {"hosted_page_id": "a", "url": "url1", "locale": "en-us"}}),
        )
        .respond(HttpMethod::Post, "/hosted-srv/hosted/bylang", json!({"data": null}))
        .respond(
            HttpMethod::Post,
            "/hosted-srv/hosted/bylang",
            json!({"data": {"hosted_page_id": "c", "url": "url3", "locale": "en-us"}}),
        );
    let reconciler = HostedPageGroupReconciler::<LegacyHostedPages>::new(remote(&transport));
    let prior = HostedPageGroup {
        pages: vec![HostedPage::new("c", "url3"), HostedPage::new("a", "url1")],
        ..group()
    };

    let outcome = reconciler.read(&prior).await;

    let observed = outcome.value.unwrap();
    let group = observed.present().unwrap();
    assert_eq!(group.page_ids(), ["c", "a"]);
    assert!(group.pages.iter().all(|page| page.locale.is_none()));
    let query = transport.calls()[1].body.clone().unwrap();
    assert_eq!(query["acceptLanguage"], "en-us");
    assert_eq!(query["hosted_page_group"], "brand");
}

#[tokio::test]
async fn legacy_delete_addresses_group_by_name() {
    let transport = ScriptedTransport::new();
    transport.respond(HttpMethod::Delete, "/hosted-srv/hostedgroup?groupname=brand", ok());
    let reconciler = HostedPageGroupReconciler::<LegacyHostedPages>::new(remote(&transport));

    assert!(reconciler.delete(&group()).await.is_empty());
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn legacy_read_never_reports_the_group_absent() {
    let transport = ScriptedTransport::new();
    let reconciler = HostedPageGroupReconciler::<LegacyHostedPages>::new(remote(&transport));

    let observed = reconciler.read(&group()).await.value.unwrap();

    assert!(!observed.is_absent());
    assert!(observed.present().unwrap().pages.is_empty());
}
