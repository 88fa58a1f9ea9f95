//! Integration tests for plan rules and observed-state persistence
//!
//! Covers the rule tables of every resource type and the JSON shape the
//! driver persists between runs.

use tenantform_domain::schema::{attributes_with, validate_plan};
use tenantform_domain::{
    App, AppPlan, HostedPage, HostedPageGroupPlan, Mutability, Observed, PlanSchema, Template,
    TemplateKey, TemplatePlan,
};

// ============================================================================
// Rule tables
// ============================================================================

#[test]
fn test_every_resource_declares_an_identity_rule() {
    assert!(attributes_with::<AppPlan>(Mutability::Computed).contains(&"id"));
    assert!(attributes_with::<tenantform_domain::HookPlan>(Mutability::Computed).contains(&"id"));
    assert!(attributes_with::<tenantform_domain::PasswordPolicyPlan>(Mutability::Computed)
        .contains(&"id"));
    assert_eq!(attributes_with::<HostedPageGroupPlan>(Mutability::ReplaceOnChange), ["id"]);
    assert_eq!(
        attributes_with::<tenantform_domain::RegistrationFieldPlan>(Mutability::ReplaceOnChange),
        ["field_key"]
    );
    assert_eq!(
        attributes_with::<tenantform_domain::TemplateGroupPlan>(Mutability::ReplaceOnChange),
        ["group_id"]
    );
}

#[test]
fn test_validation_summaries_name_resource_and_attribute() {
    let plan = AppPlan { client_type: "SINGLE_PAGE".into(), ..AppPlan::default() };
    let diagnostics = validate_plan(&plan);
    let entry = diagnostics.errors().next().expect("client_name should fail");
    assert_eq!(entry.summary, "Invalid app attribute `client_name`");
}

#[test]
fn test_warnings_follow_errors() {
    let plan = HostedPageGroupPlan {
        id: String::new(),
        default_locale: "en-US".into(),
        group_owner: None,
        pages: vec![HostedPage::new("a", "url1")],
    };
    let diagnostics = plan.validate();
    let severities: Vec<_> = diagnostics.iter().map(|d| d.severity).collect();
    assert_eq!(
        severities,
        [tenantform_domain::Severity::Error, tenantform_domain::Severity::Warning]
    );
}

// ============================================================================
// Persisted state
// ============================================================================

#[test]
fn test_app_state_round_trips_through_json() {
    let app = App {
        id: "app-123".into(),
        client_id: "cid".into(),
        client_secret: "s3cr3t".into(),
        settings: AppPlan {
            client_name: "demo".into(),
            client_type: "SINGLE_PAGE".into(),
            allowed_scopes: vec!["openid".into()],
            ..AppPlan::default()
        },
        ..App::default()
    };

    let json = serde_json::to_value(&app).expect("serialize app");
    assert_eq!(json["client_name"], "demo");
    assert_eq!(json["client_secret"], "s3cr3t");

    let back: App = serde_json::from_value(json).expect("deserialize app");
    assert_eq!(back, app);
}

#[test]
fn test_template_state_flattens_key() {
    let template = Template::from_plan(
        &TemplatePlan {
            key: TemplateKey {
                group_id: "default".into(),
                template_key: "WELCOME".into(),
                communication_method: "EMAIL".into(),
                locale: "en-us".into(),
            },
            content: "<p>hi</p>".into(),
            ..TemplatePlan::default()
        },
        None,
    );

    let json = serde_json::to_value(&template).expect("serialize template");
    assert_eq!(json["template_key"], "WELCOME");
    let back: Template = serde_json::from_value(json).expect("deserialize template");
    assert_eq!(back, template);
}

#[test]
fn test_observed_absent_serializes_without_state() {
    let json = serde_json::to_value(Observed::<App>::Absent).expect("serialize observed");
    assert_eq!(json, serde_json::json!({ "kind": "absent" }));
}
