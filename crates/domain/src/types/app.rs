//! OAuth client applications

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::CLIENT_TYPES;
use crate::schema::{AttributeRule, PlanSchema};
use crate::validation::{
    at_least, length_at_least, one_of, optional_length_at_least, required_subset_of,
};

/// User-declared app attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppPlan {
    pub client_name: String,
    pub client_display_name: Option<String>,
    pub client_type: String,

    pub accept_roles_in_the_registration: bool,
    pub is_remember_me_selected: bool,
    pub allow_disposable_email: bool,
    pub fds_enabled: bool,
    pub enable_passwordless_auth: bool,
    pub enable_deduplication: bool,
    pub auto_login_after_register: bool,
    pub enable_bot_detection: bool,
    pub is_login_success_page_enabled: bool,
    pub allow_guest_login: bool,
    pub jwe_enabled: bool,
    pub always_ask_mfa: bool,
    pub register_with_login_information: bool,
    pub email_verification_required: bool,
    pub mobile_number_verification_required: bool,

    pub communication_medium_verification: Option<String>,
    pub hosted_page_group: Option<String>,
    pub primary_color: Option<String>,
    pub accent_color: Option<String>,
    pub company_name: Option<String>,
    pub company_address: Option<String>,
    pub company_website: Option<String>,
    pub template_group_id: Option<String>,
    /// Password policy id; unset means the tenant default.
    pub password_policy_ref: Option<String>,

    pub token_lifetime_in_seconds: Option<i64>,
    pub id_token_lifetime_in_seconds: Option<i64>,
    pub refresh_token_lifetime_in_seconds: Option<i64>,

    pub allow_login_with: Vec<String>,
    pub redirect_uris: Vec<String>,
    pub allowed_logout_urls: Vec<String>,
    pub allowed_scopes: Vec<String>,
    pub response_types: Vec<String>,
    pub grant_types: Vec<String>,
    pub allowed_web_origins: Vec<String>,
    pub allowed_origins: Vec<String>,
    pub allowed_mfa: Vec<String>,
    pub allowed_roles: Vec<String>,
    pub allowed_fields: Vec<String>,
    pub required_fields: Vec<String>,
    pub consent_refs: Vec<String>,
    pub additional_access_token_payload: Vec<String>,

    pub allowed_groups: Vec<AllowedGroup>,
    pub operations_allowed_groups: Vec<AllowedGroup>,
    pub social_providers: Vec<AppSocialProvider>,
    pub custom_providers: Vec<AppCustomProvider>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllowedGroup {
    pub group_id: String,
    pub roles: Vec<String>,
    pub default_roles: Vec<String>,
}

/// Social login provider enabled on an app.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSocialProvider {
    pub provider_name: String,
    pub social_id: String,
    pub name: String,
    pub provider_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppCustomProvider {
    pub provider_name: String,
    pub display_name: String,
}

/// Key pair the platform generates for JWE-enabled apps.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppKey {
    pub id: String,
    pub private_key: String,
    pub public_key: String,
}

impl fmt::Debug for AppKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppKey")
            .field("id", &self.id)
            .field("private_key", &"[REDACTED]")
            .field("public_key", &self.public_key)
            .finish()
    }
}

/// Observed state of an app.
///
/// The computed attributes are assigned by the platform on create and only
/// ever flow from a response into state, or from state into the next
/// request.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    pub id: String,
    pub client_id: String,
    pub client_secret: String,
    pub app_owner: Option<String>,
    pub bot_provider: Option<String>,
    pub app_key: Option<AppKey>,
    #[serde(flatten)]
    pub settings: AppPlan,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("id", &self.id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("app_owner", &self.app_owner)
            .field("bot_provider", &self.bot_provider)
            .field("app_key", &self.app_key)
            .field("settings", &self.settings)
            .finish()
    }
}

impl App {
    /// Entity to send for `plan`: declared attributes from the plan,
    /// computed attributes from `prior` when there is one.
    pub fn from_plan(plan: &AppPlan, prior: Option<&App>) -> Self {
        match prior {
            Some(prior) => Self {
                id: prior.id.clone(),
                client_id: prior.client_id.clone(),
                client_secret: prior.client_secret.clone(),
                app_owner: prior.app_owner.clone(),
                bot_provider: prior.bot_provider.clone(),
                app_key: prior.app_key.clone(),
                settings: plan.clone(),
            },
            None => Self { settings: plan.clone(), ..Self::default() },
        }
    }
}

fn client_name(plan: &AppPlan) -> Result<(), String> {
    length_at_least(&plan.client_name, 1)
}

fn client_display_name(plan: &AppPlan) -> Result<(), String> {
    optional_length_at_least(plan.client_display_name.as_deref(), 1)
}

fn client_type(plan: &AppPlan) -> Result<(), String> {
    one_of(&plan.client_type, CLIENT_TYPES)
}

fn company_name(plan: &AppPlan) -> Result<(), String> {
    optional_length_at_least(plan.company_name.as_deref(), 1)
}

fn company_address(plan: &AppPlan) -> Result<(), String> {
    optional_length_at_least(plan.company_address.as_deref(), 1)
}

fn company_website(plan: &AppPlan) -> Result<(), String> {
    optional_length_at_least(plan.company_website.as_deref(), 1)
}

fn token_lifetime(plan: &AppPlan) -> Result<(), String> {
    plan.token_lifetime_in_seconds.map_or(Ok(()), |v| at_least(v, 0))
}

fn id_token_lifetime(plan: &AppPlan) -> Result<(), String> {
    plan.id_token_lifetime_in_seconds.map_or(Ok(()), |v| at_least(v, 0))
}

fn refresh_token_lifetime(plan: &AppPlan) -> Result<(), String> {
    plan.refresh_token_lifetime_in_seconds.map_or(Ok(()), |v| at_least(v, 0))
}

fn required_fields(plan: &AppPlan) -> Result<(), String> {
    required_subset_of(&plan.required_fields, &plan.allowed_fields, "allowed_fields")
}

static APP_RULES: &[AttributeRule<AppPlan>] = &[
    AttributeRule::computed("id"),
    AttributeRule::computed("client_id"),
    AttributeRule::computed("client_secret"),
    AttributeRule::computed("app_owner"),
    AttributeRule::computed("bot_provider"),
    AttributeRule::computed("app_key"),
    AttributeRule::mutable("client_name", client_name),
    AttributeRule::mutable("client_display_name", client_display_name),
    AttributeRule::mutable("client_type", client_type),
    AttributeRule::mutable("company_name", company_name),
    AttributeRule::mutable("company_address", company_address),
    AttributeRule::mutable("company_website", company_website),
    AttributeRule::mutable("token_lifetime_in_seconds", token_lifetime),
    AttributeRule::mutable("id_token_lifetime_in_seconds", id_token_lifetime),
    AttributeRule::mutable("refresh_token_lifetime_in_seconds", refresh_token_lifetime),
    AttributeRule::mutable("required_fields", required_fields),
];

impl PlanSchema for AppPlan {
    type State = App;
    const RESOURCE: &'static str = "app";

    fn attribute_rules() -> &'static [AttributeRule<Self>] {
        APP_RULES
    }

    fn replacement_triggers(&self, _prior: &App) -> Vec<&'static str> {
        Vec::new()
    }
}
