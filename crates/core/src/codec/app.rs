//! App wire format (`apps-srv/clients`)

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use tenantform_domain::{
    AllowedGroup, App, AppCustomProvider, AppKey, AppPlan, AppSocialProvider, Result,
};

use super::{decode_envelope, empty_as_none, encode_json, non_empty, WireCodec};

#[derive(Debug, Default, Clone, Copy)]
pub struct AppCodec;

impl WireCodec for AppCodec {
    type Entity = App;

    fn encode(&self, app: &App) -> Result<Vec<u8>> {
        encode_json(&AppWire::from(app))
    }

    fn decode(&self, body: &[u8]) -> Result<App> {
        decode_envelope::<AppWire>(body).map(App::from)
    }
}

#[serde_as]
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct AppWire {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(skip_serializing_if = "String::is_empty")]
    id: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(skip_serializing_if = "String::is_empty")]
    client_id: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(skip_serializing_if = "String::is_empty")]
    client_secret: String,
    #[serde_as(as = "DefaultOnNull")]
    client_name: String,
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    client_display_name: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    client_type: String,

    #[serde_as(as = "DefaultOnNull")]
    accept_roles_in_the_registration: bool,
    #[serde_as(as = "DefaultOnNull")]
    is_remember_me_selected: bool,
    #[serde_as(as = "DefaultOnNull")]
    allow_disposable_email: bool,
    #[serde_as(as = "DefaultOnNull")]
    fds_enabled: bool,
    #[serde_as(as = "DefaultOnNull")]
    enable_passwordless_auth: bool,
    #[serde_as(as = "DefaultOnNull")]
    enable_deduplication: bool,
    #[serde_as(as = "DefaultOnNull")]
    auto_login_after_register: bool,
    #[serde_as(as = "DefaultOnNull")]
    enable_bot_detection: bool,
    #[serde_as(as = "DefaultOnNull")]
    is_login_success_page_enabled: bool,
    #[serde_as(as = "DefaultOnNull")]
    allow_guest_login: bool,
    #[serde_as(as = "DefaultOnNull")]
    jwe_enabled: bool,
    #[serde_as(as = "DefaultOnNull")]
    always_ask_mfa: bool,
    #[serde_as(as = "DefaultOnNull")]
    register_with_login_information: bool,
    #[serde_as(as = "DefaultOnNull")]
    email_verification_required: bool,
    #[serde_as(as = "DefaultOnNull")]
    mobile_number_verification_required: bool,

    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    communication_medium_verification: Option<String>,
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    hosted_page_group: Option<String>,
    #[serde(
        rename = "primaryColor",
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    primary_color: Option<String>,
    #[serde(
        rename = "accentColor",
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    accent_color: Option<String>,
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    company_name: Option<String>,
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    company_address: Option<String>,
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    company_website: Option<String>,
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    template_group_id: Option<String>,
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    password_policy_ref: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    token_lifetime_in_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id_token_lifetime_in_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token_lifetime_in_seconds: Option<i64>,

    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    app_owner: Option<String>,
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    bot_provider: Option<String>,
    #[serde(rename = "appKey", skip_serializing_if = "Option::is_none")]
    app_key: Option<AppKeyWire>,

    #[serde_as(as = "DefaultOnNull")]
    allow_login_with: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    redirect_uris: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    allowed_logout_urls: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    allowed_scopes: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    response_types: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    grant_types: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    allowed_web_origins: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    allowed_origins: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    allowed_mfa: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    allowed_roles: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    allowed_fields: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    required_fields: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    consent_refs: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    additional_access_token_payload: Vec<String>,

    #[serde_as(as = "DefaultOnNull")]
    allowed_groups: Vec<AllowedGroupWire>,
    #[serde_as(as = "DefaultOnNull")]
    operations_allowed_groups: Vec<AllowedGroupWire>,
    #[serde_as(as = "DefaultOnNull")]
    social_providers: Vec<SocialProviderWire>,
    #[serde_as(as = "DefaultOnNull")]
    custom_providers: Vec<CustomProviderWire>,
}

#[serde_as]
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct AllowedGroupWire {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "groupId")]
    group_id: String,
    #[serde_as(as = "DefaultOnNull")]
    roles: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    default_roles: Vec<String>,
}

#[serde_as]
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct SocialProviderWire {
    #[serde_as(as = "DefaultOnNull")]
    social_id: String,
    #[serde_as(as = "DefaultOnNull")]
    name: String,
    #[serde_as(as = "DefaultOnNull")]
    provider_name: String,
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    provider_type: Option<String>,
}

#[serde_as]
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct CustomProviderWire {
    #[serde_as(as = "DefaultOnNull")]
    display_name: String,
    #[serde_as(as = "DefaultOnNull")]
    provider_name: String,
}

#[serde_as]
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct AppKeyWire {
    #[serde_as(as = "DefaultOnNull")]
    id: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "privateKey")]
    private_key: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "publicKey")]
    public_key: String,
}

impl From<&AllowedGroup> for AllowedGroupWire {
    fn from(group: &AllowedGroup) -> Self {
        Self {
            group_id: group.group_id.clone(),
            roles: group.roles.clone(),
            default_roles: group.default_roles.clone(),
        }
    }
}

impl From<AllowedGroupWire> for AllowedGroup {
    fn from(wire: AllowedGroupWire) -> Self {
        Self { group_id: wire.group_id, roles: wire.roles, default_roles: wire.default_roles }
    }
}

impl From<&AppSocialProvider> for SocialProviderWire {
    fn from(provider: &AppSocialProvider) -> Self {
        Self {
            social_id: provider.social_id.clone(),
            name: provider.name.clone(),
            provider_name: provider.provider_name.clone(),
            provider_type: non_empty(&provider.provider_type),
        }
    }
}

impl From<SocialProviderWire> for AppSocialProvider {
    fn from(wire: SocialProviderWire) -> Self {
        Self {
            provider_name: wire.provider_name,
            social_id: wire.social_id,
            name: wire.name,
            provider_type: wire.provider_type,
        }
    }
}

impl From<&AppCustomProvider> for CustomProviderWire {
    fn from(provider: &AppCustomProvider) -> Self {
        Self {
            display_name: provider.display_name.clone(),
            provider_name: provider.provider_name.clone(),
        }
    }
}

impl From<CustomProviderWire> for AppCustomProvider {
    fn from(wire: CustomProviderWire) -> Self {
        Self { provider_name: wire.provider_name, display_name: wire.display_name }
    }
}

impl From<&App> for AppWire {
    fn from(app: &App) -> Self {
        let s = &app.settings;
        Self {
            id: app.id.clone(),
            client_id: app.client_id.clone(),
            client_secret: app.client_secret.clone(),
            client_name: s.client_name.clone(),
            client_display_name: non_empty(&s.client_display_name),
            client_type: s.client_type.clone(),
            accept_roles_in_the_registration: s.accept_roles_in_the_registration,
            is_remember_me_selected: s.is_remember_me_selected,
            allow_disposable_email: s.allow_disposable_email,
            fds_enabled: s.fds_enabled,
            enable_passwordless_auth: s.enable_passwordless_auth,
            enable_deduplication: s.enable_deduplication,
            auto_login_after_register: s.auto_login_after_register,
            enable_bot_detection: s.enable_bot_detection,
            is_login_success_page_enabled: s.is_login_success_page_enabled,
            allow_guest_login: s.allow_guest_login,
            jwe_enabled: s.jwe_enabled,
            always_ask_mfa: s.always_ask_mfa,
            register_with_login_information: s.register_with_login_information,
            email_verification_required: s.email_verification_required,
            mobile_number_verification_required: s.mobile_number_verification_required,
            communication_medium_verification: non_empty(&s.communication_medium_verification),
            hosted_page_group: non_empty(&s.hosted_page_group),
            primary_color: non_empty(&s.primary_color),
            accent_color: non_empty(&s.accent_color),
            company_name: non_empty(&s.company_name),
            company_address: non_empty(&s.company_address),
            company_website: non_empty(&s.company_website),
            template_group_id: non_empty(&s.template_group_id),
            password_policy_ref: non_empty(&s.password_policy_ref),
            token_lifetime_in_seconds: s.token_lifetime_in_seconds,
            id_token_lifetime_in_seconds: s.id_token_lifetime_in_seconds,
            refresh_token_lifetime_in_seconds: s.refresh_token_lifetime_in_seconds,
            app_owner: non_empty(&app.app_owner),
            bot_provider: non_empty(&app.bot_provider),
            app_key: app.app_key.as_ref().map(|key| AppKeyWire {
                id: key.id.clone(),
                private_key: key.private_key.clone(),
                public_key: key.public_key.clone(),
            }),
            allow_login_with: s.allow_login_with.clone(),
            redirect_uris: s.redirect_uris.clone(),
            allowed_logout_urls: s.allowed_logout_urls.clone(),
            allowed_scopes: s.allowed_scopes.clone(),
            response_types: s.response_types.clone(),
            grant_types: s.grant_types.clone(),
            allowed_web_origins: s.allowed_web_origins.clone(),
            allowed_origins: s.allowed_origins.clone(),
            allowed_mfa: s.allowed_mfa.clone(),
            allowed_roles: s.allowed_roles.clone(),
            allowed_fields: s.allowed_fields.clone(),
            required_fields: s.required_fields.clone(),
            consent_refs: s.consent_refs.clone(),
            additional_access_token_payload: s.additional_access_token_payload.clone(),
            allowed_groups: s.allowed_groups.iter().map(AllowedGroupWire::from).collect(),
            operations_allowed_groups: s
                .operations_allowed_groups
                .iter()
                .map(AllowedGroupWire::from)
                .collect(),
            social_providers: s.social_providers.iter().map(SocialProviderWire::from).collect(),
            custom_providers: s.custom_providers.iter().map(CustomProviderWire::from).collect(),
        }
    }
}

impl From<AppWire> for App {
    fn from(wire: AppWire) -> Self {
        Self {
            id: wire.id,
            client_id: wire.client_id,
            client_secret: wire.client_secret,
            app_owner: wire.app_owner,
            bot_provider: wire.bot_provider,
            app_key: wire.app_key.map(|key| AppKey {
                id: key.id,
                private_key: key.private_key,
                public_key: key.public_key,
            }),
            settings: AppPlan {
                client_name: wire.client_name,
                client_display_name: wire.client_display_name,
                client_type: wire.client_type,
                accept_roles_in_the_registration: wire.accept_roles_in_the_registration,
                is_remember_me_selected: wire.is_remember_me_selected,
                allow_disposable_email: wire.allow_disposable_email,
                fds_enabled: wire.fds_enabled,
                enable_passwordless_auth: wire.enable_passwordless_auth,
                enable_deduplication: wire.enable_deduplication,
                auto_login_after_register: wire.auto_login_after_register,
                enable_bot_detection: wire.enable_bot_detection,
                is_login_success_page_enabled: wire.is_login_success_page_enabled,
                allow_guest_login: wire.allow_guest_login,
                jwe_enabled: wire.jwe_enabled,
                always_ask_mfa: wire.always_ask_mfa,
                register_with_login_information: wire.register_with_login_information,
                email_verification_required: wire.email_verification_required,
                mobile_number_verification_required: wire.mobile_number_verification_required,
                communication_medium_verification: wire.communication_medium_verification,
                hosted_page_group: wire.hosted_page_group,
                primary_color: wire.primary_color,
                accent_color: wire.accent_color,
                company_name: wire.company_name,
                company_address: wire.company_address,
                company_website: wire.company_website,
                template_group_id: wire.template_group_id,
                password_policy_ref: wire.password_policy_ref,
                token_lifetime_in_seconds: wire.token_lifetime_in_seconds,
                id_token_lifetime_in_seconds: wire.id_token_lifetime_in_seconds,
                refresh_token_lifetime_in_seconds: wire.refresh_token_lifetime_in_seconds,
                allow_login_with: wire.allow_login_with,
                redirect_uris: wire.redirect_uris,
                allowed_logout_urls: wire.allowed_logout_urls,
                allowed_scopes: wire.allowed_scopes,
                response_types: wire.response_types,
                grant_types: wire.grant_types,
                allowed_web_origins: wire.allowed_web_origins,
                allowed_origins: wire.allowed_origins,
                allowed_mfa: wire.allowed_mfa,
                allowed_roles: wire.allowed_roles,
                allowed_fields: wire.allowed_fields,
                required_fields: wire.required_fields,
                consent_refs: wire.consent_refs,
                additional_access_token_payload: wire.additional_access_token_payload,
                allowed_groups: wire.allowed_groups.into_iter().map(AllowedGroup::from).collect(),
                operations_allowed_groups: wire
                    .operations_allowed_groups
                    .into_iter()
                    .map(AllowedGroup::from)
                    .collect(),
                social_providers: wire
                    .social_providers
                    .into_iter()
                    .map(AppSocialProvider::from)
                    .collect(),
                custom_providers: wire
                    .custom_providers
                    .into_iter()
                    .map(AppCustomProvider::from)
                    .collect(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn decode(data: Value) -> App {
        let body = serde_json::to_vec(&json!({ "status": 200, "data": data })).unwrap();
        AppCodec.decode(&body).unwrap()
    }

    #[test]
    fn null_collections_decode_as_empty() {
        let app = decode(json!({
            "id": "app-123",
            "client_secret": "s3cr3t",
            "client_name": "demo",
            "allowed_scopes": null,
            "allowed_groups": [{ "groupId": "admins", "roles": null, "default_roles": null }],
            "operations_allowed_groups": null
        }));

        assert_eq!(app.id, "app-123");
        assert_eq!(app.client_secret, "s3cr3t");
        assert!(app.settings.allowed_scopes.is_empty());
        assert!(app.settings.redirect_uris.is_empty());
        assert!(app.settings.operations_allowed_groups.is_empty());
        assert_eq!(app.settings.allowed_groups[0].group_id, "admins");
        assert!(app.settings.allowed_groups[0].default_roles.is_empty());
    }

    #[test]
    fn empty_password_policy_ref_is_unset_and_never_sent() {
        let app = decode(json!({ "id": "a", "password_policy_ref": "" }));
        assert_eq!(app.settings.password_policy_ref, None);

        let encoded: Value = serde_json::from_slice(&AppCodec.encode(&app).unwrap()).unwrap();
        assert!(encoded.get("password_policy_ref").is_none());
    }

    #[test]
    fn null_scalars_decode_as_defaults() {
        let app = decode(json!({ "id": "a", "jwe_enabled": null, "client_name": null }));
        assert!(!app.settings.jwe_enabled);
        assert_eq!(app.settings.client_name, "");
    }

    #[test]
    fn encode_uses_platform_field_names() {
        let app = App {
            client_secret: "s3cr3t".into(),
            settings: AppPlan {
                client_name: "demo".into(),
                client_type: "SINGLE_PAGE".into(),
                primary_color: Some("#fff".into()),
                allowed_groups: vec![AllowedGroup {
                    group_id: "admins".into(),
                    ..AllowedGroup::default()
                }],
                ..AppPlan::default()
            },
            ..App::default()
        };

        let encoded: Value = serde_json::from_slice(&AppCodec.encode(&app).unwrap()).unwrap();
        assert_eq!(encoded["primaryColor"], "#fff");
        assert_eq!(encoded["client_secret"], "s3cr3t");
        assert_eq!(encoded["allowed_groups"][0]["groupId"], "admins");
        assert_eq!(encoded["allowed_scopes"], json!([]));
        assert!(encoded.get("id").is_none());
        assert!(encoded.get("appKey").is_none());
    }

    #[test]
    fn decoding_twice_is_stable() {
        let first = decode(json!({ "id": "a", "client_name": "demo", "company_name": "" }));
        let reencoded: Value = serde_json::from_slice(&AppCodec.encode(&first).unwrap()).unwrap();
        let second = decode(reencoded);
        assert_eq!(first, second);
    }
}
