//! Read-only lookups
//!
//! Queries drivers use to resolve references by name: the tenant itself,
//! password policies, consent instances, identity providers and hooks.
//! A lookup that matches nothing fails with [`ReconcileError::NotFound`].

use serde::Deserialize;
use serde_with::{serde_as, DefaultOnNull};
use tenantform_domain::{
    ConsentInstance, CustomProvider, Hook, PasswordPolicy, ReconcileError, Result,
    SocialProvider, TenantInfo,
};
use tracing::debug;

use crate::codec::hook::WEBHOOK_LIST_PATH;
use crate::codec::{
    decode_envelope, decode_envelope_list, segment, HookCodec, PasswordPolicyCodec, WireCodec,
};
use crate::reconcile::Remote;

const TENANT_INFO_PATH: &str = "/public-srv/tenantinfo/basic";
const PASSWORD_POLICY_LIST_PATH: &str = "/password-policy-srv/policy/list";
const CONSENT_INSTANCES_PATH: &str = "/consent-management-srv/v2/consent/instance/all/list";
const SOCIAL_PROVIDERS_PATH: &str = "/providers-srv/multi/providers/list";
const CUSTOM_PROVIDER_PATH: &str = "/providers-srv/custom";

#[derive(Debug, Clone)]
pub struct PlatformLookups {
    remote: Remote,
}

impl PlatformLookups {
    pub fn new(remote: Remote) -> Self {
        Self { remote }
    }

    pub async fn tenant_info(&self) -> Result<TenantInfo> {
        let body = self.required(TENANT_INFO_PATH, "tenant info").await?;
        decode_envelope::<TenantInfoWire>(&body).map(TenantInfo::from)
    }

    /// Password policy whose `policy_name` equals `name`.
    pub async fn password_policy_by_name(&self, name: &str) -> Result<PasswordPolicy> {
        let body = self.listing(PASSWORD_POLICY_LIST_PATH).await?;
        PasswordPolicyCodec
            .decode_list(&body)?
            .into_iter()
            .find(|policy| policy.settings.policy_name == name)
            .ok_or_else(|| ReconcileError::NotFound(format!("password policy `{name}`")))
    }

    /// Consent instance whose `consent_name` equals `name`.
    pub async fn consent_instance(&self, name: &str) -> Result<ConsentInstance> {
        let body = self.listing(CONSENT_INSTANCES_PATH).await?;
        decode_envelope_list::<ConsentInstanceWire>(&body)?
            .into_iter()
            .map(ConsentInstance::from)
            .find(|consent| consent.consent_name == name)
            .ok_or_else(|| ReconcileError::NotFound(format!("consent `{name}`")))
    }

    /// System social provider of type `provider_name`, matched by `name`.
    ///
    /// When no entry carries that name but the type has exactly one
    /// provider, that provider is returned.
    pub async fn social_provider(&self, provider_name: &str, name: &str) -> Result<SocialProvider> {
        let path = format!(
            "{SOCIAL_PROVIDERS_PATH}?provider_name={}&provider_type=system",
            segment(provider_name)
        );
        let body = self.listing(&path).await?;
        let mut providers: Vec<SocialProvider> = decode_envelope_list::<SocialProviderWire>(&body)?
            .into_iter()
            .map(SocialProvider::from)
            .collect();

        if let Some(index) = providers.iter().position(|provider| provider.name == name) {
            return Ok(providers.swap_remove(index));
        }
        match providers.len() {
            1 => Ok(providers.remove(0)),
            0 => Err(ReconcileError::NotFound(format!("social provider `{provider_name}`"))),
            count => Err(ReconcileError::NotFound(format!(
                "social provider `{name}` among {count} `{provider_name}` providers"
            ))),
        }
    }

    pub async fn custom_provider(&self, provider_name: &str) -> Result<CustomProvider> {
        let path = format!("{CUSTOM_PROVIDER_PATH}/{}", segment(provider_name));
        let body = self.required(&path, "custom provider").await?;
        decode_envelope::<CustomProviderWire>(&body).map(CustomProvider::from)
    }

    /// Every hook, each fetched individually after listing.
    pub async fn hooks(&self) -> Result<Vec<Hook>> {
        let codec = HookCodec;
        let body = self.listing(WEBHOOK_LIST_PATH).await?;
        let listed = codec.decode_list(&body)?;
        debug!(count = listed.len(), "hooks listed");

        let mut hooks = Vec::with_capacity(listed.len());
        for hook in listed {
            match self.remote.fetch(&codec.read_path(&hook.id)).await? {
                Some(body) => hooks.push(codec.decode(&body)?),
                None => debug!(id = %hook.id, "listed hook vanished before fetch"),
            }
        }
        Ok(hooks)
    }

    async fn required(&self, path: &str, what: &str) -> Result<Vec<u8>> {
        self.remote
            .fetch(path)
            .await?
            .ok_or_else(|| ReconcileError::NotFound(what.to_string()))
    }

    /// List endpoints: a missing list is an empty one.
    async fn listing(&self, path: &str) -> Result<Vec<u8>> {
        Ok(self.remote.fetch(path).await?.unwrap_or_else(|| br#"{"data":[]}"#.to_vec()))
    }
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TenantInfoWire {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "Custom_field_flatten")]
    custom_field_flatten: bool,
    #[serde_as(as = "DefaultOnNull")]
    tenant_key: String,
    #[serde_as(as = "DefaultOnNull")]
    tenant_name: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "versionInfo")]
    version_info: String,
}

impl From<TenantInfoWire> for TenantInfo {
    fn from(wire: TenantInfoWire) -> Self {
        Self {
            tenant_key: wire.tenant_key,
            tenant_name: wire.tenant_name,
            version_info: wire.version_info,
            custom_field_flatten: wire.custom_field_flatten,
        }
    }
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConsentInstanceWire {
    #[serde_as(as = "DefaultOnNull")]
    id: String,
    #[serde_as(as = "DefaultOnNull")]
    consent_name: String,
}

impl From<ConsentInstanceWire> for ConsentInstance {
    fn from(wire: ConsentInstanceWire) -> Self {
        Self { id: wire.id, consent_name: wire.consent_name }
    }
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SocialProviderWire {
    #[serde_as(as = "DefaultOnNull")]
    id: String,
    #[serde_as(as = "DefaultOnNull")]
    social_id: String,
    #[serde_as(as = "DefaultOnNull")]
    name: String,
    #[serde_as(as = "DefaultOnNull")]
    provider_name: String,
    provider_type: Option<String>,
}

impl From<SocialProviderWire> for SocialProvider {
    fn from(wire: SocialProviderWire) -> Self {
        Self {
            id: wire.id,
            social_id: wire.social_id,
            name: wire.name,
            provider_name: wire.provider_name,
            provider_type: wire.provider_type.filter(|value| !value.is_empty()),
        }
    }
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CustomProviderWire {
    #[serde_as(as = "DefaultOnNull")]
    display_name: String,
    #[serde_as(as = "DefaultOnNull")]
    provider_name: String,
}

impl From<CustomProviderWire> for CustomProvider {
    fn from(wire: CustomProviderWire) -> Self {
        Self { provider_name: wire.provider_name, display_name: wire.display_name }
    }
}
