//! Webhook wire format (`webhook-srv`)

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use tenantform_domain::{Hook, HookApiKeyDetails, HookPlan, Result};

use super::{
    decode_envelope, decode_envelope_list, empty_as_none, encode_json, segment, WireCodec,
};

pub const WEBHOOK_PATH: &str = "/webhook-srv/webhook";
pub const WEBHOOK_LIST_PATH: &str = "/webhooks-srv/webhook/list";

#[derive(Debug, Default, Clone, Copy)]
pub struct HookCodec;

impl HookCodec {
    /// Read target; the service looks hooks up by query.
    pub fn read_path(&self, id: &str) -> String {
        format!("{WEBHOOK_PATH}?id={}", segment(id))
    }

    /// Decode the `webhook/list` response.
    pub fn decode_list(&self, body: &[u8]) -> Result<Vec<Hook>> {
        let hooks = decode_envelope_list::<HookWire>(body)?;
        Ok(hooks.into_iter().map(Hook::from).collect())
    }
}

impl WireCodec for HookCodec {
    type Entity = Hook;

    fn encode(&self, hook: &Hook) -> Result<Vec<u8>> {
        encode_json(&HookWire::from(hook))
    }

    fn decode(&self, body: &[u8]) -> Result<Hook> {
        decode_envelope::<HookWire>(body).map(Hook::from)
    }
}

#[serde_as]
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct HookWire {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "_id", skip_serializing_if = "String::is_empty")]
    id: String,
    #[serde_as(as = "DefaultOnNull")]
    auth_type: String,
    #[serde_as(as = "DefaultOnNull")]
    events: Vec<String>,
    #[serde_as(as = "DefaultOnNull")]
    url: String,
    #[serde(
        rename = "createdTime",
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    created_time: Option<String>,
    #[serde(
        rename = "updatedTime",
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    updated_time: Option<String>,
    #[serde(rename = "apikeyDetails", skip_serializing_if = "Option::is_none")]
    api_key_details: Option<ApiKeyDetailsWire>,
}

#[serde_as]
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct ApiKeyDetailsWire {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(skip_serializing_if = "String::is_empty")]
    apikey_placement: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(skip_serializing_if = "String::is_empty")]
    apikey: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(skip_serializing_if = "String::is_empty")]
    apikey_placeholder: String,
}

impl From<&Hook> for HookWire {
    fn from(hook: &Hook) -> Self {
        Self {
            id: hook.id.clone(),
            auth_type: hook.settings.auth_type.clone(),
            events: hook.settings.events.clone(),
            url: hook.settings.url.clone(),
            created_time: None,
            updated_time: None,
            api_key_details: hook.settings.api_key_details.as_ref().map(|details| {
                ApiKeyDetailsWire {
                    apikey_placement: details.placement.clone(),
                    apikey: details.key.clone(),
                    apikey_placeholder: details.placeholder.clone(),
                }
            }),
        }
    }
}

impl From<HookWire> for Hook {
    fn from(wire: HookWire) -> Self {
        let api_key_details = wire
            .api_key_details
            .map(|details| HookApiKeyDetails {
                placement: details.apikey_placement,
                key: details.apikey,
                placeholder: details.apikey_placeholder,
            })
            .filter(|details| !details.is_empty());

        Self {
            id: wire.id,
            created_time: wire.created_time,
            updated_time: wire.updated_time,
            settings: HookPlan {
                url: wire.url,
                auth_type: wire.auth_type,
                events: wire.events,
                api_key_details,
            },
        }
    }
}
