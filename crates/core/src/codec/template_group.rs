//! Template group wire formats
//!
//! Two platform generations describe the same group. The notifications
//! service nests per-channel settings under `commSettings`; the legacy
//! templates service uses flat `*_sender_config` objects. Both map onto
//! [`SenderSettings`].

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use tenantform_domain::{Result, SenderConfig, SenderSettings, TemplateGroup, TemplateGroupPlan};

use super::{decode_envelope, empty_as_none, encode_json, non_empty, WireCodec};

/// `notifications-srv/templategroups` layout.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateGroupCodec;

impl WireCodec for TemplateGroupCodec {
    type Entity = TemplateGroup;

    fn encode(&self, group: &TemplateGroup) -> Result<Vec<u8>> {
        encode_json(&NotificationsGroupWire::from(group))
    }

    fn decode(&self, body: &[u8]) -> Result<TemplateGroup> {
        decode_envelope::<NotificationsGroupWire>(body).map(TemplateGroup::from)
    }
}

/// `templates-srv/groups` layout.
#[derive(Debug, Default, Clone, Copy)]
pub struct LegacyTemplateGroupCodec;

impl WireCodec for LegacyTemplateGroupCodec {
    type Entity = TemplateGroup;

    fn encode(&self, group: &TemplateGroup) -> Result<Vec<u8>> {
        encode_json(&LegacyGroupWire::from(group))
    }

    fn decode(&self, body: &[u8]) -> Result<TemplateGroup> {
        decode_envelope::<LegacyGroupWire>(body).map(TemplateGroup::from)
    }
}

fn first_address(config: &SenderConfig) -> Option<String> {
    config.sender_addresses.first().filter(|address| !address.is_empty()).cloned()
}

fn addresses(address: Option<String>) -> Vec<String> {
    address.into_iter().collect()
}

// ============================================================================
// Notifications layout
// ============================================================================

#[serde_as]
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct NotificationsGroupWire {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(skip_serializing_if = "String::is_empty")]
    id: String,
    #[serde_as(as = "DefaultOnNull")]
    group_id: String,
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(
        rename = "defaultLocale",
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    default_locale: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "commSettings")]
    comm_settings: CommSettingsWire,
}

#[serde_as]
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct CommSettingsWire {
    #[serde_as(as = "DefaultOnNull")]
    email: ChannelWire,
    #[serde_as(as = "DefaultOnNull")]
    sms: ChannelWire,
    #[serde_as(as = "DefaultOnNull")]
    ivr: IvrChannelWire,
    #[serde_as(as = "DefaultOnNull")]
    push: PushChannelWire,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ChannelWire {
    #[serde(deserialize_with = "empty_as_none")]
    communication_method: Option<String>,
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    service_setup_id: Option<String>,
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    sender_name: Option<String>,
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    sender_address: Option<String>,
}

#[serde_as]
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct IvrChannelWire {
    #[serde(deserialize_with = "empty_as_none")]
    communication_method: Option<String>,
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    service_setup_id: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    sender_address: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PushChannelWire {
    #[serde(deserialize_with = "empty_as_none")]
    communication_method: Option<String>,
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    service_setup_id: Option<String>,
}

impl ChannelWire {
    fn encode(method: &str, config: &SenderConfig) -> Self {
        Self {
            communication_method: Some(method.to_string()),
            service_setup_id: non_empty(&config.id),
            sender_name: non_empty(&config.sender_name),
            sender_address: first_address(config),
        }
    }

    fn into_config(self) -> SenderConfig {
        SenderConfig {
            id: self.service_setup_id,
            sender_name: self.sender_name,
            sender_addresses: addresses(self.sender_address),
        }
    }
}

impl From<&TemplateGroup> for NotificationsGroupWire {
    fn from(group: &TemplateGroup) -> Self {
        let s = &group.settings;
        let senders = &s.senders;
        Self {
            id: group.id.clone(),
            group_id: s.group_id.clone(),
            description: non_empty(&s.description),
            default_locale: non_empty(&s.default_locale),
            comm_settings: CommSettingsWire {
                email: ChannelWire::encode("EMAIL", &senders.email),
                sms: ChannelWire::encode("SMS", &senders.sms),
                ivr: IvrChannelWire {
                    communication_method: Some("IVR".to_string()),
                    service_setup_id: non_empty(&senders.ivr.id),
                    sender_address: senders.ivr.sender_addresses.clone(),
                },
                push: PushChannelWire {
                    communication_method: Some("PUSH".to_string()),
                    service_setup_id: non_empty(&senders.push.id),
                },
            },
        }
    }
}

impl From<NotificationsGroupWire> for TemplateGroup {
    fn from(wire: NotificationsGroupWire) -> Self {
        let comm = wire.comm_settings;
        Self {
            id: wire.id,
            settings: TemplateGroupPlan {
                group_id: wire.group_id,
                description: wire.description,
                default_locale: wire.default_locale,
                senders: SenderSettings {
                    email: comm.email.into_config(),
                    sms: comm.sms.into_config(),
                    ivr: SenderConfig {
                        id: comm.ivr.service_setup_id,
                        sender_name: None,
                        sender_addresses: comm.ivr.sender_address,
                    },
                    push: SenderConfig {
                        id: comm.push.service_setup_id,
                        ..SenderConfig::default()
                    },
                },
            },
        }
    }
}

// ============================================================================
// Legacy layout
// ============================================================================

#[serde_as]
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct LegacyGroupWire {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(skip_serializing_if = "String::is_empty")]
    id: String,
    #[serde_as(as = "DefaultOnNull")]
    group_id: String,
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    default_locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email_sender_config: Option<LegacySenderWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sms_sender_config: Option<LegacySenderWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ivr_sender_config: Option<LegacySenderWire>,
    #[serde(skip_serializing_if = "Option::is_none")]
    push_sender_config: Option<LegacySenderWire>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct LegacySenderWire {
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    from_name: Option<String>,
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    from_email: Option<String>,
}

impl LegacySenderWire {
    /// `None` when the channel carries nothing worth sending.
    fn encode(config: &SenderConfig, with_name: bool, with_address: bool) -> Option<Self> {
        let wire = Self {
            id: non_empty(&config.id),
            from_name: if with_name { non_empty(&config.sender_name) } else { None },
            from_email: if with_address { first_address(config) } else { None },
        };
        let empty = wire.id.is_none() && wire.from_name.is_none() && wire.from_email.is_none();
        (!empty).then_some(wire)
    }

    fn into_config(wire: Option<Self>) -> SenderConfig {
        wire.map(|wire| SenderConfig {
            id: wire.id,
            sender_name: wire.from_name,
            sender_addresses: addresses(wire.from_email),
        })
        .unwrap_or_default()
    }
}

impl From<&TemplateGroup> for LegacyGroupWire {
    fn from(group: &TemplateGroup) -> Self {
        let s = &group.settings;
        let senders = &s.senders;
        Self {
            id: group.id.clone(),
            group_id: s.group_id.clone(),
            description: non_empty(&s.description),
            default_locale: non_empty(&s.default_locale),
            email_sender_config: LegacySenderWire::encode(&senders.email, true, true),
            sms_sender_config: LegacySenderWire::encode(&senders.sms, true, false),
            ivr_sender_config: LegacySenderWire::encode(&senders.ivr, false, false),
            push_sender_config: LegacySenderWire::encode(&senders.push, false, false),
        }
    }
}

impl From<LegacyGroupWire> for TemplateGroup {
    fn from(wire: LegacyGroupWire) -> Self {
        Self {
            id: wire.id,
            settings: TemplateGroupPlan {
                group_id: wire.group_id,
                description: wire.description,
                default_locale: wire.default_locale,
                senders: SenderSettings {
                    email: LegacySenderWire::into_config(wire.email_sender_config),
                    sms: LegacySenderWire::into_config(wire.sms_sender_config),
                    ivr: LegacySenderWire::into_config(wire.ivr_sender_config),
                    push: LegacySenderWire::into_config(wire.push_sender_config),
                },
            },
        }
    }
}
