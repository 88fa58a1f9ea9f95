//! Notification template wire format (`notifications-srv/templates`)

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use tenantform_domain::{Result, Template, TemplateKey, TemplatePlan};

use super::{decode_envelope, empty_as_none, encode_json, non_empty, segment, WireCodec};

#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateCodec;

impl TemplateCodec {
    /// `/notifications-srv/templates/{group}:{key}:{method}:{locale}`
    pub fn path(&self, key: &TemplateKey) -> String {
        let parts = [&key.group_id, &key.template_key, &key.communication_method, &key.locale];
        let encoded: Vec<String> = parts.iter().map(|part| segment(part)).collect();
        format!("/notifications-srv/templates/{}", encoded.join(":"))
    }
}

impl WireCodec for TemplateCodec {
    type Entity = Template;

    fn encode(&self, template: &Template) -> Result<Vec<u8>> {
        encode_json(&TemplateWire::from(template))
    }

    fn decode(&self, body: &[u8]) -> Result<Template> {
        decode_envelope::<TemplateWire>(body).map(Template::from)
    }
}

#[serde_as]
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TemplateWire {
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    last_seeded_by: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    group_id: String,
    #[serde_as(as = "DefaultOnNull")]
    template_key: String,
    #[serde_as(as = "DefaultOnNull")]
    communication_method: String,
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    processing_type: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    locale: String,
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    message_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    enabled: Option<bool>,
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    subject: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    content: String,
}

impl From<&Template> for TemplateWire {
    fn from(template: &Template) -> Self {
        let s = &template.settings;
        Self {
            id: non_empty(&template.id),
            last_seeded_by: non_empty(&template.last_seeded_by),
            group_id: s.key.group_id.clone(),
            template_key: s.key.template_key.clone(),
            communication_method: s.key.communication_method.clone(),
            processing_type: non_empty(&s.processing_type),
            locale: s.key.locale.clone(),
            message_format: non_empty(&s.message_format),
            enabled: s.enabled,
            subject: non_empty(&s.subject),
            content: s.content.clone(),
        }
    }
}

impl From<TemplateWire> for Template {
    fn from(wire: TemplateWire) -> Self {
        Self {
            id: wire.id,
            last_seeded_by: wire.last_seeded_by,
            settings: TemplatePlan {
                key: TemplateKey {
                    group_id: wire.group_id,
                    template_key: wire.template_key,
                    communication_method: wire.communication_method,
                    locale: wire.locale,
                },
                processing_type: wire.processing_type,
                message_format: wire.message_format,
                subject: wire.subject,
                content: wire.content,
                enabled: wire.enabled,
            },
        }
    }
}
