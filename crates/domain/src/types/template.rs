//! Notification template groups and templates

use serde::{Deserialize, Serialize};

use crate::schema::{AttributeRule, PlanSchema};
use crate::validation::{length_at_least, size_at_most};

/// Sender settings for one communication channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderConfig {
    /// Service setup (provider configuration) id.
    pub id: Option<String>,
    pub sender_name: Option<String>,
    pub sender_addresses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderSettings {
    pub email: SenderConfig,
    pub sms: SenderConfig,
    pub ivr: SenderConfig,
    pub push: SenderConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateGroupPlan {
    pub group_id: String,
    pub description: Option<String>,
    pub default_locale: Option<String>,
    pub senders: SenderSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateGroup {
    pub id: String,
    #[serde(flatten)]
    pub settings: TemplateGroupPlan,
}

impl TemplateGroup {
    pub fn from_plan(plan: &TemplateGroupPlan, prior: Option<&TemplateGroup>) -> Self {
        Self {
            id: prior.map(|p| p.id.clone()).unwrap_or_default(),
            settings: plan.clone(),
        }
    }
}

fn group_id(plan: &TemplateGroupPlan) -> Result<(), String> {
    length_at_least(&plan.group_id, 1)
}

/// Email and SMS carry one sender address on the wire; IVR carries a list.
fn senders(plan: &TemplateGroupPlan) -> Result<(), String> {
    for (channel, config) in [("email", &plan.senders.email), ("sms", &plan.senders.sms)] {
        size_at_most(&config.sender_addresses, 1)
            .map_err(|message| format!("{channel} sender addresses {message}"))?;
    }
    Ok(())
}

static TEMPLATE_GROUP_RULES: &[AttributeRule<TemplateGroupPlan>] = &[
    AttributeRule::computed("id"),
    AttributeRule::replace_on_change("group_id", group_id),
    AttributeRule::mutable("senders", senders),
];

impl PlanSchema for TemplateGroupPlan {
    type State = TemplateGroup;
    const RESOURCE: &'static str = "template_group";

    fn attribute_rules() -> &'static [AttributeRule<Self>] {
        TEMPLATE_GROUP_RULES
    }

    fn replacement_triggers(&self, prior: &TemplateGroup) -> Vec<&'static str> {
        if self.group_id == prior.settings.group_id {
            Vec::new()
        } else {
            vec!["group_id"]
        }
    }
}

/// Composite key of a template: group, key, channel and locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateKey {
    pub group_id: String,
    pub template_key: String,
    pub communication_method: String,
    pub locale: String,
}

impl TemplateKey {
    /// Path segment form, `group:key:method:locale`.
    pub fn path_segment(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.group_id, self.template_key, self.communication_method, self.locale
        )
    }

    /// Parse the `group:key:method:locale` form used for imports.
    pub fn parse(value: &str) -> Result<Self, String> {
        let parts: Vec<&str> = value.split(':').collect();
        match parts.as_slice() {
            [group_id, template_key, communication_method, locale]
                if parts.iter().all(|part| !part.is_empty()) =>
            {
                Ok(Self {
                    group_id: (*group_id).to_string(),
                    template_key: (*template_key).to_string(),
                    communication_method: (*communication_method).to_string(),
                    locale: (*locale).to_string(),
                })
            }
            _ => Err(format!(
                "expected `group:key:method:locale`, got \"{value}\""
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatePlan {
    #[serde(flatten)]
    pub key: TemplateKey,
    pub processing_type: Option<String>,
    pub message_format: Option<String>,
    pub subject: Option<String>,
    pub content: String,
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: Option<String>,
    pub last_seeded_by: Option<String>,
    #[serde(flatten)]
    pub settings: TemplatePlan,
}

impl Template {
    pub fn from_plan(plan: &TemplatePlan, prior: Option<&Template>) -> Self {
        Self {
            id: prior.and_then(|p| p.id.clone()),
            last_seeded_by: prior.and_then(|p| p.last_seeded_by.clone()),
            settings: plan.clone(),
        }
    }

    pub fn key(&self) -> &TemplateKey {
        &self.settings.key
    }
}

fn identity_part(value: &str) -> Result<(), String> {
    if value.contains(':') {
        return Err("must not contain ':'".to_string());
    }
    length_at_least(value, 1)
}

fn template_group_id(plan: &TemplatePlan) -> Result<(), String> {
    identity_part(&plan.key.group_id)
}

fn template_key(plan: &TemplatePlan) -> Result<(), String> {
    identity_part(&plan.key.template_key)
}

fn communication_method(plan: &TemplatePlan) -> Result<(), String> {
    identity_part(&plan.key.communication_method)
}

fn locale(plan: &TemplatePlan) -> Result<(), String> {
    identity_part(&plan.key.locale)
}

fn content(plan: &TemplatePlan) -> Result<(), String> {
    length_at_least(&plan.content, 1)
}

static TEMPLATE_RULES: &[AttributeRule<TemplatePlan>] = &[
    AttributeRule::computed("id"),
    AttributeRule::computed("last_seeded_by"),
    AttributeRule::replace_on_change("group_id", template_group_id),
    AttributeRule::replace_on_change("template_key", template_key),
    AttributeRule::replace_on_change("communication_method", communication_method),
    AttributeRule::replace_on_change("locale", locale),
    AttributeRule::mutable("content", content),
];

impl PlanSchema for TemplatePlan {
    type State = Template;
    const RESOURCE: &'static str = "template";

    fn attribute_rules() -> &'static [AttributeRule<Self>] {
        TEMPLATE_RULES
    }

    fn replacement_triggers(&self, prior: &Template) -> Vec<&'static str> {
        let planned = &self.key;
        let observed = prior.key();
        [
            ("group_id", planned.group_id == observed.group_id),
            ("template_key", planned.template_key == observed.template_key),
            (
                "communication_method",
                planned.communication_method == observed.communication_method,
            ),
            ("locale", planned.locale == observed.locale),
        ]
        .into_iter()
        .filter(|(_, same)| !same)
        .map(|(name, _)| name)
        .collect()
    }
}
