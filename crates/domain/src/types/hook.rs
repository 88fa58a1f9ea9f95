//! Webhooks

use serde::{Deserialize, Serialize};

use crate::constants::{HOOK_APIKEY_PLACEMENTS, HOOK_AUTH_TYPES};
use crate::schema::{AttributeRule, PlanSchema};
use crate::validation::{length_at_least, one_of, size_at_least};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookPlan {
    pub url: String,
    pub auth_type: String,
    pub events: Vec<String>,
    pub api_key_details: Option<HookApiKeyDetails>,
}

/// API key the platform attaches when calling the hook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookApiKeyDetails {
    pub placement: String,
    pub key: String,
    pub placeholder: String,
}

impl HookApiKeyDetails {
    pub fn is_empty(&self) -> bool {
        self.placement.is_empty() && self.key.is_empty() && self.placeholder.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hook {
    pub id: String,
    pub created_time: Option<String>,
    pub updated_time: Option<String>,
    #[serde(flatten)]
    pub settings: HookPlan,
}

impl Hook {
    pub fn from_plan(plan: &HookPlan, prior: Option<&Hook>) -> Self {
        match prior {
            Some(prior) => Self {
                id: prior.id.clone(),
                created_time: prior.created_time.clone(),
                updated_time: prior.updated_time.clone(),
                settings: plan.clone(),
            },
            None => Self { settings: plan.clone(), ..Self::default() },
        }
    }
}

fn url(plan: &HookPlan) -> Result<(), String> {
    length_at_least(&plan.url, 1)
}

fn auth_type(plan: &HookPlan) -> Result<(), String> {
    one_of(&plan.auth_type, HOOK_AUTH_TYPES)
}

fn events(plan: &HookPlan) -> Result<(), String> {
    size_at_least(&plan.events, 1)
}

fn api_key_details(plan: &HookPlan) -> Result<(), String> {
    match &plan.api_key_details {
        Some(details) => one_of(&details.placement, HOOK_APIKEY_PLACEMENTS)
            .map_err(|message| format!("placement: {message}")),
        None => Ok(()),
    }
}

static HOOK_RULES: &[AttributeRule<HookPlan>] = &[
    AttributeRule::computed("id"),
    AttributeRule::computed("created_time"),
    AttributeRule::computed("updated_time"),
    AttributeRule::mutable("url", url),
    AttributeRule::mutable("auth_type", auth_type),
    AttributeRule::mutable("events", events),
    AttributeRule::mutable("api_key_details", api_key_details),
];

impl PlanSchema for HookPlan {
    type State = Hook;
    const RESOURCE: &'static str = "hook";

    fn attribute_rules() -> &'static [AttributeRule<Self>] {
        HOOK_RULES
    }

    fn replacement_triggers(&self, _prior: &Hook) -> Vec<&'static str> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_auth_type_events_and_placement() {
        let plan = HookPlan {
            url: "https://hooks.example/in".into(),
            auth_type: "BASIC".into(),
            events: Vec::new(),
            api_key_details: Some(HookApiKeyDetails {
                placement: "body".into(),
                ..HookApiKeyDetails::default()
            }),
        };
        assert_eq!(plan.validate().errors().count(), 3);
    }

    #[test]
    fn accepts_apikey_hook() {
        let plan = HookPlan {
            url: "https://hooks.example/in".into(),
            auth_type: "APIKEY".into(),
            events: vec!["ACCOUNT_MODIFIED".into()],
            api_key_details: Some(HookApiKeyDetails {
                placement: "header".into(),
                key: "k".into(),
                placeholder: "x-api-key".into(),
            }),
        };
        assert!(plan.validate().is_empty());
    }
}
