//! Custom registration fields
//!
//! The plan carries the primary attributes. Before every upsert the
//! derivation step in core expands a [`RegistrationFieldInput`] into the
//! complete record the platform expects.

use serde::{Deserialize, Serialize};

use crate::schema::{AttributeRule, PlanSchema};
use crate::validation::length_at_least;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrationFieldPlan {
    /// Field key; also the identifier used for reads and deletes.
    pub field_key: String,
    pub data_type: String,
    pub required: bool,
    pub enabled: bool,
    pub read_only: bool,
    pub claimable: bool,
    pub parent_group_id: String,
    pub order: i64,
    pub consent_refs: Vec<String>,
}

/// Observed state of a registration field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationField {
    pub id: String,
    #[serde(flatten)]
    pub settings: RegistrationFieldPlan,
}

/// Primary attributes handed to the derivation step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationFieldInput {
    /// Platform id; `None` on first create.
    pub id: Option<String>,
    pub settings: RegistrationFieldPlan,
}

impl RegistrationFieldInput {
    pub fn from_plan(plan: &RegistrationFieldPlan, prior: Option<&RegistrationField>) -> Self {
        Self {
            id: prior.map(|p| p.id.clone()).filter(|id| !id.is_empty()),
            settings: plan.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentLabel {
    pub label: String,
    pub label_text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleText {
    pub locale: String,
    pub language: String,
    pub consent_label: ConsentLabel,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub language: String,
    pub locale: String,
}

/// Primary attributes plus every derived attribute, ready to encode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationFieldComplete {
    pub id: Option<String>,
    pub settings: RegistrationFieldPlan,
    pub internal: bool,
    pub scopes: Vec<String>,
    pub is_group: bool,
    pub is_list: bool,
    pub field_type: String,
    pub base_data_type: String,
    pub field_definition: FieldDefinition,
    pub locale_text: LocaleText,
}

fn field_key(plan: &RegistrationFieldPlan) -> Result<(), String> {
    length_at_least(&plan.field_key, 1)
}

fn data_type(plan: &RegistrationFieldPlan) -> Result<(), String> {
    length_at_least(&plan.data_type, 1)
}

static REGISTRATION_FIELD_RULES: &[AttributeRule<RegistrationFieldPlan>] = &[
    AttributeRule::computed("id"),
    AttributeRule::replace_on_change("field_key", field_key),
    AttributeRule::mutable("data_type", data_type),
];

impl PlanSchema for RegistrationFieldPlan {
    type State = RegistrationField;
    const RESOURCE: &'static str = "registration_field";

    fn attribute_rules() -> &'static [AttributeRule<Self>] {
        REGISTRATION_FIELD_RULES
    }

    fn replacement_triggers(&self, prior: &RegistrationField) -> Vec<&'static str> {
        if self.field_key == prior.settings.field_key {
            Vec::new()
        } else {
            vec!["field_key"]
        }
    }
}
