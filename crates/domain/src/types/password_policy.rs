//! Password policies

use serde::{Deserialize, Serialize};

use crate::schema::{AttributeRule, PlanSchema};
use crate::validation::{at_least, length_at_least};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordPolicyPlan {
    pub policy_name: String,
    pub minimum_length: i64,
    pub no_of_digits: i64,
    pub lower_and_upper_case: bool,
    pub no_of_special_chars: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordPolicy {
    pub id: String,
    #[serde(flatten)]
    pub settings: PasswordPolicyPlan,
}

impl PasswordPolicy {
    pub fn from_plan(plan: &PasswordPolicyPlan, prior: Option<&PasswordPolicy>) -> Self {
        Self {
            id: prior.map(|p| p.id.clone()).unwrap_or_default(),
            settings: plan.clone(),
        }
    }
}

fn policy_name(plan: &PasswordPolicyPlan) -> Result<(), String> {
    length_at_least(&plan.policy_name, 1)
}

fn minimum_length(plan: &PasswordPolicyPlan) -> Result<(), String> {
    at_least(plan.minimum_length, 0)
}

fn no_of_digits(plan: &PasswordPolicyPlan) -> Result<(), String> {
    at_least(plan.no_of_digits, 0)
}

fn no_of_special_chars(plan: &PasswordPolicyPlan) -> Result<(), String> {
    at_least(plan.no_of_special_chars, 0)
}

static PASSWORD_POLICY_RULES: &[AttributeRule<PasswordPolicyPlan>] = &[
    AttributeRule::computed("id"),
    AttributeRule::mutable("policy_name", policy_name),
    AttributeRule::mutable("minimum_length", minimum_length),
    AttributeRule::mutable("no_of_digits", no_of_digits),
    AttributeRule::mutable("no_of_special_chars", no_of_special_chars),
];

impl PlanSchema for PasswordPolicyPlan {
    type State = PasswordPolicy;
    const RESOURCE: &'static str = "password_policy";

    fn attribute_rules() -> &'static [AttributeRule<Self>] {
        PASSWORD_POLICY_RULES
    }

    fn replacement_triggers(&self, _prior: &PasswordPolicy) -> Vec<&'static str> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_counts_are_rejected() {
        let plan = PasswordPolicyPlan {
            policy_name: "strict".into(),
            minimum_length: -1,
            no_of_special_chars: -2,
            ..PasswordPolicyPlan::default()
        };
        assert_eq!(plan.validate().errors().count(), 2);
    }
}
