//! Password policy wire format (`password-policy-srv`)

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use tenantform_domain::{PasswordPolicy, PasswordPolicyPlan, Result};

use super::{decode_envelope, decode_envelope_list, encode_json, WireCodec};

#[derive(Debug, Default, Clone, Copy)]
pub struct PasswordPolicyCodec;

impl PasswordPolicyCodec {
    pub fn decode_list(&self, body: &[u8]) -> Result<Vec<PasswordPolicy>> {
        let policies = decode_envelope_list::<PasswordPolicyWire>(body)?;
        Ok(policies.into_iter().map(PasswordPolicy::from).collect())
    }
}

impl WireCodec for PasswordPolicyCodec {
    type Entity = PasswordPolicy;

    fn encode(&self, policy: &PasswordPolicy) -> Result<Vec<u8>> {
        encode_json(&PasswordPolicyWire::from(policy))
    }

    fn decode(&self, body: &[u8]) -> Result<PasswordPolicy> {
        decode_envelope::<PasswordPolicyWire>(body).map(PasswordPolicy::from)
    }
}

#[serde_as]
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PasswordPolicyWire {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(skip_serializing_if = "String::is_empty")]
    id: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "policy_name")]
    policy_name: String,
    #[serde_as(as = "DefaultOnNull")]
    minimum_length: i64,
    #[serde_as(as = "DefaultOnNull")]
    no_of_digits: i64,
    #[serde_as(as = "DefaultOnNull")]
    lower_and_upper_case: bool,
    #[serde_as(as = "DefaultOnNull")]
    no_of_special_chars: i64,
}

impl From<&PasswordPolicy> for PasswordPolicyWire {
    fn from(policy: &PasswordPolicy) -> Self {
        let s = &policy.settings;
        Self {
            id: policy.id.clone(),
            policy_name: s.policy_name.clone(),
            minimum_length: s.minimum_length,
            no_of_digits: s.no_of_digits,
            lower_and_upper_case: s.lower_and_upper_case,
            no_of_special_chars: s.no_of_special_chars,
        }
    }
}

impl From<PasswordPolicyWire> for PasswordPolicy {
    fn from(wire: PasswordPolicyWire) -> Self {
        Self {
            id: wire.id,
            settings: PasswordPolicyPlan {
                policy_name: wire.policy_name,
                minimum_length: wire.minimum_length,
                no_of_digits: wire.no_of_digits,
                lower_and_upper_case: wire.lower_and_upper_case,
                no_of_special_chars: wire.no_of_special_chars,
            },
        }
    }
}
