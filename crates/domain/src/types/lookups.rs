//! Read-only platform records used to resolve references

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantInfo {
    pub tenant_key: String,
    pub tenant_name: String,
    pub version_info: String,
    pub custom_field_flatten: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentInstance {
    pub id: String,
    pub consent_name: String,
}

/// Configured social login provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialProvider {
    pub id: String,
    pub social_id: String,
    pub name: String,
    pub provider_name: String,
    pub provider_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomProvider {
    pub provider_name: String,
    pub display_name: String,
}
