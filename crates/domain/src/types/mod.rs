//! Resource entities, plans and lookup records

pub mod app;
pub mod hook;
pub mod hosted_pages;
pub mod lookups;
pub mod password_policy;
pub mod registration_field;
pub mod template;

pub use app::{AllowedGroup, App, AppCustomProvider, AppKey, AppPlan, AppSocialProvider};
pub use hook::{Hook, HookApiKeyDetails, HookPlan};
pub use hosted_pages::{HostedPage, HostedPageGroup, HostedPageGroupPlan};
pub use lookups::{ConsentInstance, CustomProvider, SocialProvider, TenantInfo};
pub use password_policy::{PasswordPolicy, PasswordPolicyPlan};
pub use registration_field::{
    ConsentLabel, FieldDefinition, LocaleText, RegistrationField, RegistrationFieldComplete,
    RegistrationFieldInput, RegistrationFieldPlan,
};
pub use template::{
    SenderConfig, SenderSettings, Template, TemplateGroup, TemplateGroupPlan, TemplateKey,
    TemplatePlan,
};
