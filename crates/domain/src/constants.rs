//! Platform constants
//!
//! Keyword sets accepted by the platform and fixed values used when
//! building requests.

/// Accepted `client_type` values for apps.
pub const CLIENT_TYPES: &[&str] =
    &["SINGLE_PAGE", "ANDROID", "IOS", "REGULAR_WEB", "NON_INTERACTIVE"];

/// Accepted webhook authentication schemes.
pub const HOOK_AUTH_TYPES: &[&str] = &["APIKEY", "TOTP", "CIDAAS_OAUTH2"];

/// Where a webhook API key is attached to outgoing calls.
pub const HOOK_APIKEY_PLACEMENTS: &[&str] = &["query", "header"];

/// Page identifiers the hosted-pages service knows about.
pub const HOSTED_PAGE_IDS: &[&str] = &[
    "consent_preview",
    "consent_scopes",
    "error",
    "login_success",
    "logout_success",
    "mfa_required",
    "password_forgot_init",
    "password_set_success",
    "register_additional_info",
    "register_success",
    "verification_init",
    "verification_complete",
    "password_set",
    "account_deduplication",
    "reactivate_verification_method",
    "device_init_code",
    "device_success_page",
    "status",
    "group_selection",
    "login",
    "register",
];

/// Locale sent for legacy hosted pages that declare none.
pub const DEFAULT_HOSTED_PAGE_LOCALE: &str = "en-us";

/// Registration field data type that carries a consent link.
pub const CONSENT_DATA_TYPE: &str = "CONSENT";

/// Field type stamped on every registration field this tool manages.
pub const CUSTOM_FIELD_TYPE: &str = "CUSTOM";

/// Locale metadata stamped on registration field definitions.
pub const FIELD_DEFINITION_LANGUAGE: &str = "de";
pub const FIELD_DEFINITION_LOCALE: &str = "de-DE";

/// Grant type for the token exchange.
pub const CLIENT_CREDENTIALS_GRANT: &str = "client_credentials";
