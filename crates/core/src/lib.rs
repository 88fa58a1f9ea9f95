//! # Tenantform Core
//!
//! Reconciliation logic for identity-platform tenant resources, with no
//! infrastructure dependencies.
//!
//! This crate contains:
//! - Wire codecs for every resource and API version
//! - The registration field derivation engine
//! - The composite orchestrator for parent/child resources
//! - Resource reconcilers and read-only lookups
//! - The transport port the infrastructure layer implements
//!
//! ## Architecture Principles
//! - Only depends on `tenantform-domain`
//! - No HTTP or credential handling; every call goes through
//!   [`PlatformTransport`]
//! - Operations run sequentially and report through diagnostics

pub mod codec;
pub mod composite;
pub mod derivation;
pub mod lookups;
pub mod reconcile;

// Infrastructure ports
pub mod transport_ports;

pub use codec::{WireCodec, WireRequest};
pub use composite::{CompositeLayout, CompositeOrchestrator, CompositeResult, CompositeStatus};
pub use derivation::FieldDerivationEngine;
pub use lookups::PlatformLookups;
pub use reconcile::{
    AppReconciler, HookReconciler, HostedPageGroupReconciler, HostedPagesBackend, HostedPagesV3,
    LegacyHostedPages, LegacyTemplatesApi, NotificationsApi, PasswordPolicyReconciler,
    RegistrationFieldReconciler, Remote, ResourceReconciler, TemplateGroupBackend,
    TemplateGroupReconciler, TemplateReconciler,
};
pub use transport_ports::{HttpMethod, PlatformTransport, TransportResponse};
