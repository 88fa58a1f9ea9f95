//! # Tenantform Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The authenticated platform session (client-credentials exchange)
//! - HTTP client plumbing and error conversions
//! - Configuration loading from environment variables and files
//! - Logging initialisation
//! - The [`Platform`] facade wiring every reconciler over one session
//!
//! ## Architecture
//! - Implements `PlatformTransport` from `tenantform-core`
//! - Depends on `tenantform-domain` and `tenantform-core`
//! - Contains all "impure" code (network, environment, files)

pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod platform;
pub mod session;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::{init_logging, LogFormat};
pub use platform::{DynHostedPages, DynTemplateGroups, Platform};
pub use session::AuthenticatedSession;
