//! # Tenantform Domain
//!
//! Resource types and shared vocabulary for reconciling identity-platform
//! tenant configuration.
//!
//! This crate contains:
//! - Resource entities (observed state) and their plans
//! - Static attribute rules and validators
//! - Diagnostics, outcomes and the error taxonomy
//! - Platform connection configuration
//!
//! ## Architecture
//! - No dependencies on other tenantform crates
//! - No I/O; pure data and rules

pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod errors;
pub mod macros;
pub mod schema;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use config::*;
pub use diagnostics::*;
pub use errors::*;
pub use schema::{change_action, AttributeRule, ChangeAction, Mutability, PlanSchema};
pub use types::*;
