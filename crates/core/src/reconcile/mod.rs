//! Resource reconcilers
//!
//! One reconciler per resource type drives the create/read/update/delete/
//! import lifecycle against the platform. Every operation reports through
//! [`Outcome`]/[`Diagnostics`] and never returns early with a bare error:
//! remote failures become error diagnostics, a missing remote resource on
//! read becomes [`Observed::Absent`], and a missing resource on delete is
//! success.
//!
//! Plans are validated before any remote call. Updates that would change a
//! replace-on-change attribute are refused; the driver destroys and
//! recreates instead.

mod app;
mod hook;
mod hosted_pages;
mod password_policy;
mod registration_field;
pub mod remote;
mod template;
mod template_group;

use async_trait::async_trait;
use tenantform_domain::{
    change_action, ChangeAction, Diagnostics, Observed, Outcome, PlanSchema, ReconcileError,
    Result,
};
use tracing::{debug, warn};

pub use app::AppReconciler;
pub use hook::HookReconciler;
pub use hosted_pages::{
    HostedPageGroupReconciler, HostedPagesBackend, HostedPagesV3, LegacyHostedPages,
};
pub use password_policy::PasswordPolicyReconciler;
pub use registration_field::RegistrationFieldReconciler;
pub use remote::Remote;
pub use template::TemplateReconciler;
pub use template_group::{
    LegacyTemplatesApi, NotificationsApi, TemplateGroupBackend, TemplateGroupReconciler,
};

/// Lifecycle operations for one resource type.
#[async_trait]
pub trait ResourceReconciler: Send + Sync {
    type Plan: PlanSchema<State = Self::State> + Send + Sync;
    type State: Send + Sync;

    /// Resource type name used in diagnostics and logs.
    fn resource(&self) -> &'static str {
        <Self::Plan as PlanSchema>::RESOURCE
    }

    /// Create the resource. On failure no state is produced.
    async fn create(&self, plan: &Self::Plan) -> Outcome<Self::State>;

    /// Refresh `prior` from the platform.
    async fn read(&self, prior: &Self::State) -> Outcome<Observed<Self::State>>;

    /// Apply `plan` on top of `prior`, keeping identity and computed fields.
    async fn update(&self, plan: &Self::Plan, prior: &Self::State) -> Outcome<Self::State>;

    /// Delete by identity; a resource that is already gone is deleted.
    async fn delete(&self, prior: &Self::State) -> Diagnostics;

    /// Adopt an existing remote resource by its external identifier.
    async fn import(&self, external_id: &str) -> Outcome<Self::State>;
}

/// Validate a plan for create. Errors mean no remote call may be made.
pub(crate) fn preflight<P: PlanSchema>(plan: &P) -> Diagnostics {
    let diagnostics = plan.validate();
    if diagnostics.has_errors() {
        warn!(resource = P::RESOURCE, errors = diagnostics.errors().count(), "plan rejected");
    }
    diagnostics
}

/// Validate a plan for update and refuse replace-on-change differences.
pub(crate) fn update_preflight<P: PlanSchema>(plan: &P, prior: &P::State) -> Diagnostics {
    let mut diagnostics = preflight(plan);
    if let ChangeAction::Replace { attributes } = change_action(plan, prior) {
        warn!(resource = P::RESOURCE, ?attributes, "update requires replacement");
        diagnostics.add_error(
            format!("Cannot update {} in place", P::RESOURCE),
            ReconcileError::Validation(format!(
                "changing {} requires replacing the resource",
                attributes.join(", ")
            )),
        );
    }
    diagnostics
}

/// Fold an operation result into an outcome, keeping earlier diagnostics.
pub(crate) fn conclude<T>(
    resource: &'static str,
    action: &'static str,
    result: Result<T>,
    mut diagnostics: Diagnostics,
) -> Outcome<T> {
    match result {
        Ok(value) => {
            debug!(resource, action, "operation succeeded");
            Outcome::with_diagnostics(value, diagnostics)
        }
        Err(err) => {
            warn!(resource, action, error = %err, kind = err.label(), "operation failed");
            diagnostics.add_error(format!("Error {action} {resource}"), err);
            Outcome::failed(diagnostics)
        }
    }
}

/// Outcome of a read: `None` means the remote resource is gone.
pub(crate) fn observe<T>(
    resource: &'static str,
    result: Result<Option<T>>,
) -> Outcome<Observed<T>> {
    let result = result.map(|state| {
        if state.is_none() {
            debug!(resource, "remote resource absent");
        }
        Observed::from(state)
    });
    conclude(resource, "reading", result, Diagnostics::new())
}

/// Import reads the resource and requires it to exist.
pub(crate) fn imported<T>(
    resource: &'static str,
    external_id: &str,
    result: Result<Option<T>>,
) -> Outcome<T> {
    let result = result.and_then(|state| {
        state.ok_or_else(|| ReconcileError::NotFound(format!("{resource} `{external_id}`")))
    });
    conclude(resource, "importing", result, Diagnostics::new())
}

/// Diagnostics of a delete.
pub(crate) fn removed(resource: &'static str, result: Result<()>) -> Diagnostics {
    conclude(resource, "deleting", result, Diagnostics::new()).diagnostics
}
