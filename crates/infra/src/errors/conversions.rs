//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use tenantform_domain::ReconcileError;
use url::ParseError as UrlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ReconcileError);

impl From<InfraError> for ReconcileError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ReconcileError> for InfraError {
    fn from(value: ReconcileError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoReconcileError {
    fn into_reconcile(self) -> ReconcileError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ReconcileError */
/* -------------------------------------------------------------------------- */

impl IntoReconcileError for HttpError {
    fn into_reconcile(self) -> ReconcileError {
        if self.is_timeout() {
            return ReconcileError::Transport("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return ReconcileError::Transport("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let reason = status.canonical_reason().unwrap_or("unknown status");
            return ReconcileError::Request { status: code, body: reason.to_string() };
        }

        if self.is_builder() {
            return ReconcileError::Config(format!("invalid HTTP request: {self}"));
        }

        ReconcileError::Transport(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_reconcile())
    }
}

/* -------------------------------------------------------------------------- */
/* url::ParseError → ReconcileError */
/* -------------------------------------------------------------------------- */

impl IntoReconcileError for UrlError {
    fn into_reconcile(self) -> ReconcileError {
        ReconcileError::Config(format!("invalid platform host: {self}"))
    }
}

impl From<UrlError> for InfraError {
    fn from(value: UrlError) -> Self {
        InfraError(value.into_reconcile())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
