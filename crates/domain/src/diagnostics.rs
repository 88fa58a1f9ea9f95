//! Operation outcomes and accumulated diagnostics
//!
//! Every reconciler operation reports through [`Diagnostics`]: zero or more
//! error/warning entries collected without aborting. Operations that produce
//! a value return an [`Outcome`], which carries the value (if any) alongside
//! the diagnostics.

use serde::{Deserialize, Serialize};

use crate::errors::ReconcileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

/// A single diagnostic entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    /// Underlying error for error entries, kept so callers can branch on kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ReconcileError>,
}

/// Ordered collection of diagnostics for one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Diagnostics holding a single error entry.
    pub fn from_error(summary: impl Into<String>, error: ReconcileError) -> Self {
        let mut diagnostics = Self::new();
        diagnostics.add_error(summary, error);
        diagnostics
    }

    pub fn add_error(&mut self, summary: impl Into<String>, error: ReconcileError) {
        self.entries.push(Diagnostic {
            severity: Severity::Error,
            summary: summary.into(),
            detail: error.to_string(),
            error: Some(error),
        });
    }

    pub fn add_warning(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
        self.entries.push(Diagnostic {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: detail.into(),
            error: None,
        });
    }

    /// Move every entry of `other` to the end of this collection.
    pub fn append(&mut self, mut other: Diagnostics) {
        self.entries.append(&mut other.entries);
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.severity == Severity::Warning)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Result of a reconciler operation: an optional value plus diagnostics.
///
/// `value` is `None` whenever the operation failed; a present value may
/// still come with warnings, or with errors for partially applied
/// composite resources.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Outcome<T> {
    pub value: Option<T>,
    pub diagnostics: Diagnostics,
}

impl<T> Outcome<T> {
    pub fn success(value: T) -> Self {
        Self { value: Some(value), diagnostics: Diagnostics::new() }
    }

    pub fn with_diagnostics(value: T, diagnostics: Diagnostics) -> Self {
        Self { value: Some(value), diagnostics }
    }

    pub fn failed(diagnostics: Diagnostics) -> Self {
        Self { value: None, diagnostics }
    }

    /// Failed outcome with a single error entry.
    pub fn failure(summary: impl Into<String>, error: ReconcileError) -> Self {
        Self::failed(Diagnostics::from_error(summary, error))
    }

    /// `true` when a value was produced and no error was recorded.
    pub fn is_success(&self) -> bool {
        self.value.is_some() && !self.diagnostics.has_errors()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome { value: self.value.map(f), diagnostics: self.diagnostics }
    }

    /// Split into the value and the diagnostics.
    pub fn into_parts(self) -> (Option<T>, Diagnostics) {
        (self.value, self.diagnostics)
    }
}

/// What a read found on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "state", rename_all = "snake_case")]
pub enum Observed<T> {
    Present(T),
    /// Deleted out of band; the driver should drop the instance from state.
    Absent,
}

impl<T> Observed<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn present(&self) -> Option<&T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent => None,
        }
    }
}

impl<T> From<Option<T>> for Observed<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Self::Present)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_entries_in_insertion_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add_warning("first", "unknown page id");
        diagnostics.add_error("second", ReconcileError::Validation("bad".into()));
        diagnostics.add_error("third", ReconcileError::Transport("reset".into()));

        let summaries: Vec<_> = diagnostics.iter().map(|d| d.summary.as_str()).collect();
        assert_eq!(summaries, ["first", "second", "third"]);
        assert_eq!(diagnostics.errors().count(), 2);
        assert_eq!(diagnostics.warnings().count(), 1);
    }

    #[test]
    fn warnings_alone_are_not_errors() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.add_warning("heads up", "detail");
        assert!(!diagnostics.has_errors());
        assert!(Outcome::with_diagnostics(1, diagnostics).is_success());
    }

    #[test]
    fn failure_outcome_has_no_value() {
        let outcome: Outcome<u8> =
            Outcome::failure("Could not create", ReconcileError::Auth("denied".into()));
        assert!(outcome.value.is_none());
        assert!(!outcome.is_success());
        let entry = outcome.diagnostics.errors().next().unwrap();
        assert_eq!(entry.error, Some(ReconcileError::Auth("denied".into())));
        assert_eq!(entry.detail, "Authentication failed: denied");
    }

    #[test]
    fn observed_from_option() {
        assert!(Observed::<u8>::from(None).is_absent());
        assert_eq!(Observed::from(Some(3)).present(), Some(&3));
    }
}
