//! Composite resource orchestration
//!
//! Some resources are one logical entity on our side but several records on
//! the platform: a parent record plus one record per child. The orchestrator
//! runs `EnsureParent → UpsertChild₁ → … → UpsertChildₙ → Done` strictly in
//! order:
//!
//! - a parent failure stops the sequence; no child is attempted
//! - every child is attempted even when an earlier one failed
//! - the result holds exactly the children that succeeded, in declaration
//!   order, plus one error diagnostic per failed child
//!
//! Failed children are not retried; the next apply upserts them again.

use tenantform_domain::{Diagnostics, Result};
use tracing::{info, warn};

use crate::codec::WireRequest;
use crate::reconcile::Remote;

/// Request construction for one kind of composite resource.
pub trait CompositeLayout: Send + Sync {
    type Parent: Send + Sync;
    type Child: Send + Sync;

    /// Human-readable child kind for diagnostics, e.g. `"Hosted page"`.
    const CHILD_KIND: &'static str;

    fn parent_key<'a>(&self, parent: &'a Self::Parent) -> &'a str;

    fn child_key<'a>(&self, child: &'a Self::Child) -> &'a str;

    /// Request that creates or updates the parent record.
    fn parent_request(
        &self,
        parent: &Self::Parent,
        children: &[Self::Child],
    ) -> Result<WireRequest>;

    /// Confirmed parent and the children still to process, from the parent
    /// response.
    fn parent_confirmed(
        &self,
        desired: &Self::Parent,
        children: &[Self::Child],
        body: &[u8],
    ) -> Result<(Self::Parent, Vec<Self::Child>)>;

    /// Request for one child; `None` when the parent call already stored it.
    fn child_request(
        &self,
        parent: &Self::Parent,
        child: &Self::Child,
    ) -> Option<Result<WireRequest>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeStatus {
    /// Parent and every child succeeded.
    Done,
    /// Parent succeeded, at least one child failed.
    PartiallyDone,
    /// Parent failed; nothing to record.
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositeResult<P, C> {
    pub status: CompositeStatus,
    pub parent: Option<P>,
    pub children: Vec<C>,
    pub diagnostics: Diagnostics,
}

pub struct CompositeOrchestrator<L> {
    remote: Remote,
    layout: L,
}

impl<L: CompositeLayout> CompositeOrchestrator<L> {
    pub fn new(remote: Remote, layout: L) -> Self {
        Self { remote, layout }
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    pub fn remote(&self) -> &Remote {
        &self.remote
    }

    /// Converge the parent and its children.
    pub async fn apply(
        &self,
        parent: &L::Parent,
        children: &[L::Child],
    ) -> CompositeResult<L::Parent, L::Child> {
        let mut diagnostics = Diagnostics::new();
        let parent_key = self.layout.parent_key(parent);

        let (confirmed, pending) = match self.ensure_parent(parent, children).await {
            Ok(confirmed) => confirmed,
            Err(err) => {
                warn!(parent = parent_key, error = %err, "parent upsert failed");
                diagnostics.add_error(format!("Failed to upsert `{parent_key}`"), err);
                return CompositeResult {
                    status: CompositeStatus::Failed,
                    parent: None,
                    children: Vec::new(),
                    diagnostics,
                };
            }
        };

        let mut succeeded = Vec::with_capacity(pending.len());
        let mut failed = 0_usize;
        for child in pending {
            let key = self.layout.child_key(&child);
            match self.upsert_child(&confirmed, &child).await {
                Ok(()) => succeeded.push(child),
                Err(err) => {
                    warn!(parent = parent_key, child = key, error = %err, "child upsert failed");
                    diagnostics.add_error(format!("{} `{key}` failed", L::CHILD_KIND), err);
                    failed += 1;
                }
            }
        }

        let status =
            if failed == 0 { CompositeStatus::Done } else { CompositeStatus::PartiallyDone };
        info!(
            parent = parent_key,
            succeeded = succeeded.len(),
            failed,
            ?status,
            "composite applied"
        );
        CompositeResult { status, parent: Some(confirmed), children: succeeded, diagnostics }
    }

    async fn ensure_parent(
        &self,
        parent: &L::Parent,
        children: &[L::Child],
    ) -> Result<(L::Parent, Vec<L::Child>)> {
        let request = self.layout.parent_request(parent, children)?;
        let body = self.remote.send(request).await?;
        self.layout.parent_confirmed(parent, children, &body)
    }

    async fn upsert_child(&self, parent: &L::Parent, child: &L::Child) -> Result<()> {
        match self.layout.child_request(parent, child) {
            None => Ok(()),
            Some(request) => self.remote.send(request?).await.map(drop),
        }
    }
}
