//! Webhook reconciler

use async_trait::async_trait;
use tenantform_domain::{Diagnostics, Hook, HookPlan, Observed, Outcome, PlanSchema, Result};

use super::{
    conclude, imported, observe, preflight, removed, update_preflight, Remote, ResourceReconciler,
};
use crate::codec::hook::WEBHOOK_PATH;
use crate::codec::{segment, HookCodec, WireCodec, WireRequest};

pub struct HookReconciler {
    remote: Remote,
    codec: HookCodec,
}

impl HookReconciler {
    pub fn new(remote: Remote) -> Self {
        Self { remote, codec: HookCodec }
    }

    /// Create and update share the upsert endpoint; a known `_id` updates.
    async fn upsert(&self, hook: &Hook) -> Result<Hook> {
        let request = WireRequest::post(WEBHOOK_PATH, self.codec.encode(hook)?);
        let body = self.remote.send(request).await?;
        let mut observed = self.codec.decode(&body)?;
        if observed.id.is_empty() {
            observed.id.clone_from(&hook.id);
        }
        if observed.created_time.is_none() {
            observed.created_time.clone_from(&hook.created_time);
        }
        Ok(observed)
    }

    async fn fetch(&self, id: &str) -> Result<Option<Hook>> {
        match self.remote.fetch(&self.codec.read_path(id)).await? {
            Some(body) => self.codec.decode(&body).map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ResourceReconciler for HookReconciler {
    type Plan = HookPlan;
    type State = Hook;

    async fn create(&self, plan: &HookPlan) -> Outcome<Hook> {
        let diagnostics = preflight(plan);
        if diagnostics.has_errors() {
            return Outcome::failed(diagnostics);
        }
        let result = self.upsert(&Hook::from_plan(plan, None)).await;
        conclude(HookPlan::RESOURCE, "creating", result, diagnostics)
    }

    async fn read(&self, prior: &Hook) -> Outcome<Observed<Hook>> {
        observe(HookPlan::RESOURCE, self.fetch(&prior.id).await)
    }

    async fn update(&self, plan: &HookPlan, prior: &Hook) -> Outcome<Hook> {
        let diagnostics = update_preflight(plan, prior);
        if diagnostics.has_errors() {
            return Outcome::failed(diagnostics);
        }
        let result = self.upsert(&Hook::from_plan(plan, Some(prior))).await;
        conclude(HookPlan::RESOURCE, "updating", result, diagnostics)
    }

    async fn delete(&self, prior: &Hook) -> Diagnostics {
        let path = format!("{WEBHOOK_PATH}/{}", segment(&prior.id));
        removed(HookPlan::RESOURCE, self.remote.remove(&path).await)
    }

    async fn import(&self, id: &str) -> Outcome<Hook> {
        imported(HookPlan::RESOURCE, id, self.fetch(id).await)
    }
}
