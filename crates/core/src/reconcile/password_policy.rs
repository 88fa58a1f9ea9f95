//! Password policy reconciler

use async_trait::async_trait;
use tenantform_domain::{
    Diagnostics, Observed, Outcome, PasswordPolicy, PasswordPolicyPlan, PlanSchema, Result,
};

use super::{
    conclude, imported, observe, preflight, removed, update_preflight, Remote, ResourceReconciler,
};
use crate::codec::{segment, PasswordPolicyCodec, WireCodec, WireRequest};

const POLICY_PATH: &str = "/password-policy-srv/policy";

pub struct PasswordPolicyReconciler {
    remote: Remote,
    codec: PasswordPolicyCodec,
}

impl PasswordPolicyReconciler {
    pub fn new(remote: Remote) -> Self {
        Self { remote, codec: PasswordPolicyCodec }
    }

    fn policy_path(id: &str) -> String {
        format!("{POLICY_PATH}/{}", segment(id))
    }

    async fn upsert(&self, policy: &PasswordPolicy) -> Result<PasswordPolicy> {
        let request = WireRequest::post(POLICY_PATH, self.codec.encode(policy)?);
        let body = self.remote.send(request).await?;
        let mut observed = self.codec.decode(&body)?;
        if observed.id.is_empty() {
            observed.id.clone_from(&policy.id);
        }
        Ok(observed)
    }

    async fn fetch(&self, id: &str) -> Result<Option<PasswordPolicy>> {
        match self.remote.fetch(&Self::policy_path(id)).await? {
            Some(body) => self.codec.decode(&body).map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ResourceReconciler for PasswordPolicyReconciler {
    type Plan = PasswordPolicyPlan;
    type State = PasswordPolicy;

    async fn create(&self, plan: &PasswordPolicyPlan) -> Outcome<PasswordPolicy> {
        let diagnostics = preflight(plan);
        if diagnostics.has_errors() {
            return Outcome::failed(diagnostics);
        }
        let result = self.upsert(&PasswordPolicy::from_plan(plan, None)).await;
        conclude(PasswordPolicyPlan::RESOURCE, "creating", result, diagnostics)
    }

    async fn read(&self, prior: &PasswordPolicy) -> Outcome<Observed<PasswordPolicy>> {
        observe(PasswordPolicyPlan::RESOURCE, self.fetch(&prior.id).await)
    }

    async fn update(
        &self,
        plan: &PasswordPolicyPlan,
        prior: &PasswordPolicy,
    ) -> Outcome<PasswordPolicy> {
        let diagnostics = update_preflight(plan, prior);
        if diagnostics.has_errors() {
            return Outcome::failed(diagnostics);
        }
        let result = self.upsert(&PasswordPolicy::from_plan(plan, Some(prior))).await;
        conclude(PasswordPolicyPlan::RESOURCE, "updating", result, diagnostics)
    }

    async fn delete(&self, prior: &PasswordPolicy) -> Diagnostics {
        let result = self.remote.remove(&Self::policy_path(&prior.id)).await;
        removed(PasswordPolicyPlan::RESOURCE, result)
    }

    async fn import(&self, id: &str) -> Outcome<PasswordPolicy> {
        imported(PasswordPolicyPlan::RESOURCE, id, self.fetch(id).await)
    }
}
