//! Template group reconciler
//!
//! The platform serves template groups from two services with different
//! layouts and verbs. [`TemplateGroupBackend`] captures the difference; the
//! reconciler is instantiated once for the service the tenant runs.

use std::marker::PhantomData;

use async_trait::async_trait;
use tenantform_domain::{
    Diagnostics, Observed, Outcome, PlanSchema, Result, TemplateGroup, TemplateGroupPlan,
};

use super::{
    conclude, imported, observe, preflight, removed, update_preflight, Remote, ResourceReconciler,
};
use crate::codec::{segment, LegacyTemplateGroupCodec, TemplateGroupCodec, WireCodec, WireRequest};

/// Endpoints and wire layout of one template group service.
pub trait TemplateGroupBackend: Send + Sync + 'static {
    type Codec: WireCodec<Entity = TemplateGroup> + Default;

    fn create_request(codec: &Self::Codec, group: &TemplateGroup) -> Result<WireRequest>;

    fn update_request(codec: &Self::Codec, group: &TemplateGroup) -> Result<WireRequest>;

    /// Read and delete target.
    fn group_path(group_id: &str) -> String;
}

/// `notifications-srv/templategroups`
#[derive(Debug, Clone, Copy)]
pub struct NotificationsApi;

const TEMPLATE_GROUPS_PATH: &str = "/notifications-srv/templategroups";

impl TemplateGroupBackend for NotificationsApi {
    type Codec = TemplateGroupCodec;

    fn create_request(codec: &TemplateGroupCodec, group: &TemplateGroup) -> Result<WireRequest> {
        Ok(WireRequest::post(TEMPLATE_GROUPS_PATH, codec.encode(group)?))
    }

    fn update_request(codec: &TemplateGroupCodec, group: &TemplateGroup) -> Result<WireRequest> {
        Ok(WireRequest::put(Self::group_path(&group.settings.group_id), codec.encode(group)?))
    }

    fn group_path(group_id: &str) -> String {
        format!("{TEMPLATE_GROUPS_PATH}/{}", segment(group_id))
    }
}

/// `templates-srv/groups`; create and update share one upsert.
#[derive(Debug, Clone, Copy)]
pub struct LegacyTemplatesApi;

const LEGACY_GROUPS_PATH: &str = "/templates-srv/groups";

impl TemplateGroupBackend for LegacyTemplatesApi {
    type Codec = LegacyTemplateGroupCodec;

    fn create_request(
        codec: &LegacyTemplateGroupCodec,
        group: &TemplateGroup,
    ) -> Result<WireRequest> {
        Ok(WireRequest::post(LEGACY_GROUPS_PATH, codec.encode(group)?))
    }

    fn update_request(
        codec: &LegacyTemplateGroupCodec,
        group: &TemplateGroup,
    ) -> Result<WireRequest> {
        Self::create_request(codec, group)
    }

    fn group_path(group_id: &str) -> String {
        format!("{LEGACY_GROUPS_PATH}/{}", segment(group_id))
    }
}

pub struct TemplateGroupReconciler<A: TemplateGroupBackend> {
    remote: Remote,
    codec: A::Codec,
    api: PhantomData<A>,
}

impl<A: TemplateGroupBackend> TemplateGroupReconciler<A> {
    pub fn new(remote: Remote) -> Self {
        Self { remote, codec: A::Codec::default(), api: PhantomData }
    }

    async fn send(&self, request: WireRequest, group: &TemplateGroup) -> Result<TemplateGroup> {
        let body = self.remote.send(request).await?;
        let mut observed = self.codec.decode(&body)?;
        if observed.id.is_empty() {
            observed.id.clone_from(&group.id);
        }
        if observed.settings.group_id.is_empty() {
            observed.settings.group_id.clone_from(&group.settings.group_id);
        }
        Ok(observed)
    }

    async fn fetch(&self, group_id: &str) -> Result<Option<TemplateGroup>> {
        match self.remote.fetch(&A::group_path(group_id)).await? {
            Some(body) => self.codec.decode(&body).map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl<A: TemplateGroupBackend> ResourceReconciler for TemplateGroupReconciler<A> {
    type Plan = TemplateGroupPlan;
    type State = TemplateGroup;

    async fn create(&self, plan: &TemplateGroupPlan) -> Outcome<TemplateGroup> {
        let diagnostics = preflight(plan);
        if diagnostics.has_errors() {
            return Outcome::failed(diagnostics);
        }
        let group = TemplateGroup::from_plan(plan, None);
        let result = match A::create_request(&self.codec, &group) {
            Ok(request) => self.send(request, &group).await,
            Err(err) => Err(err),
        };
        conclude(TemplateGroupPlan::RESOURCE, "creating", result, diagnostics)
    }

    async fn read(&self, prior: &TemplateGroup) -> Outcome<Observed<TemplateGroup>> {
        observe(TemplateGroupPlan::RESOURCE, self.fetch(&prior.settings.group_id).await)
    }

    async fn update(
        &self,
        plan: &TemplateGroupPlan,
        prior: &TemplateGroup,
    ) -> Outcome<TemplateGroup> {
        let diagnostics = update_preflight(plan, prior);
        if diagnostics.has_errors() {
            return Outcome::failed(diagnostics);
        }
        let group = TemplateGroup::from_plan(plan, Some(prior));
        let result = match A::update_request(&self.codec, &group) {
            Ok(request) => self.send(request, &group).await,
            Err(err) => Err(err),
        };
        conclude(TemplateGroupPlan::RESOURCE, "updating", result, diagnostics)
    }

    async fn delete(&self, prior: &TemplateGroup) -> Diagnostics {
        let result = self.remote.remove(&A::group_path(&prior.settings.group_id)).await;
        removed(TemplateGroupPlan::RESOURCE, result)
    }

    async fn import(&self, group_id: &str) -> Outcome<TemplateGroup> {
        imported(TemplateGroupPlan::RESOURCE, group_id, self.fetch(group_id).await)
    }
}
