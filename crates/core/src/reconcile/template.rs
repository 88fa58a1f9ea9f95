//! Notification template reconciler
//!
//! A template is addressed by its composite key. Create and update are the
//! same upsert.

use async_trait::async_trait;
use tenantform_domain::{
    Diagnostics, Observed, Outcome, PlanSchema, ReconcileError, Result, Template, TemplateKey,
    TemplatePlan,
};

use super::{
    conclude, imported, observe, preflight, removed, update_preflight, Remote, ResourceReconciler,
};
use crate::codec::{TemplateCodec, WireCodec, WireRequest};

pub struct TemplateReconciler {
    remote: Remote,
    codec: TemplateCodec,
}

impl TemplateReconciler {
    pub fn new(remote: Remote) -> Self {
        Self { remote, codec: TemplateCodec }
    }

    async fn upsert(&self, template: &Template) -> Result<Template> {
        let request =
            WireRequest::post(self.codec.path(template.key()), self.codec.encode(template)?);
        let body = self.remote.send(request).await?;
        let mut observed = self.codec.decode(&body)?;
        fill_identity(&mut observed, template);
        Ok(observed)
    }

    async fn fetch(&self, key: &TemplateKey) -> Result<Option<Template>> {
        match self.remote.fetch(&self.codec.path(key)).await? {
            Some(body) => self.codec.decode(&body).map(Some),
            None => Ok(None),
        }
    }
}

/// Identity parts and ids the platform leaves empty keep the known values.
fn fill_identity(observed: &mut Template, known: &Template) {
    fn keep(target: &mut String, value: &str) {
        if target.is_empty() {
            *target = value.to_string();
        }
    }
    let key = &mut observed.settings.key;
    keep(&mut key.group_id, &known.settings.key.group_id);
    keep(&mut key.template_key, &known.settings.key.template_key);
    keep(&mut key.communication_method, &known.settings.key.communication_method);
    keep(&mut key.locale, &known.settings.key.locale);
    if observed.id.is_none() {
        observed.id.clone_from(&known.id);
    }
    if observed.last_seeded_by.is_none() {
        observed.last_seeded_by.clone_from(&known.last_seeded_by);
    }
}

#[async_trait]
impl ResourceReconciler for TemplateReconciler {
    type Plan = TemplatePlan;
    type State = Template;

    async fn create(&self, plan: &TemplatePlan) -> Outcome<Template> {
        let diagnostics = preflight(plan);
        if diagnostics.has_errors() {
            return Outcome::failed(diagnostics);
        }
        let result = self.upsert(&Template::from_plan(plan, None)).await;
        conclude(TemplatePlan::RESOURCE, "creating", result, diagnostics)
    }

    async fn read(&self, prior: &Template) -> Outcome<Observed<Template>> {
        let result = self.fetch(prior.key()).await.map(|template| {
            template.map(|mut template| {
                fill_identity(&mut template, prior);
                template
            })
        });
        observe(TemplatePlan::RESOURCE, result)
    }

    async fn update(&self, plan: &TemplatePlan, prior: &Template) -> Outcome<Template> {
        let diagnostics = update_preflight(plan, prior);
        if diagnostics.has_errors() {
            return Outcome::failed(diagnostics);
        }
        let result = self.upsert(&Template::from_plan(plan, Some(prior))).await;
        conclude(TemplatePlan::RESOURCE, "updating", result, diagnostics)
    }

    async fn delete(&self, prior: &Template) -> Diagnostics {
        let result = self.remote.remove(&self.codec.path(prior.key())).await;
        removed(TemplatePlan::RESOURCE, result)
    }

    /// `external_id` is `group:key:method:locale`.
    async fn import(&self, external_id: &str) -> Outcome<Template> {
        let key = match TemplateKey::parse(external_id) {
            Ok(key) => key,
            Err(message) => {
                let result = Err(ReconcileError::Validation(message));
                return imported(TemplatePlan::RESOURCE, external_id, result);
            }
        };
        let known = Template {
            settings: TemplatePlan { key, ..TemplatePlan::default() },
            ..Template::default()
        };
        let result = self.fetch(known.key()).await.map(|template| {
            template.map(|mut template| {
                fill_identity(&mut template, &known);
                template
            })
        });
        imported(TemplatePlan::RESOURCE, external_id, result)
    }
}
