//! Registration field reconciler
//!
//! Every upsert sends the complete derived record; the plan only carries
//! primary attributes.

use async_trait::async_trait;
use tenantform_domain::{
    Diagnostics, Observed, Outcome, PlanSchema, RegistrationField, RegistrationFieldInput,
    RegistrationFieldPlan, Result,
};

use super::{
    conclude, imported, observe, preflight, removed, update_preflight, Remote, ResourceReconciler,
};
use crate::codec::{segment, RegistrationFieldCodec, WireRequest};
use crate::derivation::FieldDerivationEngine;

const FIELDS_PATH: &str = "/registration-setup-srv/fields";

pub struct RegistrationFieldReconciler {
    remote: Remote,
    codec: RegistrationFieldCodec,
    engine: FieldDerivationEngine,
}

impl RegistrationFieldReconciler {
    pub fn new(remote: Remote) -> Self {
        Self { remote, codec: RegistrationFieldCodec, engine: FieldDerivationEngine::new() }
    }

    async fn upsert(&self, input: RegistrationFieldInput) -> Result<RegistrationField> {
        let complete = self.engine.derive(&input)?;
        let request = WireRequest::post(FIELDS_PATH, self.codec.encode(&complete)?);
        let body = self.remote.send(request).await?;
        let id = self.codec.decode_upsert_id(&body)?;
        Ok(RegistrationField {
            id: if id.is_empty() { input.id.unwrap_or_default() } else { id },
            settings: input.settings,
        })
    }

    async fn fetch(&self, field_key: &str) -> Result<Option<RegistrationField>> {
        let path = format!("{FIELDS_PATH}/flat/field/{}", segment(field_key));
        match self.remote.fetch(&path).await? {
            Some(body) => self.codec.decode(&body).map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ResourceReconciler for RegistrationFieldReconciler {
    type Plan = RegistrationFieldPlan;
    type State = RegistrationField;

    async fn create(&self, plan: &RegistrationFieldPlan) -> Outcome<RegistrationField> {
        let diagnostics = preflight(plan);
        if diagnostics.has_errors() {
            return Outcome::failed(diagnostics);
        }
        let result = self.upsert(RegistrationFieldInput::from_plan(plan, None)).await;
        conclude(RegistrationFieldPlan::RESOURCE, "creating", result, diagnostics)
    }

    async fn read(&self, prior: &RegistrationField) -> Outcome<Observed<RegistrationField>> {
        let result = self.fetch(&prior.settings.field_key).await.map(|field| {
            field.map(|mut field| {
                if field.id.is_empty() {
                    field.id.clone_from(&prior.id);
                }
                field
            })
        });
        observe(RegistrationFieldPlan::RESOURCE, result)
    }

    async fn update(
        &self,
        plan: &RegistrationFieldPlan,
        prior: &RegistrationField,
    ) -> Outcome<RegistrationField> {
        let diagnostics = update_preflight(plan, prior);
        if diagnostics.has_errors() {
            return Outcome::failed(diagnostics);
        }
        let result = self.upsert(RegistrationFieldInput::from_plan(plan, Some(prior))).await;
        conclude(RegistrationFieldPlan::RESOURCE, "updating", result, diagnostics)
    }

    async fn delete(&self, prior: &RegistrationField) -> Diagnostics {
        let path = format!("{FIELDS_PATH}/{}", segment(&prior.settings.field_key));
        removed(RegistrationFieldPlan::RESOURCE, self.remote.remove(&path).await)
    }

    async fn import(&self, field_key: &str) -> Outcome<RegistrationField> {
        imported(RegistrationFieldPlan::RESOURCE, field_key, self.fetch(field_key).await)
    }
}
