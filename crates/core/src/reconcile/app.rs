//! App (OAuth client) reconciler

use async_trait::async_trait;
use tenantform_domain::{App, AppPlan, Diagnostics, Observed, Outcome, PlanSchema, Result};

use super::{
    conclude, imported, observe, preflight, removed, update_preflight, Remote, ResourceReconciler,
};
use crate::codec::{segment, AppCodec, WireCodec, WireRequest};
use crate::transport_ports::HttpMethod;

const CLIENTS_PATH: &str = "/apps-srv/clients";

pub struct AppReconciler {
    remote: Remote,
    codec: AppCodec,
}

impl AppReconciler {
    pub fn new(remote: Remote) -> Self {
        Self { remote, codec: AppCodec }
    }

    fn client_path(client_id: &str) -> String {
        format!("{CLIENTS_PATH}/{}", segment(client_id))
    }

    async fn upsert(&self, method: HttpMethod, app: &App) -> Result<App> {
        let request = WireRequest::with_body(method, CLIENTS_PATH, self.codec.encode(app)?);
        let body = self.remote.send(request).await?;
        Ok(carry_over(self.codec.decode(&body)?, app))
    }

    async fn fetch(&self, client_id: &str) -> Result<Option<App>> {
        match self.remote.fetch(&Self::client_path(client_id)).await? {
            Some(body) => self.codec.decode(&body).map(Some),
            None => Ok(None),
        }
    }
}

/// Computed attributes the response leaves empty keep the value that was sent.
fn carry_over(mut observed: App, sent: &App) -> App {
    fn keep(target: &mut String, known: &str) {
        if target.is_empty() {
            *target = known.to_string();
        }
    }
    keep(&mut observed.id, &sent.id);
    keep(&mut observed.client_id, &sent.client_id);
    keep(&mut observed.client_secret, &sent.client_secret);
    if observed.app_owner.is_none() {
        observed.app_owner.clone_from(&sent.app_owner);
    }
    if observed.bot_provider.is_none() {
        observed.bot_provider.clone_from(&sent.bot_provider);
    }
    if observed.app_key.is_none() {
        observed.app_key.clone_from(&sent.app_key);
    }
    observed
}

#[async_trait]
impl ResourceReconciler for AppReconciler {
    type Plan = AppPlan;
    type State = App;

    async fn create(&self, plan: &AppPlan) -> Outcome<App> {
        let diagnostics = preflight(plan);
        if diagnostics.has_errors() {
            return Outcome::failed(diagnostics);
        }
        let app = App::from_plan(plan, None);
        let result = self.upsert(HttpMethod::Post, &app).await;
        conclude(AppPlan::RESOURCE, "creating", result, diagnostics)
    }

    async fn read(&self, prior: &App) -> Outcome<Observed<App>> {
        let result = self
            .fetch(&prior.client_id)
            .await
            .map(|app| app.map(|app| carry_over(app, prior)));
        observe(AppPlan::RESOURCE, result)
    }

    async fn update(&self, plan: &AppPlan, prior: &App) -> Outcome<App> {
        let diagnostics = update_preflight(plan, prior);
        if diagnostics.has_errors() {
            return Outcome::failed(diagnostics);
        }
        let app = App::from_plan(plan, Some(prior));
        let result = self.upsert(HttpMethod::Put, &app).await;
        conclude(AppPlan::RESOURCE, "updating", result, diagnostics)
    }

    async fn delete(&self, prior: &App) -> Diagnostics {
        removed(AppPlan::RESOURCE, self.remote.remove(&Self::client_path(&prior.client_id)).await)
    }

    async fn import(&self, client_id: &str) -> Outcome<App> {
        imported(AppPlan::RESOURCE, client_id, self.fetch(client_id).await)
    }
}
