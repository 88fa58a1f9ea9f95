//! Platform facade
//!
//! Wires every reconciler and the lookups from one shared transport. The
//! hosted pages and template group reconcilers are picked from
//! [`ApiVersions`] once, at construction.

use std::sync::Arc;

use tenantform_core::{
    AppReconciler, HookReconciler, HostedPageGroupReconciler, HostedPagesV3, LegacyHostedPages,
    LegacyTemplatesApi, NotificationsApi, PasswordPolicyReconciler, PlatformLookups,
    PlatformTransport, RegistrationFieldReconciler, Remote, ResourceReconciler,
    TemplateGroupReconciler, TemplateReconciler,
};
use tenantform_domain::{
    ApiVersions, HostedPageGroup, HostedPageGroupPlan, HostedPagesApi, PlatformConfig, Result,
    TemplateGroup, TemplateGroupPlan, TemplateGroupsApi,
};
use tracing::info;

use crate::session::AuthenticatedSession;

/// Hosted page group reconciler for whichever wire version is configured.
pub type DynHostedPages =
    Arc<dyn ResourceReconciler<Plan = HostedPageGroupPlan, State = HostedPageGroup>>;

/// Template group reconciler for whichever wire version is configured.
pub type DynTemplateGroups =
    Arc<dyn ResourceReconciler<Plan = TemplateGroupPlan, State = TemplateGroup>>;

/// Every reconciler of one tenant, sharing one session.
pub struct Platform {
    apps: AppReconciler,
    hooks: HookReconciler,
    password_policies: PasswordPolicyReconciler,
    registration_fields: RegistrationFieldReconciler,
    templates: TemplateReconciler,
    hosted_pages: DynHostedPages,
    template_groups: DynTemplateGroups,
    lookups: PlatformLookups,
    api: ApiVersions,
}

impl Platform {
    /// Authenticate with `config` and wire the reconcilers.
    pub async fn connect(config: &PlatformConfig) -> Result<Self> {
        let session = AuthenticatedSession::authenticate(config).await?;
        Ok(Self::new(Arc::new(session), config.api))
    }

    /// Wire the reconcilers over an existing transport.
    pub fn new(transport: Arc<dyn PlatformTransport>, api: ApiVersions) -> Self {
        let remote = Remote::new(transport);

        let hosted_pages: DynHostedPages = match api.hosted_pages {
            HostedPagesApi::V3 => {
                Arc::new(HostedPageGroupReconciler::<HostedPagesV3>::new(remote.clone()))
            }
            HostedPagesApi::Legacy => {
                Arc::new(HostedPageGroupReconciler::<LegacyHostedPages>::new(remote.clone()))
            }
        };
        let template_groups: DynTemplateGroups = match api.template_groups {
            TemplateGroupsApi::Notifications => {
                Arc::new(TemplateGroupReconciler::<NotificationsApi>::new(remote.clone()))
            }
            TemplateGroupsApi::Legacy => {
                Arc::new(TemplateGroupReconciler::<LegacyTemplatesApi>::new(remote.clone()))
            }
        };
        info!(
            hosted_pages = %api.hosted_pages,
            template_groups = %api.template_groups,
            "platform reconcilers wired"
        );

        Self {
            apps: AppReconciler::new(remote.clone()),
            hooks: HookReconciler::new(remote.clone()),
            password_policies: PasswordPolicyReconciler::new(remote.clone()),
            registration_fields: RegistrationFieldReconciler::new(remote.clone()),
            templates: TemplateReconciler::new(remote.clone()),
            hosted_pages,
            template_groups,
            lookups: PlatformLookups::new(remote),
            api,
        }
    }

    pub fn api(&self) -> ApiVersions {
        self.api
    }

    pub fn apps(&self) -> &AppReconciler {
        &self.apps
    }

    pub fn hooks(&self) -> &HookReconciler {
        &self.hooks
    }

    pub fn password_policies(&self) -> &PasswordPolicyReconciler {
        &self.password_policies
    }

    pub fn registration_fields(&self) -> &RegistrationFieldReconciler {
        &self.registration_fields
    }

    pub fn templates(&self) -> &TemplateReconciler {
        &self.templates
    }

    pub fn hosted_pages(&self) -> &DynHostedPages {
        &self.hosted_pages
    }

    pub fn template_groups(&self) -> &DynTemplateGroups {
        &self.template_groups
    }

    pub fn lookups(&self) -> &PlatformLookups {
        &self.lookups
    }
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform").field("api", &self.api).finish_non_exhaustive()
    }
}
