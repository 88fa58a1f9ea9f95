//! Hosted page group reconciler
//!
//! Groups are composite resources applied through the
//! [`CompositeOrchestrator`]. The v3 service stores the group and its pages
//! in one call, so there are no child steps; the legacy service needs one
//! call per page.

use async_trait::async_trait;
use tenantform_domain::constants::DEFAULT_HOSTED_PAGE_LOCALE;
use tenantform_domain::{
    Diagnostics, HostedPage, HostedPageGroup, HostedPageGroupPlan, Observed, Outcome, PlanSchema,
    Result,
};
use tracing::debug;

use super::{imported, observe, preflight, removed, update_preflight, Remote, ResourceReconciler};
use crate::codec::hosted_pages::{
    AVAILABLE_PAGES_PATH, HOSTED_GROUP_PATH, HOSTED_PAGE_PATH, HPGROUP_PATH,
    PAGE_BY_LANGUAGE_PATH,
};
use crate::codec::{HostedPagesV3Codec, LegacyHostedPagesCodec, WireCodec, WireRequest};
use crate::composite::{CompositeLayout, CompositeOrchestrator, CompositeStatus};

/// One hosted pages service: how groups are written, read and deleted.
#[async_trait]
pub trait HostedPagesBackend:
    CompositeLayout<Parent = HostedPageGroup, Child = HostedPage> + Default + 'static
{
    /// Current remote state of the group `known` describes.
    async fn fetch(
        &self,
        remote: &Remote,
        known: &HostedPageGroup,
    ) -> Result<Option<HostedPageGroup>>;

    fn delete_path(&self, group_id: &str) -> String;
}

// ============================================================================
// v3
// ============================================================================

#[derive(Debug, Default, Clone, Copy)]
pub struct HostedPagesV3 {
    codec: HostedPagesV3Codec,
}

impl CompositeLayout for HostedPagesV3 {
    type Parent = HostedPageGroup;
    type Child = HostedPage;

    const CHILD_KIND: &'static str = "Hosted page";

    fn parent_key<'a>(&self, parent: &'a HostedPageGroup) -> &'a str {
        &parent.id
    }

    fn child_key<'a>(&self, child: &'a HostedPage) -> &'a str {
        &child.id
    }

    fn parent_request(
        &self,
        parent: &HostedPageGroup,
        children: &[HostedPage],
    ) -> Result<WireRequest> {
        let group = HostedPageGroup { pages: children.to_vec(), ..parent.clone() };
        Ok(WireRequest::post(HPGROUP_PATH, self.codec.encode(&group)?))
    }

    fn parent_confirmed(
        &self,
        desired: &HostedPageGroup,
        children: &[HostedPage],
        body: &[u8],
    ) -> Result<(HostedPageGroup, Vec<HostedPage>)> {
        let mut confirmed = self.codec.decode(body)?;
        if confirmed.id.is_empty() {
            confirmed.id.clone_from(&desired.id);
        }
        if confirmed.default_locale.is_empty() {
            confirmed.default_locale.clone_from(&desired.default_locale);
        }
        if confirmed.group_owner.is_none() {
            confirmed.group_owner.clone_from(&desired.group_owner);
        }
        let pages = if confirmed.pages.is_empty() {
            children.to_vec()
        } else {
            std::mem::take(&mut confirmed.pages)
        };
        Ok((confirmed, pages))
    }

    fn child_request(&self, _: &HostedPageGroup, _: &HostedPage) -> Option<Result<WireRequest>> {
        None
    }
}

#[async_trait]
impl HostedPagesBackend for HostedPagesV3 {
    async fn fetch(
        &self,
        remote: &Remote,
        known: &HostedPageGroup,
    ) -> Result<Option<HostedPageGroup>> {
        match remote.fetch(&self.codec.group_path(&known.id)).await? {
            Some(body) => self.codec.decode(&body).map(Some),
            None => Ok(None),
        }
    }

    fn delete_path(&self, group_id: &str) -> String {
        self.codec.group_path(group_id)
    }
}

// ============================================================================
// Legacy
// ============================================================================

#[derive(Debug, Default, Clone, Copy)]
pub struct LegacyHostedPages {
    codec: LegacyHostedPagesCodec,
}

impl CompositeLayout for LegacyHostedPages {
    type Parent = HostedPageGroup;
    type Child = HostedPage;

    const CHILD_KIND: &'static str = "Hosted page";

    fn parent_key<'a>(&self, parent: &'a HostedPageGroup) -> &'a str {
        &parent.id
    }

    fn child_key<'a>(&self, child: &'a HostedPage) -> &'a str {
        &child.id
    }

    fn parent_request(&self, parent: &HostedPageGroup, _: &[HostedPage]) -> Result<WireRequest> {
        Ok(WireRequest::post(HOSTED_GROUP_PATH, self.codec.encode_group(parent)?))
    }

    /// The group record response carries nothing the state needs.
    fn parent_confirmed(
        &self,
        desired: &HostedPageGroup,
        children: &[HostedPage],
        _: &[u8],
    ) -> Result<(HostedPageGroup, Vec<HostedPage>)> {
        Ok((HostedPageGroup { pages: Vec::new(), ..desired.clone() }, children.to_vec()))
    }

    fn child_request(
        &self,
        parent: &HostedPageGroup,
        child: &HostedPage,
    ) -> Option<Result<WireRequest>> {
        let request = self
            .codec
            .encode_page(&parent.id, child)
            .map(|body| WireRequest::post(HOSTED_PAGE_PATH, body));
        Some(request)
    }
}

#[async_trait]
impl HostedPagesBackend for LegacyHostedPages {
    /// The legacy service has no group read. The group is reassembled from
    /// the page catalogue, one query per page id; it is never reported absent.
    async fn fetch(
        &self,
        remote: &Remote,
        known: &HostedPageGroup,
    ) -> Result<Option<HostedPageGroup>> {
        let page_ids = match remote.fetch(AVAILABLE_PAGES_PATH).await? {
            Some(body) => self.codec.decode_available_pages(&body)?,
            None => Vec::new(),
        };
        let language = if known.default_locale.is_empty() {
            DEFAULT_HOSTED_PAGE_LOCALE
        } else {
            known.default_locale.as_str()
        };

        let mut pages = Vec::new();
        for page_id in &page_ids {
            let query = self.codec.encode_page_query(&known.id, page_id, language)?;
            let body = match remote.send(WireRequest::post(PAGE_BY_LANGUAGE_PATH, query)).await {
                Ok(body) => body,
                Err(err) if err.is_not_found() => continue,
                Err(err) => return Err(err),
            };
            if let Some(mut page) = self.codec.decode_page(&body)? {
                if page.id.is_empty() {
                    page.id.clone_from(page_id);
                }
                pages.push(page);
            }
        }
        debug!(
            group = %known.id,
            available = page_ids.len(),
            configured = pages.len(),
            "legacy pages read"
        );

        Ok(Some(HostedPageGroup { pages: align_pages(pages, &known.pages), ..known.clone() }))
    }

    fn delete_path(&self, group_id: &str) -> String {
        self.codec.group_delete_path(group_id)
    }
}

/// Order observed pages like the known ones, unknown pages last. A page
/// stored under the fallback locale keeps an unset locale when it had none.
fn align_pages(mut observed: Vec<HostedPage>, known: &[HostedPage]) -> Vec<HostedPage> {
    let position = |id: &str| known.iter().position(|page| page.id == id).unwrap_or(usize::MAX);
    observed.sort_by_key(|page| position(&page.id));
    for page in &mut observed {
        let known_unset = known
            .iter()
            .find(|candidate| candidate.id == page.id)
            .is_some_and(|candidate| candidate.locale.is_none());
        if known_unset && page.locale.as_deref() == Some(DEFAULT_HOSTED_PAGE_LOCALE) {
            page.locale = None;
        }
    }
    observed
}

// ============================================================================
// Reconciler
// ============================================================================

pub struct HostedPageGroupReconciler<B: HostedPagesBackend> {
    orchestrator: CompositeOrchestrator<B>,
}

impl<B: HostedPagesBackend> HostedPageGroupReconciler<B> {
    pub fn new(remote: Remote) -> Self {
        Self { orchestrator: CompositeOrchestrator::new(remote, B::default()) }
    }

    async fn apply(
        &self,
        group: &HostedPageGroup,
        mut diagnostics: Diagnostics,
    ) -> Outcome<HostedPageGroup> {
        let result = self.orchestrator.apply(group, &group.pages).await;
        diagnostics.append(result.diagnostics);
        match (result.status, result.parent) {
            (CompositeStatus::Failed, _) | (_, None) => Outcome::failed(diagnostics),
            (_, Some(parent)) => {
                let state = HostedPageGroup { pages: result.children, ..parent };
                Outcome::with_diagnostics(state, diagnostics)
            }
        }
    }

    async fn fetch(&self, known: &HostedPageGroup) -> Result<Option<HostedPageGroup>> {
        self.orchestrator.layout().fetch(self.orchestrator.remote(), known).await
    }
}

#[async_trait]
impl<B: HostedPagesBackend> ResourceReconciler for HostedPageGroupReconciler<B> {
    type Plan = HostedPageGroupPlan;
    type State = HostedPageGroup;

    async fn create(&self, plan: &HostedPageGroupPlan) -> Outcome<HostedPageGroup> {
        let diagnostics = preflight(plan);
        if diagnostics.has_errors() {
            return Outcome::failed(diagnostics);
        }
        self.apply(&HostedPageGroup::from_plan(plan, None), diagnostics).await
    }

    async fn read(&self, prior: &HostedPageGroup) -> Outcome<Observed<HostedPageGroup>> {
        observe(HostedPageGroupPlan::RESOURCE, self.fetch(prior).await)
    }

    async fn update(
        &self,
        plan: &HostedPageGroupPlan,
        prior: &HostedPageGroup,
    ) -> Outcome<HostedPageGroup> {
        let diagnostics = update_preflight(plan, prior);
        if diagnostics.has_errors() {
            return Outcome::failed(diagnostics);
        }
        self.apply(&HostedPageGroup::from_plan(plan, Some(prior)), diagnostics).await
    }

    async fn delete(&self, prior: &HostedPageGroup) -> Diagnostics {
        let path = self.orchestrator.layout().delete_path(&prior.id);
        removed(HostedPageGroupPlan::RESOURCE, self.orchestrator.remote().remove(&path).await)
    }

    async fn import(&self, group_id: &str) -> Outcome<HostedPageGroup> {
        let known = HostedPageGroup { id: group_id.to_string(), ..HostedPageGroup::default() };
        imported(HostedPageGroupPlan::RESOURCE, group_id, self.fetch(&known).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned_pages_follow_declaration_order() {
        let known = vec![HostedPage::new("b", "u2"), HostedPage::new("a", "u1")];
        let observed = vec![
            HostedPage { locale: Some("en-us".into()), ..HostedPage::new("a", "u1") },
            HostedPage::new("z", "u9"),
            HostedPage { locale: Some("de".into()), ..HostedPage::new("b", "u2") },
        ];

        let aligned = align_pages(observed, &known);
        let ids: Vec<&str> = aligned.iter().map(|page| page.id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "z"]);
        assert_eq!(aligned[1].locale, None);
        assert_eq!(aligned[0].locale.as_deref(), Some("de"));
    }

    #[test]
    fn v3_has_no_child_steps() {
        let layout = HostedPagesV3::default();
        let group = HostedPageGroup { id: "g".into(), ..HostedPageGroup::default() };
        assert!(layout.child_request(&group, &HostedPage::new("login", "u")).is_none());
    }

    #[test]
    fn v3_falls_back_to_desired_pages_when_response_omits_them() {
        let layout = HostedPagesV3::default();
        let desired = HostedPageGroup { id: "g".into(), ..HostedPageGroup::default() };
        let children = vec![HostedPage::new("login", "u")];
        let (parent, pages) =
            layout.parent_confirmed(&desired, &children, br#"{"data":{"_id":""}}"#).unwrap();
        assert_eq!(parent.id, "g");
        assert_eq!(pages, children);
    }
}
