//! Hosted page groups
//!
//! A group is one logical resource backed by a group record plus one record
//! per page. Pages keep the order they were declared in.

use serde::{Deserialize, Serialize};

use crate::constants::HOSTED_PAGE_IDS;
use crate::diagnostics::Diagnostics;
use crate::schema::{AttributeRule, PlanSchema};
use crate::validation::{length_at_least, unique};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostedPage {
    /// Page identifier, e.g. `login`.
    pub id: String,
    pub locale: Option<String>,
    pub url: Option<String>,
    pub content: Option<String>,
}

impl HostedPage {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self { id: id.into(), url: Some(url.into()), ..Self::default() }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostedPageGroupPlan {
    /// Group name; also the platform identifier.
    pub id: String,
    pub default_locale: String,
    pub group_owner: Option<String>,
    pub pages: Vec<HostedPage>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostedPageGroup {
    pub id: String,
    pub default_locale: String,
    pub group_owner: Option<String>,
    pub created_time: Option<String>,
    pub updated_time: Option<String>,
    pub pages: Vec<HostedPage>,
}

impl HostedPageGroup {
    pub fn from_plan(plan: &HostedPageGroupPlan, prior: Option<&HostedPageGroup>) -> Self {
        Self {
            id: plan.id.clone(),
            default_locale: plan.default_locale.clone(),
            group_owner: plan
                .group_owner
                .clone()
                .or_else(|| prior.and_then(|p| p.group_owner.clone())),
            created_time: prior.and_then(|p| p.created_time.clone()),
            updated_time: prior.and_then(|p| p.updated_time.clone()),
            pages: plan.pages.clone(),
        }
    }

    pub fn page(&self, id: &str) -> Option<&HostedPage> {
        self.pages.iter().find(|page| page.id == id)
    }

    pub fn page_ids(&self) -> Vec<&str> {
        self.pages.iter().map(|page| page.id.as_str()).collect()
    }
}

fn group_id(plan: &HostedPageGroupPlan) -> Result<(), String> {
    length_at_least(&plan.id, 1)
}

fn default_locale(plan: &HostedPageGroupPlan) -> Result<(), String> {
    length_at_least(&plan.default_locale, 1)
}

fn pages(plan: &HostedPageGroupPlan) -> Result<(), String> {
    if let Some(page) = plan.pages.iter().find(|page| page.id.is_empty()) {
        return Err(format!("page with url {:?} has an empty id", page.url));
    }
    unique(plan.pages.iter().map(|page| page.id.as_str()))
}

static HOSTED_PAGE_GROUP_RULES: &[AttributeRule<HostedPageGroupPlan>] = &[
    AttributeRule::replace_on_change("id", group_id),
    AttributeRule::computed("created_time"),
    AttributeRule::computed("updated_time"),
    AttributeRule::mutable("default_locale", default_locale),
    AttributeRule::mutable("pages", pages),
];

impl PlanSchema for HostedPageGroupPlan {
    type State = HostedPageGroup;
    const RESOURCE: &'static str = "hosted_page_group";

    fn attribute_rules() -> &'static [AttributeRule<Self>] {
        HOSTED_PAGE_GROUP_RULES
    }

    fn replacement_triggers(&self, prior: &HostedPageGroup) -> Vec<&'static str> {
        if self.id == prior.id {
            Vec::new()
        } else {
            vec!["id"]
        }
    }

    fn warnings(&self) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        for page in &self.pages {
            if !page.id.is_empty() && !HOSTED_PAGE_IDS.contains(&page.id.as_str()) {
                diagnostics.add_warning(
                    format!("Unknown hosted page `{}`", page.id),
                    "The platform may reject or ignore pages outside its catalogue.",
                );
            }
        }
        diagnostics
    }
}
