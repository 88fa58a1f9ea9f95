//! Hosted page group wire formats
//!
//! The v3 service (`hostedpages-srv`) stores a group and its pages in one
//! document. The legacy service (`hosted-srv`) keeps a bare group record and
//! one record per page, read back page by page.

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use tenantform_domain::constants::DEFAULT_HOSTED_PAGE_LOCALE;
use tenantform_domain::{HostedPage, HostedPageGroup, ReconcileError, Result};

use super::{
    decode_envelope, decode_envelope_list, empty_as_none, encode_json, non_empty, segment,
    WireCodec,
};

// ============================================================================
// v3
// ============================================================================

pub const HPGROUP_PATH: &str = "/hostedpages-srv/hpgroup";

#[derive(Debug, Default, Clone, Copy)]
pub struct HostedPagesV3Codec;

impl HostedPagesV3Codec {
    pub fn group_path(&self, id: &str) -> String {
        format!("{HPGROUP_PATH}/{}", segment(id))
    }
}

impl WireCodec for HostedPagesV3Codec {
    type Entity = HostedPageGroup;

    fn encode(&self, group: &HostedPageGroup) -> Result<Vec<u8>> {
        encode_json(&GroupWire::from(group))
    }

    fn decode(&self, body: &[u8]) -> Result<HostedPageGroup> {
        decode_envelope::<GroupWire>(body).map(HostedPageGroup::from)
    }
}

#[serde_as]
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct GroupWire {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(rename = "_id")]
    id: String,
    #[serde(
        rename = "createdTime",
        deserialize_with = "empty_as_none",
        skip_serializing
    )]
    created_time: Option<String>,
    #[serde(
        rename = "updatedTime",
        deserialize_with = "empty_as_none",
        skip_serializing
    )]
    updated_time: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    default_locale: String,
    #[serde(
        rename = "groupOwner",
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    group_owner: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    hosted_pages: Vec<PageWire>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct PageWire {
    hosted_page_id: String,
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    locale: Option<String>,
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

impl From<&HostedPageGroup> for GroupWire {
    fn from(group: &HostedPageGroup) -> Self {
        Self {
            id: group.id.clone(),
            created_time: None,
            updated_time: None,
            default_locale: group.default_locale.clone(),
            group_owner: non_empty(&group.group_owner),
            hosted_pages: group
                .pages
                .iter()
                .map(|page| PageWire {
                    hosted_page_id: page.id.clone(),
                    locale: non_empty(&page.locale),
                    url: non_empty(&page.url),
                    content: non_empty(&page.content),
                })
                .collect(),
        }
    }
}

impl From<GroupWire> for HostedPageGroup {
    fn from(wire: GroupWire) -> Self {
        Self {
            id: wire.id,
            default_locale: wire.default_locale,
            group_owner: wire.group_owner,
            created_time: wire.created_time,
            updated_time: wire.updated_time,
            pages: wire
                .hosted_pages
                .into_iter()
                .map(|page| HostedPage {
                    id: page.hosted_page_id,
                    locale: page.locale,
                    url: page.url,
                    content: page.content,
                })
                .collect(),
        }
    }
}

// ============================================================================
// Legacy
// ============================================================================

pub const HOSTED_GROUP_PATH: &str = "/hosted-srv/hostedgroup";
pub const HOSTED_PAGE_PATH: &str = "/hosted-srv/hosted";
pub const AVAILABLE_PAGES_PATH: &str = "/hosted-srv/hosted/availablepages";
pub const PAGE_BY_LANGUAGE_PATH: &str = "/hosted-srv/hosted/bylang";

#[derive(Debug, Default, Clone, Copy)]
pub struct LegacyHostedPagesCodec;

#[derive(Debug, Serialize)]
struct GroupRecordWire<'a> {
    hosted_page_group: &'a str,
}

#[derive(Debug, Serialize)]
struct PageRecordWire<'a> {
    hosted_page_group: &'a str,
    hosted_page_id: &'a str,
    locale: &'a str,
    url: &'a str,
}

#[derive(Debug, Serialize)]
struct PageQueryWire<'a> {
    hosted_page_group: &'a str,
    hosted_page_id: &'a str,
    #[serde(rename = "acceptLanguage")]
    accept_language: &'a str,
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PageByLanguageWire {
    #[serde_as(as = "DefaultOnNull")]
    hosted_page_id: String,
    #[serde(deserialize_with = "empty_as_none")]
    url: Option<String>,
    #[serde(deserialize_with = "empty_as_none")]
    locale: Option<String>,
}

impl LegacyHostedPagesCodec {
    /// `DELETE` target; the legacy service addresses groups by query.
    pub fn group_delete_path(&self, id: &str) -> String {
        format!("{HOSTED_GROUP_PATH}?groupname={}", segment(id))
    }

    pub fn encode_group(&self, group: &HostedPageGroup) -> Result<Vec<u8>> {
        encode_json(&GroupRecordWire { hosted_page_group: &group.id })
    }

    /// Page record; pages without a locale are stored under the default locale.
    pub fn encode_page(&self, group_id: &str, page: &HostedPage) -> Result<Vec<u8>> {
        encode_json(&PageRecordWire {
            hosted_page_group: group_id,
            hosted_page_id: &page.id,
            locale: page
                .locale
                .as_deref()
                .filter(|locale| !locale.is_empty())
                .unwrap_or(DEFAULT_HOSTED_PAGE_LOCALE),
            url: page.url.as_deref().unwrap_or_default(),
        })
    }

    /// Page ids the tenant can host.
    pub fn decode_available_pages(&self, body: &[u8]) -> Result<Vec<String>> {
        decode_envelope_list(body)
    }

    pub fn encode_page_query(
        &self,
        group_id: &str,
        page_id: &str,
        accept_language: &str,
    ) -> Result<Vec<u8>> {
        encode_json(&PageQueryWire {
            hosted_page_group: group_id,
            hosted_page_id: page_id,
            accept_language,
        })
    }

    /// One page of a group; `None` when the group does not configure it.
    pub fn decode_page(&self, body: &[u8]) -> Result<Option<HostedPage>> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        let wire: PageByLanguageWire = match decode_envelope(body) {
            Ok(wire) => wire,
            Err(ReconcileError::Decode { field, .. }) if field == "data" => return Ok(None),
            Err(err) => return Err(err),
        };
        Ok(wire.url.map(|url| HostedPage {
            id: wire.hosted_page_id,
            locale: wire.locale,
            url: Some(url),
            content: None,
        }))
    }
}
