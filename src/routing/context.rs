//! Request-scoped routing results.
//!
//! A [`RequestContext`] is created for every routed request and attached to
//! the request extensions. It is owned by that request only; the sitemap it
//! references is shared read-only.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::content::{Page, PageType, Post, Site, Sitemap};

/// The site a request was resolved to.
#[derive(Debug, Clone, Serialize)]
pub struct SiteContext {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub logo: Option<String>,
    /// Culture to render with; threaded explicitly instead of set globally.
    pub culture: Option<String>,
    /// Hostname the site was matched on (without prefix).
    pub host: String,
    /// Path prefix consumed from the URL, if the site is prefixed.
    pub prefix: Option<String>,
    pub content_last_modified: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub sitemap: Arc<Sitemap>,
}

impl SiteContext {
    pub fn new(site: &Site, host: String, prefix: Option<String>, sitemap: Arc<Sitemap>) -> Self {
        Self {
            id: site.id,
            title: site.title.clone(),
            description: site.description.clone(),
            logo: site.logo.clone(),
            culture: site.culture.clone(),
            host,
            prefix,
            content_last_modified: site.content_last_modified,
            sitemap,
        }
    }
}

/// Content resolved for rendering by the inner pipeline.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RenderTarget {
    Page {
        page: Page,
        page_type: PageType,
        /// Resolved through `?draft=true`.
        draft: bool,
    },
    Archive {
        page: Page,
        page_type: PageType,
        draft: bool,
    },
    Post {
        post: Post,
        archive: Page,
        draft: bool,
    },
}

impl RenderTarget {
    pub fn content_id(&self) -> Uuid {
        match self {
            RenderTarget::Page { page, .. } | RenderTarget::Archive { page, .. } => page.id,
            RenderTarget::Post { post, .. } => post.id,
        }
    }

    pub fn is_post(&self) -> bool {
        matches!(self, RenderTarget::Post { .. })
    }

    pub fn is_draft(&self) -> bool {
        match self {
            RenderTarget::Page { draft, .. }
            | RenderTarget::Archive { draft, .. }
            | RenderTarget::Post { draft, .. } => *draft,
        }
    }

    pub fn published(&self) -> Option<DateTime<Utc>> {
        match self {
            RenderTarget::Page { page, .. } | RenderTarget::Archive { page, .. } => {
                page.published
            }
            RenderTarget::Post { post, .. } => post.published,
        }
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        match self {
            RenderTarget::Page { page, .. } | RenderTarget::Archive { page, .. } => {
                page.last_modified
            }
            RenderTarget::Post { post, .. } => post.last_modified,
        }
    }
}

/// Per-request routing context handed to the inner pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    pub site: SiteContext,
    /// Published page only; drafts never land here.
    pub current_page: Option<Page>,
    /// Published post only.
    pub current_post: Option<Post>,
    /// What the inner pipeline should render, drafts included.
    pub target: Option<RenderTarget>,
}

impl RequestContext {
    pub fn new(site: SiteContext) -> Self {
        Self {
            site,
            current_page: None,
            current_post: None,
            target: None,
        }
    }
}
