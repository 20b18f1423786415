//! Request resolution pipeline.
//!
//! # Data Flow
//! ```text
//! RouteRequest
//!     → exclusions (manager, already handled)      → Bypass
//!     → site.rs (prefix, hostname, default)        → Bypass if no site
//!     → sitemap path                                → Sitemap
//!     → alias.rs                                    → Redirect
//!     → locator.rs (page, then post)               → PassThrough if nothing / unpublished
//!     → archive.rs (archive pages without post)
//!     → rewrite.rs                                  → Redirect | Rewrite
//! ```

use chrono::{Datelike, Utc};
use serde::Serialize;

use super::archive::parse_archive;
use super::context::{RenderTarget, RequestContext, SiteContext};
use super::locator::{locate_page, locate_post};
use super::request::RouteRequest;
use super::rewrite::{rewrite_archive, rewrite_page, rewrite_post, Redirect, Rewrite, RewrittenRoute};
use super::site::resolve_site;
use super::alias::resolve_alias;
use crate::config::RoutingConfig;
use crate::store::{Api, StoreError};

const SITEMAP_SEGMENT: &str = "sitemap.xml";

/// Errors that abort routing. Not-found is never one of them.
#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("content lookup failed: {0}")]
    Store(#[from] StoreError),
}

/// What the HTTP layer should do with the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum RouteAction {
    /// Routing skipped entirely; no context is attached.
    Bypass,
    /// Continue unmodified, with whatever context was resolved.
    PassThrough,
    Redirect(Redirect),
    Rewrite(RewrittenRoute),
    /// Answer with the XML sitemap of the resolved site.
    Sitemap,
}

impl RouteAction {
    /// Label used for logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            RouteAction::Bypass => "bypass",
            RouteAction::PassThrough => "pass_through",
            RouteAction::Redirect(_) => "redirect",
            RouteAction::Rewrite(_) => "rewrite",
            RouteAction::Sitemap => "sitemap",
        }
    }
}

/// Result of resolving one request.
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    pub action: RouteAction,
    pub context: Option<RequestContext>,
}

impl Resolution {
    pub fn bypass() -> Self {
        Self {
            action: RouteAction::Bypass,
            context: None,
        }
    }

    fn with(action: RouteAction, context: RequestContext) -> Self {
        Self {
            action,
            context: Some(context),
        }
    }

    fn pass_through(context: RequestContext) -> Self {
        Self::with(RouteAction::PassThrough, context)
    }
}

/// Resolves requests against sites, aliases, pages and posts.
#[derive(Clone)]
pub struct Resolver {
    api: Api,
    options: RoutingConfig,
}

impl Resolver {
    pub fn new(api: Api, options: RoutingConfig) -> Self {
        Self { api, options }
    }

    pub fn api(&self) -> &Api {
        &self.api
    }

    pub fn options(&self) -> &RoutingConfig {
        &self.options
    }

    /// Resolve `request`, using the current year for archive filters.
    pub async fn resolve(&self, request: &RouteRequest) -> Result<Resolution, RoutingError> {
        self.resolve_with_year(request, Utc::now().year()).await
    }

    /// Resolve `request`; archive years are clamped to `current_year`.
    pub async fn resolve_with_year(
        &self,
        request: &RouteRequest,
        current_year: i32,
    ) -> Result<Resolution, RoutingError> {
        if request.is_excluded() {
            return Ok(Resolution::bypass());
        }

        let segments = request.segments();
        let Some(matched) = resolve_site(
            self.api.sites.as_ref(),
            self.options.use_site_routing,
            &request.hostname,
            &segments,
        )
        .await?
        else {
            tracing::debug!(hostname = %request.hostname, "No site configured, routing skipped");
            return Ok(Resolution::bypass());
        };

        let site_id = matched.site.id;
        let sitemap = self.api.sites.get_sitemap(site_id).await?.unwrap_or_default();
        let mut context = RequestContext::new(SiteContext::new(
            &matched.site,
            matched.hostname.clone(),
            matched.prefix.clone(),
            sitemap,
        ));

        let mut pos = matched.consumed();
        let remaining = &segments[pos..];

        if self.options.use_sitemap_routing
            && remaining.len() == 1
            && remaining[0].eq_ignore_ascii_case(SITEMAP_SEGMENT)
        {
            return Ok(Resolution::with(RouteAction::Sitemap, context));
        }

        if self.options.use_alias_routing {
            if let Some(alias) = resolve_alias(self.api.aliases.as_ref(), site_id, remaining).await? {
                let redirect = Redirect::new(alias.redirect_url, alias.redirect_type);
                return Ok(Resolution::with(RouteAction::Redirect(redirect), context));
            }
        }

        if !self.options.use_page_routing {
            return Ok(Resolution::pass_through(context));
        }

        let draft = request.is_draft();
        let Some(located) = locate_page(
            self.api.pages.as_ref(),
            site_id,
            remaining,
            self.options.use_startpage_routing,
        )
        .await?
        else {
            return Ok(Resolution::pass_through(context));
        };
        pos += located.consumed;
        let page = located.page;

        if !page.is_published() && !draft {
            tracing::debug!(page_id = %page.id, "Unpublished page requested without draft flag");
            return Ok(Resolution::pass_through(context));
        }
        if page.is_published() {
            context.current_page = Some(page.clone());
        }

        let page_type = self.api.page_types.resolve(&page.type_id).clone();

        let mut post = None;
        if page_type.is_archive && self.options.use_post_routing && pos < segments.len() {
            if let Some(found) = locate_post(self.api.posts.as_ref(), page.id, &segments[pos]).await? {
                if !found.is_published() && !draft {
                    tracing::debug!(post_id = %found.id, "Unpublished post requested without draft flag");
                    return Ok(Resolution::pass_through(context));
                }
                pos += 1;
                if found.is_published() {
                    context.current_post = Some(found.clone());
                }
                post = Some(found);
            }
        }

        let trailing = &segments[pos..];
        let (rewrite, target) = match post {
            Some(post) => {
                let rewrite = rewrite_post(&post, trailing);
                let draft = !post.is_published() || !page.is_published();
                (rewrite, RenderTarget::Post { post, archive: page, draft })
            }
            None if page_type.is_archive && self.options.use_archive_routing => {
                let filter =
                    parse_archive(self.api.taxonomies.as_ref(), page.id, trailing, current_year)
                        .await?;
                let rewrite = rewrite_archive(&page, &page_type, &filter);
                let draft = !page.is_published();
                (rewrite, RenderTarget::Archive { page, page_type, draft })
            }
            None => {
                let rewrite = rewrite_page(&page, &page_type, trailing);
                let draft = !page.is_published();
                (rewrite, RenderTarget::Page { page, page_type, draft })
            }
        };

        let action = match rewrite {
            Rewrite::Redirect(redirect) => RouteAction::Redirect(redirect),
            Rewrite::Route(route) => {
                context.target = Some(target);
                RouteAction::Rewrite(route)
            }
        };
        tracing::debug!(
            site_id = %site_id,
            path = %request.path,
            outcome = action.outcome(),
            "Request resolved"
        );
        Ok(Resolution::with(action, context))
    }
}
