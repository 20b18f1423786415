//! Route rewriting.
//!
//! Turns the terminal content of a request into either a redirect or the
//! internal route + query the inner pipeline dispatches on.
//!
//! # Design Decisions
//! - Content redirects win over route construction
//! - Unconsumed segments are appended to page and post routes verbatim;
//!   archives consume them as filters instead
//! - The rewritten query always leads with `id`

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;

use super::archive::ArchiveFilter;
use super::query::RouteQuery;
use super::request::HANDLED_PARAM;
use crate::content::{Page, PageType, Post, RedirectType};

const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

pub const DEFAULT_PAGE_ROUTE: &str = "/page";
pub const DEFAULT_ARCHIVE_ROUTE: &str = "/archive";
pub const DEFAULT_POST_ROUTE: &str = "/post";

/// An HTTP redirect decided by routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Redirect {
    pub location: String,
    /// 301 when true, 302 otherwise.
    pub permanent: bool,
}

impl Redirect {
    pub fn new(location: impl Into<String>, redirect_type: RedirectType) -> Self {
        Self {
            location: location.into(),
            permanent: redirect_type.is_permanent(),
        }
    }
}

/// Internal route the request is rewritten to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewrittenRoute {
    pub path: String,
    pub query: RouteQuery,
}

impl RewrittenRoute {
    /// Path and query of the rewritten URI.
    ///
    /// The handled marker follows the route query, then the original query
    /// string of the request.
    pub fn path_and_query(&self, original_query: Option<&str>) -> String {
        let query = self.query.clone().with(HANDLED_PARAM, true).to_query_string();
        match original_query.filter(|q| !q.is_empty()) {
            Some(original) => format!("{}?{}&{}", self.path, query, original),
            None => format!("{}?{}", self.path, query),
        }
    }
}

/// Outcome of rewriting a piece of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rewrite {
    Redirect(Redirect),
    Route(RewrittenRoute),
}

/// Rewrite for a matched post.
pub fn rewrite_post(post: &Post, trailing: &[String]) -> Rewrite {
    if let Some(url) = post.redirect() {
        return Rewrite::Redirect(Redirect::new(url, post.redirect_type));
    }

    let base = post.route.as_deref().unwrap_or(DEFAULT_POST_ROUTE);
    Rewrite::Route(RewrittenRoute {
        path: append_segments(base, trailing),
        query: RouteQuery::new().with("id", post.id),
    })
}

/// Rewrite for a plain page, or an archive with archive routing disabled.
pub fn rewrite_page(page: &Page, page_type: &PageType, trailing: &[String]) -> Rewrite {
    if let Some(url) = page.redirect() {
        return Rewrite::Redirect(Redirect::new(url, page.redirect_type));
    }

    let default = if page_type.is_archive {
        DEFAULT_ARCHIVE_ROUTE
    } else {
        DEFAULT_PAGE_ROUTE
    };
    Rewrite::Route(RewrittenRoute {
        path: append_segments(&page_route(page, page_type, default), trailing),
        query: page_query(page),
    })
}

/// Rewrite for an archive page filtered by `filter`.
pub fn rewrite_archive(page: &Page, page_type: &PageType, filter: &ArchiveFilter) -> Rewrite {
    if let Some(url) = page.redirect() {
        return Rewrite::Redirect(Redirect::new(url, page.redirect_type));
    }

    Rewrite::Route(RewrittenRoute {
        path: page_route(page, page_type, DEFAULT_ARCHIVE_ROUTE),
        query: page_query(page).chain(filter.to_query()),
    })
}

fn page_route(page: &Page, page_type: &PageType, default: &str) -> String {
    page.route
        .as_deref()
        .or(page_type.route.as_deref())
        .unwrap_or(default)
        .to_string()
}

fn page_query(page: &Page) -> RouteQuery {
    let query = RouteQuery::new().with("id", page.id);
    if page.is_startpage() {
        query.with("startpage", true)
    } else {
        query
    }
}

fn append_segments(base: &str, trailing: &[String]) -> String {
    let mut path = base.trim_end_matches('/').to_string();
    for segment in trailing {
        path.push('/');
        path.extend(utf8_percent_encode(segment, SEGMENT));
    }
    if path.is_empty() {
        path.push('/');
    }
    path
}
