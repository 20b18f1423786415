//! Conditional request handling.
//!
//! # Responsibilities
//! - Derive `ETag` and `Last-Modified` from content metadata
//! - Attach `Cache-Control` for cacheable content, `no-cache` otherwise
//! - Decide whether the client copy is still fresh (304)
//!
//! # Design Decisions
//! - The ETag covers the later of the content and site timestamps, so a
//!   site-wide change invalidates every page of the site
//! - Timestamps are compared at second precision, matching the header format

use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::Response;
use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use uuid::Uuid;

use crate::observability::metrics;
use crate::routing::{RenderTarget, SiteContext};

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";
const ETAG_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Metadata the negotiator needs about one piece of content.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheInfo {
    pub id: Uuid,
    pub published: Option<DateTime<Utc>>,
    pub last_modified: DateTime<Utc>,
    pub site_last_modified: Option<DateTime<Utc>>,
}

impl CacheInfo {
    pub fn from_target(target: &RenderTarget, site: &SiteContext) -> Self {
        Self {
            id: target.content_id(),
            published: target.published(),
            last_modified: target.last_modified(),
            site_last_modified: site.content_last_modified,
        }
    }

    /// The later of the content and site modification times.
    pub fn effective_last_modified(&self) -> DateTime<Utc> {
        match self.site_last_modified {
            Some(site) if site > self.last_modified => site,
            _ => self.last_modified,
        }
    }

    fn is_published(&self) -> bool {
        self.published.is_some_and(|p| p <= Utc::now())
    }
}

/// Quoted hex MD5 of the content id and its last modification.
pub fn generate_etag(id: Uuid, last_modified: DateTime<Utc>) -> String {
    let mut hasher = Md5::new();
    hasher.update(id.to_string().as_bytes());
    hasher.update(last_modified.format(ETAG_DATE_FORMAT).to_string().as_bytes());
    format!("\"{}\"", hex::encode(hasher.finalize()))
}

pub fn format_http_date(date: DateTime<Utc>) -> String {
    date.format(HTTP_DATE_FORMAT).to_string()
}

pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Whether the conditional headers in `headers` match `etag` / `last_modified`.
pub fn is_cached(headers: &HeaderMap, etag: &str, last_modified: DateTime<Utc>) -> bool {
    let if_none_match = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok());
    let if_modified_since = headers
        .get(header::IF_MODIFIED_SINCE)
        .and_then(|v| v.to_str().ok());

    match (if_none_match, if_modified_since) {
        (None, None) => false,
        (Some(tags), since) => {
            etag_matches(tags, etag) && since.map_or(true, |s| not_modified_since(s, last_modified))
        }
        (None, Some(since)) => not_modified_since(since, last_modified),
    }
}

fn etag_matches(header_value: &str, etag: &str) -> bool {
    header_value.split(',').map(str::trim).any(|tag| {
        let tag = tag.strip_prefix("W/").unwrap_or(tag);
        tag == "*" || tag == etag
    })
}

fn not_modified_since(since: &str, last_modified: DateTime<Utc>) -> bool {
    parse_http_date(since).is_some_and(|since| since.timestamp() >= last_modified.timestamp())
}

/// Attach cache headers to `response` and answer 304 when the client is fresh.
///
/// Returns `true` when the caller must stop and send `response` without a body.
/// Content that was never published, or an `expires` of zero, gets
/// `Cache-Control: no-cache` and always returns `false`.
pub fn handle_cache(
    request_headers: &HeaderMap,
    response: &mut Response,
    info: &CacheInfo,
    expires: u64,
) -> bool {
    if expires == 0 || !info.is_published() {
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        return false;
    }

    let last_modified = info.effective_last_modified();
    let etag = generate_etag(info.id, last_modified);

    let headers = response.headers_mut();
    set_header(headers, header::CACHE_CONTROL, format!("public, max-age={}", expires));
    set_header(headers, header::ETAG, etag.clone());
    set_header(headers, header::LAST_MODIFIED, format_http_date(last_modified));

    if is_cached(request_headers, &etag, last_modified) {
        *response.status_mut() = StatusCode::NOT_MODIFIED;
        metrics::record_not_modified();
        tracing::debug!(content_id = %info.id, etag = %etag, "Client cache is fresh");
        return true;
    }
    false
}

fn set_header(headers: &mut HeaderMap, name: HeaderName, value: String) {
    match HeaderValue::from_str(&value) {
        Ok(v) => {
            headers.insert(name, v);
        }
        Err(e) => tracing::warn!(header = %name, error = %e, "Skipping invalid header value"),
    }
}
