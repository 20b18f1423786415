//! Routing view of an inbound request.

use percent_encoding::percent_decode_str;

/// Query parameter marking a request as already handled by earlier middleware.
pub const HANDLED_PARAM: &str = "piranha_handled";

/// Query parameter requesting unpublished content.
pub const DRAFT_PARAM: &str = "draft";

const MANAGER_PATH: &str = "/manager";

/// Host, path and query of a request, as seen by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    /// Host name without port, lowercase.
    pub hostname: String,
    pub path: String,
    /// Raw query string without the leading `?`.
    pub query: Option<String>,
}

impl RouteRequest {
    pub fn new(host: &str, path: &str, query: Option<&str>) -> Self {
        Self {
            hostname: strip_port(host).to_lowercase(),
            path: path.to_string(),
            query: query.filter(|q| !q.is_empty()).map(str::to_string),
        }
    }

    /// Build from an absolute URL.
    pub fn from_url(url: &url::Url) -> Self {
        Self::new(url.host_str().unwrap_or_default(), url.path(), url.query())
    }

    /// Decoded, non-empty path segments.
    pub fn segments(&self) -> Vec<String> {
        self.path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| percent_decode_str(s).decode_utf8_lossy().into_owned())
            .collect()
    }

    /// Requests for the manager or already handled by earlier middleware.
    pub fn is_excluded(&self) -> bool {
        let path = self.path.to_lowercase();
        let manager = path == MANAGER_PATH || path.starts_with("/manager/");
        manager || self.flag(HANDLED_PARAM)
    }

    pub fn is_draft(&self) -> bool {
        self.flag(DRAFT_PARAM)
    }

    fn flag(&self, name: &str) -> bool {
        let Some(query) = &self.query else {
            return false;
        };
        url::form_urlencoded::parse(query.as_bytes())
            .any(|(k, v)| k == name && v.eq_ignore_ascii_case("true"))
    }
}

fn strip_port(host: &str) -> &str {
    // Bracketed IPv6 literals keep their colons
    if let Some(end) = host.find(']') {
        return &host[..=end];
    }
    host.split(':').next().unwrap_or(host)
}
