//! Routing middleware.
//!
//! Resolves every request before the inner router sees it, then either
//! answers directly (redirects, sitemap) or forwards the request with a
//! rewritten URI and the [`RequestContext`] attached as an extension.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{header, uri::PathAndQuery, HeaderMap, HeaderValue, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::request::RequestIdExt;
use super::server::{AppState, InnerState};
use crate::config::SitemapConfig;
use crate::observability::metrics;
use crate::routing::{Redirect, RequestContext, Resolution, RouteAction, RouteRequest, SiteContext};

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

pub async fn routing_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let inner = state.current();

    let host = request_host(&req);
    let route_request = RouteRequest::new(&host, req.uri().path(), req.uri().query());

    let resolution = match inner.resolver.resolve(&route_request).await {
        Ok(resolution) => resolution,
        Err(e) => {
            tracing::error!(
                request_id = %req.request_id(),
                path = %route_request.path,
                error = %e,
                "Routing failed"
            );
            metrics::record_routing_error();
            return (StatusCode::INTERNAL_SERVER_ERROR, "Routing failed").into_response();
        }
    };

    let outcome = resolution.action.outcome();
    tracing::debug!(
        request_id = %req.request_id(),
        host = %route_request.hostname,
        path = %route_request.path,
        outcome = outcome,
        "Request resolved"
    );

    let Resolution { action, context } = resolution;
    let response = match action {
        RouteAction::Bypass => next.run(req).await,
        RouteAction::PassThrough => {
            attach(&mut req, context);
            next.run(req).await
        }
        RouteAction::Redirect(redirect) => redirect_response(&redirect),
        RouteAction::Sitemap => match context {
            Some(context) => {
                let base_url =
                    sitemap_base_url(&inner.config.sitemap, req.headers(), req.uri(), &context.site);
                sitemap_response(&inner, &base_url, &context.site).await
            }
            None => StatusCode::NOT_FOUND.into_response(),
        },
        RouteAction::Rewrite(route) => {
            let target = route.path_and_query(req.uri().query());
            match rewrite_uri(req.uri(), &target) {
                Some(uri) => {
                    tracing::debug!(request_id = %req.request_id(), to = %uri, "Rewriting request");
                    *req.uri_mut() = uri;
                    attach(&mut req, context);
                    next.run(req).await
                }
                None => {
                    tracing::error!(
                        request_id = %req.request_id(),
                        target = %target,
                        "Rewritten route is not a valid URI"
                    );
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            }
        }
    };

    metrics::record_resolution(outcome, start);
    response
}

fn attach(req: &mut Request, context: Option<RequestContext>) {
    if let Some(context) = context {
        req.extensions_mut().insert(context);
    }
}

/// Host header, falling back to the URI authority for HTTP/2 requests.
fn request_host(req: &Request) -> String {
    req.headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| req.uri().authority().map(|a| a.as_str().to_string()))
        .unwrap_or_default()
}

fn rewrite_uri(original: &Uri, path_and_query: &str) -> Option<Uri> {
    let mut parts = original.clone().into_parts();
    parts.path_and_query = Some(path_and_query.parse::<PathAndQuery>().ok()?);
    Uri::from_parts(parts).ok()
}

fn redirect_response(redirect: &Redirect) -> Response {
    let status = if redirect.permanent {
        StatusCode::MOVED_PERMANENTLY
    } else {
        StatusCode::FOUND
    };
    match HeaderValue::from_str(&redirect.location) {
        Ok(location) => (status, [(header::LOCATION, location)]).into_response(),
        Err(e) => {
            tracing::error!(location = %redirect.location, error = %e, "Invalid redirect location");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn sitemap_response(inner: &InnerState, base_url: &str, site: &SiteContext) -> Response {
    match inner.sitemap.generate(&site.sitemap, base_url).await {
        Ok(xml) => (
            [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
            xml,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(site_id = %site.id, error = %e, "Sitemap generation failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Configured base URL, else scheme and authority of the request plus the site prefix.
pub fn sitemap_base_url(
    config: &SitemapConfig,
    headers: &HeaderMap,
    uri: &Uri,
    site: &SiteContext,
) -> String {
    if let Some(base) = &config.base_url {
        return base.trim_end_matches('/').to_string();
    }

    let scheme = headers
        .get(X_FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.scheme_str())
        .unwrap_or(config.default_scheme.as_str());
    let authority = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .unwrap_or(site.host.as_str());

    let mut base = format!("{}://{}", scheme, authority);
    if let Some(prefix) = &site.prefix {
        base.push('/');
        base.push_str(prefix);
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Site;
    use std::sync::Arc;

    fn site(prefix: Option<&str>) -> SiteContext {
        let site = Site {
            id: uuid::Uuid::new_v4(),
            title: "Site".into(),
            description: None,
            logo: None,
            hostnames: None,
            culture: None,
            is_default: true,
            content_last_modified: None,
        };
        SiteContext::new(&site, "example.com".into(), prefix.map(str::to_string), Arc::new(Vec::new()))
    }

    #[test]
    fn test_base_url_from_config() {
        let config = SitemapConfig {
            base_url: Some("https://cdn.example.com/".into()),
            ..Default::default()
        };
        let uri: Uri = "/sitemap.xml".parse().unwrap();
        assert_eq!(
            sitemap_base_url(&config, &HeaderMap::new(), &uri, &site(Some("en"))),
            "https://cdn.example.com"
        );
    }

    #[test]
    fn test_base_url_from_request() {
        let config = SitemapConfig::default();
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("www.example.com:8080"));
        headers.insert(X_FORWARDED_PROTO, HeaderValue::from_static("https"));
        let uri: Uri = "/en/sitemap.xml".parse().unwrap();
        assert_eq!(
            sitemap_base_url(&config, &headers, &uri, &site(Some("en"))),
            "https://www.example.com:8080/en"
        );
    }

    #[test]
    fn test_base_url_defaults() {
        let config = SitemapConfig::default();
        let uri: Uri = "/sitemap.xml".parse().unwrap();
        assert_eq!(
            sitemap_base_url(&config, &HeaderMap::new(), &uri, &site(None)),
            format!("{}://example.com", config.default_scheme)
        );
    }

    #[test]
    fn test_rewrite_uri_keeps_authority() {
        let original: Uri = "http://example.com/about?x=1".parse().unwrap();
        let uri = rewrite_uri(&original, "/page?id=1&piranha_handled=true").unwrap();
        assert_eq!(uri.authority().unwrap().as_str(), "example.com");
        assert_eq!(uri.path(), "/page");
        assert_eq!(uri.query(), Some("id=1&piranha_handled=true"));
    }

    #[test]
    fn test_redirect_status() {
        let permanent = redirect_response(&Redirect {
            location: "/new".into(),
            permanent: true,
        });
        assert_eq!(permanent.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(permanent.headers()[header::LOCATION], "/new");

        let temporary = redirect_response(&Redirect {
            location: "/new".into(),
            permanent: false,
        });
        assert_eq!(temporary.status(), StatusCode::FOUND);
    }
}
