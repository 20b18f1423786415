//! Default inner handler.
//!
//! Renders the resolved [`RequestContext`] as JSON after cache negotiation.
//! Downstream applications replace this with their own page handlers.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use uuid::Uuid;

use super::cache::{handle_cache, CacheInfo};
use super::server::AppState;
use crate::routing::{RenderTarget, RequestContext, SiteContext};

#[derive(Serialize)]
struct RenderedContent<'a> {
    route: &'a str,
    query: Vec<(String, String)>,
    site: &'a SiteContext,
    content: &'a RenderTarget,
    current_page: Option<Uuid>,
    current_post: Option<Uuid>,
}

pub async fn content_handler(State(state): State<AppState>, req: Request) -> Response {
    let Some(context) = req.extensions().get::<RequestContext>() else {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };
    let Some(target) = &context.target else {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };

    let inner = state.current();
    let expires = if target.is_draft() {
        0
    } else if target.is_post() {
        inner.config.cache.post_expires_secs
    } else {
        inner.config.cache.page_expires_secs
    };

    let mut response = Response::new(Body::empty());
    let info = CacheInfo::from_target(target, &context.site);
    if handle_cache(req.headers(), &mut response, &info, expires) {
        return response;
    }

    let rendered = RenderedContent {
        route: req.uri().path(),
        query: url::form_urlencoded::parse(req.uri().query().unwrap_or_default().as_bytes())
            .into_owned()
            .collect(),
        site: &context.site,
        content: target,
        current_page: context.current_page.as_ref().map(|p| p.id),
        current_post: context.current_post.as_ref().map(|p| p.id),
    };

    match serde_json::to_vec(&rendered) {
        Ok(body) => {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
            *response.body_mut() = Body::from(body);
            response
        }
        Err(e) => {
            tracing::error!(content_id = %info.id, error = %e, "Failed to serialize content");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
