//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum app: routing middleware in front of the inner router
//! - Wire up middleware (timeout, request ID, tracing)
//! - Bind server to listener
//! - Swap routing state when the config file changes
//! - Graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    extract::Request,
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::Layer;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use super::handler::content_handler;
use super::middleware::routing_middleware;
use super::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::config::RouterConfig;
use crate::routing::rewrite::{DEFAULT_ARCHIVE_ROUTE, DEFAULT_PAGE_ROUTE, DEFAULT_POST_ROUTE};
use crate::routing::Resolver;
use crate::sitemap::{SitemapGenerator, SitemapHook};
use crate::store::Api;

/// State derived from one configuration generation.
pub struct InnerState {
    pub config: RouterConfig,
    pub resolver: Resolver,
    pub sitemap: SitemapGenerator,
}

impl InnerState {
    fn build(config: RouterConfig, api: &Api, hook: Option<&SitemapHook>) -> Self {
        let resolver = Resolver::new(api.clone(), config.routing.clone());
        let mut sitemap = SitemapGenerator::new(api.posts.clone(), api.page_types.clone());
        if let Some(hook) = hook {
            sitemap = sitemap.with_hook(hook.clone());
        }
        Self {
            config,
            resolver,
            sitemap,
        }
    }
}

/// Application state injected into middleware and handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<ArcSwap<InnerState>>,
    api: Api,
    hook: Option<SitemapHook>,
}

impl AppState {
    pub fn new(config: RouterConfig, api: Api, hook: Option<SitemapHook>) -> Self {
        let inner = InnerState::build(config, &api, hook.as_ref());
        Self {
            inner: Arc::new(ArcSwap::from_pointee(inner)),
            api,
            hook,
        }
    }

    /// Snapshot of the current generation.
    pub fn current(&self) -> Arc<InnerState> {
        self.inner.load_full()
    }

    /// Replace routing and cache settings; in-flight requests keep their snapshot.
    pub fn reload(&self, config: RouterConfig) {
        let inner = InnerState::build(config, &self.api, self.hook.as_ref());
        self.inner.store(Arc::new(inner));
    }
}

/// HTTP server for the CMS router.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    pub fn new(config: RouterConfig, api: Api) -> Self {
        Self::with_sitemap_hook(config, api, None)
    }

    /// Like [`HttpServer::new`], with a hook applied to every generated sitemap.
    pub fn with_sitemap_hook(config: RouterConfig, api: Api, hook: Option<SitemapHook>) -> Self {
        let request_secs = config.timeouts.request_secs;
        let state = AppState::new(config, api, hook);
        let router = Self::build_router(request_secs, state.clone());
        Self { router, state }
    }

    /// Build the Axum app with all middleware layers.
    ///
    /// The routing middleware wraps the inner router as a plain service so
    /// that the URI it rewrites is the one the inner router dispatches on.
    #[allow(deprecated)]
    fn build_router(request_secs: u64, state: AppState) -> Router {
        let inner = Router::new()
            .route(DEFAULT_PAGE_ROUTE, get(content_handler))
            .route(DEFAULT_ARCHIVE_ROUTE, get(content_handler))
            .route(DEFAULT_POST_ROUTE, get(content_handler))
            .fallback(content_handler)
            .with_state(state.clone());

        let routed = from_fn_with_state(state, routing_middleware).layer(inner);

        Router::new()
            .fallback_service(routed)
            .layer(TimeoutLayer::new(Duration::from_secs(request_secs)))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request.request_id(),
                )
            }))
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// The assembled app, for serving or driving directly in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve on `listener` until `shutdown` fires, applying config updates as they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let state = self.state.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                tracing::info!(
                    use_site_routing = config.routing.use_site_routing,
                    page_expires_secs = config.cache.page_expires_secs,
                    "Applying reloaded configuration"
                );
                state.reload(config);
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
