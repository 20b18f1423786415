//! Multi-site CMS request router.
//!
//! Resolves inbound URLs to sites, aliases, pages, posts and archive
//! listings, rewrites them to internal render routes, negotiates HTTP
//! caching and serves XML sitemaps.

// Domain
pub mod content;
pub mod routing;
pub mod sitemap;
pub mod store;

// HTTP surface
pub mod http;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use config::schema::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::Resolver;
pub use store::{Api, MemoryStore};
