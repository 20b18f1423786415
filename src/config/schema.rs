//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the content router.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Routing feature switches.
    pub routing: RoutingConfig,

    /// HTTP cache settings for rendered content.
    pub cache: CacheConfig,

    /// Sitemap generation settings.
    pub sitemap: SitemapConfig,

    /// Content source.
    pub content: ContentConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Switches for each stage of the routing pipeline.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct RoutingConfig {
    /// Match sites on hostname and path prefix (otherwise always the default site).
    pub use_site_routing: bool,

    /// Redirect requests matching a stored alias.
    pub use_alias_routing: bool,

    /// Resolve pages by slug.
    pub use_page_routing: bool,

    /// Resolve posts under archive pages.
    pub use_post_routing: bool,

    /// Parse archive filters from trailing segments.
    pub use_archive_routing: bool,

    /// Serve the start page for the site root.
    pub use_startpage_routing: bool,

    /// Serve `/sitemap.xml`.
    pub use_sitemap_routing: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            use_site_routing: true,
            use_alias_routing: true,
            use_page_routing: true,
            use_post_routing: true,
            use_archive_routing: true,
            use_startpage_routing: true,
            use_sitemap_routing: true,
        }
    }
}

/// Client cache window for rendered content, in seconds (0 = no-cache).
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct CacheConfig {
    pub page_expires_secs: u64,
    pub post_expires_secs: u64,
}

/// Sitemap configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct SitemapConfig {
    /// Absolute base URL overriding the one derived from the request.
    pub base_url: Option<String>,

    /// Scheme used when the request does not carry one ("http" or "https").
    pub default_scheme: String,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            default_scheme: "http".to_string(),
        }
    }
}

/// Where content is loaded from.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContentConfig {
    /// JSON content file.
    pub seed_path: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            seed_path: "data/content.json".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format ("pretty" or "json").
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
