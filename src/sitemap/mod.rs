//! Sitemap generation subsystem.
//!
//! # Data Flow
//! ```text
//! Cached Arc<Sitemap> of the resolved site
//!     → optional hook on a deep clone (cache never mutated)
//!     → generator.rs (depth-first walk, index flags, archive posts)
//!     → writer.rs (urlset XML)
//!     → application/xml response
//! ```
//!
//! # Design Decisions
//! - Children are always visited, whatever the parent's index flag
//! - Absolute permalinks (external redirects) are emitted as-is
//! - `changefreq` is always `daily`

pub mod generator;
pub mod writer;

pub use generator::{SitemapGenerator, SitemapHook, UrlEntry};
pub use writer::write_urlset;

use crate::store::StoreError;

/// Errors raised while generating a sitemap.
#[derive(Debug, thiserror::Error)]
pub enum SitemapError {
    #[error("content lookup failed: {0}")]
    Store(#[from] StoreError),

    #[error("XML write error: {0}")]
    Xml(String),

    #[error("sitemap is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}
