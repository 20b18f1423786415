//! Content data model.
//!
//! # Data Flow
//! ```text
//! Editorial workflows (external)
//!     → Site / Page / Post / Alias / Taxonomy records
//!     → store (read-only during routing)
//!     → sitemap.rs (cached SitemapItem tree per site)
//!
//! Startup:
//!     PageType descriptors → page_type.rs registry (no reflection)
//! ```
//!
//! # Design Decisions
//! - Records are plain data; lookups live in the store
//! - Publish state is a nullable timestamp, compared against "now"
//! - Sitemap trees own their children; no back references

pub mod alias;
pub mod page;
pub mod page_type;
pub mod post;
pub mod site;
pub mod sitemap;
pub mod taxonomy;

pub use alias::{Alias, RedirectType};
pub use page::Page;
pub use page_type::{PageType, PageTypeRegistry};
pub use post::Post;
pub use site::Site;
pub use sitemap::{Sitemap, SitemapItem};
pub use taxonomy::{Taxonomy, TaxonomyKind};

use chrono::{DateTime, Utc};

/// Returns true if the publish timestamp is set and not in the future.
pub(crate) fn is_published_at(published: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    published.is_some_and(|p| p <= now)
}

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn default_priority() -> f64 {
    0.5
}
