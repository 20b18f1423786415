//! Content lookup contracts and the in-memory store.
//!
//! # Data Flow
//! ```text
//! Routing / sitemap generation
//!     → Api (Arc<dyn ...Service> handles + PageTypeRegistry)
//!     → memory.rs (MemoryStore snapshot lookups)
//!     → Ok(Some(record)) | Ok(None) on no match | Err(StoreError) on failure
//! ```
//!
//! # Design Decisions
//! - Every lookup is async and single-attempt; no retries
//! - No-match is `Ok(None)`, never an error
//! - Contracts are split per concern so routing can be tested with fakes

pub mod memory;

pub use memory::{ContentSeed, MemoryStore};

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::content::{Alias, Page, PageTypeRegistry, Post, Site, Sitemap, Taxonomy};

/// Errors raised by content stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid content: {}", .0.join(", "))]
    Invalid(Vec<String>),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait SiteService: Send + Sync {
    /// Find the site bound to `hostname` (`host` or `host/prefix`).
    async fn get_by_hostname(&self, hostname: &str) -> Result<Option<Site>, StoreError>;

    /// The site marked as default.
    async fn get_default(&self) -> Result<Option<Site>, StoreError>;

    /// Cached page tree of the site.
    async fn get_sitemap(&self, site_id: Uuid) -> Result<Option<Arc<Sitemap>>, StoreError>;
}

#[async_trait]
pub trait PageService: Send + Sync {
    async fn get_by_slug(&self, site_id: Uuid, slug: &str) -> Result<Option<Page>, StoreError>;

    async fn get_startpage(&self, site_id: Uuid) -> Result<Option<Page>, StoreError>;
}

#[async_trait]
pub trait PostService: Send + Sync {
    async fn get_by_slug(&self, archive_id: Uuid, slug: &str) -> Result<Option<Post>, StoreError>;

    /// All posts of an archive, published or not.
    async fn list_by_archive(&self, archive_id: Uuid) -> Result<Vec<Post>, StoreError>;
}

#[async_trait]
pub trait AliasService: Send + Sync {
    async fn get_by_alias_url(
        &self,
        site_id: Uuid,
        alias_url: &str,
    ) -> Result<Option<Alias>, StoreError>;
}

#[async_trait]
pub trait TaxonomyService: Send + Sync {
    async fn get_category_by_slug(
        &self,
        archive_id: Uuid,
        slug: &str,
    ) -> Result<Option<Taxonomy>, StoreError>;

    async fn get_tag_by_slug(
        &self,
        archive_id: Uuid,
        slug: &str,
    ) -> Result<Option<Taxonomy>, StoreError>;
}

/// Handles to every content collaborator used by routing.
#[derive(Clone)]
pub struct Api {
    pub sites: Arc<dyn SiteService>,
    pub pages: Arc<dyn PageService>,
    pub posts: Arc<dyn PostService>,
    pub aliases: Arc<dyn AliasService>,
    pub taxonomies: Arc<dyn TaxonomyService>,
    pub page_types: Arc<PageTypeRegistry>,
}

impl Api {
    /// Use one store for all collaborators.
    pub fn from_store(store: Arc<MemoryStore>) -> Self {
        let page_types = Arc::new(store.page_types());
        Self {
            sites: store.clone(),
            pages: store.clone(),
            posts: store.clone(),
            aliases: store.clone(),
            taxonomies: store,
            page_types,
        }
    }
}
