//! In-memory content store.
//!
//! Holds an immutable content snapshot behind an `ArcSwap` so a reload never
//! blocks readers, and caches one sitemap tree per site.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AliasService, PageService, PostService, SiteService, StoreError, TaxonomyService};
use crate::content::sitemap::build_sitemap;
use crate::content::{
    Alias, Page, PageType, PageTypeRegistry, Post, Site, Sitemap, Taxonomy, TaxonomyKind,
};

/// Serialized content, as found in a seed file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentSeed {
    pub sites: Vec<Site>,
    pub page_types: Vec<PageType>,
    pub pages: Vec<Page>,
    pub posts: Vec<Post>,
    pub aliases: Vec<Alias>,
    pub taxonomies: Vec<Taxonomy>,
}

impl ContentSeed {
    /// Check the cross-record invariants, returning every violation.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let defaults = self.sites.iter().filter(|s| s.is_default).count();
        if !self.sites.is_empty() && defaults != 1 {
            errors.push(format!("exactly one default site required, found {}", defaults));
        }

        let mut hostnames = HashSet::new();
        for site in &self.sites {
            for host in site.hostname_entries() {
                if !hostnames.insert(host.clone()) {
                    errors.push(format!("hostname '{}' bound to more than one site", host));
                }
            }
        }

        let mut aliases = HashSet::new();
        for alias in &self.aliases {
            if !aliases.insert((alias.site_id, alias.alias_url.as_str())) {
                errors.push(format!(
                    "duplicate alias '{}' for site {}",
                    alias.alias_url, alias.site_id
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// A sitemap tree and the content snapshot it was built from.
struct CachedSitemap {
    snapshot: Arc<ContentSeed>,
    tree: Arc<Sitemap>,
}

/// Thread-safe content store backed by a swappable snapshot.
pub struct MemoryStore {
    content: ArcSwap<ContentSeed>,
    sitemaps: DashMap<Uuid, CachedSitemap>,
}

impl MemoryStore {
    /// Create a store from validated content.
    pub fn new(seed: ContentSeed) -> Result<Self, StoreError> {
        seed.validate().map_err(StoreError::Invalid)?;
        Ok(Self {
            content: ArcSwap::from_pointee(seed),
            sitemaps: DashMap::new(),
        })
    }

    /// Load content from a JSON seed file.
    pub fn load_from_file(path: &Path) -> Result<Self, StoreError> {
        let file = File::open(path)?;
        let seed: ContentSeed = serde_json::from_reader(BufReader::new(file))?;
        let store = Self::new(seed)?;

        let content = store.content.load();
        tracing::info!(
            path = %path.display(),
            sites = content.sites.len(),
            pages = content.pages.len(),
            posts = content.posts.len(),
            aliases = content.aliases.len(),
            "Loaded content"
        );
        drop(content);

        Ok(store)
    }

    /// Atomically replace all content and drop cached sitemaps.
    pub fn replace(&self, seed: ContentSeed) -> Result<(), StoreError> {
        seed.validate().map_err(StoreError::Invalid)?;
        self.content.store(Arc::new(seed));
        self.sitemaps.clear();
        tracing::info!("Content replaced, sitemap cache invalidated");
        Ok(())
    }

    /// Drop the cached sitemap of one site.
    pub fn invalidate_sitemap(&self, site_id: Uuid) {
        self.sitemaps.remove(&site_id);
    }

    /// Built-in page types extended with the types declared in the content.
    pub fn page_types(&self) -> PageTypeRegistry {
        let mut registry = PageTypeRegistry::with_defaults();
        for page_type in &self.content.load().page_types {
            registry.register(page_type.clone());
        }
        registry
    }

    fn find_taxonomy(&self, archive_id: Uuid, slug: &str, kind: TaxonomyKind) -> Option<Taxonomy> {
        self.content
            .load()
            .taxonomies
            .iter()
            .find(|t| t.archive_id == archive_id && t.kind == kind && t.slug == slug)
            .cloned()
    }
}

fn sitemap_for(content: &ContentSeed, site_id: Uuid) -> Option<Arc<Sitemap>> {
    if !content.sites.iter().any(|s| s.id == site_id) {
        return None;
    }
    let pages: Vec<Page> = content
        .pages
        .iter()
        .filter(|p| p.site_id == site_id)
        .cloned()
        .collect();
    Some(Arc::new(build_sitemap(&pages)))
}

#[async_trait]
impl SiteService for MemoryStore {
    async fn get_by_hostname(&self, hostname: &str) -> Result<Option<Site>, StoreError> {
        Ok(self
            .content
            .load()
            .sites
            .iter()
            .find(|s| s.matches_hostname(hostname))
            .cloned())
    }

    async fn get_default(&self) -> Result<Option<Site>, StoreError> {
        Ok(self.content.load().sites.iter().find(|s| s.is_default).cloned())
    }

    async fn get_sitemap(&self, site_id: Uuid) -> Result<Option<Arc<Sitemap>>, StoreError> {
        let content = self.content.load_full();

        // An entry built from an older snapshot may land after `replace`; never serve it
        if let Some(cached) = self.sitemaps.get(&site_id) {
            if Arc::ptr_eq(&cached.snapshot, &content) {
                return Ok(Some(cached.tree.clone()));
            }
        }

        let Some(tree) = sitemap_for(&content, site_id) else {
            return Ok(None);
        };
        tracing::debug!(site_id = %site_id, items = tree.len(), "Sitemap cached");

        self.sitemaps.insert(
            site_id,
            CachedSitemap {
                snapshot: content,
                tree: tree.clone(),
            },
        );
        Ok(Some(tree))
    }
}

#[async_trait]
impl PageService for MemoryStore {
    async fn get_by_slug(&self, site_id: Uuid, slug: &str) -> Result<Option<Page>, StoreError> {
        Ok(self
            .content
            .load()
            .pages
            .iter()
            .find(|p| p.site_id == site_id && p.slug == slug)
            .cloned())
    }

    async fn get_startpage(&self, site_id: Uuid) -> Result<Option<Page>, StoreError> {
        Ok(self
            .content
            .load()
            .pages
            .iter()
            .find(|p| p.site_id == site_id && p.is_startpage())
            .cloned())
    }
}

#[async_trait]
impl PostService for MemoryStore {
    async fn get_by_slug(&self, archive_id: Uuid, slug: &str) -> Result<Option<Post>, StoreError> {
        Ok(self
            .content
            .load()
            .posts
            .iter()
            .find(|p| p.archive_id == archive_id && p.slug == slug)
            .cloned())
    }

    async fn list_by_archive(&self, archive_id: Uuid) -> Result<Vec<Post>, StoreError> {
        let mut posts: Vec<Post> = self
            .content
            .load()
            .posts
            .iter()
            .filter(|p| p.archive_id == archive_id)
            .cloned()
            .collect();
        // Newest first
        posts.sort_by(|a, b| b.published.cmp(&a.published));
        Ok(posts)
    }
}

#[async_trait]
impl AliasService for MemoryStore {
    async fn get_by_alias_url(
        &self,
        site_id: Uuid,
        alias_url: &str,
    ) -> Result<Option<Alias>, StoreError> {
        Ok(self
            .content
            .load()
            .aliases
            .iter()
            .find(|a| a.site_id == site_id && a.alias_url == alias_url)
            .cloned())
    }
}

#[async_trait]
impl TaxonomyService for MemoryStore {
    async fn get_category_by_slug(
        &self,
        archive_id: Uuid,
        slug: &str,
    ) -> Result<Option<Taxonomy>, StoreError> {
        Ok(self.find_taxonomy(archive_id, slug, TaxonomyKind::Category))
    }

    async fn get_tag_by_slug(
        &self,
        archive_id: Uuid,
        slug: &str,
    ) -> Result<Option<Taxonomy>, StoreError> {
        Ok(self.find_taxonomy(archive_id, slug, TaxonomyKind::Tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::RedirectType;
    use chrono::{Duration, Utc};

    fn site(hostnames: &str, is_default: bool) -> Site {
        Site {
            id: Uuid::new_v4(),
            title: hostnames.into(),
            description: None,
            logo: None,
            hostnames: Some(hostnames.into()),
            culture: None,
            is_default,
            content_last_modified: None,
        }
    }

    fn page(site_id: Uuid, slug: &str, sort_order: u32) -> Page {
        Page {
            id: Uuid::new_v4(),
            site_id,
            parent_id: None,
            sort_order,
            type_id: "Standard".into(),
            title: slug.into(),
            slug: slug.into(),
            route: None,
            published: Some(Utc::now() - Duration::hours(1)),
            last_modified: Utc::now(),
            redirect_url: None,
            redirect_type: RedirectType::Temporary,
            meta_index: true,
            meta_follow: true,
            meta_priority: 0.5,
        }
    }

    #[test]
    fn test_validate_default_site() {
        let seed = ContentSeed {
            sites: vec![site("a.com", false), site("b.com", false)],
            ..Default::default()
        };
        let errors = seed.validate().unwrap_err();
        assert!(errors[0].contains("exactly one default site"));

        let seed = ContentSeed {
            sites: vec![site("a.com", true), site("b.com", false)],
            ..Default::default()
        };
        assert!(seed.validate().is_ok());
    }

    #[test]
    fn test_validate_duplicate_hostnames_and_aliases() {
        let a = site("a.com,shared.com/en", true);
        let b = site("SHARED.com/en", false);
        let alias = Alias {
            id: Uuid::new_v4(),
            site_id: a.id,
            alias_url: "/old".into(),
            redirect_url: "/new".into(),
            redirect_type: RedirectType::Permanent,
        };
        let seed = ContentSeed {
            sites: vec![a, b],
            aliases: vec![alias.clone(), alias],
            ..Default::default()
        };
        let errors = seed.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[tokio::test]
    async fn test_site_lookups() {
        let main = site("example.com", true);
        let en = site("example.com/en", false);
        let store = MemoryStore::new(ContentSeed {
            sites: vec![main.clone(), en.clone()],
            ..Default::default()
        })
        .unwrap();

        let found = store.get_by_hostname("Example.com/EN").await.unwrap();
        assert_eq!(found.map(|s| s.id), Some(en.id));
        assert!(store.get_by_hostname("other.com").await.unwrap().is_none());
        assert_eq!(store.get_default().await.unwrap().map(|s| s.id), Some(main.id));
    }

    #[tokio::test]
    async fn test_sitemap_cache_and_invalidation() {
        let s = site("example.com", true);
        let home = page(s.id, "home", 0);
        let store = MemoryStore::new(ContentSeed {
            sites: vec![s.clone()],
            pages: vec![home.clone()],
            ..Default::default()
        })
        .unwrap();

        let first = store.get_sitemap(s.id).await.unwrap().unwrap();
        let second = store.get_sitemap(s.id).await.unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(store.get_sitemap(Uuid::new_v4()).await.unwrap().is_none());

        let about = page(s.id, "about", 1);
        store
            .replace(ContentSeed {
                sites: vec![s.clone()],
                pages: vec![home, about],
                ..Default::default()
            })
            .unwrap();
        let rebuilt = store.get_sitemap(s.id).await.unwrap().unwrap();
        assert_eq!(rebuilt.len(), 2);
        assert_eq!(first.len(), 1);
    }

    #[tokio::test]
    async fn test_late_insert_from_old_snapshot_is_not_served() {
        let s = site("example.com", true);
        let home = page(s.id, "home", 0);
        let store = MemoryStore::new(ContentSeed {
            sites: vec![s.clone()],
            pages: vec![home.clone()],
            ..Default::default()
        })
        .unwrap();

        // A reader builds from the old snapshot while content is replaced
        let old = store.content.load_full();
        let old_tree = sitemap_for(&old, s.id).unwrap();
        store
            .replace(ContentSeed {
                sites: vec![s.clone()],
                pages: vec![home, page(s.id, "about", 1)],
                ..Default::default()
            })
            .unwrap();
        store.sitemaps.insert(
            s.id,
            CachedSitemap {
                snapshot: old,
                tree: old_tree.clone(),
            },
        );

        let current = store.get_sitemap(s.id).await.unwrap().unwrap();
        assert_eq!(current.len(), 2);
        assert!(!Arc::ptr_eq(&current, &old_tree));

        let again = store.get_sitemap(s.id).await.unwrap().unwrap();
        assert!(Arc::ptr_eq(&current, &again));
    }

    #[tokio::test]
    async fn test_invalidate_single_site() {
        let a = site("a.com", true);
        let b = site("b.com", false);
        let store = MemoryStore::new(ContentSeed {
            sites: vec![a.clone(), b.clone()],
            pages: vec![page(a.id, "home", 0), page(b.id, "home", 0)],
            ..Default::default()
        })
        .unwrap();

        let a_first = store.get_sitemap(a.id).await.unwrap().unwrap();
        let b_first = store.get_sitemap(b.id).await.unwrap().unwrap();
        store.invalidate_sitemap(a.id);

        let a_second = store.get_sitemap(a.id).await.unwrap().unwrap();
        let b_second = store.get_sitemap(b.id).await.unwrap().unwrap();
        assert!(!Arc::ptr_eq(&a_first, &a_second));
        assert!(Arc::ptr_eq(&b_first, &b_second));
    }

    #[tokio::test]
    async fn test_startpage_lookup() {
        let s = site("example.com", true);
        let about = page(s.id, "about", 1);
        let home = page(s.id, "home", 0);
        let store = MemoryStore::new(ContentSeed {
            sites: vec![s.clone()],
            pages: vec![about, home.clone()],
            ..Default::default()
        })
        .unwrap();

        let start = PageService::get_startpage(&store, s.id).await.unwrap();
        assert_eq!(start.map(|p| p.id), Some(home.id));
    }

    #[test]
    fn test_page_types_extend_defaults() {
        let store = MemoryStore::new(ContentSeed {
            page_types: vec![PageType::archive("News")],
            ..Default::default()
        })
        .unwrap();
        let registry = store.page_types();
        assert!(registry.is_archive("News"));
        assert!(registry.is_archive("Blog"));
    }
}
