//! Cached sitemap tree of a site.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{is_published_at, Page};

/// Top-level items of a site's page tree.
pub type Sitemap = Vec<SitemapItem>;

/// A node in the page tree of a site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SitemapItem {
    pub id: Uuid,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    pub sort_order: u32,
    pub title: String,
    pub slug: String,
    /// Site relative path, or an absolute URL for pages redirecting elsewhere.
    pub permalink: String,
    pub page_type: String,
    pub published: Option<DateTime<Utc>>,
    pub last_modified: DateTime<Utc>,
    pub meta_index: bool,
    pub meta_follow: bool,
    pub meta_priority: f64,
    #[serde(default)]
    pub items: Vec<SitemapItem>,
}

impl SitemapItem {
    pub fn from_page(page: &Page) -> Self {
        Self {
            id: page.id,
            parent_id: page.parent_id,
            sort_order: page.sort_order,
            title: page.title.clone(),
            slug: page.slug.clone(),
            permalink: page
                .redirect()
                .map(str::to_string)
                .unwrap_or_else(|| page.permalink()),
            page_type: page.type_id.clone(),
            published: page.published,
            last_modified: page.last_modified,
            meta_index: page.meta_index,
            meta_follow: page.meta_follow,
            meta_priority: page.meta_priority,
            items: Vec::new(),
        }
    }

    pub fn is_published(&self) -> bool {
        is_published_at(self.published, Utc::now())
    }

    /// Depth-first search for an item by id.
    pub fn find(&self, id: Uuid) -> Option<&SitemapItem> {
        if self.id == id {
            return Some(self);
        }
        self.items.iter().find_map(|i| i.find(id))
    }
}

/// Build the sitemap tree from the pages of one site.
///
/// Only published pages are included; a page whose parent is missing from
/// the published set is dropped together with its subtree.
pub fn build_sitemap(pages: &[Page]) -> Sitemap {
    let published: Vec<&Page> = pages.iter().filter(|p| p.is_published()).collect();
    children_of(None, &published)
}

fn children_of(parent: Option<Uuid>, pages: &[&Page]) -> Vec<SitemapItem> {
    let mut level: Vec<&&Page> = pages.iter().filter(|p| p.parent_id == parent).collect();
    level.sort_by_key(|p| p.sort_order);

    level
        .into_iter()
        .map(|page| {
            let mut item = SitemapItem::from_page(page);
            item.items = children_of(Some(page.id), pages);
            item
        })
        .collect()
}
