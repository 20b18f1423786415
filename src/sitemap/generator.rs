//! Sitemap tree walk.

use std::borrow::Cow;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::writer::write_urlset;
use super::SitemapError;
use crate::content::{PageTypeRegistry, Sitemap, SitemapItem};
use crate::observability::metrics;
use crate::store::PostService;

/// Hook run on a private copy of the sitemap before it is serialized.
pub type SitemapHook = Arc<dyn Fn(&mut Sitemap) + Send + Sync>;

/// A single `<url>` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlEntry {
    pub loc: String,
    pub last_modified: DateTime<Utc>,
    pub priority: f64,
}

/// Generates XML sitemaps from cached site trees.
#[derive(Clone)]
pub struct SitemapGenerator {
    posts: Arc<dyn PostService>,
    page_types: Arc<PageTypeRegistry>,
    hook: Option<SitemapHook>,
}

impl SitemapGenerator {
    pub fn new(posts: Arc<dyn PostService>, page_types: Arc<PageTypeRegistry>) -> Self {
        Self {
            posts,
            page_types,
            hook: None,
        }
    }

    /// Install a hook that may rewrite the sitemap before serialization.
    pub fn with_hook(mut self, hook: SitemapHook) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Render the sitemap XML for `sitemap` with URLs rooted at `base_url`.
    pub async fn generate(&self, sitemap: &Sitemap, base_url: &str) -> Result<String, SitemapError> {
        let entries = self.collect(sitemap, base_url).await?;
        metrics::record_sitemap(entries.len());
        write_urlset(&entries)
    }

    /// Collect the entries of `sitemap` in depth-first order.
    pub async fn collect(
        &self,
        sitemap: &Sitemap,
        base_url: &str,
    ) -> Result<Vec<UrlEntry>, SitemapError> {
        let snapshot: Cow<'_, Sitemap> = match &self.hook {
            Some(hook) => {
                let mut copy = sitemap.clone();
                hook(&mut copy);
                Cow::Owned(copy)
            }
            None => Cow::Borrowed(sitemap),
        };

        let mut entries = Vec::new();
        let mut stack: Vec<&SitemapItem> = snapshot.iter().rev().collect();

        while let Some(item) = stack.pop() {
            if item.meta_index && item.is_published() {
                entries.push(UrlEntry {
                    loc: absolute_url(base_url, &item.permalink),
                    last_modified: item.last_modified,
                    priority: item.meta_priority,
                });

                if self.page_types.is_archive(&item.page_type) {
                    // Posts live under the archive slug even when the page redirects
                    let archive_path = format!("/{}", item.slug);
                    for post in self.posts.list_by_archive(item.id).await? {
                        if !post.meta_index || !post.is_published() {
                            continue;
                        }
                        entries.push(UrlEntry {
                            loc: absolute_url(base_url, &post.permalink_under(&archive_path)),
                            last_modified: post.last_modified,
                            priority: post.meta_priority,
                        });
                    }
                }
            }

            stack.extend(item.items.iter().rev());
        }

        tracing::debug!(base_url = %base_url, urls = entries.len(), "Sitemap collected");
        Ok(entries)
    }
}

/// Join `permalink` to `base_url` unless it already is an absolute URL.
pub fn absolute_url(base_url: &str, permalink: &str) -> String {
    let is_absolute = url::Url::parse(permalink)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false);
    if is_absolute {
        return permalink.to_string();
    }

    let base = base_url.trim_end_matches('/');
    if permalink.starts_with('/') {
        format!("{}{}", base, permalink)
    } else {
        format!("{}/{}", base, permalink)
    }
}
