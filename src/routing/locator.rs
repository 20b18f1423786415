//! Content location.
//!
//! # Responsibilities
//! - Find the page matching the longest prefix of the remaining segments
//! - Fall back to the start page when no segments remain
//! - Find a post of an archive by the next single segment
//!
//! # Design Decisions
//! - Longest match wins: candidates are tried from the full path downwards
//! - Publish state is not checked here; the resolver applies the draft rule

use uuid::Uuid;

use crate::content::{Page, Post};
use crate::store::{PageService, PostService, StoreError};

/// A page matched against the request path.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedPage {
    pub page: Page,
    /// Number of segments the page slug consumed.
    pub consumed: usize,
}

/// Locate the most specific page for `segments` under `site_id`.
pub async fn locate_page(
    pages: &dyn PageService,
    site_id: Uuid,
    segments: &[String],
    use_startpage: bool,
) -> Result<Option<LocatedPage>, StoreError> {
    if segments.is_empty() {
        if !use_startpage {
            return Ok(None);
        }
        let page = pages.get_startpage(site_id).await?;
        return Ok(page.map(|page| LocatedPage { page, consumed: 0 }));
    }

    for len in (1..=segments.len()).rev() {
        let slug = segments[..len].join("/");
        if let Some(page) = pages.get_by_slug(site_id, &slug).await? {
            tracing::debug!(site_id = %site_id, slug = %slug, page_id = %page.id, "Page matched");
            return Ok(Some(LocatedPage { page, consumed: len }));
        }
    }

    Ok(None)
}

/// Locate a post of `archive_id` by slug.
pub async fn locate_post(
    posts: &dyn PostService,
    archive_id: Uuid,
    slug: &str,
) -> Result<Option<Post>, StoreError> {
    let post = posts.get_by_slug(archive_id, slug).await?;
    if let Some(post) = &post {
        tracing::debug!(archive_id = %archive_id, slug = %slug, post_id = %post.id, "Post matched");
    }
    Ok(post)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{RedirectType, Site};
    use crate::store::{ContentSeed, MemoryStore};
    use chrono::Utc;

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
            published: Some(Utc::now()),
            last_modified: Utc::now(),
            redirect_url: None,
            redirect_type: RedirectType::Temporary,
            meta_index: true,
            meta_follow: true,
            meta_priority: 0.5,
        }
    }

    fn fixture() -> (MemoryStore, Uuid, Page, Page, Page) {
        let site_id = Uuid::new_v4();
        let home = page(site_id, "home", 0);
        let about = page(site_id, "about", 1);
        let team = page(site_id, "about/team", 2);
        let store = MemoryStore::new(ContentSeed {
            sites: vec![Site {
                id: site_id,
                title: "Main".into(),
                description: None,
                logo: None,
                hostnames: None,
                culture: None,
                is_default: true,
                content_last_modified: None,
            }],
            pages: vec![home.clone(), about.clone(), team.clone()],
            ..Default::default()
        })
        .unwrap();
        (store, site_id, home, about, team)
    }

    fn segs(s: &[&str]) -> Vec<String> {
        s.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_longest_prefix_wins() {
        let (store, site_id, _, about, team) = fixture();

        let found = locate_page(&store, site_id, &segs(&["about", "team", "extra"]), true)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.page.id, team.id);
        assert_eq!(found.consumed, 2);

        let found = locate_page(&store, site_id, &segs(&["about", "history"]), true)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.page.id, about.id);
        assert_eq!(found.consumed, 1);
    }

    #[tokio::test]
    async fn test_startpage_only_for_empty_path() {
        let (store, site_id, home, _, _) = fixture();

        let found = locate_page(&store, site_id, &[], true).await.unwrap().unwrap();
        assert_eq!(found.page.id, home.id);
        assert_eq!(found.consumed, 0);

        assert!(locate_page(&store, site_id, &[], false).await.unwrap().is_none());
        assert!(locate_page(&store, site_id, &segs(&["missing"]), true)
            .await
            .unwrap()
            .is_none());
    }
}
