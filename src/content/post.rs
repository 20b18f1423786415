//! Posts belonging to archive pages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{default_priority, default_true, is_published_at, RedirectType};

/// A content unit owned by exactly one archive page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Post {
    pub id: Uuid,

    /// The archive page owning this post.
    pub archive_id: Uuid,

    pub title: String,

    /// Slug unique within the archive.
    pub slug: String,

    #[serde(default)]
    pub route: Option<String>,

    /// Explicit permalink; derived from the archive path when absent.
    #[serde(default)]
    pub permalink: Option<String>,

    #[serde(default)]
    pub category_id: Option<Uuid>,

    #[serde(default)]
    pub tag_ids: Vec<Uuid>,

    #[serde(default)]
    pub published: Option<DateTime<Utc>>,

    pub last_modified: DateTime<Utc>,

    #[serde(default)]
    pub redirect_url: Option<String>,

    #[serde(default)]
    pub redirect_type: RedirectType,

    #[serde(default = "default_true")]
    pub meta_index: bool,

    #[serde(default = "default_priority")]
    pub meta_priority: f64,
}

impl Post {
    pub fn is_published(&self) -> bool {
        is_published_at(self.published, Utc::now())
    }

    pub fn redirect(&self) -> Option<&str> {
        self.redirect_url.as_deref().filter(|u| !u.trim().is_empty())
    }

    /// Permalink of the post given the permalink of its archive page.
    pub fn permalink_under(&self, archive_permalink: &str) -> String {
        match &self.permalink {
            Some(p) => p.clone(),
            None => format!("{}/{}", archive_permalink.trim_end_matches('/'), self.slug),
        }
    }
}
