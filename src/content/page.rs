//! Pages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{default_priority, default_true, is_published_at, RedirectType};

/// A content unit addressable at a slug under a site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page {
    pub id: Uuid,
    pub site_id: Uuid,

    #[serde(default)]
    pub parent_id: Option<Uuid>,

    #[serde(default)]
    pub sort_order: u32,

    /// Page type id, resolved through the page type registry.
    pub type_id: String,

    pub title: String,

    /// Full slug relative to the site, e.g. `about/team`.
    pub slug: String,

    /// Route template overriding the page type default.
    #[serde(default)]
    pub route: Option<String>,

    #[serde(default)]
    pub published: Option<DateTime<Utc>>,

    pub last_modified: DateTime<Utc>,

    #[serde(default)]
    pub redirect_url: Option<String>,

    #[serde(default)]
    pub redirect_type: RedirectType,

    #[serde(default = "default_true")]
    pub meta_index: bool,

    #[serde(default = "default_true")]
    pub meta_follow: bool,

    #[serde(default = "default_priority")]
    pub meta_priority: f64,
}

impl Page {
    pub fn is_published(&self) -> bool {
        is_published_at(self.published, Utc::now())
    }

    /// The structural root of the site: no parent and first in sort order.
    pub fn is_startpage(&self) -> bool {
        self.parent_id.is_none() && self.sort_order == 0
    }

    /// Redirect target, ignoring blank values.
    pub fn redirect(&self) -> Option<&str> {
        self.redirect_url.as_deref().filter(|u| !u.trim().is_empty())
    }

    pub fn permalink(&self) -> String {
        format!("/{}", self.slug)
    }
}
