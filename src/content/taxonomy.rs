//! Categories and tags of an archive.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxonomyKind {
    Category,
    Tag,
}

/// A category or tag scoped to one archive page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Taxonomy {
    pub id: Uuid,
    /// The archive page this taxonomy belongs to.
    pub archive_id: Uuid,
    pub kind: TaxonomyKind,
    pub title: String,
    pub slug: String,
}
