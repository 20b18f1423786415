//! Page type descriptors and their registry.
//!
//! Types are registered explicitly at startup and looked up by id; there is
//! no attribute scanning.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Describes how pages of a given type are routed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageType {
    pub id: String,

    #[serde(default)]
    pub title: Option<String>,

    /// Archive pages list posts and accept archive filters.
    #[serde(default)]
    pub is_archive: bool,

    /// Default route for pages of this type.
    #[serde(default)]
    pub route: Option<String>,
}

impl PageType {
    pub fn page(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            is_archive: false,
            route: None,
        }
    }

    pub fn archive(id: impl Into<String>) -> Self {
        Self {
            is_archive: true,
            ..Self::page(id)
        }
    }
}

/// Registry mapping page type ids to [`PageType`] descriptors.
#[derive(Debug, Clone)]
pub struct PageTypeRegistry {
    types: HashMap<String, PageType>,
    fallback: PageType,
}

impl PageTypeRegistry {
    /// Empty registry; unknown ids resolve to a plain page type.
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
            fallback: PageType::page("Standard"),
        }
    }

    /// Registry with the built-in `Standard` page and `Blog` archive types.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(PageType::page("Standard"));
        registry.register(PageType::archive("Blog"));
        registry
    }

    /// Register or replace a page type.
    pub fn register(&mut self, page_type: PageType) {
        self.types.insert(page_type.id.clone(), page_type);
    }

    pub fn get(&self, id: &str) -> Option<&PageType> {
        self.types.get(id)
    }

    /// Look up a type, falling back to a non-archive page type.
    pub fn resolve(&self, id: &str) -> &PageType {
        match self.types.get(id) {
            Some(t) => t,
            None => {
                tracing::warn!(page_type = %id, "Unknown page type, treating as standard page");
                &self.fallback
            }
        }
    }

    pub fn is_archive(&self, id: &str) -> bool {
        self.get(id).is_some_and(|t| t.is_archive)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for PageTypeRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
