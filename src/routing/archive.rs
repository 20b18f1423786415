//! Archive filter parsing.
//!
//! Trailing segments of an archive URL are read as optional filters:
//!
//! ```text
//! /blog/category/{slug}/tag/{slug}/{year}/{month}/page/{n}
//! ```
//!
//! # Design Decisions
//! - Single forward pass; each token is consumed at most once
//! - Unknown categories/tags and malformed numbers are skipped, never errors
//! - `page` must be last: the scan stops after the number following it
//! - Store failures still propagate

use uuid::Uuid;

use super::query::RouteQuery;
use crate::store::{StoreError, TaxonomyService};

/// Filters extracted from an archive URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveFilter {
    pub category: Option<Uuid>,
    pub tag: Option<Uuid>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub page: Option<u32>,
}

impl ArchiveFilter {
    /// Query parameters in canonical order.
    pub fn to_query(&self) -> RouteQuery {
        RouteQuery::new()
            .with_opt("category", self.category)
            .with_opt("tag", self.tag)
            .with_opt("year", self.year)
            .with_opt("month", self.month)
            .with_opt("page", self.page)
            .with_opt("pagenum", self.page)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Any,
    Category,
    Tag,
    PageNumber,
}

/// Parse archive `segments` of the archive page `archive_id`.
///
/// Years later than `current_year` are clamped to it; months are clamped
/// to `1..=12`.
pub async fn parse_archive(
    taxonomies: &dyn TaxonomyService,
    archive_id: Uuid,
    segments: &[String],
    current_year: i32,
) -> Result<ArchiveFilter, StoreError> {
    let mut filter = ArchiveFilter::default();
    let mut expect = Expect::Any;
    let mut seen_category = false;
    let mut seen_page = false;

    for segment in segments {
        match expect {
            Expect::Category => {
                expect = Expect::Any;
                match taxonomies.get_category_by_slug(archive_id, segment).await? {
                    Some(category) => {
                        filter.category.get_or_insert(category.id);
                    }
                    None => {
                        tracing::debug!(archive_id = %archive_id, slug = %segment, "Unknown category ignored");
                    }
                }
                continue;
            }
            Expect::Tag => {
                expect = Expect::Any;
                match taxonomies.get_tag_by_slug(archive_id, segment).await? {
                    Some(tag) => {
                        filter.tag.get_or_insert(tag.id);
                    }
                    None => {
                        tracing::debug!(archive_id = %archive_id, slug = %segment, "Unknown tag ignored");
                    }
                }
                continue;
            }
            Expect::PageNumber => {
                filter.page = segment.parse::<u32>().ok();
                break;
            }
            Expect::Any => {}
        }

        match segment.as_str() {
            "category" if !seen_page => {
                seen_category = true;
                expect = Expect::Category;
            }
            "tag" if !seen_page && !seen_category => {
                expect = Expect::Tag;
            }
            "page" => {
                seen_page = true;
                expect = Expect::PageNumber;
            }
            _ if filter.year.is_none() => {
                if let Ok(year) = segment.parse::<u32>() {
                    let year = i32::try_from(year).unwrap_or(i32::MAX);
                    filter.year = Some(year.min(current_year));
                }
            }
            _ => {
                if filter.month.is_none() {
                    if let Ok(month) = segment.parse::<i64>() {
                        // Clamped into 1..=12, always fits
                        filter.month = Some(month.clamp(1, 12) as u32);
                    }
                }
            }
        }
    }

    Ok(filter)
}
