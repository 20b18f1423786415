//! Site resolution.
//!
//! # Responsibilities
//! - Match `host/first-segment` against prefixed site bindings
//! - Fall back to the bare hostname, then the default site
//! - Report how many segments the site prefix consumed

use crate::content::Site;
use crate::store::{SiteService, StoreError};

/// A site matched for a request.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteMatch {
    pub site: Site,
    /// Hostname used for display and absolute URLs (without prefix).
    pub hostname: String,
    /// Consumed site prefix segment.
    pub prefix: Option<String>,
}

impl SiteMatch {
    /// Number of path segments consumed by the site prefix.
    pub fn consumed(&self) -> usize {
        usize::from(self.prefix.is_some())
    }
}

/// Resolve the active site for `hostname` and the request `segments`.
///
/// Returns `Ok(None)` only when no site exists at all.
pub async fn resolve_site(
    sites: &dyn SiteService,
    use_site_routing: bool,
    hostname: &str,
    segments: &[String],
) -> Result<Option<SiteMatch>, StoreError> {
    if use_site_routing {
        if let Some(first) = segments.first() {
            let prefixed = format!("{}/{}", hostname, first);
            if let Some(site) = sites.get_by_hostname(&prefixed).await? {
                tracing::debug!(site_id = %site.id, hostname = %prefixed, "Site matched on prefix");
                return Ok(Some(SiteMatch {
                    site,
                    hostname: hostname.to_string(),
                    prefix: Some(first.clone()),
                }));
            }
        }

        if let Some(site) = sites.get_by_hostname(hostname).await? {
            tracing::debug!(site_id = %site.id, hostname = %hostname, "Site matched on hostname");
            return Ok(Some(SiteMatch {
                site,
                hostname: hostname.to_string(),
                prefix: None,
            }));
        }
    }

    let site = sites.get_default().await?;
    if let Some(site) = &site {
        tracing::debug!(site_id = %site.id, hostname = %hostname, "Using default site");
    }
    Ok(site.map(|site| SiteMatch {
        site,
        hostname: hostname.to_string(),
        prefix: None,
    }))
}
