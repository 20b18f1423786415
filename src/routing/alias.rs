//! Alias resolution.
//!
//! Matches the full remaining path (not a prefix) against stored aliases.

use uuid::Uuid;

use crate::content::Alias;
use crate::store::{AliasService, StoreError};

/// Look up an alias for the unconsumed `segments` of a request.
pub async fn resolve_alias(
    aliases: &dyn AliasService,
    site_id: Uuid,
    segments: &[String],
) -> Result<Option<Alias>, StoreError> {
    if segments.is_empty() {
        return Ok(None);
    }
    let url = format!("/{}", segments.join("/"));
    let alias = aliases.get_by_alias_url(site_id, &url).await?;
    if let Some(alias) = &alias {
        tracing::debug!(
            site_id = %site_id,
            alias_url = %url,
            redirect_url = %alias.redirect_url,
            "Alias matched"
        );
    }
    Ok(alias)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{RedirectType, Site};
    use crate::store::{ContentSeed, MemoryStore};

    #[tokio::test]
    async fn test_exact_match_only() {
        let site_id = Uuid::new_v4();
        let alias = Alias {
            id: Uuid::new_v4(),
            site_id,
            alias_url: "/old/news".into(),
            redirect_url: "/blog".into(),
            redirect_type: RedirectType::Permanent,
        };
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
            aliases: vec![alias.clone()],
            ..Default::default()
        })
        .unwrap();

        let segs = |s: &[&str]| s.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let found = resolve_alias(&store, site_id, &segs(&["old", "news"])).await.unwrap();
        assert_eq!(found, Some(alias));

        assert!(resolve_alias(&store, site_id, &segs(&["old"])).await.unwrap().is_none());
        assert!(resolve_alias(&store, site_id, &segs(&["old", "news", "x"]))
            .await
            .unwrap()
            .is_none());
        assert!(resolve_alias(&store, Uuid::new_v4(), &segs(&["old", "news"]))
            .await
            .unwrap()
            .is_none());
        assert!(resolve_alias(&store, site_id, &[]).await.unwrap().is_none());
    }
}
