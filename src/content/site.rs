//! Site records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A routable tenant identified by one or more hostnames.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Site {
    pub id: Uuid,

    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub logo: Option<String>,

    /// Comma-separated `host` or `host/prefix` entries.
    #[serde(default)]
    pub hostnames: Option<String>,

    /// Culture used when rendering content of this site (e.g. "en-US").
    #[serde(default)]
    pub culture: Option<String>,

    #[serde(default)]
    pub is_default: bool,

    /// Last time any content of the site changed.
    #[serde(default)]
    pub content_last_modified: Option<DateTime<Utc>>,
}

impl Site {
    /// Normalized hostname entries (trimmed, lowercase, empty entries skipped).
    pub fn hostname_entries(&self) -> impl Iterator<Item = String> + '_ {
        self.hostnames
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(|h| h.trim().to_lowercase())
            .filter(|h| !h.is_empty())
    }

    /// Returns true if `hostname` (optionally `host/prefix`) is bound to this site.
    ///
    /// Both sides are compared lowercase since host names are case-insensitive.
    pub fn matches_hostname(&self, hostname: &str) -> bool {
        let wanted = hostname.trim().to_lowercase();
        self.hostname_entries().any(|h| h == wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(hostnames: Option<&str>) -> Site {
        Site {
            id: Uuid::new_v4(),
            title: "Test".into(),
            description: None,
            logo: None,
            hostnames: hostnames.map(String::from),
            culture: None,
            is_default: false,
            content_last_modified: None,
        }
    }

    #[test]
    fn test_hostname_entries_are_normalized() {
        let s = site(Some(" Example.com , example.com/EN ,,"));
        let entries: Vec<_> = s.hostname_entries().collect();
        assert_eq!(entries, vec!["example.com", "example.com/en"]);
    }

    #[test]
    fn test_matches_hostname_case_insensitive() {
        let s = site(Some("example.com,blog.example.com/en"));
        assert!(s.matches_hostname("EXAMPLE.COM"));
        assert!(s.matches_hostname("blog.example.com/EN"));
        assert!(!s.matches_hostname("blog.example.com"));
        assert!(!site(None).matches_hostname("example.com"));
    }
}
