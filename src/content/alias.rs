//! Stored redirects from old URLs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Redirect flavour used by aliases and content redirects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedirectType {
    /// 301 Moved Permanently.
    Permanent,
    /// 302 Found.
    #[default]
    Temporary,
}

impl RedirectType {
    pub fn is_permanent(self) -> bool {
        self == RedirectType::Permanent
    }
}

/// A `(site, alias url) → redirect url` mapping, unique per site and url.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alias {
    pub id: Uuid,
    pub site_id: Uuid,
    /// Path the alias answers on, always starting with `/`.
    pub alias_url: String,
    pub redirect_url: String,
    #[serde(default, rename = "type")]
    pub redirect_type: RedirectType,
}
