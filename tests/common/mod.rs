//! Shared content fixture for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use cms_router::content::{
    Alias, Page, Post, RedirectType, Site, Taxonomy, TaxonomyKind,
};
use cms_router::store::{Api, ContentSeed, MemoryStore};

pub const MAIN_SITE: Uuid = Uuid::from_u128(0x100);
pub const DOCS_SITE: Uuid = Uuid::from_u128(0x200);
pub const OTHER_SITE: Uuid = Uuid::from_u128(0x300);

pub const HOME: Uuid = Uuid::from_u128(0x1001);
pub const ABOUT: Uuid = Uuid::from_u128(0x1002);
pub const TEAM: Uuid = Uuid::from_u128(0x1003);
pub const BLOG: Uuid = Uuid::from_u128(0x1004);
pub const SECRET: Uuid = Uuid::from_u128(0x1005);
pub const OLD_PAGE: Uuid = Uuid::from_u128(0x1006);
pub const CONTACT: Uuid = Uuid::from_u128(0x1007);
pub const HIDDEN: Uuid = Uuid::from_u128(0x1008);

pub const DOCS_HOME: Uuid = Uuid::from_u128(0x2001);
pub const GUIDE: Uuid = Uuid::from_u128(0x2002);

pub const OTHER_HOME: Uuid = Uuid::from_u128(0x3001);

pub const HELLO_POST: Uuid = Uuid::from_u128(0x4001);
pub const DRAFT_POST: Uuid = Uuid::from_u128(0x4002);
pub const MOVED_POST: Uuid = Uuid::from_u128(0x4003);

pub const NEWS: Uuid = Uuid::from_u128(0x5001);
pub const RUST_TAG: Uuid = Uuid::from_u128(0x5002);

pub fn modified() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
}

fn published() -> Option<DateTime<Utc>> {
    Some(Utc::now() - Duration::days(7))
}

fn site(id: Uuid, title: &str, hostnames: &str, is_default: bool) -> Site {
    Site {
        id,
        title: title.into(),
        description: None,
        logo: None,
        hostnames: Some(hostnames.into()),
        culture: Some("en-US".into()),
        is_default,
        content_last_modified: Some(modified()),
    }
}

fn page(id: Uuid, site_id: Uuid, slug: &str, sort_order: u32) -> Page {
    Page {
        id,
        site_id,
        parent_id: None,
        sort_order,
        type_id: "Standard".into(),
        title: slug.to_uppercase(),
        slug: slug.into(),
        route: None,
        published: published(),
        last_modified: modified(),
        redirect_url: None,
        redirect_type: RedirectType::Temporary,
        meta_index: true,
        meta_follow: true,
        meta_priority: 0.5,
    }
}

fn post(id: Uuid, slug: &str) -> Post {
    Post {
        id,
        archive_id: BLOG,
        title: slug.to_uppercase(),
        slug: slug.into(),
        route: None,
        permalink: None,
        category_id: Some(NEWS),
        tag_ids: vec![RUST_TAG],
        published: published(),
        last_modified: modified(),
        redirect_url: None,
        redirect_type: RedirectType::Temporary,
        meta_index: true,
        meta_priority: 0.5,
    }
}

/// Three sites: `example.com` (default), `example.com/docs` and `other.org`.
pub fn content() -> ContentSeed {
    let team = Page {
        parent_id: Some(ABOUT),
        ..page(TEAM, MAIN_SITE, "about/team", 0)
    };
    let blog = Page {
        type_id: "Blog".into(),
        ..page(BLOG, MAIN_SITE, "blog", 2)
    };
    let secret = Page {
        published: None,
        ..page(SECRET, MAIN_SITE, "secret", 3)
    };
    let old_page = Page {
        redirect_url: Some("/about".into()),
        redirect_type: RedirectType::Permanent,
        ..page(OLD_PAGE, MAIN_SITE, "old-page", 4)
    };
    let contact = Page {
        route: Some("/contact-form".into()),
        ..page(CONTACT, MAIN_SITE, "contact", 5)
    };
    let hidden = Page {
        meta_index: false,
        ..page(HIDDEN, MAIN_SITE, "hidden", 6)
    };

    let draft_post = Post {
        published: None,
        ..post(DRAFT_POST, "upcoming")
    };
    let moved_post = Post {
        redirect_url: Some("https://elsewhere.org/hello".into()),
        ..post(MOVED_POST, "moved")
    };

    ContentSeed {
        sites: vec![
            site(MAIN_SITE, "Main", "example.com, www.example.com", true),
            site(DOCS_SITE, "Docs", "example.com/docs", false),
            site(OTHER_SITE, "Other", "other.org", false),
        ],
        page_types: Vec::new(),
        pages: vec![
            page(HOME, MAIN_SITE, "home", 0),
            page(ABOUT, MAIN_SITE, "about", 1),
            team,
            blog,
            secret,
            old_page,
            contact,
            hidden,
            page(DOCS_HOME, DOCS_SITE, "start", 0),
            page(GUIDE, DOCS_SITE, "guide", 1),
            page(OTHER_HOME, OTHER_SITE, "welcome", 0),
        ],
        posts: vec![post(HELLO_POST, "hello-world"), draft_post, moved_post],
        aliases: vec![
            Alias {
                id: Uuid::from_u128(0x6001),
                site_id: MAIN_SITE,
                alias_url: "/old-url".into(),
                redirect_url: "/about".into(),
                redirect_type: RedirectType::Permanent,
            },
            Alias {
                id: Uuid::from_u128(0x6002),
                site_id: MAIN_SITE,
                alias_url: "/promo/spring".into(),
                redirect_url: "/blog".into(),
                redirect_type: RedirectType::Temporary,
            },
        ],
        taxonomies: vec![
            Taxonomy {
                id: NEWS,
                archive_id: BLOG,
                kind: TaxonomyKind::Category,
                title: "News".into(),
                slug: "news".into(),
            },
            Taxonomy {
                id: RUST_TAG,
                archive_id: BLOG,
                kind: TaxonomyKind::Tag,
                title: "Rust".into(),
                slug: "rust".into(),
            },
        ],
    }
}

pub fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new(content()).unwrap())
}

pub fn api() -> Api {
    Api::from_store(store())
}
