//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, path, query)
//!     → request.rs (normalize host, split segments, flags)
//!     → site.rs (site prefix / hostname / default)
//!     → alias.rs (exact-path redirects)
//!     → locator.rs (longest page slug, then post slug)
//!     → archive.rs (category/tag/year/month/page filters)
//!     → rewrite.rs (internal route + query, or redirect)
//!     → Resolution { action, context }
//! ```
//!
//! # Design Decisions
//! - Content records are read-only during routing
//! - Not-found never errors: the request passes through unmodified
//! - Deterministic: same request and content always yield the same route
//! - Query parameters are an ordered immutable list serialized once

pub mod alias;
pub mod archive;
pub mod context;
pub mod locator;
pub mod query;
pub mod request;
pub mod resolver;
pub mod rewrite;
pub mod site;

pub use context::{RenderTarget, RequestContext, SiteContext};
pub use query::RouteQuery;
pub use request::RouteRequest;
pub use resolver::{Resolution, Resolver, RouteAction, RoutingError};
pub use rewrite::{Redirect, RewrittenRoute};
