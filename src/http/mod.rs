//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, timeout, request ID, trace layers)
//!     → middleware.rs (resolve; redirect, sitemap or rewrite the URI)
//!     → inner router (dispatch on the rewritten path)
//!     → handler.rs (cache.rs negotiation, then render)
//!     → Send to client
//! ```
//!
//! # Design Decisions
//! - Routing runs outside the inner router so rewrites change dispatch
//! - Routing state is swapped atomically on config reload
//! - Redirects use 301/302, not the 307/308 of `axum::response::Redirect`

pub mod cache;
pub mod handler;
pub mod middleware;
pub mod request;
pub mod server;

pub use cache::{generate_etag, handle_cache, is_cached, CacheInfo};
pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
