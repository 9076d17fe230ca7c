//! marquee-edge: the HTTP edge that gives the Marquee SPA real social
//! previews.
//!
//! The SPA is statically hosted, so every post URL serves the same shell
//! with the same placeholder head, and crawlers never run the JavaScript
//! that would fill it in. This service sits in front of the static origin,
//! passes everything through untouched, and rewrites just the `<head>` of
//! `/posts/{id}` documents with per-post Open Graph and Twitter tags looked
//! up from the document store.
//!
//! Module map:
//!
//! - [`assets`]: resolution of every request against the static origin
//! - [`store`]: post metadata lookups (Firestore-style REST)
//! - [`routes`]: the rewrite-or-pass-through pipeline
//! - [`config`] / [`state`] / [`error`]: the usual service plumbing
//!
//! The pure string work (path matching, field precedence, head surgery)
//! lives in the `marquee-core` crate.

pub mod assets;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;

pub use config::Config;
pub use routes::router;
pub use state::AppState;
