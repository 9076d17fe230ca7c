//! Core rewrite engine for marquee.
//!
//! This crate holds the deterministic half of the edge preview rewriter:
//!
//! - Route matching for single-post paths ([`route`])
//! - Metadata field precedence and description shaping ([`meta`])
//! - HTML entity escaping and head rewriting ([`html`])
//!
//! Everything here is pure string transformation: no I/O, no async, no
//! request state. The `marquee-edge` crate wires these pieces into the HTTP
//! pipeline.

pub mod html;
pub mod meta;
pub mod route;

/// Default bound on generated preview descriptions, in characters.
pub const DEFAULT_DESCRIPTION_LIMIT: usize = 180;

pub use html::{
    escape_html, inject_meta_block, render_meta_block, rewrite_document, strip_social_tags,
};
pub use meta::{BrandDefaults, PostFields, SocialMeta, shape_description};
pub use route::match_post_path;
