//! HTML head rewriting: entity escaping, stale-tag stripping, and meta-block
//! injection.
//!
//! The SPA shell ships with placeholder `<title>` and social tags baked in by
//! the frontend build. Rewriting replaces them wholesale: strip every tag the
//! preview block is about to provide, then insert the freshly rendered block
//! right before `</head>`. Running the rewrite over its own output yields the
//! same bytes, so a misconfigured double-pass (edge in front of edge) cannot
//! duplicate tags.

use std::sync::LazyLock;

use regex::Regex;

use crate::meta::SocialMeta;

/// Matches every head tag the preview block replaces: `<title>` elements,
/// `og:*` and `twitter:*` meta tags, the description meta tag, and the
/// canonical link. Case-insensitive, both quote styles, any attribute order.
/// Trailing whitespace is folded into the match so stripping an injected
/// block removes its newlines with it. Title content is matched as text
/// (no `<`), so an unterminated `<title>` is left alone instead of
/// swallowing everything up to a later closer.
static SOCIAL_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"(?i)(?:"#,
        r#"<title\b[^>]*>[^<]*</title\s*>"#,
        r#"|<meta\b[^>]*?\s(?:property|name)\s*=\s*["'](?:og:[^"']*|twitter:[^"']*|description)["'][^>]*>"#,
        r#"|<link\b[^>]*?\srel\s*=\s*["']canonical["'][^>]*>"#,
        r#")\s*"#,
    ))
    .unwrap()
});

const HEAD_CLOSE: &str = "</head>";

/// Escapes the five HTML-significant characters for safe interpolation into
/// text content and double-quoted attribute values.
pub fn escape_html(value: &str) -> String {
    // Ampersand first, or the other replacements would be re-escaped.
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Renders the full preview block for one post: title, description, Open
/// Graph tags, canonical link, and Twitter card tags, one per line. All
/// interpolated values are escaped here.
pub fn render_meta_block(meta: &SocialMeta) -> String {
    let title = escape_html(&meta.title);
    let description = escape_html(&meta.description);
    let image = escape_html(&meta.image);
    let url = escape_html(&meta.url);
    let site_name = escape_html(&meta.site_name);

    format!(
        "<title>{title}</title>\n\
         <meta name=\"description\" content=\"{description}\" />\n\
         <meta property=\"og:type\" content=\"article\" />\n\
         <meta property=\"og:site_name\" content=\"{site_name}\" />\n\
         <meta property=\"og:title\" content=\"{title}\" />\n\
         <meta property=\"og:description\" content=\"{description}\" />\n\
         <meta property=\"og:image\" content=\"{image}\" />\n\
         <meta property=\"og:image:secure_url\" content=\"{image}\" />\n\
         <meta property=\"og:url\" content=\"{url}\" />\n\
         <link rel=\"canonical\" href=\"{url}\" />\n\
         <meta name=\"twitter:card\" content=\"summary_large_image\" />\n\
         <meta name=\"twitter:title\" content=\"{title}\" />\n\
         <meta name=\"twitter:description\" content=\"{description}\" />\n\
         <meta name=\"twitter:image\" content=\"{image}\" />\n"
    )
}

/// Removes every tag [`render_meta_block`] is about to provide.
///
/// Stripping is confined to the region before `</head>`: a `<title>` inside
/// an inline SVG, say, is body content and must survive. When the document
/// has no `</head>` marker the whole input is swept.
pub fn strip_social_tags(html: &str) -> String {
    match html.find(HEAD_CLOSE) {
        Some(position) => {
            let (head, rest) = html.split_at(position);
            let mut out = SOCIAL_TAG_RE.replace_all(head, "").into_owned();
            out.push_str(rest);
            out
        }
        None => SOCIAL_TAG_RE.replace_all(html, "").into_owned(),
    }
}

/// Inserts a rendered block immediately before `</head>`, or at the start of
/// the document when no `</head>` marker exists.
pub fn inject_meta_block(html: &str, block: &str) -> String {
    match html.find(HEAD_CLOSE) {
        Some(position) => {
            let mut out = String::with_capacity(html.len() + block.len());
            out.push_str(&html[..position]);
            out.push_str(block);
            out.push_str(&html[position..]);
            out
        }
        None => format!("{block}{html}"),
    }
}

/// Full head rewrite: strip the stale preview tags, then inject the block
/// rendered from `meta`. Idempotent byte-for-byte.
pub fn rewrite_document(html: &str, meta: &SocialMeta) -> String {
    let stripped = strip_social_tags(html);
    inject_meta_block(&stripped, &render_meta_block(meta))
}
