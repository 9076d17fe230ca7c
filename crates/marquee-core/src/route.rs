//! Path matching for the single-post route.

use std::sync::LazyLock;

use regex::Regex;

/// Matches `/posts/{id}` with an optional trailing slash. The id segment is
/// anything non-empty that contains no `/`.
static POST_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/posts/([^/]+)/?$").unwrap());

/// Extracts the post id from a request path, or `None` when the path is not
/// the single-post route.
///
/// The id is returned exactly as it appears in the path, percent-encoding
/// included. It is only ever interpolated into the document-store URL and the
/// canonical URL, where the encoded form is what we want.
pub fn match_post_path(path: &str) -> Option<&str> {
    POST_PATH_RE
        .captures(path)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str())
}
