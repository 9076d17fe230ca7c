//! Post metadata model and preview-field resolution.
//!
//! A post document carries base fields (`title`, `content`, `image`) plus
//! optional share overrides that editors use to tune the social card without
//! touching the rendered post. Resolution picks, per preview field, the
//! override first, then the base field, then the brand default. Empty strings
//! count as absent at every step.

/// Raw per-post fields as read from the document store.
///
/// All fields are optional; a document with none of them still resolves (to
/// the brand defaults). Values are kept verbatim, empty strings included, and
/// filtered at resolution time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostFields {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
    pub share_title: Option<String>,
    pub share_description: Option<String>,
    pub share_image: Option<String>,
}

/// Site-wide fallback values, built once from configuration.
#[derive(Debug, Clone)]
pub struct BrandDefaults {
    pub site_name: String,
    pub title: String,
    pub description: String,
    pub image: String,
}

/// Resolved preview values for one document rewrite.
///
/// Every field is a final, non-optional string: the fallback chain has
/// already run and the description has been shaped. Values are unescaped;
/// escaping happens when the meta block is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialMeta {
    pub title: String,
    pub description: String,
    pub image: String,
    pub url: String,
    pub site_name: String,
}

impl SocialMeta {
    /// Resolves the preview fields for one post.
    ///
    /// `fields` is `None` when the document was missing or the store could
    /// not be reached; the result is then the pure brand-default card. The
    /// description is shaped (whitespace collapsed, bounded to
    /// `description_limit` characters) regardless of which source supplied
    /// it.
    pub fn resolve(
        fields: Option<&PostFields>,
        brand: &BrandDefaults,
        canonical_url: &str,
        description_limit: usize,
    ) -> Self {
        let title = fields
            .and_then(|f| {
                nonempty(f.share_title.as_deref()).or_else(|| nonempty(f.title.as_deref()))
            })
            .unwrap_or(&brand.title);
        let description = fields
            .and_then(|f| {
                nonempty(f.share_description.as_deref()).or_else(|| nonempty(f.content.as_deref()))
            })
            .unwrap_or(&brand.description);
        let image = fields
            .and_then(|f| {
                nonempty(f.share_image.as_deref()).or_else(|| nonempty(f.image.as_deref()))
            })
            .unwrap_or(&brand.image);

        Self {
            title: title.to_owned(),
            description: shape_description(description, description_limit),
            image: image.to_owned(),
            url: canonical_url.to_owned(),
            site_name: brand.site_name.clone(),
        }
    }
}

fn nonempty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Collapses every run of whitespace to a single space, trims the ends, and
/// bounds the result to `limit` characters.
///
/// The bound counts `char`s, not bytes, so multibyte text is never split
/// mid-character.
pub fn shape_description(text: &str, limit: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= limit {
        collapsed
    } else {
        collapsed.chars().take(limit).collect()
    }
}
