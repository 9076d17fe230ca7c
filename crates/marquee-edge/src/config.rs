//! Application configuration loaded from environment variables.

use std::time::Duration;

use marquee_core::{BrandDefaults, DEFAULT_DESCRIPTION_LIMIT};

const DEFAULT_FETCH_TIMEOUT_MS: u64 = 2000;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8787").
    pub bind_addr: String,

    /// Public base URL of the site, used for canonical URLs and as the
    /// asset-origin fallback. No trailing slash.
    pub public_base_url: String,

    /// Site name rendered into `og:site_name`.
    pub site_name: String,

    /// Fallback card title when a post supplies none.
    pub default_title: String,

    /// Fallback card description when a post supplies none.
    pub default_description: String,

    /// Fallback card image when a post supplies none.
    pub default_image: String,

    /// Origin the static SPA assets are fetched from. `None` falls back to
    /// `public_base_url`.
    pub asset_origin: Option<String>,

    /// Base URL of the document-store REST API. No trailing slash.
    pub docstore_base_url: String,

    /// Project id for the document store. While unset, metadata lookups are
    /// disabled and every card renders the brand defaults.
    pub docstore_project_id: Option<String>,

    /// Collection the post documents live in.
    pub docstore_collection: String,

    /// Upper bound on one metadata lookup, store round-trip included.
    pub fetch_timeout: Duration,

    /// Character bound for generated descriptions.
    pub description_limit: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - None (all have defaults for local development)
    ///
    /// Optional:
    /// - `MARQUEE_BIND_ADDR`: Server bind address (default: "0.0.0.0:8787")
    /// - `MARQUEE_PUBLIC_BASE_URL`: Public site URL (default: "http://localhost:8787")
    /// - `MARQUEE_SITE_NAME`: Site name for OG tags (default: "Marquee")
    /// - `MARQUEE_DEFAULT_TITLE`: Fallback title (default: the site name)
    /// - `MARQUEE_DEFAULT_DESCRIPTION`: Fallback description (default: empty)
    /// - `MARQUEE_DEFAULT_IMAGE`: Fallback image URL (default: "{base}/logo.png")
    /// - `MARQUEE_ASSET_ORIGIN`: Static asset origin (default: the public base URL)
    /// - `DOCSTORE_BASE_URL`: Document-store endpoint (default: "https://firestore.googleapis.com")
    /// - `DOCSTORE_PROJECT_ID`: Document-store project; unset disables lookups
    /// - `DOCSTORE_COLLECTION`: Post collection name (default: "posts")
    /// - `MARQUEE_FETCH_TIMEOUT_MS`: Metadata lookup deadline (default: 2000)
    /// - `MARQUEE_DESCRIPTION_LIMIT`: Description character bound (default: 180)
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("MARQUEE_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8787".to_string());

        let public_base_url = std::env::var("MARQUEE_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8787".to_string())
            .trim_end_matches('/')
            .to_string();

        let site_name =
            std::env::var("MARQUEE_SITE_NAME").unwrap_or_else(|_| "Marquee".to_string());

        let default_title =
            std::env::var("MARQUEE_DEFAULT_TITLE").unwrap_or_else(|_| site_name.clone());

        let default_description = std::env::var("MARQUEE_DEFAULT_DESCRIPTION").unwrap_or_default();

        let default_image = std::env::var("MARQUEE_DEFAULT_IMAGE")
            .unwrap_or_else(|_| format!("{public_base_url}/logo.png"));

        let asset_origin = std::env::var("MARQUEE_ASSET_ORIGIN")
            .ok()
            .filter(|v| !v.is_empty())
            .map(|v| v.trim_end_matches('/').to_string());

        let docstore_base_url = std::env::var("DOCSTORE_BASE_URL")
            .unwrap_or_else(|_| "https://firestore.googleapis.com".to_string())
            .trim_end_matches('/')
            .to_string();

        let docstore_project_id = std::env::var("DOCSTORE_PROJECT_ID")
            .ok()
            .filter(|v| !v.is_empty());

        let docstore_collection =
            std::env::var("DOCSTORE_COLLECTION").unwrap_or_else(|_| "posts".to_string());

        let fetch_timeout_ms: u64 = match std::env::var("MARQUEE_FETCH_TIMEOUT_MS") {
            Ok(raw) => raw.parse().map_err(|_| {
                anyhow::anyhow!("MARQUEE_FETCH_TIMEOUT_MS must be an integer, got {raw:?}")
            })?,
            Err(_) => DEFAULT_FETCH_TIMEOUT_MS,
        };

        let description_limit: usize = match std::env::var("MARQUEE_DESCRIPTION_LIMIT") {
            Ok(raw) => raw.parse().map_err(|_| {
                anyhow::anyhow!("MARQUEE_DESCRIPTION_LIMIT must be an integer, got {raw:?}")
            })?,
            Err(_) => DEFAULT_DESCRIPTION_LIMIT,
        };

        tracing::info!(
            bind_addr = %bind_addr,
            public_base_url = %public_base_url,
            site_name = %site_name,
            asset_origin = ?asset_origin,
            docstore_base_url = %docstore_base_url,
            docstore_configured = docstore_project_id.is_some(),
            docstore_collection = %docstore_collection,
            fetch_timeout_ms,
            description_limit,
            "configuration loaded"
        );

        Ok(Self {
            bind_addr,
            public_base_url,
            site_name,
            default_title,
            default_description,
            default_image,
            asset_origin,
            docstore_base_url,
            docstore_project_id,
            docstore_collection,
            fetch_timeout: Duration::from_millis(fetch_timeout_ms),
            description_limit,
        })
    }

    /// The brand-default card values, used whenever a post supplies nothing
    /// better.
    pub fn brand(&self) -> BrandDefaults {
        BrandDefaults {
            site_name: self.site_name.clone(),
            title: self.default_title.clone(),
            description: self.default_description.clone(),
            image: self.default_image.clone(),
        }
    }
}

#[cfg(test)]
impl Config {
    /// Fixed configuration for pipeline tests; no environment involved.
    pub(crate) fn for_tests() -> Self {
        Self {
            bind_addr: "127.0.0.1:0".to_string(),
            public_base_url: "https://marquee.test".to_string(),
            site_name: "Marquee".to_string(),
            default_title: "Marquee".to_string(),
            default_description: "Watch live.".to_string(),
            default_image: "https://marquee.test/logo.png".to_string(),
            asset_origin: None,
            docstore_base_url: "https://store.test".to_string(),
            docstore_project_id: Some("marquee-test".to_string()),
            docstore_collection: "posts".to_string(),
            fetch_timeout: Duration::from_millis(200),
            description_limit: 180,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mutex to serialize config tests that manipulate env vars.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_KEYS: &[&str] = &[
        "MARQUEE_BIND_ADDR",
        "MARQUEE_PUBLIC_BASE_URL",
        "MARQUEE_SITE_NAME",
        "MARQUEE_DEFAULT_TITLE",
        "MARQUEE_DEFAULT_DESCRIPTION",
        "MARQUEE_DEFAULT_IMAGE",
        "MARQUEE_ASSET_ORIGIN",
        "DOCSTORE_BASE_URL",
        "DOCSTORE_PROJECT_ID",
        "DOCSTORE_COLLECTION",
        "MARQUEE_FETCH_TIMEOUT_MS",
        "MARQUEE_DESCRIPTION_LIMIT",
    ];

    /// Helper to run config tests with isolated env vars.
    /// Uses a mutex to prevent concurrent env var races.
    fn with_env_vars<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let _guard = ENV_MUTEX.lock().unwrap();

        let saved: Vec<_> = ENV_KEYS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();

        // SAFETY: Serialized by mutex; only test code touches these vars.
        unsafe {
            for k in ENV_KEYS {
                std::env::remove_var(k);
            }
            for (k, v) in vars {
                std::env::set_var(k, v);
            }
        }

        f();

        // SAFETY: Restoring original env state.
        unsafe {
            for (k, v) in &saved {
                match v {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn config_defaults() {
        with_env_vars(&[], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.bind_addr, "0.0.0.0:8787");
            assert_eq!(config.public_base_url, "http://localhost:8787");
            assert_eq!(config.site_name, "Marquee");
            assert_eq!(config.default_title, "Marquee");
            assert_eq!(config.default_description, "");
            assert_eq!(config.default_image, "http://localhost:8787/logo.png");
            assert_eq!(config.asset_origin, None);
            assert_eq!(config.docstore_base_url, "https://firestore.googleapis.com");
            assert_eq!(config.docstore_project_id, None);
            assert_eq!(config.docstore_collection, "posts");
            assert_eq!(config.fetch_timeout, Duration::from_millis(2000));
            assert_eq!(config.description_limit, 180);
        });
    }

    #[test]
    fn config_custom_values() {
        with_env_vars(
            &[
                ("MARQUEE_BIND_ADDR", "127.0.0.1:9000"),
                ("MARQUEE_SITE_NAME", "Celestial"),
                ("DOCSTORE_PROJECT_ID", "celestial-prod"),
                ("DOCSTORE_COLLECTION", "stories"),
                ("MARQUEE_FETCH_TIMEOUT_MS", "250"),
                ("MARQUEE_DESCRIPTION_LIMIT", "80"),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.bind_addr, "127.0.0.1:9000");
                assert_eq!(config.site_name, "Celestial");
                assert_eq!(config.docstore_project_id.as_deref(), Some("celestial-prod"));
                assert_eq!(config.docstore_collection, "stories");
                assert_eq!(config.fetch_timeout, Duration::from_millis(250));
                assert_eq!(config.description_limit, 80);
            },
        );
    }

    #[test]
    fn config_default_title_and_image_follow_site_settings() {
        with_env_vars(
            &[
                ("MARQUEE_SITE_NAME", "Celestial"),
                ("MARQUEE_PUBLIC_BASE_URL", "https://celestial.tv"),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.default_title, "Celestial");
                assert_eq!(config.default_image, "https://celestial.tv/logo.png");
            },
        );
    }

    #[test]
    fn config_base_urls_trailing_slash_stripped() {
        with_env_vars(
            &[
                ("MARQUEE_PUBLIC_BASE_URL", "https://celestial.tv/"),
                ("MARQUEE_ASSET_ORIGIN", "https://assets.celestial.tv/"),
                ("DOCSTORE_BASE_URL", "https://store.test/"),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.public_base_url, "https://celestial.tv");
                assert_eq!(
                    config.asset_origin.as_deref(),
                    Some("https://assets.celestial.tv")
                );
                assert_eq!(config.docstore_base_url, "https://store.test");
            },
        );
    }

    #[test]
    fn config_empty_optionals_count_as_unset() {
        with_env_vars(
            &[("MARQUEE_ASSET_ORIGIN", ""), ("DOCSTORE_PROJECT_ID", "")],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.asset_origin, None);
                assert_eq!(config.docstore_project_id, None);
            },
        );
    }

    #[test]
    fn config_rejects_unparseable_numbers() {
        with_env_vars(&[("MARQUEE_FETCH_TIMEOUT_MS", "soon")], || {
            assert!(Config::from_env().is_err());
        });
        with_env_vars(&[("MARQUEE_DESCRIPTION_LIMIT", "-5")], || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn config_brand_mirrors_default_fields() {
        with_env_vars(
            &[
                ("MARQUEE_SITE_NAME", "Celestial"),
                ("MARQUEE_DEFAULT_TITLE", "Celestial TV"),
                ("MARQUEE_DEFAULT_DESCRIPTION", "Live shows."),
                ("MARQUEE_DEFAULT_IMAGE", "https://celestial.tv/card.png"),
            ],
            || {
                let brand = Config::from_env().unwrap().brand();
                assert_eq!(brand.site_name, "Celestial");
                assert_eq!(brand.title, "Celestial TV");
                assert_eq!(brand.description, "Live shows.");
                assert_eq!(brand.image, "https://celestial.tv/card.png");
            },
        );
    }
}
