//! The single-post rewrite pipeline.
//!
//! Every inbound request lands here via the router fallback:
//!
//! 1. Match the path against `/posts/{id}`.
//! 2. A matched OPTIONS request is answered 204 before any upstream work.
//! 3. Resolve the asset, exactly once per request.
//! 4. Unmatched paths, non-HTML assets, and content-coded assets pass
//!    through byte-identically.
//! 5. A matched HEAD request gets the rewrite headers and no body, with no
//!    metadata lookup.
//! 6. Everything else that came back as HTML gets its head rewritten, with
//!    the metadata lookup bounded by the fetch timeout and every failure
//!    downgrading to the brand-default card.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use marquee_core::{SocialMeta, match_post_path, rewrite_document};

use crate::assets::{AssetRequest, AssetResolver, AssetResponse};
use crate::error::EdgeError;
use crate::state::AppState;
use crate::store::{DocumentStore, StoreError};

const HTML_CONTENT_TYPE: &str = "text/html; charset=UTF-8";
const CACHE_NO_STORE: &str = "no-store";

pub async fn edge_entry<A: AssetResolver, S: DocumentStore>(
    State(state): State<AppState<A, S>>,
    request: Request,
) -> Result<Response, EdgeError> {
    let method = request.method().clone();
    let post_id = match_post_path(request.uri().path()).map(str::to_owned);

    if post_id.is_some() && method == Method::OPTIONS {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let asset = resolve_asset(&state, request).await?;

    let Some(post_id) = post_id else {
        return Ok(asset.into_response());
    };
    if !asset.is_html() || asset.is_encoded() {
        return Ok(asset.into_response());
    }

    if method == Method::HEAD {
        return Ok(preview_response(asset.status, asset.headers, Body::empty()));
    }

    let meta = lookup_meta(&state, &post_id).await;
    let html = String::from_utf8_lossy(&asset.body);
    let rewritten = rewrite_document(&html, &meta);
    tracing::debug!(post_id = %post_id, bytes = rewritten.len(), "rewrote post document head");
    Ok(preview_response(
        asset.status,
        asset.headers,
        Body::from(rewritten),
    ))
}

/// Buffers the inbound request and resolves it against the asset origin.
async fn resolve_asset<A: AssetResolver, S: DocumentStore>(
    state: &AppState<A, S>,
    request: Request,
) -> Result<AssetResponse, EdgeError> {
    let (parts, body) = request.into_parts();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_owned())
        .unwrap_or_else(|| parts.uri.path().to_owned());
    let body = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(|error| EdgeError::BadRequest(error.to_string()))?;

    state
        .assets
        .fetch(AssetRequest {
            method: parts.method,
            path_and_query,
            headers: parts.headers,
            body,
        })
        .await
        .map_err(EdgeError::AssetFetch)
}

/// Resolves the preview metadata for one post, never failing: missing
/// documents, store errors, and lookups that outlive the fetch timeout all
/// render the brand-default card.
async fn lookup_meta<A: AssetResolver, S: DocumentStore>(
    state: &AppState<A, S>,
    post_id: &str,
) -> SocialMeta {
    let canonical_url = format!("{}/posts/{}", state.config.public_base_url, post_id);
    let lookup = tokio::time::timeout(state.config.fetch_timeout, state.store.fetch_post(post_id));
    let fields = match lookup.await {
        Ok(Ok(Some(fields))) => Some(fields),
        Ok(Ok(None)) => {
            tracing::debug!(post_id = %post_id, "post not found, rendering brand defaults");
            None
        }
        Ok(Err(StoreError::Unconfigured)) => {
            tracing::debug!("document store not configured, rendering brand defaults");
            None
        }
        Ok(Err(error)) => {
            tracing::warn!(
                post_id = %post_id,
                error = %error,
                "document lookup failed, rendering brand defaults"
            );
            None
        }
        Err(_) => {
            tracing::warn!(
                post_id = %post_id,
                timeout_ms = state.config.fetch_timeout.as_millis() as u64,
                "document lookup timed out, rendering brand defaults"
            );
            None
        }
    };

    SocialMeta::resolve(
        fields.as_ref(),
        &state.brand,
        &canonical_url,
        state.config.description_limit,
    )
}

/// Response envelope for the rewrite path: forced content type, cache
/// suppression, upstream status. Content-length is dropped so it is
/// recomputed for the new body.
fn preview_response(status: StatusCode, mut headers: HeaderMap, body: Body) -> Response {
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(HTML_CONTENT_TYPE),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(CACHE_NO_STORE),
    );
    headers.remove(header::CONTENT_LENGTH);

    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
