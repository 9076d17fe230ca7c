//! Static asset resolution.
//!
//! The edge never serves files itself; every request is resolved against the
//! origin that hosts the built SPA (a CDN bucket, another reverse proxy, or
//! the same host in development). The [`AssetResolver`] trait is the seam the
//! rewrite pipeline is tested through.

use std::future::Future;

use anyhow::{Context, Result};
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};

/// Hop-by-hop headers, dropped from both directions of the proxied exchange.
const HOP_HEADERS: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// One inbound request, reduced to the parts the origin needs.
#[derive(Debug)]
pub struct AssetRequest {
    pub method: Method,
    pub path_and_query: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// One origin response, fully buffered.
///
/// `headers` and `body` are exactly what the pipeline passes through when no
/// rewrite applies, so resolvers must hand back what the origin sent (minus
/// hop-by-hop headers, which never survive a proxy).
#[derive(Debug, Clone)]
pub struct AssetResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl AssetResponse {
    /// Whether the response carries an HTML document, per its content type.
    pub fn is_html(&self) -> bool {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.to_ascii_lowercase().contains("text/html"))
    }

    /// Whether the body bytes were transformed by a content coding.
    ///
    /// Origins can answer compressed even when the request accepted no
    /// codings (stored objects with content-encoding metadata do); such
    /// bytes are opaque to the rewrite.
    pub fn is_encoded(&self) -> bool {
        self.headers
            .get_all(header::CONTENT_ENCODING)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(','))
            .any(|coding| !coding.trim().eq_ignore_ascii_case("identity"))
    }
}

impl IntoResponse for AssetResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// Source of the static SPA files.
pub trait AssetResolver: Send + Sync + 'static {
    /// Resolves one request against the asset origin.
    ///
    /// Called exactly once per inbound request; an error here means the edge
    /// has nothing to serve and surfaces as a 500.
    fn fetch(&self, request: AssetRequest) -> impl Future<Output = Result<AssetResponse>> + Send;
}

/// [`AssetResolver`] that proxies to an HTTP origin.
pub struct HttpAssetResolver {
    client: reqwest::Client,
    origin: String,
}

impl HttpAssetResolver {
    /// `origin` is scheme plus authority, no trailing slash.
    pub fn new(client: reqwest::Client, origin: String) -> Self {
        Self { client, origin }
    }
}

impl AssetResolver for HttpAssetResolver {
    async fn fetch(&self, request: AssetRequest) -> Result<AssetResponse> {
        let url = format!("{}{}", self.origin, request.path_and_query);

        let mut headers = request.headers;
        // Host and content-length are set per connection by the client.
        // Accept-encoding is dropped so the origin answers with identity
        // bytes; the rewrite path needs plaintext HTML.
        headers.remove(header::HOST);
        headers.remove(header::CONTENT_LENGTH);
        headers.remove(header::ACCEPT_ENCODING);
        strip_hop_headers(&mut headers);

        let mut builder = self.client.request(request.method, &url).headers(headers);
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }
        let response = builder
            .send()
            .await
            .with_context(|| format!("asset origin request for {url} failed"))?;

        let status = response.status();
        let mut headers = response.headers().clone();
        strip_hop_headers(&mut headers);
        let body = response
            .bytes()
            .await
            .with_context(|| format!("reading asset origin response body for {url}"))?;

        Ok(AssetResponse {
            status,
            headers,
            body,
        })
    }
}

pub(crate) fn strip_hop_headers(headers: &mut HeaderMap) {
    for name in HOP_HEADERS {
        headers.remove(name);
    }
}
