//! Request-level errors for the edge pipeline.
//!
//! Only failures that leave the edge with nothing to serve end up here.
//! Document-store problems are not in this enum: metadata lookups degrade to
//! the brand-default card instead of failing the page.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use maud::{DOCTYPE, Markup, PreEscaped, html};

const ERROR_CSS: &str = "body{margin:0;font-family:system-ui,sans-serif;background:#0b0b10;color:#e8e8ef;display:grid;place-items:center;min-height:100vh}main{text-align:center}h1{font-size:3rem;margin:0 0 .5rem}p{color:#9a9aa8}";

#[derive(Debug, thiserror::Error)]
pub enum EdgeError {
    /// The asset origin could not be reached or its answer could not be
    /// read.
    #[error("asset fetch failed: {0}")]
    AssetFetch(anyhow::Error),
    /// The inbound request body could not be buffered.
    #[error("unreadable request body: {0}")]
    BadRequest(String),
}

impl EdgeError {
    fn status(&self) -> StatusCode {
        match self {
            Self::AssetFetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            Self::AssetFetch(_) => "The page could not be loaded right now.",
            Self::BadRequest(_) => "The request could not be read.",
        }
    }
}

impl IntoResponse for EdgeError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (status, error_page(status, self.public_message())).into_response()
    }
}

fn error_page(status: StatusCode, message: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (status.as_u16()) }
                style { (PreEscaped(ERROR_CSS)) }
            }
            body {
                main {
                    h1 { (status.as_u16()) }
                    p { (message) }
                }
            }
        }
    }
}
