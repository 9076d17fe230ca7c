//! Post metadata lookups against the document store.
//!
//! The store speaks a Firestore-style REST protocol: one GET per document,
//! every field wrapped in a `{"stringValue": ...}` envelope. Only string
//! fields participate in previews; anything else in the document is ignored.

use std::future::Future;

use axum::http::StatusCode;
use marquee_core::PostFields;
use serde::Deserialize;

/// Failure modes of one metadata lookup.
///
/// None of these fail the page. The pipeline logs them and renders the
/// brand-default card instead.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("document store project id is not configured")]
    Unconfigured,
    #[error("document store request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("document store answered {0}")]
    Status(StatusCode),
    #[error("document payload could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Source of per-post metadata.
pub trait DocumentStore: Send + Sync + 'static {
    /// Looks up one post document by id.
    ///
    /// `Ok(None)` means the document does not exist, which is an ordinary
    /// outcome, not an error.
    fn fetch_post(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<PostFields>, StoreError>> + Send;
}

/// [`DocumentStore`] backed by the Firestore-style REST endpoint.
pub struct RestDocumentStore {
    client: reqwest::Client,
    base_url: String,
    project_id: Option<String>,
    collection: String,
}

impl RestDocumentStore {
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        project_id: Option<String>,
        collection: String,
    ) -> Self {
        Self {
            client,
            base_url,
            project_id,
            collection,
        }
    }
}

impl DocumentStore for RestDocumentStore {
    async fn fetch_post(&self, id: &str) -> Result<Option<PostFields>, StoreError> {
        let Some(project) = self.project_id.as_deref() else {
            return Err(StoreError::Unconfigured);
        };
        let url = document_url(&self.base_url, project, &self.collection, id);

        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(StoreError::Status(response.status()));
        }

        let payload = response.bytes().await?;
        let document: WireDocument = serde_json::from_slice(&payload)?;
        Ok(Some(document.into_fields()))
    }
}

fn document_url(base_url: &str, project: &str, collection: &str, id: &str) -> String {
    format!(
        "{base_url}/v1/projects/{project}/databases/(default)/documents/{collection}/{id}"
    )
}

/// Document envelope: `{"fields": {"title": {"stringValue": "..."}}}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WireDocument {
    fields: WireFields,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireFields {
    title: WireValue,
    content: WireValue,
    image: WireValue,
    share_title: WireValue,
    share_description: WireValue,
    share_image: WireValue,
}

/// A typed field value. Non-string envelopes decode with `string_value`
/// unset, which downstream treats as absent.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct WireValue {
    string_value: Option<String>,
}

impl WireDocument {
    fn into_fields(self) -> PostFields {
        let fields = self.fields;
        PostFields {
            title: fields.title.string_value,
            content: fields.content.string_value,
            image: fields.image.string_value,
            share_title: fields.share_title.string_value,
            share_description: fields.share_description.string_value,
            share_image: fields.share_image.string_value,
        }
    }
}
