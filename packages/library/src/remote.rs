//! Fetching the source text from the document-sharing service.
//!
//! Documents are exported as plain text. A document that is not shared
//! publicly answers with an HTML sign-in page instead, which is reported as
//! [`LibraryError::NotText`].

use reqwest::blocking::Client;

use crate::config::{export_url, validate_doc_id};
use crate::error::{LibraryError, Result};
use crate::http::{bytes_to_string, create_client, download};

/// Something that can produce the raw source text for a document ID.
pub trait TextSource {
    fn fetch(&self, doc_id: &str) -> Result<String>;
}

/// Fetch the plain-text export of a remote document.
pub fn fetch_remote_text(client: &Client, base_url: &str, doc_id: &str) -> Result<String> {
    validate_doc_id(doc_id)?;

    let url = export_url(base_url, doc_id);
    tracing::debug!(url = %url, "Fetching remote document");

    let response = download(client, &url).map_err(|e| {
        if let LibraryError::Http(source) = e {
            LibraryError::RemoteFetch {
                doc_id: doc_id.to_string(),
                source,
            }
        } else {
            e
        }
    })?;

    if let Some(content_type) = &response.content_type {
        if content_type.to_ascii_lowercase().starts_with("text/html") {
            return Err(LibraryError::NotText {
                doc_id: doc_id.to_string(),
                content_type: content_type.clone(),
            });
        }
    }

    Ok(bytes_to_string(
        &response.bytes,
        &format!("remote document {doc_id}"),
    ))
}

/// [`TextSource`] backed by the remote export endpoint.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    client: Client,
    base_url: String,
}

impl RemoteSource {
    /// Create a source with a fresh HTTP client.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self::with_client(create_client()?, base_url))
    }

    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl TextSource for RemoteSource {
    fn fetch(&self, doc_id: &str) -> Result<String> {
        fetch_remote_text(&self.client, &self.base_url, doc_id)
    }
}
