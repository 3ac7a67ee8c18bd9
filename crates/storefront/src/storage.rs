//! Object storage REST client for uploaded print files.
//!
//! Talks to the hosted storage service's bucket API: `upload` puts a file
//! under a generated key, `public_url` derives the CDN-facing URL, and
//! `remove` best-effort deletes companion files when records are removed.

use rand::Rng;
use rand::distr::Alphanumeric;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::config::StorageConfig;

/// Length of the random suffix in generated object keys.
const KEY_SUFFIX_LEN: usize = 8;

/// Errors that can occur when talking to the storage service.
#[derive(Debug, Error)]
pub enum StorageError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Storage API returned an error response.
    #[error("storage API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Client configuration is invalid.
    #[error("storage config error: {0}")]
    Config(String),
}

/// Bucket-scoped client for the object storage service.
#[derive(Debug, Clone)]
pub struct StorageClient {
    client: reqwest::Client,
    endpoint: Url,
    bucket: String,
}

#[derive(Serialize)]
struct RemoveRequest<'a> {
    prefixes: &'a [String],
}

impl StorageClient {
    /// Create a new storage client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the service key is not a valid header value or
    /// the HTTP client fails to build.
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.service_key.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| StorageError::Config(format!("invalid service key: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert("Authorization", auth_header);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            bucket: config.bucket.clone(),
        })
    }

    /// Upload a file under `key` and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Http` on transport failure or
    /// `StorageError::Api` when the service rejects the upload.
    pub async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let url = self.object_url(key)?;

        let response = self
            .client
            .post(url)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        self.public_url(key)
    }

    /// Public URL for an object key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Config` if the key produces an invalid URL.
    pub fn public_url(&self, key: &str) -> Result<String, StorageError> {
        let url = self
            .endpoint
            .join(&format!("object/public/{}/{key}", self.bucket))
            .map_err(|e| StorageError::Config(format!("invalid object key {key}: {e}")))?;
        Ok(url.into())
    }

    /// Delete objects by key. Used for companion-file cleanup when records
    /// are removed; callers treat failure as non-fatal.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Http` on transport failure or
    /// `StorageError::Api` when the service rejects the delete.
    pub async fn remove(&self, keys: &[String]) -> Result<(), StorageError> {
        let url = self
            .endpoint
            .join(&format!("object/{}", self.bucket))
            .map_err(|e| StorageError::Config(format!("invalid bucket path: {e}")))?;

        let response = self
            .client
            .delete(url)
            .json(&RemoveRequest { prefixes: keys })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(())
    }

    fn object_url(&self, key: &str) -> Result<Url, StorageError> {
        self.endpoint
            .join(&format!("object/{}/{key}", self.bucket))
            .map_err(|e| StorageError::Config(format!("invalid object key {key}: {e}")))
    }
}

async fn api_error(response: reqwest::Response) -> StorageError {
    let status = response.status().as_u16();
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_owned());
    StorageError::Api { status, message }
}

/// Generate a collision-resistant object key for an uploaded file:
/// UTC timestamp + random alphanumeric suffix + the original extension.
#[must_use]
pub fn object_key(original_name: &str) -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%d%H%M%S");

    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(KEY_SUFFIX_LEN)
        .map(char::from)
        .collect();

    let extension = original_name
        .rsplit_once('.')
        .map(|(_, ext)| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default();

    format!("{timestamp}-{suffix}{extension}")
}

/// Extract the object key from a public URL produced by this client.
///
/// Returns `None` for URLs that don't point into the public object space.
#[must_use]
pub fn key_from_public_url(url: &str) -> Option<String> {
    url.split_once("/object/public/")
        .and_then(|(_, rest)| rest.split_once('/'))
        .map(|(_bucket, key)| key.to_owned())
}
