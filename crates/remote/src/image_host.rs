//! REST client for the image-hosting admin API.
//!
//! Lists the uploaded images under a folder prefix, following
//! `next_cursor` pagination until the host reports no further pages.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Page size requested from the host (its documented maximum).
const PAGE_SIZE: u32 = 500;

/// Hard stop for pagination in case the host keeps returning a cursor.
const MAX_PAGES: usize = 200;

/// Connection settings for the image host.
#[derive(Debug, Clone)]
pub struct ImageHostConfig {
    /// Base admin API URL, e.g. `https://api.cloudinary.com/v1_1`.
    pub api_url: String,
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

/// One uploaded image as reported by the host.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HostedImage {
    pub public_id: String,
    pub secure_url: String,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub bytes: Option<u64>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// One page of the resources listing.
#[derive(Debug, Deserialize)]
struct ResourcesPage {
    #[serde(default)]
    resources: Vec<HostedImage>,
    #[serde(default)]
    next_cursor: Option<String>,
}

/// Errors from the image host layer.
#[derive(Debug, thiserror::Error)]
pub enum ImageHostError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The host returned a non-2xx status code.
    #[error("Image host API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    /// The folder argument cannot be turned into a prefix.
    #[error("Invalid folder: {0}")]
    InvalidFolder(String),

    /// The host never stopped returning a cursor.
    #[error("Image host returned more than {0} pages")]
    TooManyPages(usize),
}

/// HTTP client for the image host's admin API.
pub struct ImageHostClient {
    client: reqwest::Client,
    config: ImageHostConfig,
}

impl ImageHostClient {
    /// Create a client with a per-request timeout.
    pub fn new(config: ImageHostConfig, timeout: Duration) -> Result<Self, ImageHostError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, config })
    }

    /// List every image stored under `folder`.
    ///
    /// Sends `GET {api_url}/{cloud}/resources/image/upload?prefix={folder}/`
    /// with HTTP basic auth, then repeats with `next_cursor` until the host
    /// stops returning one.
    pub async fn list_folder(&self, folder: &str) -> Result<Vec<HostedImage>, ImageHostError> {
        let prefix = folder_prefix(folder)?;
        let url = self.resources_url();

        let mut images = Vec::new();
        let mut cursor: Option<String> = None;

        for page in 1..=MAX_PAGES {
            let mut request = self
                .client
                .get(&url)
                .basic_auth(&self.config.api_key, Some(&self.config.api_secret))
                .query(&[("prefix", prefix.as_str())])
                .query(&[("max_results", PAGE_SIZE)]);
            if let Some(next) = &cursor {
                request = request.query(&[("next_cursor", next.as_str())]);
            }

            let response = request.send().await?;
            let body: ResourcesPage = parse_response(response).await?;
            tracing::debug!(
                page,
                received = body.resources.len(),
                has_more = body.next_cursor.is_some(),
                "Fetched image host page"
            );

            images.extend(body.resources);
            match body.next_cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => return Ok(images),
            }
        }

        Err(ImageHostError::TooManyPages(MAX_PAGES))
    }

    fn resources_url(&self) -> String {
        format!(
            "{}/{}/resources/image/upload",
            self.config.api_url.trim_end_matches('/'),
            self.config.cloud_name
        )
    }
}

/// Turn a user-supplied folder into the host's prefix form: no leading
/// slash, exactly one trailing slash.
pub fn folder_prefix(folder: &str) -> Result<String, ImageHostError> {
    let trimmed = folder.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Err(ImageHostError::InvalidFolder(
            "folder must not be empty".to_string(),
        ));
    }
    if trimmed.split('/').any(|segment| segment.is_empty() || segment == "..") {
        return Err(ImageHostError::InvalidFolder(format!(
            "malformed folder path '{folder}'"
        )));
    }
    Ok(format!("{trimmed}/"))
}

/// Sum of reported sizes, ignoring images the host did not size.
pub fn total_bytes(images: &[HostedImage]) -> u64 {
    images.iter().filter_map(|image| image.bytes).sum()
}

/// Ensure a success status, then decode the JSON body.
async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ImageHostError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(ImageHostError::ApiError {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json::<T>().await?)
}
