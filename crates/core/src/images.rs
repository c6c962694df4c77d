//! Parsing and classification of the `images` column.
//!
//! The column stores a JSON-encoded array of URL strings as plain text.
//! Nothing in the schema enforces that, so every reader goes through
//! [`parse_image_list`].

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// An image entry must be an absolute http(s) URL without whitespace.
static IMAGE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/]+\S*$").expect("valid regex"));

/// Why a stored `images` value is not a well-formed URL list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ImageListIssue {
    #[error("images field is blank")]
    Blank,

    #[error("images field is not valid JSON: {message}")]
    InvalidJson { message: String },

    #[error("images field is JSON but not an array")]
    NotAnArray,

    #[error("entry {index} is not a string")]
    NonStringEntry { index: usize },

    #[error("entry {index} is not an http(s) URL: {value}")]
    InvalidUrl { index: usize, value: String },
}

impl ImageListIssue {
    /// Short stable label used for per-outcome totals.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::InvalidJson { .. } => "invalid_json",
            Self::NotAnArray => "not_an_array",
            Self::NonStringEntry { .. } => "non_string_entry",
            Self::InvalidUrl { .. } => "invalid_url",
        }
    }
}

/// Parse a stored `images` value into its URL list.
///
/// The first problem found is returned; an empty array is valid.
pub fn parse_image_list(raw: &str) -> Result<Vec<String>, ImageListIssue> {
    if raw.trim().is_empty() {
        return Err(ImageListIssue::Blank);
    }

    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| ImageListIssue::InvalidJson {
            message: e.to_string(),
        })?;

    parse_image_value(&value)
}

/// Validate an already-decoded JSON value as an image URL list.
///
/// Used for API payloads that send `images` as a real array instead of a
/// JSON string.
pub fn parse_image_value(value: &serde_json::Value) -> Result<Vec<String>, ImageListIssue> {
    let entries = value.as_array().ok_or(ImageListIssue::NotAnArray)?;

    let mut urls = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let url = entry
            .as_str()
            .ok_or(ImageListIssue::NonStringEntry { index })?;
        if !IMAGE_URL_RE.is_match(url) {
            return Err(ImageListIssue::InvalidUrl {
                index,
                value: url.to_string(),
            });
        }
        urls.push(url.to_string());
    }
    Ok(urls)
}

/// Outcome of auditing one stored `images` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ImageAudit {
    /// Well-formed list with at least one URL.
    Valid { count: usize },
    /// Well-formed but empty; the product has no pictures.
    NoImages,
    /// Malformed value.
    Invalid { issue: ImageListIssue },
}

impl ImageAudit {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// Stable label for grouping totals.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Valid { .. } => "valid",
            Self::NoImages => "no_images",
            Self::Invalid { issue } => issue.kind(),
        }
    }
}

/// Audit a stored `images` value.
pub fn audit_image_list(raw: &str) -> ImageAudit {
    match parse_image_list(raw) {
        Ok(urls) if urls.is_empty() => ImageAudit::NoImages,
        Ok(urls) => ImageAudit::Valid { count: urls.len() },
        Err(issue) => ImageAudit::Invalid { issue },
    }
}
