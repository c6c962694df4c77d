//! Canonical category vocabulary for catalog records.
//!
//! Stored category strings drift over time (`"Tv Shows"`, `"tv-shows"`,
//! `"TV SHOWS"`). [`Category`] is the fixed vocabulary, and
//! [`classify_category`] decides whether a stored value is canonical,
//! drifted, or unknown.

use serde::Serialize;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

/// The fixed category vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Movies,
    TvShows,
    Music,
    Anime,
    Gaming,
    Sports,
    Art,
    Quotes,
}

impl Category {
    /// Every canonical category, in display order.
    pub const ALL: &'static [Category] = &[
        Category::Movies,
        Category::TvShows,
        Category::Music,
        Category::Anime,
        Category::Gaming,
        Category::Sports,
        Category::Art,
        Category::Quotes,
    ];

    /// Return the exact string stored in the database for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movies => "Movies",
            Self::TvShows => "TV Shows",
            Self::Music => "Music",
            Self::Anime => "Anime",
            Self::Gaming => "Gaming",
            Self::Sports => "Sports",
            Self::Art => "Art",
            Self::Quotes => "Quotes",
        }
    }

    /// Resolve a free-text category to the vocabulary, tolerating case,
    /// spacing, punctuation, and a small set of aliases.
    pub fn resolve(raw: &str) -> Option<Self> {
        let key = lookup_key(raw);
        if key.is_empty() {
            return None;
        }

        if let Some(category) = Self::ALL
            .iter()
            .copied()
            .find(|c| lookup_key(c.as_str()) == key)
        {
            return Some(category);
        }

        ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, category)| *category)
    }

    /// Strict variant of [`Category::resolve`] for user-supplied arguments.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        Self::resolve(raw).ok_or_else(|| {
            let valid: Vec<&str> = Self::ALL.iter().map(|c| c.as_str()).collect();
            CoreError::Validation(format!(
                "Unknown category: '{raw}'. Valid categories: {}",
                valid.join(", ")
            ))
        })
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Alternate spellings, keyed by their lookup key.
const ALIASES: &[(&str, Category)] = &[
    ("tv", Category::TvShows),
    ("tvshow", Category::TvShows),
    ("tvseries", Category::TvShows),
    ("television", Category::TvShows),
    ("movie", Category::Movies),
    ("film", Category::Movies),
    ("films", Category::Movies),
    ("games", Category::Gaming),
    ("videogames", Category::Gaming),
    ("sport", Category::Sports),
    ("quote", Category::Quotes),
];

/// Lowercase ASCII alphanumerics only. `"Tv  Shows"` and `"tv-shows"` both
/// become `"tvshows"`.
fn lookup_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// How a stored category string relates to the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "canonical", rename_all = "snake_case")]
pub enum CategoryStatus {
    /// Spelled exactly like a canonical category.
    Canonical(Category),
    /// Resolves to a canonical category but is spelled differently.
    Drifted(Category),
    /// Does not resolve to any category.
    Unknown,
}

impl CategoryStatus {
    /// The canonical category a drifted value should be rewritten to.
    pub fn rewrite_target(&self) -> Option<Category> {
        match self {
            Self::Drifted(category) => Some(*category),
            _ => None,
        }
    }
}

/// Classify a stored category value against the vocabulary.
pub fn classify_category(stored: &str) -> CategoryStatus {
    match Category::resolve(stored) {
        Some(category) if category.as_str() == stored => CategoryStatus::Canonical(category),
        Some(category) => CategoryStatus::Drifted(category),
        None => CategoryStatus::Unknown,
    }
}

/// Validate a literal category rename. Both sides must be non-blank and
/// differ; the target is not required to be canonical.
pub fn validate_rename(from: &str, to: &str) -> Result<(), CoreError> {
    if from.trim().is_empty() || to.trim().is_empty() {
        return Err(CoreError::Validation(
            "Category names must not be empty".to_string(),
        ));
    }
    if from == to {
        return Err(CoreError::Validation(format!(
            "Source and target category are identical: '{from}'"
        )));
    }
    Ok(())
}
