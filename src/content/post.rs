//! Post models

use chrono::NaiveDate;
use serde::Serialize;

use super::meta::ReadingTime;

/// Listing projection of a post: frontmatter plus derived metadata,
/// without the rendered body.
#[derive(Debug, Clone, Serialize)]
pub struct PostMeta {
    /// URL-safe unique identifier, derived from the source filename.
    pub slug: String,

    pub title: String,

    #[serde(rename = "publishedAt")]
    pub published_at: NaiveDate,

    pub summary: String,

    /// Cover image path under the static asset root.
    pub image: String,

    #[serde(rename = "wordCount")]
    pub word_count: usize,

    #[serde(rename = "readingTime")]
    pub reading_time: ReadingTime,

    /// Base64 data URL of the low-resolution cover preview.
    #[serde(rename = "blurDataURL")]
    pub blur_data_url: String,
}

/// A fully loaded post, as returned by single-post fetch.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    #[serde(flatten)]
    pub meta: PostMeta,

    /// Raw markdown body (frontmatter stripped).
    pub raw: String,

    /// Rendered HTML content.
    pub content: String,
}
