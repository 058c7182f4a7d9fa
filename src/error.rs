//! Error taxonomy for the ingestion pipeline and the markdown API

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the pipeline and the serving boundary.
///
/// Build-time errors (frontmatter, images, configuration) are fatal to the
/// whole build. At the serving boundary only `InvalidSlug` and `PostNotFound` are
/// recoverable per-request; everything else maps to a 500.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no post found for slug '{0}'")]
    PostNotFound(String),

    #[error("invalid slug '{0}'")]
    InvalidSlug(String),

    #[error("malformed front-matter: {0}")]
    MalformedFrontMatter(String),

    #[error("invalid publishedAt date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    #[error("duplicate slug '{0}' in content directory")]
    DuplicateSlug(String),

    #[error("cover image not found: {0}")]
    ImageNotFound(PathBuf),

    #[error("failed to decode cover image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper attaching the offending slug to a build error.
    #[error("in post '{slug}': {source}")]
    Post {
        slug: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attach a slug to an error surfaced during per-post processing.
    pub fn for_post(self, slug: &str) -> Self {
        match self {
            already @ Error::Post { .. } => already,
            other => Error::Post {
                slug: slug.to_string(),
                source: Box::new(other),
            },
        }
    }
}
