//! Site configuration (mdxgen.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
///
/// Every knob the pipeline and the emitters depend on lives here: nothing is
/// read from ambient globals, so two builds with the same config and content
/// are byte-identical (modulo feed timestamps).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,

    // Directory
    pub content_dir: String,
    pub public_dir: String,

    // Derived metadata
    /// Reading speed used for the "N min read" estimate. Stable across
    /// builds so reading times are reproducible.
    pub words_per_minute: u32,
    /// Longest edge of the downscaled blur placeholder, in pixels.
    pub placeholder_size: u32,

    // Markdown pipeline
    /// Ordered list of transformation step names applied to post bodies.
    pub pipeline: Vec<String>,
    pub highlight_theme: String,

    // Feeds
    pub rss_path: String,
    pub llms_path: String,
    #[serde(default)]
    pub llms: LlmsConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),
            url: "http://example.com".to_string(),

            content_dir: "posts".to_string(),
            public_dir: "public".to_string(),

            words_per_minute: 200,
            placeholder_size: 20,

            pipeline: default_pipeline(),
            highlight_theme: "base16-ocean.dark".to_string(),

            rss_path: "blog/rss.xml".to_string(),
            llms_path: "llms.txt".to_string(),
            llms: LlmsConfig::default(),

            extra: HashMap::new(),
        }
    }
}

/// Default transformation step order. Slug assignment must precede the
/// autolink step, and code-title extraction must precede highlighting.
pub fn default_pipeline() -> Vec<String> {
    [
        "heading-slugs",
        "autolink-headings",
        "code-titles",
        "callouts",
        "highlight",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Static text blocks for the llms.txt feed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmsConfig {
    /// Biography paragraph under the "## About" heading.
    pub about: String,
    /// Bullet list under "## Topics Covered".
    pub topics: Vec<String>,
    /// Labelled links under "## Contact".
    pub contacts: Vec<ContactLink>,
}

/// A single labelled contact link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactLink {
    pub name: String,
    pub url: String,
}
