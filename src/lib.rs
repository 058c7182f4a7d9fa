//! mdxgen: a static blog pipeline for MDX content
//!
//! Discovers MDX posts in a content directory, parses frontmatter, computes
//! derived metadata (reading time, word count, blur placeholders), renders
//! markdown through a configurable step pipeline, and emits RSS and llms.txt
//! feeds. A small server exposes each post's raw markdown at
//! `/api/blog/{slug}.md`.

pub mod cache;
pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod feeds;
pub mod pipeline;
pub mod server;

use anyhow::Result;
use std::path::Path;

/// Config file name looked up in the base directory
const CONFIG_FILE: &str = "mdxgen.yml";

/// The site handle: configuration plus resolved directories.
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Content directory (post sources)
    pub content_dir: std::path::PathBuf,
    /// Public directory: static asset root and feed output target
    pub public_dir: std::path::PathBuf,
}

impl Site {
    /// Create a site handle from a base directory, loading `mdxgen.yml`
    /// when present.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        })
    }

    /// Build the static feeds.
    pub fn build(&self) -> Result<()> {
        commands::build::run(self)
    }

    /// Remove generated output and the placeholder cache.
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
