//! Post aggregation pipeline
//!
//! Drives the per-post stages (store read, frontmatter parse, derived
//! metadata, markdown render) and assembles the globally sorted collection
//! consumed by listings and the feed emitters.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::cache::{self, PlaceholderCache};
use crate::content::{FrontMatter, MarkdownRenderer, PlaceholderEncoder, Post, PostMeta, PostStore};
use crate::content::meta;
use crate::error::{Error, Result};
use crate::Site;

/// Aggregates posts into a sorted collection.
pub struct Pipeline {
    store: PostStore,
    renderer: MarkdownRenderer,
    placeholders: PlaceholderEncoder,
    cache: PlaceholderCache,
    base_dir: PathBuf,
    words_per_minute: u32,
}

impl Pipeline {
    pub fn new(site: &Site) -> Result<Self> {
        let renderer = MarkdownRenderer::from_config(
            &site.config.pipeline,
            &site.config.highlight_theme,
        )?;
        let placeholders =
            PlaceholderEncoder::new(&site.public_dir, site.config.placeholder_size);
        let cache = PlaceholderCache::load(&site.base_dir, site.config.placeholder_size);

        Ok(Self {
            store: PostStore::new(&site.content_dir),
            renderer,
            placeholders,
            cache,
            base_dir: site.base_dir.clone(),
            words_per_minute: site.config.words_per_minute,
        })
    }

    /// Slug enumeration for static path generation.
    pub fn list_slugs(&self) -> Result<Vec<String>> {
        self.store.list_slugs()
    }

    /// Load every post's metadata (no rendered bodies), sorted by
    /// `publishedAt` descending with slug ascending as the tie-break.
    ///
    /// Any per-post failure aborts the whole batch with the offending slug
    /// attached: a broken post must never silently drop out of the feeds.
    pub fn all(&mut self) -> Result<Vec<PostMeta>> {
        let slugs = self.store.list_slugs()?;

        let mut seen = HashSet::new();
        let mut posts = Vec::with_capacity(slugs.len());
        for slug in slugs {
            if !seen.insert(slug.clone()) {
                return Err(Error::DuplicateSlug(slug));
            }
            let meta = self.load_meta(&slug).map_err(|e| e.for_post(&slug))?;
            posts.push(meta);
        }

        posts.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| a.slug.cmp(&b.slug))
        });

        if let Err(e) = self.cache.save(&self.base_dir) {
            tracing::warn!("Failed to save placeholder cache: {}", e);
        }

        Ok(posts)
    }

    /// Load a single post in full, including the rendered body.
    pub fn by_slug(&mut self, slug: &str) -> Result<Post> {
        let raw = self.store.read_raw(slug)?;
        let (fm, body) = FrontMatter::parse(&raw).map_err(|e| e.for_post(slug))?;
        let content = self.renderer.render(body).map_err(|e| e.for_post(slug))?;
        let meta = self
            .assemble_meta(slug, fm, body)
            .map_err(|e| e.for_post(slug))?;

        Ok(Post {
            meta,
            raw: body.to_string(),
            content,
        })
    }

    fn load_meta(&mut self, slug: &str) -> Result<PostMeta> {
        let raw = self.store.read_raw(slug)?;
        let (fm, body) = FrontMatter::parse(&raw)?;
        self.assemble_meta(slug, fm, body)
    }

    fn assemble_meta(&mut self, slug: &str, fm: FrontMatter, body: &str) -> Result<PostMeta> {
        let word_count = meta::word_count(body);
        let reading_time = meta::reading_time(word_count, self.words_per_minute);
        let blur_data_url = self.placeholder_for(&fm.image)?;

        Ok(PostMeta {
            slug: slug.to_string(),
            title: fm.title,
            published_at: fm.published_at,
            summary: fm.summary,
            image: fm.image,
            word_count,
            reading_time,
            blur_data_url,
        })
    }

    fn placeholder_for(&mut self, image_ref: &str) -> Result<String> {
        let path = self.placeholders.resolve(image_ref)?;
        let mtime = cache::file_mtime(&path).unwrap_or(0);

        if let Some(cached) = self.cache.get(image_ref, mtime) {
            return Ok(cached.to_string());
        }

        let data_url = self.placeholders.encode(image_ref)?;
        self.cache.insert(image_ref, mtime, data_url.clone());
        Ok(data_url)
    }
}
