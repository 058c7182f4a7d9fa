//! Post store - enumerates and reads post source files

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Recognized content file extensions, in resolution priority order.
const CONTENT_EXTENSIONS: &[&str] = &["mdx", "md"];

/// Read-only access to the content directory.
///
/// Slugs are file stems; resolution only ever joins `<slug>.<ext>` under the
/// content directory, so a slug can never escape it.
pub struct PostStore {
    content_dir: PathBuf,
}

impl PostStore {
    pub fn new<P: AsRef<Path>>(content_dir: P) -> Self {
        Self {
            content_dir: content_dir.as_ref().to_path_buf(),
        }
    }

    /// Enumerate slugs for all post files in the content directory.
    ///
    /// Enumeration order follows the file system and is not significant; the
    /// aggregator re-sorts deterministically.
    pub fn list_slugs(&self) -> Result<Vec<String>> {
        if !self.content_dir.exists() {
            return Ok(Vec::new());
        }

        let mut slugs = Vec::new();
        for entry in WalkDir::new(&self.content_dir)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && is_content_file(path) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    slugs.push(stem.to_string());
                }
            }
        }

        Ok(slugs)
    }

    /// Resolve a slug to its source file path.
    pub fn resolve(&self, slug: &str) -> Result<PathBuf> {
        for ext in CONTENT_EXTENSIONS {
            let candidate = self.content_dir.join(format!("{}.{}", slug, ext));
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
        Err(Error::PostNotFound(slug.to_string()))
    }

    /// Read the raw text of a post by slug.
    pub fn read_raw(&self, slug: &str) -> Result<String> {
        let path = self.resolve(slug)?;
        Ok(fs::read_to_string(path)?)
    }
}

fn is_content_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| CONTENT_EXTENSIONS.contains(&e))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_posts(files: &[(&str, &str)]) -> (tempfile::TempDir, PostStore) {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        let store = PostStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn test_list_slugs_filters_extensions() {
        let (_dir, store) = store_with_posts(&[
            ("hello-world.mdx", "a"),
            ("older-post.md", "b"),
            ("notes.txt", "c"),
            ("README", "d"),
        ]);

        let mut slugs = store.list_slugs().unwrap();
        slugs.sort();
        assert_eq!(slugs, vec!["hello-world", "older-post"]);
    }

    #[test]
    fn test_read_raw() {
        let (_dir, store) = store_with_posts(&[("hello-world.mdx", "post body")]);
        assert_eq!(store.read_raw("hello-world").unwrap(), "post body");
    }

    #[test]
    fn test_read_raw_unknown_slug() {
        let (_dir, store) = store_with_posts(&[("hello-world.mdx", "post body")]);
        match store.read_raw("missing") {
            Err(Error::PostNotFound(slug)) => assert_eq!(slug, "missing"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_missing_content_dir_is_empty() {
        let store = PostStore::new("/nonexistent/content/dir");
        assert!(store.list_slugs().unwrap().is_empty());
    }
}
