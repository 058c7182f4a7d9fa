//! Remove generated output

use anyhow::Result;
use std::fs;

use crate::cache;
use crate::Site;

/// Delete the generated feeds and the placeholder cache.
pub fn run(site: &Site) -> Result<()> {
    for rel in [&site.config.rss_path, &site.config.llms_path] {
        let path = site.public_dir.join(rel.trim_start_matches('/'));
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::info!("Removed {:?}", path);
        }
    }

    cache::clear(&site.base_dir)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_removes_feeds() {
        let dir = tempfile::tempdir().unwrap();
        let rss = dir.path().join("public/blog/rss.xml");
        fs::create_dir_all(rss.parent().unwrap()).unwrap();
        fs::write(&rss, "<rss/>").unwrap();
        fs::create_dir_all(dir.path().join("posts")).unwrap();

        let site = Site::new(dir.path()).unwrap();
        run(&site).unwrap();
        assert!(!rss.exists());
    }
}
