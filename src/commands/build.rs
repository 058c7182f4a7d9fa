//! Build the static feeds

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::feeds::{LlmsEmitter, RssEmitter};
use crate::pipeline::Pipeline;
use crate::Site;

/// Run the full pipeline and write rss.xml and llms.txt into the public dir.
pub fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    let mut pipeline = Pipeline::new(site)?;
    let posts = pipeline.all()?;
    tracing::info!("Loaded {} posts", posts.len());

    let rss = RssEmitter::new(&site.config, &site.public_dir).emit(&posts)?;
    let rss_path = site.public_dir.join(site.config.rss_path.trim_start_matches('/'));
    write_output(&rss_path, &rss)?;
    tracing::info!("Generated {}", site.config.rss_path);

    let llms = LlmsEmitter::new(&site.config).emit(&posts);
    let llms_path = site
        .public_dir
        .join(site.config.llms_path.trim_start_matches('/'));
    write_output(&llms_path, &llms)?;
    tracing::info!("Generated {}", site.config.llms_path);

    let duration = start.elapsed();
    tracing::info!("Built in {:.2}s", duration.as_secs_f64());

    Ok(())
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageFormat;

    fn seed_site(dir: &Path) -> Site {
        let posts_dir = dir.join("posts");
        fs::create_dir_all(&posts_dir).unwrap();
        let img_path = dir.join("public/static/images/hi.png");
        fs::create_dir_all(img_path.parent().unwrap()).unwrap();
        image::RgbImage::from_pixel(16, 16, image::Rgb([10, 20, 30]))
            .save_with_format(&img_path, ImageFormat::Png)
            .unwrap();

        fs::write(
            posts_dir.join("hello-world.mdx"),
            "---\ntitle: Hello World\npublishedAt: '2024-06-01'\nsummary: First post\nimage: /static/images/hi.png\n---\n\nHello **world**.\n",
        )
        .unwrap();

        Site::new(dir).unwrap()
    }

    #[test]
    fn test_build_writes_feeds() {
        let dir = tempfile::tempdir().unwrap();
        let site = seed_site(dir.path());

        run(&site).unwrap();

        let rss = fs::read_to_string(dir.path().join("public/blog/rss.xml")).unwrap();
        assert!(rss.contains("<title>Hello World</title>"));

        let llms = fs::read_to_string(dir.path().join("public/llms.txt")).unwrap();
        assert!(llms.contains("hello-world.md"));
    }
}
