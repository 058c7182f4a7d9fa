//! List posts in the content directory

use anyhow::Result;

use crate::pipeline::Pipeline;
use crate::Site;

/// Print the sorted post collection to stdout.
pub fn run(site: &Site) -> Result<()> {
    let mut pipeline = Pipeline::new(site)?;
    let posts = pipeline.all()?;

    if posts.is_empty() {
        println!("No posts found in {:?}", site.content_dir);
        return Ok(());
    }

    println!("{:<12} {:<12} {:<40} {}", "Date", "Reading", "Title", "Slug");
    for post in &posts {
        println!(
            "{:<12} {:<12} {:<40} {}",
            post.published_at.format("%Y-%m-%d").to_string(),
            post.reading_time.text,
            post.title,
            post.slug
        );
    }
    println!("\nTotal: {} posts", posts.len());

    Ok(())
}
