//! RSS 2.0 feed emitter

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};

use super::{escape_xml, mime_for_extension};
use crate::config::SiteConfig;
use crate::content::PostMeta;
use crate::error::{Error, Result};

/// Emits an RSS 2.0 document for the post collection.
///
/// Every text field is XML-escaped; the enclosure's byte length is resolved
/// from the cover image under the asset root.
pub struct RssEmitter<'a> {
    config: &'a SiteConfig,
    asset_root: PathBuf,
}

impl<'a> RssEmitter<'a> {
    pub fn new<P: AsRef<Path>>(config: &'a SiteConfig, asset_root: P) -> Self {
        Self {
            config,
            asset_root: asset_root.as_ref().to_path_buf(),
        }
    }

    pub fn emit(&self, posts: &[PostMeta]) -> Result<String> {
        let base_url = self.config.url.trim_end_matches('/');

        let mut feed = String::new();
        feed.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        feed.push_str("<rss version=\"2.0\" xmlns:atom=\"http://www.w3.org/2005/Atom\">\n");
        feed.push_str("  <channel>\n");
        feed.push_str(&format!(
            "    <title>{}</title>\n",
            escape_xml(&self.config.title)
        ));
        feed.push_str(&format!("    <link>{}</link>\n", base_url));
        feed.push_str(&format!(
            "    <description>{}</description>\n",
            escape_xml(&self.config.description)
        ));
        feed.push_str(&format!(
            "    <language>{}</language>\n",
            self.config.language
        ));
        feed.push_str(&format!(
            "    <lastBuildDate>{}</lastBuildDate>\n",
            Utc::now().to_rfc2822()
        ));
        feed.push_str(&format!(
            "    <atom:link href=\"{}/{}\" rel=\"self\" type=\"application/rss+xml\" />\n",
            base_url,
            self.config.rss_path.trim_start_matches('/')
        ));

        for post in posts {
            feed.push_str(&self.emit_item(post, base_url)?);
        }

        feed.push_str("  </channel>\n");
        feed.push_str("</rss>\n");

        Ok(feed)
    }

    fn emit_item(&self, post: &PostMeta, base_url: &str) -> Result<String> {
        let post_url = format!("{}/blog/{}", base_url, post.slug);
        let image_url = format!("{}{}", base_url, post.image);
        let image_size = self.image_byte_length(&post.image)?;
        let mime = post
            .image
            .rsplit('.')
            .next()
            .map(mime_for_extension)
            .unwrap_or("application/octet-stream");

        let pub_date = Utc
            .from_utc_datetime(&post.published_at.and_hms_opt(0, 0, 0).unwrap())
            .to_rfc2822();

        let mut item = String::new();
        item.push_str("    <item>\n");
        item.push_str(&format!(
            "      <title>{}</title>\n",
            escape_xml(&post.title)
        ));
        item.push_str(&format!("      <link>{}</link>\n", post_url));
        item.push_str(&format!("      <guid>{}</guid>\n", post_url));
        item.push_str(&format!("      <pubDate>{}</pubDate>\n", pub_date));
        item.push_str(&format!(
            "      <description>{}</description>\n",
            escape_xml(&post.summary)
        ));
        item.push_str(&format!(
            "      <enclosure url=\"{}\" length=\"{}\" type=\"{}\" />\n",
            escape_xml(&image_url),
            image_size,
            mime
        ));
        item.push_str("    </item>\n");

        Ok(item)
    }

    fn image_byte_length(&self, image_ref: &str) -> Result<u64> {
        let path = self.asset_root.join(image_ref.trim_start_matches('/'));
        if !path.is_file() {
            return Err(Error::ImageNotFound(path));
        }
        Ok(fs::metadata(path)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::meta::reading_time;
    use chrono::NaiveDate;
    use std::fs;

    fn meta(slug: &str, title: &str, summary: &str, date: NaiveDate) -> PostMeta {
        PostMeta {
            slug: slug.to_string(),
            title: title.to_string(),
            published_at: date,
            summary: summary.to_string(),
            image: "/static/images/cover.png".to_string(),
            word_count: 100,
            reading_time: reading_time(100, 200),
            blur_data_url: String::new(),
        }
    }

    fn asset_root() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let img_path = dir.path().join("static/images/cover.png");
        fs::create_dir_all(img_path.parent().unwrap()).unwrap();
        fs::write(&img_path, vec![0u8; 1234]).unwrap();
        dir
    }

    #[test]
    fn test_emit_escapes_special_characters() {
        let config = SiteConfig {
            url: "https://blog.example.com".to_string(),
            ..Default::default()
        };
        let dir = asset_root();
        let emitter = RssEmitter::new(&config, dir.path());

        let posts = vec![meta(
            "ampersand",
            r#"Tom & Jerry's <"Adventures">"#,
            "Quotes & <tags> 'everywhere'",
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )];
        let xml = emitter.emit(&posts).unwrap();

        assert!(xml.contains("Tom &amp; Jerry&apos;s &lt;&quot;Adventures&quot;&gt;"));
        assert!(xml.contains("Quotes &amp; &lt;tags&gt; &apos;everywhere&apos;"));
        // No raw special characters survive outside of markup
        assert!(!xml.contains("Jerry's"));
    }

    #[test]
    fn test_emit_item_fields() {
        let config = SiteConfig {
            url: "https://blog.example.com/".to_string(),
            ..Default::default()
        };
        let dir = asset_root();
        let emitter = RssEmitter::new(&config, dir.path());

        let posts = vec![meta(
            "hello-world",
            "Hello World",
            "First post",
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )];
        let xml = emitter.emit(&posts).unwrap();

        assert!(xml.contains("<link>https://blog.example.com/blog/hello-world</link>"));
        assert!(xml.contains("<guid>https://blog.example.com/blog/hello-world</guid>"));
        assert!(xml.contains("<pubDate>Sat, 1 Jun 2024 00:00:00 +0000</pubDate>"));
        assert!(xml.contains("length=\"1234\""));
        assert!(xml.contains("type=\"image/png\""));
        assert!(xml.contains(
            "url=\"https://blog.example.com/static/images/cover.png\""
        ));
    }

    #[test]
    fn test_missing_enclosure_image_is_fatal() {
        let config = SiteConfig::default();
        let dir = tempfile::tempdir().unwrap();
        let emitter = RssEmitter::new(&config, dir.path());

        let posts = vec![meta(
            "p",
            "T",
            "S",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )];
        assert!(matches!(
            emitter.emit(&posts),
            Err(Error::ImageNotFound(_))
        ));
    }
}
