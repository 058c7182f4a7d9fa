//! llms.txt emitter - a plain-text index of the blog for language models

use crate::config::SiteConfig;
use crate::content::PostMeta;

/// Emits the llms.txt document: header, biography, per-post links to the
/// markdown API, topics, and contact links.
pub struct LlmsEmitter<'a> {
    config: &'a SiteConfig,
}

impl<'a> LlmsEmitter<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self { config }
    }

    pub fn emit(&self, posts: &[PostMeta]) -> String {
        let base_url = self.config.url.trim_end_matches('/');

        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", self.config.title));

        if !self.config.description.is_empty() {
            out.push_str(&format!("> {}\n\n", self.config.description));
        }

        if !self.config.llms.about.is_empty() {
            out.push_str("## About\n\n");
            out.push_str(&self.config.llms.about);
            out.push_str("\n\n");
        }

        out.push_str("## Blog Posts\n\n");
        out.push_str("All blog posts are available in markdown format at `/api/blog/{slug}.md`\n\n");
        for post in posts {
            out.push_str(&format!(
                "- [{}]({}/api/blog/{}.md)\n",
                post.title, base_url, post.slug
            ));
        }
        out.push('\n');

        if !self.config.llms.topics.is_empty() {
            out.push_str("## Topics Covered\n\n");
            for topic in &self.config.llms.topics {
                out.push_str(&format!("- {}\n", topic));
            }
            out.push('\n');
        }

        out.push_str("## Contact\n\n");
        out.push_str(&format!("- Website: {}\n", base_url));
        for contact in &self.config.llms.contacts {
            out.push_str(&format!("- {}: {}\n", contact.name, contact.url));
        }

        out
    }
}
