//! Content module - post files, frontmatter, markdown, derived metadata

mod frontmatter;
pub mod markdown;
pub mod meta;
mod placeholder;
mod post;
mod store;

pub use frontmatter::{parse_published_at, FrontMatter};
pub use markdown::MarkdownRenderer;
pub use placeholder::PlaceholderEncoder;
pub use post::{Post, PostMeta};
pub use store::PostStore;
