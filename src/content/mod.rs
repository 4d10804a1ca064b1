//! Content module - posts and the markdown pipeline that produces them

mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use frontmatter::{parse_date_string, FrontMatter};
pub use markdown::{split_excerpt, MarkdownRenderer};
pub use post::PostRecord;
