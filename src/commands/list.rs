//! List site content

use anyhow::Result;
use indexmap::IndexMap;

use crate::content::loader::ContentLoader;
use crate::content::PostRecord;
use crate::filter::{PostFilter, VisibilityFlag};
use crate::Blog;

/// List posts as the index shows them, or tag counts
pub fn run(blog: &Blog, content_type: &str, include_drafts: bool) -> Result<()> {
    let posts = ContentLoader::new(blog).load_posts()?;

    match content_type {
        "post" | "posts" => {
            let filter = PostFilter::from_config(&blog.config.index)?;
            let visible = filter.visible_posts(&posts, VisibilityFlag::new(include_drafts));
            println!("Posts ({} of {}):", visible.len(), posts.len());
            for post in visible {
                println!("  {} - {} [{}]", post.date, post.display_title(), post.source);
            }
        }
        "tag" | "tags" => {
            let tags = tag_counts(&posts);
            println!("Tags ({}):", tags.len());
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, tag", content_type);
        }
    }

    Ok(())
}

/// Tag usage counts, most used first; ties keep first-seen order
pub fn tag_counts(posts: &[PostRecord]) -> IndexMap<String, usize> {
    let mut tags: IndexMap<String, usize> = IndexMap::new();
    for post in posts {
        for tag in &post.tags {
            *tags.entry(tag.clone()).or_insert(0) += 1;
        }
    }
    tags.sort_by(|_, a, _, b| b.cmp(a));
    tags
}
