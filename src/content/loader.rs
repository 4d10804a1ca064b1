//! Content loader - reads posts from the source directory

use anyhow::Result;
use chrono::{DateTime, Local};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{FrontMatter, MarkdownRenderer, PostRecord};
use crate::helpers::format_date;
use crate::Blog;

/// Loads posts from `<source_dir>/_posts`
pub struct ContentLoader<'a> {
    blog: &'a Blog,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    pub fn new(blog: &'a Blog) -> Self {
        let renderer = MarkdownRenderer::with_options(&blog.config.highlight);
        Self { blog, renderer }
    }

    /// Load all posts, newest first
    pub fn load_posts(&self) -> Result<Vec<PostRecord>> {
        let posts_dir = self.blog.posts_dir();
        if !posts_dir.exists() {
            tracing::warn!("No posts directory at {:?}", posts_dir);
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(&posts_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && is_markdown_file(path) {
                match self.load_post(&posts_dir, path) {
                    Ok(post) => posts.push(post),
                    Err(e) => tracing::warn!("Failed to load post {:?}: {}", path, e),
                }
            }
        }

        // Newest first; slug breaks ties so the order does not depend on the walk
        posts.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| a.slug.cmp(&b.slug))
        });

        Ok(posts)
    }

    fn load_post(&self, posts_dir: &Path, path: &Path) -> Result<PostRecord> {
        let raw = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&raw)?;

        let published_at = match fm.parse_date() {
            Some(date) => date,
            None => file_modified(path)?,
        };

        let relative = path.strip_prefix(posts_dir).unwrap_or(path);
        let slug = slug_for(relative);

        let (content, excerpt) = self
            .renderer
            .render_post(body, self.blog.config.excerpt_length)?;

        let mut post = PostRecord::new(slug, published_at);
        post.title = fm.title.filter(|t| !t.trim().is_empty());
        post.date = format_date(&published_at, &self.blog.config.date_format);
        post.excerpt = excerpt;
        post.description = fm.description;
        post.tags = fm.tags;
        post.content = content;
        post.source = path
            .strip_prefix(&self.blog.source_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();
        post.extra = fm.extra;

        tracing::debug!("Loaded post {} from {:?}", post.slug, path);
        Ok(post)
    }
}

/// Slug for a post file relative to the posts directory.
///
/// `hello.md` -> `/hello/`, `2019/hello.md` -> `/2019/hello/`,
/// `hello/index.md` -> `/hello/`.
pub fn slug_for(relative: &Path) -> String {
    let without_ext = relative.with_extension("");
    let mut segments: Vec<String> = without_ext
        .components()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .collect();

    if segments.last().map(|s| s == "index").unwrap_or(false) {
        segments.pop();
    }

    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", segments.join("/"))
    }
}

fn file_modified(path: &Path) -> Result<DateTime<Local>> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(DateTime::<Local>::from(modified))
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}
