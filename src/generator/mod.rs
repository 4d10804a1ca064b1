//! Generator module - writes the index and post pages to the public directory

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::content::PostRecord;
use crate::filter::{PostFilter, VisibilityFlag};
use crate::page::{index_path, IndexPage, PostPage};
use crate::Blog;

/// Static site generator
pub struct Generator<'a> {
    blog: &'a Blog,
    filter: PostFilter,
}

impl<'a> Generator<'a> {
    pub fn new(blog: &'a Blog) -> Result<Self> {
        let filter = PostFilter::from_config(&blog.config.index)?;
        Ok(Self { blog, filter })
    }

    pub fn filter(&self) -> &PostFilter {
        &self.filter
    }

    /// Generate the entire site
    pub fn generate(&self, posts: &[PostRecord]) -> Result<()> {
        fs::create_dir_all(&self.blog.public_dir)?;

        self.copy_source_assets()?;
        self.generate_index_pages(posts)?;
        self.generate_post_pages(posts)?;

        Ok(())
    }

    /// One index page per state of the drafts switch
    fn generate_index_pages(&self, posts: &[PostRecord]) -> Result<()> {
        let states: &[bool] = if self.filter.uses_flag() {
            &[false, true]
        } else {
            self.remove_drafts_index()?;
            &[false]
        };

        for &include_drafts in states {
            let mut page = IndexPage::new(&self.blog.config, &self.filter, posts);
            page.toggle(include_drafts);

            let output_path = self
                .blog
                .public_dir
                .join(index_path(VisibilityFlag::new(include_drafts)))
                .join("index.html");
            write_file(&output_path, &page.render())?;
            tracing::debug!(
                "Generated index ({} of {} posts): {:?}",
                page.visible_posts().len(),
                posts.len(),
                output_path
            );
        }

        Ok(())
    }

    /// A drafts page left by an earlier build would list posts this policy hides
    fn remove_drafts_index(&self) -> Result<()> {
        let drafts_dir = self
            .blog
            .public_dir
            .join(index_path(VisibilityFlag::new(true)));
        let stale = drafts_dir.join("index.html");
        if !stale.exists() {
            return Ok(());
        }

        fs::remove_file(&stale).with_context(|| format!("Failed to remove {:?}", stale))?;
        tracing::info!("Removed stale drafts index: {:?}", stale);

        // Assets copied into the same directory keep it alive
        if fs::read_dir(&drafts_dir)?.next().is_none() {
            fs::remove_dir(&drafts_dir)?;
        }

        Ok(())
    }

    /// Every post gets a page, whether or not the index lists it
    fn generate_post_pages(&self, posts: &[PostRecord]) -> Result<()> {
        let mut written = HashSet::new();

        for post in posts {
            let page = PostPage::new(&self.blog.config, post);
            let path = page.path();

            if path.is_empty() || path == index_path(VisibilityFlag::new(true)) {
                tracing::warn!("Skipping post {}: its path clashes with the index", post.slug);
                continue;
            }
            if !written.insert(path.clone()) {
                tracing::warn!("Skipping post {}: {} is already taken", post.slug, path);
                continue;
            }

            let output_path = self.blog.public_dir.join(&path).join("index.html");
            write_file(&output_path, &page.render())?;
            tracing::debug!("Generated post: {:?}", output_path);
        }

        Ok(())
    }

    /// Copy non-markdown files outside `_posts` (images, css, ...) verbatim
    fn copy_source_assets(&self) -> Result<()> {
        let source_dir = &self.blog.source_dir;
        if !source_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(source_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str());
            if matches!(ext, Some("md") | Some("markdown")) {
                continue;
            }

            let relative = path.strip_prefix(source_dir)?;
            if relative.components().any(|c| c.as_os_str() == "_posts") {
                continue;
            }

            let dest = self.blog.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)
                .with_context(|| format!("Failed to copy {:?} to {:?}", path, dest))?;
        }

        Ok(())
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create dir {:?}", parent))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))
}
