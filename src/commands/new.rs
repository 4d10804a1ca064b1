//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Blog;

/// Scaffold a post under `_posts`, named after the slugified title unless
/// `path` is given
pub fn create_post(blog: &Blog, title: &str, path: Option<&str>) -> Result<PathBuf> {
    let now = chrono::Local::now();

    let name = match path {
        Some(p) => p.trim_end_matches(".md").to_string(),
        None => slug::slugify(title),
    };
    if name.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    let file_path = blog.posts_dir().join(format!("{}.md", name));
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let content = format!(
        "---\ntitle: {}\ndate: {}\ndescription:\ntags:\n---\n",
        serde_yaml::to_string(title)?.trim_end(),
        now.format("%Y-%m-%d %H:%M:%S")
    );
    fs::write(&file_path, content)?;

    tracing::info!("Created: {:?}", file_path);
    Ok(file_path)
}
