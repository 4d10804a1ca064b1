//! Generate static files

use anyhow::Result;
use notify::Watcher;
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::content::loader::ContentLoader;
use crate::generator::Generator;
use crate::Blog;

/// Load every post and write the site
pub fn run(blog: &Blog) -> Result<()> {
    let start = Instant::now();

    let posts = ContentLoader::new(blog).load_posts()?;
    tracing::info!("Loaded {} posts", posts.len());

    Generator::new(blog)?.generate(&posts)?;

    tracing::info!("Generated in {:.2}s", start.elapsed().as_secs_f64());
    Ok(())
}

/// Watch the sources and regenerate on change. Config changes are picked up
/// by reopening the blog before each rebuild.
pub fn watch(blog: &Blog) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    if blog.source_dir.exists() {
        watcher.watch(&blog.source_dir, notify::RecursiveMode::Recursive)?;
    }
    let config_path = blog.config_path();
    if config_path.exists() {
        watcher.watch(&config_path, notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let mut last_rebuild = Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, regenerating...");
                    if let Err(e) = Blog::new(&blog.base_dir).and_then(|b| run(&b)) {
                        tracing::error!("Generation failed: {}", e);
                    }
                    last_rebuild = Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_generate_from_disk() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("_config.yml"),
            "title: Overreacted\nauthor: Dan\nindex:\n  policy: draft\n",
        )
        .unwrap();
        let posts_dir = dir.path().join("source/_posts");
        fs::create_dir_all(&posts_dir).unwrap();
        fs::write(
            posts_dir.join("hello.md"),
            "---\ntitle: Hello\ndate: 2019-01-01\n---\nFirst post.",
        )
        .unwrap();
        fs::write(
            posts_dir.join("wip.md"),
            "---\ntitle: DRAFT thoughts\ndate: 2019-02-01\n---\nNot ready.",
        )
        .unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        run(&blog).unwrap();

        let index = fs::read_to_string(blog.public_dir.join("index.html")).unwrap();
        assert!(index.contains("Hello"));
        assert!(index.contains("January 01, 2019"));
        assert!(index.contains("First post."));
        assert!(!index.contains("DRAFT thoughts"));

        let drafts = fs::read_to_string(blog.public_dir.join("drafts/index.html")).unwrap();
        let draft_pos = drafts.find("DRAFT thoughts").unwrap();
        let hello_pos = drafts.find("/hello/").unwrap();
        assert!(draft_pos < hello_pos, "newest post comes first");

        assert!(blog.public_dir.join("hello/index.html").exists());
        assert!(blog.public_dir.join("wip/index.html").exists());
    }
}
