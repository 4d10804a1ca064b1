//! blog-index: a personal blog generator with a filterable post index
//!
//! Posts are markdown files with front-matter under `<source>/_posts`. The
//! generator renders them into an index page, which leaves out hidden posts
//! or drafts depending on the configured policy, and one page per post.

pub mod commands;
pub mod components;
pub mod config;
pub mod content;
pub mod filter;
pub mod generator;
pub mod helpers;
pub mod page;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// A blog rooted at a directory
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Source directory
    pub source_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Blog {
    /// Open the blog in `base_dir`, reading `_config.yml` if there is one
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No _config.yml in {:?}, using defaults", base_dir);
            config::SiteConfig::default()
        };

        let source_dir = base_dir.join(&config.source_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            source_dir,
            public_dir,
        })
    }

    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join("_config.yml")
    }

    pub fn posts_dir(&self) -> PathBuf {
        self.source_dir.join("_posts")
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
