//! Post record model

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One published blog entry, as the index and post pages see it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Unique path identifier, e.g. `/hello-world/`
    pub slug: String,

    /// Display title, if the front-matter has one
    pub title: Option<String>,

    /// Pre-formatted display date
    pub date: String,

    /// Publication date, used for ordering
    pub published_at: DateTime<Local>,

    /// Auto-derived summary HTML
    pub excerpt: String,

    /// Author-provided summary, overrides the excerpt when non-empty
    pub description: Option<String>,

    /// Free-text labels
    pub tags: Vec<String>,

    /// Rendered HTML content
    pub content: String,

    /// Source file path (relative to the source directory)
    pub source: String,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl PostRecord {
    /// Create a record with only a slug and a publication date
    pub fn new(slug: impl Into<String>, published_at: DateTime<Local>) -> Self {
        Self {
            slug: slug.into(),
            title: None,
            date: String::new(),
            published_at,
            excerpt: String::new(),
            description: None,
            tags: Vec::new(),
            content: String::new(),
            source: String::new(),
            extra: HashMap::new(),
        }
    }

    /// Title to display, falling back to the slug
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.slug)
    }

    /// Summary fragment to display: the description when non-empty, else the excerpt
    pub fn summary(&self) -> &str {
        match self.description.as_deref() {
            Some(description) if !description.is_empty() => description,
            _ => &self.excerpt,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
