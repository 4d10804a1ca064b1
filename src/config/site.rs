//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::filter::FilterPolicy;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    #[serde(default)]
    pub social: SocialConfig,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub source_dir: String,
    pub public_dir: String,

    // Writing
    pub date_format: String,
    pub excerpt_length: usize,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Home page
    #[serde(default)]
    pub index: IndexConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            social: SocialConfig::default(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            source_dir: "source".to_string(),
            public_dir: "public".to_string(),

            date_format: "MMMM DD, YYYY".to_string(),
            excerpt_length: 140,
            highlight: HighlightConfig::default(),

            index: IndexConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Social handles shown in the byline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialConfig {
    pub twitter: Option<String>,
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: true,
        }
    }
}

/// Post index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Which posts the index leaves out
    pub policy: FilterPolicy,
    /// Tag that hides a post under the tag policy
    pub hidden_tag: String,
    /// Case-insensitive title pattern marking a draft under the draft policy
    pub draft_pattern: String,
    /// Link each post to the first segment of its slug instead of the full slug
    pub link_first_segment: bool,
    pub toggle_label: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            policy: FilterPolicy::Tag,
            hidden_tag: "hidden".to_string(),
            draft_pattern: "draft".to_string(),
            link_first_segment: false,
            toggle_label: "Include drafts and mumbles".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.source_dir, "source");
        assert_eq!(config.index.policy, FilterPolicy::Tag);
        assert_eq!(config.index.hidden_tag, "hidden");
        assert_eq!(config.excerpt_length, 140);
        assert!(config.social.twitter.is_none());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Overreacted
author: Test User
social:
  twitter: testuser
index:
  policy: draft
  link_first_segment: true
comments: disqus
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Overreacted");
        assert_eq!(config.author, "Test User");
        assert_eq!(config.social.twitter.as_deref(), Some("testuser"));
        assert_eq!(config.index.policy, FilterPolicy::Draft);
        assert!(config.index.link_first_segment);
        // untouched keys keep their defaults
        assert_eq!(config.index.draft_pattern, "draft");
        assert_eq!(config.date_format, "MMMM DD, YYYY");
        assert!(config.extra.contains_key("comments"));
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let yaml = "index:\n  policy: everything\n";
        assert!(serde_yaml::from_str::<SiteConfig>(yaml).is_err());
    }
}
