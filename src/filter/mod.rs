//! Post list filtering
//!
//! The index hides some posts. Which ones depends on the configured
//! [`FilterPolicy`]: the tag policy always drops posts carrying the hidden
//! tag, the draft policy drops posts whose title looks like a draft unless
//! the reader has switched drafts on through the [`VisibilityFlag`].
//! The two policies are alternatives and are never combined.

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::IndexConfig;
use crate::content::PostRecord;

lazy_static! {
    static ref DEFAULT_DRAFT: Regex = RegexBuilder::new("draft")
        .case_insensitive(true)
        .build()
        .expect("literal pattern compiles");
}

/// Errors raised while building a filter from configuration
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("invalid draft pattern `{pattern}`: {source}")]
    InvalidDraftPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("hidden tag must not be empty")]
    EmptyHiddenTag,
}

/// Rule deciding which posts the index leaves out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterPolicy {
    /// Drop posts tagged with the hidden tag
    #[default]
    Tag,
    /// Drop posts whose title matches the draft pattern, unless drafts are included
    Draft,
}

/// Whether drafts are included in the index. Starts out `false` on every load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibilityFlag(bool);

impl VisibilityFlag {
    pub const fn new(include_drafts: bool) -> Self {
        Self(include_drafts)
    }

    pub const fn includes_drafts(self) -> bool {
        self.0
    }

    pub const fn flipped(self) -> Self {
        Self(!self.0)
    }
}

impl From<bool> for VisibilityFlag {
    fn from(value: bool) -> Self {
        Self(value)
    }
}

/// A compiled filtering policy
#[derive(Debug, Clone)]
pub struct PostFilter {
    policy: FilterPolicy,
    hidden_tag: String,
    draft: Regex,
}

impl PostFilter {
    /// Build a filter with the stock `hidden` tag and `draft` pattern
    pub fn with_policy(policy: FilterPolicy) -> Self {
        Self {
            policy,
            hidden_tag: "hidden".to_string(),
            draft: DEFAULT_DRAFT.clone(),
        }
    }

    /// Build a filter with a custom hidden tag and draft pattern
    pub fn new(
        policy: FilterPolicy,
        hidden_tag: &str,
        draft_pattern: &str,
    ) -> Result<Self, FilterError> {
        if hidden_tag.is_empty() {
            return Err(FilterError::EmptyHiddenTag);
        }

        let draft = RegexBuilder::new(draft_pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| FilterError::InvalidDraftPattern {
                pattern: draft_pattern.to_string(),
                source,
            })?;

        Ok(Self {
            policy,
            hidden_tag: hidden_tag.to_string(),
            draft,
        })
    }

    pub fn from_config(config: &IndexConfig) -> Result<Self, FilterError> {
        Self::new(config.policy, &config.hidden_tag, &config.draft_pattern)
    }

    pub fn policy(&self) -> FilterPolicy {
        self.policy
    }

    /// Only the draft policy reacts to the visibility flag
    pub fn uses_flag(&self) -> bool {
        self.policy == FilterPolicy::Draft
    }

    /// Whether a single post survives the filter
    pub fn is_visible(&self, post: &PostRecord, flag: VisibilityFlag) -> bool {
        match self.policy {
            FilterPolicy::Tag => !post.has_tag(&self.hidden_tag),
            FilterPolicy::Draft => flag.includes_drafts() || !self.is_draft(post),
        }
    }

    /// Whether the post's title marks it as a draft. Untitled posts never do.
    pub fn is_draft(&self, post: &PostRecord) -> bool {
        post.title
            .as_deref()
            .map(|title| self.draft.is_match(title))
            .unwrap_or(false)
    }

    /// Posts that survive the filter, in their original order
    pub fn visible_posts<'a>(
        &self,
        posts: &'a [PostRecord],
        flag: VisibilityFlag,
    ) -> Vec<&'a PostRecord> {
        posts
            .iter()
            .filter(|post| self.is_visible(post, flag))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn tagged(slug: &str, tags: &[&str]) -> PostRecord {
        let mut post = PostRecord::new(slug, Local::now());
        post.tags = tags.iter().map(|t| t.to_string()).collect();
        post
    }

    fn titled(slug: &str, title: Option<&str>) -> PostRecord {
        let mut post = PostRecord::new(slug, Local::now());
        post.title = title.map(str::to_string);
        post
    }

    fn slugs(posts: &[&PostRecord]) -> Vec<String> {
        posts.iter().map(|p| p.slug.clone()).collect()
    }

    #[test]
    fn test_tag_policy_drops_hidden_posts() {
        let filter = PostFilter::with_policy(FilterPolicy::Tag);
        let posts = vec![tagged("/a", &["life"]), tagged("/b", &["hidden"])];

        let visible = filter.visible_posts(&posts, VisibilityFlag::default());
        assert_eq!(slugs(&visible), vec!["/a"]);
    }

    #[test]
    fn test_tag_policy_ignores_flag() {
        let filter = PostFilter::with_policy(FilterPolicy::Tag);
        let posts = vec![tagged("/a", &[]), tagged("/b", &["rust", "hidden"])];

        let off = filter.visible_posts(&posts, VisibilityFlag::new(false));
        let on = filter.visible_posts(&posts, VisibilityFlag::new(true));
        assert_eq!(slugs(&off), vec!["/a"]);
        assert_eq!(off, on);
    }

    #[test]
    fn test_tag_policy_keeps_untagged_posts() {
        let filter = PostFilter::with_policy(FilterPolicy::Tag);
        let posts = vec![tagged("/a", &[]), tagged("/b", &["Hidden"])];

        // Tag matching is literal, so a capitalised tag does not hide the post
        let visible = filter.visible_posts(&posts, VisibilityFlag::default());
        assert_eq!(slugs(&visible), vec!["/a", "/b"]);
    }

    #[test]
    fn test_draft_policy_excludes_drafts_by_default() {
        let filter = PostFilter::with_policy(FilterPolicy::Draft);
        let posts = vec![
            titled("/hello", Some("Hello")),
            titled("/wip", Some("Draft: WIP")),
        ];

        let visible = filter.visible_posts(&posts, VisibilityFlag::default());
        assert_eq!(slugs(&visible), vec!["/hello"]);
    }

    #[test]
    fn test_draft_policy_includes_everything_when_flag_set() {
        let filter = PostFilter::with_policy(FilterPolicy::Draft);
        let posts = vec![
            titled("/hello", Some("Hello")),
            titled("/wip", Some("Draft: WIP")),
        ];

        let visible = filter.visible_posts(&posts, VisibilityFlag::new(true));
        assert_eq!(slugs(&visible), vec!["/hello", "/wip"]);
    }

    #[test]
    fn test_draft_match_is_unanchored_and_case_insensitive() {
        let filter = PostFilter::with_policy(FilterPolicy::Draft);
        for title in ["my DRAFT notes", "Redrafting", "draft", "A dRaFt"] {
            assert!(filter.is_draft(&titled("/x", Some(title))), "{}", title);
        }
        assert!(!filter.is_draft(&titled("/x", Some("Drat"))));
    }

    #[test]
    fn test_untitled_post_is_never_a_draft() {
        let filter = PostFilter::with_policy(FilterPolicy::Draft);
        let posts = vec![titled("/draft-slug", None)];

        let visible = filter.visible_posts(&posts, VisibilityFlag::default());
        assert_eq!(visible.len(), 1);
    }

    #[test]
    fn test_filtering_is_stable_and_idempotent() {
        let filter = PostFilter::with_policy(FilterPolicy::Draft);
        let posts = vec![
            titled("/1", Some("One")),
            titled("/2", Some("draft two")),
            titled("/3", Some("Three")),
            titled("/4", Some("Draft four")),
            titled("/5", None),
        ];
        let flag = VisibilityFlag::default();

        let once: Vec<PostRecord> = filter
            .visible_posts(&posts, flag)
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(
            once.iter().map(|p| p.slug.as_str()).collect::<Vec<_>>(),
            vec!["/1", "/3", "/5"]
        );

        let twice = filter.visible_posts(&once, flag);
        assert_eq!(twice.len(), once.len());
        assert!(twice.iter().zip(once.iter()).all(|(a, b)| *a == b));
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let filter = PostFilter::with_policy(FilterPolicy::Tag);
        assert!(filter.visible_posts(&[], VisibilityFlag::default()).is_empty());
    }

    #[test]
    fn test_custom_pattern_and_tag() {
        let filter = PostFilter::new(FilterPolicy::Draft, "secret", "^wip|mumble").unwrap();
        assert!(filter.is_draft(&titled("/a", Some("WIP: parser"))));
        assert!(filter.is_draft(&titled("/b", Some("Mumbles"))));
        assert!(!filter.is_draft(&titled("/c", Some("About WIP"))));

        let filter = PostFilter::new(FilterPolicy::Tag, "secret", "draft").unwrap();
        let posts = vec![tagged("/a", &["secret"]), tagged("/b", &["hidden"])];
        let visible = filter.visible_posts(&posts, VisibilityFlag::default());
        assert_eq!(slugs(&visible), vec!["/b"]);
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let err = PostFilter::new(FilterPolicy::Draft, "hidden", "draft(").unwrap_err();
        assert!(matches!(err, FilterError::InvalidDraftPattern { .. }));
        assert!(err.to_string().contains("draft("));

        let err = PostFilter::new(FilterPolicy::Tag, "", "draft").unwrap_err();
        assert!(matches!(err, FilterError::EmptyHiddenTag));
    }

    #[test]
    fn test_flag_flips() {
        let flag = VisibilityFlag::default();
        assert!(!flag.includes_drafts());
        assert!(flag.flipped().includes_drafts());
        assert_eq!(flag.flipped().flipped(), flag);
        assert_eq!(VisibilityFlag::from(true), VisibilityFlag::new(true));
    }

    #[test]
    fn test_policy_from_config() {
        let mut config = IndexConfig::default();
        assert!(!PostFilter::from_config(&config).unwrap().uses_flag());

        config.policy = FilterPolicy::Draft;
        let filter = PostFilter::from_config(&config).unwrap();
        assert_eq!(filter.policy(), FilterPolicy::Draft);
        assert!(filter.uses_flag());
    }
}
