//! Author byline

use crate::config::SiteConfig;
use crate::helpers::{encode_segment, html_escape};

/// "by **author** (twitter)" line shown above the post list
#[derive(Debug, Clone)]
pub struct Bio<'a> {
    author: &'a str,
    twitter: Option<&'a str>,
}

impl<'a> Bio<'a> {
    pub fn new(author: &'a str, twitter: Option<&'a str>) -> Self {
        let twitter = twitter
            .map(|handle| handle.trim_start_matches('@'))
            .filter(|handle| !handle.is_empty());
        Self { author, twitter }
    }

    pub fn from_config(config: &'a SiteConfig) -> Self {
        Self::new(&config.author, config.social.twitter.as_deref())
    }

    pub fn render(&self) -> String {
        let twitter = self
            .twitter
            .map(|handle| {
                format!(
                    r#" <a href="https://twitter.com/{}">(twitter)</a>"#,
                    encode_segment(handle)
                )
            })
            .unwrap_or_default();

        format!(
            r#"<div class="bio" style="display: flex; margin-bottom: 0.4375rem"><p>by <strong>{}</strong>{}</p></div>"#,
            html_escape(self.author),
            twitter
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bio_with_twitter() {
        let html = Bio::new("Dan", Some("@dan_abramov")).render();
        assert!(html.contains("by <strong>Dan</strong>"));
        assert!(html.contains(r#"href="https://twitter.com/dan_abramov""#));
    }

    #[test]
    fn test_bio_without_twitter() {
        let html = Bio::new("A & B", None).render();
        assert!(html.contains("<strong>A &amp; B</strong>"));
        assert!(!html.contains("twitter"));

        assert!(!Bio::new("A", Some("")).render().contains("twitter"));
    }

    #[test]
    fn test_bio_from_config() {
        let mut config = SiteConfig::default();
        config.author = "Jane".to_string();
        config.social.twitter = Some("jane".to_string());
        let html = Bio::from_config(&config).render();
        assert!(html.contains("Jane"));
        assert!(html.contains("twitter.com/jane"));
    }
}
