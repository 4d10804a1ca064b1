//! Post index entries

use crate::config::SiteConfig;
use crate::content::PostRecord;
use crate::helpers::{html_escape, link_to, post_path, url_for};

/// What the index shows for one post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostItem {
    pub key: String,
    pub href: String,
    pub title: String,
    pub date: String,
    /// HTML fragment, inserted unescaped
    pub summary: String,
}

/// Renders posts in the order given. Filtering and sorting happen upstream.
#[derive(Debug, Clone)]
pub struct PostList<'a> {
    config: &'a SiteConfig,
    posts: &'a [&'a PostRecord],
}

impl<'a> PostList<'a> {
    pub fn new(config: &'a SiteConfig, posts: &'a [&'a PostRecord]) -> Self {
        Self { config, posts }
    }

    pub fn items(&self) -> Vec<PostItem> {
        self.posts.iter().map(|post| self.item(post)).collect()
    }

    fn item(&self, post: &PostRecord) -> PostItem {
        let path = post_path(&post.slug, self.config.index.link_first_segment);
        PostItem {
            key: post.slug.clone(),
            href: url_for(self.config, &path),
            title: post.display_title().to_string(),
            date: post.date.clone(),
            summary: post.summary().to_string(),
        }
    }

    pub fn render(&self) -> String {
        self.items()
            .iter()
            .map(render_item)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn render_item(item: &PostItem) -> String {
    format!(
        r#"<article data-key="{key}">
<h3 style="margin-bottom: 0.21875rem">{link}</h3>
<small>{date}</small>
<div class="summary">{summary}</div>
</article>"#,
        key = html_escape(&item.key),
        link = link_to(&item.href, &html_escape(&item.title), Some("box-shadow: none")),
        date = html_escape(&item.date),
        summary = item.summary,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn post(slug: &str, title: Option<&str>) -> PostRecord {
        let mut post = PostRecord::new(slug, Local::now());
        post.title = title.map(str::to_string);
        post.date = "January 01, 2019".to_string();
        post.excerpt = "Summary text".to_string();
        post
    }

    #[test]
    fn test_items_keep_order_and_fall_back_to_slug() {
        let config = SiteConfig::default();
        let a = post("/b-post/", Some("B"));
        let b = post("/a-post/", None);
        let posts = vec![&a, &b];

        let items = PostList::new(&config, &posts).items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "B");
        assert_eq!(items[0].href, "/b-post/");
        assert_eq!(items[1].title, "/a-post/");
        assert_eq!(items[1].key, "/a-post/");
    }

    #[test]
    fn test_summary_prefers_description() {
        let config = SiteConfig::default();
        let plain = post("/plain/", Some("Plain"));
        let mut custom = post("/custom/", Some("Custom"));
        custom.description = Some("Custom".to_string());
        let posts = vec![&plain, &custom];

        let items = PostList::new(&config, &posts).items();
        assert_eq!(items[0].summary, "Summary text");
        assert_eq!(items[1].summary, "Custom");
    }

    #[test]
    fn test_first_segment_links() {
        let mut config = SiteConfig::default();
        config.root = "/blog/".to_string();
        config.index.link_first_segment = true;
        let nested = post("/2019/hello/", Some("Hello"));
        let posts = vec![&nested];

        let items = PostList::new(&config, &posts).items();
        assert_eq!(items[0].href, "/blog/2019/");
    }

    #[test]
    fn test_render_escapes_title_not_summary() {
        let config = SiteConfig::default();
        let mut p = post("/x/", Some("<script>"));
        p.excerpt = "<em>hi</em>".to_string();
        let posts = vec![&p];

        let html = PostList::new(&config, &posts).render();
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("<em>hi</em>"));
        assert!(html.contains("<small>January 01, 2019</small>"));
    }

    #[test]
    fn test_empty_list_renders_nothing() {
        let config = SiteConfig::default();
        assert_eq!(PostList::new(&config, &[]).render(), "");
    }
}
