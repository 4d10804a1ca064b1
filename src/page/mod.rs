//! Page composition
//!
//! [`IndexPage`] owns the visibility flag for one load of the post index and
//! wires content, filter and components together. [`PostPage`] renders a
//! single post inside the same chrome.

use crate::components::{Bio, Layout, PostList, Switch};
use crate::config::SiteConfig;
use crate::content::PostRecord;
use crate::filter::{PostFilter, VisibilityFlag};
use crate::helpers::{html_escape, post_path, url_for};

/// Index path, relative to the site root, showing the given flag state
pub fn index_path(flag: VisibilityFlag) -> &'static str {
    if flag.includes_drafts() {
        "drafts/"
    } else {
        ""
    }
}

/// The post index for a single page load
#[derive(Debug, Clone)]
pub struct IndexPage<'a> {
    config: &'a SiteConfig,
    filter: &'a PostFilter,
    posts: &'a [PostRecord],
    flag: VisibilityFlag,
}

impl<'a> IndexPage<'a> {
    /// Start a page load. Drafts are excluded until the reader toggles them on.
    pub fn new(config: &'a SiteConfig, filter: &'a PostFilter, posts: &'a [PostRecord]) -> Self {
        Self {
            config,
            filter,
            posts,
            flag: VisibilityFlag::default(),
        }
    }

    pub fn flag(&self) -> VisibilityFlag {
        self.flag
    }

    /// Change handler for the drafts switch
    pub fn toggle(&mut self, include_drafts: bool) {
        let flag = VisibilityFlag::new(include_drafts);
        if flag != self.flag {
            tracing::debug!("Drafts toggled: {}", include_drafts);
        }
        self.flag = flag;
    }

    /// Route a click on the switch back into [`IndexPage::toggle`].
    /// Does nothing when the policy has no switch.
    pub fn click_switch(&mut self) {
        let mut next = None;
        if let Some(switch) = self.switch("") {
            switch.click(|checked| next = Some(checked));
        }
        if let Some(checked) = next {
            self.toggle(checked);
        }
    }

    pub fn visible_posts(&self) -> Vec<&'a PostRecord> {
        self.filter.visible_posts(self.posts, self.flag)
    }

    /// URL of the page showing the other flag state
    pub fn toggle_href(&self) -> String {
        url_for(self.config, index_path(self.flag.flipped()))
    }

    fn switch<'s>(&'s self, action: &'s str) -> Option<Switch<'s>> {
        self.filter.uses_flag().then(|| {
            Switch::new(
                self.flag.includes_drafts(),
                &self.config.index.toggle_label,
                action,
            )
        })
    }

    pub fn render(&self) -> String {
        let visible = self.visible_posts();
        let toggle_href = self.toggle_href();

        let mut body = vec![Bio::from_config(self.config).render()];
        if let Some(switch) = self.switch(&toggle_href) {
            body.push(switch.render());
        }
        body.push(PostList::new(self.config, &visible).render());

        let home = url_for(self.config, "");
        Layout::new(self.config, &home)
            .with_page_title("All posts")
            .render(&body.join("\n"))
    }
}

/// A single post, rendered at its own path
#[derive(Debug, Clone)]
pub struct PostPage<'a> {
    config: &'a SiteConfig,
    post: &'a PostRecord,
}

impl<'a> PostPage<'a> {
    pub fn new(config: &'a SiteConfig, post: &'a PostRecord) -> Self {
        Self { config, post }
    }

    /// Output path relative to the site root
    pub fn path(&self) -> String {
        post_path(&self.post.slug, self.config.index.link_first_segment)
    }

    pub fn render(&self) -> String {
        let location = url_for(self.config, &self.path());
        let title = self.post.display_title();

        let article = format!(
            r#"<article>
<h1>{title}</h1>
<small>{date}</small>
{content}
</article>
<hr>
{bio}"#,
            title = html_escape(title),
            date = html_escape(&self.post.date),
            content = self.post.content,
            bio = Bio::from_config(self.config).render(),
        );

        Layout::new(self.config, &location)
            .with_page_title(title)
            .render(&article)
    }
}
