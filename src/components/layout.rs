//! Page chrome: header, main column and footer

use chrono::{Datelike, Local};

use crate::config::SiteConfig;
use crate::helpers::{html_escape, link_to, url_for};

const LINK_STYLE: &str = "box-shadow: none; text-decoration: none; color: inherit";

/// Wraps page content in the site header and footer.
///
/// The header is a large `<h1>` on the home page and a smaller `<h3>`
/// everywhere else; both link back home.
#[derive(Debug, Clone)]
pub struct Layout<'a> {
    config: &'a SiteConfig,
    location: &'a str,
    page_title: Option<&'a str>,
    year: i32,
}

impl<'a> Layout<'a> {
    /// `location` is the URL path of the page being rendered
    pub fn new(config: &'a SiteConfig, location: &'a str) -> Self {
        Self {
            config,
            location,
            page_title: None,
            year: Local::now().year(),
        }
    }

    /// Title for the `<title>` element, in front of the site title
    pub fn with_page_title(mut self, title: &'a str) -> Self {
        self.page_title = Some(title);
        self
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    pub fn is_root(&self) -> bool {
        self.location == url_for(self.config, "")
    }

    fn header(&self) -> String {
        let home = link_to(
            &url_for(self.config, ""),
            &html_escape(&self.config.title),
            Some(LINK_STYLE),
        );

        if self.is_root() {
            format!(
                r#"<h1 style="font-size: 2.5rem; margin-bottom: 2.625rem; margin-top: 0">{}</h1>"#,
                home
            )
        } else {
            format!(
                r#"<h3 style="font-family: Montserrat, sans-serif; margin-top: 0">{}</h3>"#,
                home
            )
        }
    }

    pub fn render(&self, children: &str) -> String {
        let title = match self.page_title {
            Some(page) => format!("{} | {}", page, self.config.title),
            None => self.config.title.clone(),
        };
        let description = if self.config.description.is_empty() {
            String::new()
        } else {
            format!(
                "\n<meta name=\"description\" content=\"{}\">",
                html_escape(&self.config.description)
            )
        };

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>{description}
</head>
<body>
<div style="margin-left: auto; margin-right: auto; max-width: 42rem; padding: 2.625rem 1.3125rem">
<header>{header}</header>
<main>
{children}
</main>
<footer>© {year}, Built with <a href="https://crates.io/crates/blog-index">blog-index</a></footer>
</div>
</body>
</html>
"#,
            title = html_escape(&title),
            description = description,
            header = self.header(),
            children = children,
            year = self.year,
        )
    }
}
