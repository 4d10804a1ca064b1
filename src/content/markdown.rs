//! Markdown rendering with syntax highlighting

use anyhow::Result;
use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::HighlightConfig;
use crate::helpers::{html_escape, truncate};

lazy_static! {
    static ref MORE_MARKER: Regex = Regex::new(r"<!--\s*more\s*-->").expect("valid regex");
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self::with_options(&HighlightConfig::default())
    }

    pub fn with_options(highlight: &HighlightConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: highlight.theme.clone(),
            line_numbers: highlight.line_number,
        }
    }

    fn options() -> Options {
        // Front-matter is stripped before rendering, so no metadata block option
        Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        let parser = Parser::new_ext(markdown, Self::options());

        let mut events: Vec<Event> = Vec::new();
        let mut in_code_block = false;
        let mut code_block_lang: Option<String> = None;
        let mut code_block_content = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_block_lang = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                        _ => None,
                    };
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let highlighted =
                        self.highlight_code(&code_block_content, code_block_lang.as_deref());
                    events.push(Event::Html(CowStr::from(highlighted)));
                    in_code_block = false;
                    code_block_lang = None;
                }
                Event::Text(text) if in_code_block => {
                    code_block_content.push_str(&text);
                }
                _ if in_code_block => {}
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    /// Render a post body, returning `(content_html, excerpt_html)`.
    ///
    /// With a `<!-- more -->` marker the excerpt is the rendered text before it.
    /// Otherwise it is the plain text of the whole post, cut to `excerpt_length`
    /// characters.
    pub fn render_post(&self, body: &str, excerpt_length: usize) -> Result<(String, String)> {
        match split_excerpt(body) {
            Some((excerpt_md, rest_md)) => {
                let excerpt = self.render(excerpt_md)?;
                let content = self.render(&format!("{}\n\n{}", excerpt_md, rest_md))?;
                Ok((content, excerpt))
            }
            None => {
                let content = self.render(body)?;
                let text = plain_text(body);
                let excerpt = html_escape(&truncate(&text, excerpt_length, Some("…")));
                Ok((content, excerpt))
            }
        }
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());

        let highlighted = theme.and_then(|theme| {
            highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
        });

        match highlighted {
            Some(highlighted) if self.line_numbers => add_line_numbers(&highlighted, lang),
            Some(highlighted) => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                lang, highlighted
            ),
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                lang,
                html_escape(code)
            ),
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a body at the first `<!-- more -->` marker
pub fn split_excerpt(body: &str) -> Option<(&str, &str)> {
    let marker = MORE_MARKER.find(body)?;
    Some((
        body[..marker.start()].trim(),
        body[marker.end()..].trim(),
    ))
}

/// Text content of a markdown document with whitespace collapsed
fn plain_text(markdown: &str) -> String {
    let mut text = String::new();

    for event in Parser::new_ext(markdown, MarkdownRenderer::options()) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak
            | Event::HardBreak
            | Event::End(TagEnd::Paragraph)
            | Event::End(TagEnd::Heading(_))
            | Event::End(TagEnd::Item)
            | Event::End(TagEnd::CodeBlock) => text.push(' '),
            _ => {}
        }
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn add_line_numbers(code: &str, lang: &str) -> String {
    let lines: Vec<&str> = code.lines().collect();

    let gutter = (1..=lines.len())
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre>{}</pre></td></tr></table></figure>"#,
        lang,
        gutter,
        lines.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a test.").unwrap();
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_code_block() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```rust\nfn main() {}\n```").unwrap();
        assert!(html.contains("highlight rust"));
        assert!(html.contains("line-number"));
    }

    #[test]
    fn test_split_excerpt() {
        let (excerpt, rest) =
            split_excerpt("This is excerpt.\n<!--more-->\nThis is more content.").unwrap();
        assert_eq!(excerpt, "This is excerpt.");
        assert_eq!(rest, "This is more content.");
        assert!(split_excerpt("No marker here").is_none());
    }

    #[test]
    fn test_excerpt_from_marker() {
        let renderer = MarkdownRenderer::new();
        let (content, excerpt) = renderer
            .render_post("Intro *text*.\n\n<!-- more -->\n\nThe rest.", 140)
            .unwrap();
        assert_eq!(excerpt.trim(), "<p>Intro <em>text</em>.</p>");
        assert!(content.contains("The rest."));
        assert!(!content.contains("more -->"));
    }

    #[test]
    fn test_excerpt_is_truncated_plain_text() {
        let renderer = MarkdownRenderer::new();
        let body = "# Heading\n\nSome **bold** words that go on for a while.";
        let (_, excerpt) = renderer.render_post(body, 20).unwrap();
        assert!(!excerpt.contains('<'));
        assert!(excerpt.starts_with("Heading Some bold"));
        assert!(excerpt.ends_with('…'));
        assert!(excerpt.chars().count() <= 20);
    }

    #[test]
    fn test_short_body_excerpt_is_whole_text() {
        let renderer = MarkdownRenderer::new();
        let (_, excerpt) = renderer.render_post("Tom & Jerry", 140).unwrap();
        assert_eq!(excerpt, "Tom &amp; Jerry");
    }
}
