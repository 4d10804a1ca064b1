//! HTML helper functions

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Truncate a string to at most `length` characters, omission included.
/// The omission is dropped when `length` leaves no room for it.
pub fn truncate(s: &str, length: usize, omission: Option<&str>) -> String {
    let omission = omission.unwrap_or("...");

    if s.chars().count() <= length {
        s.to_string()
    } else if omission.chars().count() > length {
        s.chars().take(length).collect()
    } else {
        let truncated: String = s
            .chars()
            .take(length.saturating_sub(omission.chars().count()))
            .collect();
        format!("{}{}", truncated.trim_end(), omission)
    }
}

/// Generate an anchor tag. `text` is inserted as-is.
pub fn link_to(href: &str, text: &str, style: Option<&str>) -> String {
    let style_attr = style
        .map(|s| format!(r#" style="{}""#, html_escape(s)))
        .unwrap_or_default();
    format!(
        r#"<a href="{}"{}>{}</a>"#,
        html_escape(href),
        style_attr,
        text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello World", 8, None), "Hello...");
        assert_eq!(truncate("Hi", 10, None), "Hi");
        assert_eq!(truncate("Hello World", 6, Some("…")), "Hello…");
    }

    #[test]
    fn test_truncate_shorter_than_omission() {
        assert_eq!(truncate("Hello World", 0, Some("…")), "");
        assert_eq!(truncate("Hello World", 2, None), "He");
        assert_eq!(truncate("Hello World", 3, None), "...");
    }

    #[test]
    fn test_link_to() {
        assert_eq!(link_to("/a/", "A", None), r#"<a href="/a/">A</a>"#);
        assert_eq!(
            link_to("/", "Home", Some("box-shadow: none")),
            r#"<a href="/" style="box-shadow: none">Home</a>"#
        );
    }
}
