//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::SiteConfig;

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'%');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/hello-world/") // -> "/blog/hello-world/"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Path a post is published under, relative to the site root.
///
/// With `first_segment` only the first segment of the slug is kept, so
/// `/2019/hello/` becomes `2019/`. Every segment is percent-encoded.
pub fn post_path(slug: &str, first_segment: bool) -> String {
    let mut segments = slug.split('/').filter(|s| !s.is_empty());

    let kept: Vec<String> = if first_segment {
        segments.next().into_iter().map(encode_segment).collect()
    } else {
        segments.map(encode_segment).collect()
    };

    if kept.is_empty() {
        String::new()
    } else {
        format!("{}/", kept.join("/"))
    }
}

/// Percent-encode a single URL path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}
