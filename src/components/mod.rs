//! Presentational building blocks of the blog pages
//!
//! Each component is a plain value rendered to an HTML string. Components
//! hold no state of their own; whatever they display is passed in by the
//! page that composes them.

mod bio;
mod layout;
mod post_list;
mod switch;

pub use bio::Bio;
pub use layout::Layout;
pub use post_list::{PostItem, PostList};
pub use switch::Switch;
