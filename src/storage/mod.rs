//! Local article storage.

pub mod article;
pub mod store;

pub use article::{is_valid_slug, make_slug, Article};
pub use store::{ArticleStore, FileArticleStore};
