//! seo-forge: multilingual SEO article generator for a product catalog.
//!
//! This library rotates through the catalog, asks an LLM for articles in
//! every configured language, screens them with lexical quality checks and
//! renders the accepted ones into a static site.

pub mod cli;
pub mod config;
pub mod error;
pub mod generation;
pub mod llm;
pub mod prompts;
pub mod quality;
pub mod rotation;
pub mod site;
pub mod storage;
pub mod testing;

// Re-export commonly used error types
pub use error::{ConfigError, GenerationError, LlmError, RotationError, SiteError, StorageError};
