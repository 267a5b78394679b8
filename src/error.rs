//! Error types for seo-forge operations.
//!
//! Defines error types for the major subsystems:
//! - Configuration loading and validation
//! - LLM API interactions
//! - Article and rotation-state persistence
//! - Article generation (prompting + parsing)
//! - Static site rendering

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON config error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML config error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported config format '{0}': expected .json, .yaml or .yml")]
    UnsupportedFormat(String),

    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Unknown {kind} '{id}'")]
    UnknownId { kind: &'static str, id: String },
}

/// Errors that can occur during LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Missing API key: set {env_var} or create the key file {file:?}")]
    MissingApiKey { env_var: String, file: PathBuf },

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Failed to parse LLM response: {0}")]
    ParseError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error ({code}): {message}")]
    ApiError { code: u16, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LlmError {
    /// Whether retrying the same request can reasonably succeed.
    ///
    /// A missing credential or an unreadable key file will not fix itself
    /// between attempts; everything else is a network/API hiccup.
    pub fn is_transient(&self) -> bool {
        !matches!(self, LlmError::MissingApiKey { .. } | LlmError::Io(_))
    }
}

/// Errors that can occur while persisting articles.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to create storage directory: {0}")]
    DirectoryCreationFailed(String),

    #[error("Invalid article slug '{0}'")]
    InvalidSlug(String),
}

/// Errors that can occur in the rotation scheduler.
#[derive(Debug, Error)]
pub enum RotationError {
    #[error("Rotation has no products to schedule")]
    EmptyCatalog,

    #[error("products_per_day must be at least 1")]
    ZeroBatchSize,

    #[error("IO error on rotation state {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors that can occur while producing a single article.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Prompt rendering failed: {0}")]
    Prompt(#[from] tera::Error),

    #[error("Generator timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to acquire generation permit: {0}")]
    PermitUnavailable(String),
}

impl GenerationError {
    /// Whether this failure should consume a retry rather than abort the task.
    pub fn is_transient(&self) -> bool {
        match self {
            GenerationError::Llm(e) => e.is_transient(),
            GenerationError::Timeout { .. } => true,
            GenerationError::Prompt(_)
            | GenerationError::Config(_)
            | GenerationError::PermitUnavailable(_) => false,
        }
    }
}

/// Errors that can occur while rendering the static site.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template rendering error: {0}")]
    Template(#[from] tera::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to copy assets: {0}")]
    AssetCopy(#[from] walkdir::Error),
}
