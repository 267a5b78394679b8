//! Blog configuration loaded once at startup.
//!
//! The configuration file describes the product catalog, the supported
//! languages, the article angles and every tunable of the generation run.
//! It is parsed into an explicit [`BlogConfig`] that callers pass down by
//! reference; nothing in the crate reads configuration from globals.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::prompts::angle_prompt;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "./config.json";

/// Root configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogConfig {
    /// Site-wide settings used by the renderer and quality gate.
    #[serde(default)]
    pub site: SiteSettings,
    /// LLM endpoint settings.
    #[serde(default)]
    pub llm: LlmSettings,
    /// Generation and retry tunables.
    #[serde(default)]
    pub generation: GenerationSettings,
    /// Product catalog. List order is the default rotation order.
    pub products: Vec<ProductConfig>,
    /// Supported languages, in display order.
    pub languages: Vec<LanguageConfig>,
    /// Angle identifiers available for sampling.
    pub angles: Vec<String>,
    /// Background facts mentioned casually in every article.
    #[serde(default)]
    pub tallow_knowledge: ProductKnowledge,
    /// Filesystem layout.
    #[serde(default)]
    pub paths: PathSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub name: String,
    /// Absolute origin, e.g. `https://example.com`. Empty means relative URLs.
    pub base_url: String,
    /// Marketplace whose name must not be over-mentioned in articles.
    pub marketplace: String,
    /// Origin used in sitemap/robots when `base_url` is empty.
    pub fallback_origin: String,
    /// Last day the advertised product price is valid, for structured data.
    pub price_valid_until: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            name: "FrenchTallowSoap".to_string(),
            base_url: String::new(),
            marketplace: "Etsy".to_string(),
            fallback_origin: "https://puretallow.com".to_string(),
            price_valid_until: "2026-12-31".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Full chat-completions URL.
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Environment variable consulted first for the API key.
    pub api_key_env: String,
    /// Key file (relative to the config file) consulted when the env var is unset.
    pub api_key_file: PathBuf,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.deepseek.com/beta/chat/completions".to_string(),
            model: "deepseek-chat".to_string(),
            max_tokens: 4096,
            temperature: 0.95,
            top_p: 0.92,
            timeout_secs: 180,
            api_key_env: "DEEPSEEK_API_KEY".to_string(),
            api_key_file: PathBuf::from("deepseek_api_key.txt"),
        }
    }
}

impl LlmSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub min_words: u32,
    pub max_words: u32,
    /// Rotation batch size.
    pub products_per_day: usize,
    /// Angles sampled per (product, language) pair.
    pub articles_per_product_per_day: usize,
    /// Total attempts per task, shared by generator errors and gate failures.
    pub max_attempts: u32,
    /// Backoff unit after a quality-gate failure (multiplied by the attempt number).
    pub quality_backoff_secs: u64,
    /// Backoff unit after a generator error (multiplied by the attempt number).
    pub error_backoff_secs: u64,
    /// Global cap on simultaneous generator calls.
    pub max_concurrent: usize,
    /// Worker count for the worker-pool execution mode.
    pub workers: usize,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            min_words: 900,
            max_words: 1400,
            products_per_day: 4,
            articles_per_product_per_day: 1,
            max_attempts: 3,
            quality_backoff_secs: 2,
            error_backoff_secs: 5,
            max_concurrent: 100,
            workers: 20,
        }
    }
}

/// One sellable product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub scent_benefits: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub image: String,
    #[serde(default = "default_price")]
    pub price: f64,
}

fn default_price() -> f64 {
    21.0
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LanguageConfig {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductKnowledge {
    pub what_it_is: String,
    pub addresses: Vec<String>,
}

impl Default for ProductKnowledge {
    fn default() -> Self {
        Self {
            what_it_is: "Rendered grass-fed beef fat, rich in vitamins A, D, E and K".to_string(),
            addresses: vec![
                "dry skin".to_string(),
                "eczema".to_string(),
                "chapped hands".to_string(),
                "sensitive skin".to_string(),
                "fine lines".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    pub articles_dir: PathBuf,
    pub images_dir: PathBuf,
    pub output_dir: PathBuf,
    pub rotation_file: PathBuf,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            articles_dir: PathBuf::from("articles"),
            images_dir: PathBuf::from("images"),
            output_dir: PathBuf::from("public"),
            rotation_file: PathBuf::from("rotation_state.json"),
        }
    }
}

impl PathSettings {
    /// Resolves every relative path against `base`.
    pub fn resolved_against(&self, base: &Path) -> Self {
        let join = |p: &PathBuf| {
            if p.is_absolute() {
                p.clone()
            } else {
                base.join(p)
            }
        };
        Self {
            articles_dir: join(&self.articles_dir),
            images_dir: join(&self.images_dir),
            output_dir: join(&self.output_dir),
            rotation_file: join(&self.rotation_file),
        }
    }
}

impl BlogConfig {
    /// Loads configuration from a `.json`, `.yaml` or `.yml` file.
    ///
    /// Relative paths inside the document (data directories, key file) are
    /// resolved against the directory containing the config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();

        let mut config: BlogConfig = match extension.as_str() {
            "json" => serde_json::from_str(&raw)?,
            "yaml" | "yml" => serde_yaml::from_str(&raw)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.paths = config.paths.resolved_against(base);
        if config.llm.api_key_file.is_relative() {
            config.llm.api_key_file = base.join(&config.llm.api_key_file);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates cross-field invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.products.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "at least one product is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for product in &self.products {
            if !seen.insert(product.id.as_str()) {
                return Err(ConfigError::ValidationFailed(format!(
                    "duplicate product id '{}'",
                    product.id
                )));
            }
        }

        if self.languages.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "at least one language is required".to_string(),
            ));
        }

        if self.angles.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "at least one angle is required".to_string(),
            ));
        }
        if let Some(unknown) = self.angles.iter().find(|a| angle_prompt(a).is_none()) {
            return Err(ConfigError::ValidationFailed(format!(
                "angle '{}' has no prompt",
                unknown
            )));
        }

        if self.generation.products_per_day == 0 {
            return Err(ConfigError::ValidationFailed(
                "products_per_day must be at least 1".to_string(),
            ));
        }
        if self.generation.max_attempts == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if self.generation.max_concurrent == 0 || self.generation.workers == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_concurrent and workers must be at least 1".to_string(),
            ));
        }
        if self.generation.min_words > self.generation.max_words {
            return Err(ConfigError::ValidationFailed(format!(
                "min_words ({}) must be <= max_words ({})",
                self.generation.min_words, self.generation.max_words
            )));
        }

        Ok(())
    }

    /// Product ids in catalog order.
    pub fn product_ids(&self) -> Vec<String> {
        self.products.iter().map(|p| p.id.clone()).collect()
    }

    /// Language codes in configuration order.
    pub fn language_codes(&self) -> Vec<String> {
        self.languages.iter().map(|l| l.code.clone()).collect()
    }

    pub fn product(&self, id: &str) -> Result<&ProductConfig, ConfigError> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ConfigError::UnknownId {
                kind: "product",
                id: id.to_string(),
            })
    }

    pub fn language(&self, code: &str) -> Result<&LanguageConfig, ConfigError> {
        self.languages
            .iter()
            .find(|l| l.code == code)
            .ok_or_else(|| ConfigError::UnknownId {
                kind: "language",
                id: code.to_string(),
            })
    }

    pub fn ensure_angle(&self, angle: &str) -> Result<(), ConfigError> {
        if self.angles.iter().any(|a| a == angle) {
            Ok(())
        } else {
            Err(ConfigError::UnknownId {
                kind: "angle",
                id: angle.to_string(),
            })
        }
    }
}
