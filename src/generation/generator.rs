//! Content generators: turn a task into an article.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::Local;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use super::task::GenerationTask;
use crate::config::BlogConfig;
use crate::error::{GenerationError, LlmError};
use crate::llm::{GenerationRequest, LlmProvider, Message};
use crate::prompts::build_article_prompt;
use crate::storage::{make_slug, Article};

/// Produces one candidate article per call. May fail transiently.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, task: &GenerationTask) -> Result<Article, GenerationError>;
}

/// Splits a completion into `(title, body)`.
///
/// The first line, with surrounding `#`, `*` and whitespace removed, is the
/// title; everything after it, trimmed, is the body.
pub fn parse_completion(content: &str) -> Result<(String, String), LlmError> {
    let content = content.trim();
    let (first, rest) = content.split_once('\n').unwrap_or((content, ""));

    let title = first
        .trim_matches(|c: char| c == '#' || c == '*' || c.is_whitespace())
        .to_string();
    if title.is_empty() {
        return Err(LlmError::ParseError(
            "completion has no title line".to_string(),
        ));
    }

    Ok((title, rest.trim().to_string()))
}

/// Generator backed by a chat-completions provider.
pub struct LlmContentGenerator {
    provider: Arc<dyn LlmProvider>,
    config: Arc<BlogConfig>,
    rng: Mutex<ChaCha8Rng>,
}

impl LlmContentGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, config: Arc<BlogConfig>) -> Self {
        Self {
            provider,
            config,
            rng: Mutex::new(ChaCha8Rng::from_rng(&mut rand::rng())),
        }
    }

    /// Uses a fixed seed for the prompt flavor and slug suffix.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(ChaCha8Rng::seed_from_u64(seed));
        self
    }
}

#[async_trait]
impl ContentGenerator for LlmContentGenerator {
    async fn generate(&self, task: &GenerationTask) -> Result<Article, GenerationError> {
        let now = Local::now().naive_local();
        let today = now.date();

        let product = self.config.product(&task.product)?;
        let language = self.config.language(&task.language)?;

        let (prompt, disambiguator) = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            let prompt = build_article_prompt(task, &self.config, today, &mut *rng)?;
            (prompt, rng.random_range(100..=999))
        };

        let llm = &self.config.llm;
        let request = GenerationRequest::new(
            &llm.model,
            vec![Message::system(&prompt.system), Message::user(&prompt.user)],
        )
        .with_max_tokens(llm.max_tokens)
        .with_temperature(llm.temperature)
        .with_top_p(llm.top_p);

        tracing::debug!(task = %task, seed = %prompt.variation_seed, "Requesting article");

        let response = self.provider.generate(request).await?;
        let content = response
            .first_content()
            .ok_or_else(|| LlmError::ParseError("response has no choices".to_string()))?;
        let (title, body) = parse_completion(content)?;

        Ok(Article {
            title,
            body,
            product: task.product.clone(),
            product_name: product.name.clone(),
            product_link: product.link.clone(),
            product_image: product.image.clone(),
            language: task.language.clone(),
            language_name: language.name.clone(),
            angle: task.angle.clone(),
            slug: make_slug(&task.language, &task.product, &task.angle, today, disambiguator),
            generated_at: now,
            season: prompt.season,
            variation_seed: prompt.variation_seed,
            useless_detail: prompt.useless_detail,
            random_tangent: prompt.random_tangent,
            quality: None,
        })
    }
}
