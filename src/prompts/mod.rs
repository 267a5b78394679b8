//! LLM prompts for article generation.
//!
//! - [`angles`] - the narrative angles and their briefs
//! - [`article`] - system prompt, flavor lists and the user-prompt builder

pub mod angles;
pub mod article;

pub use angles::{angle_ids, angle_prompt, AnglePrompt, ANGLE_PROMPTS};
pub use article::{
    build_article_prompt, season_for, ArticlePrompt, Season, ARTICLE_SYSTEM_PROMPT,
};
