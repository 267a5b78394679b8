//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::Path;

use chrono::NaiveDate;
use seo_forge::config::{
    BlogConfig, GenerationSettings, LanguageConfig, LlmSettings, PathSettings, ProductConfig,
    ProductKnowledge, SiteSettings,
};
use seo_forge::generation::GenerationTask;
use seo_forge::prompts::Season;
use seo_forge::storage::Article;

/// Article body that passes every critical gate rule.
pub const GOOD_BODY: &str = "Okay so my hands were a wreck last winter. I didn't expect much from a tin of beef fat, honestly.\n\n**Does it smell like beef?**\nNot at all, it smells faintly of lemon peel and nothing else after a minute.";

/// Article body that trips several critical gate rules.
pub const BAD_BODY: &str = "In this article we explore a miracle balm. It is a game-changer. Buy now on Etsy, Etsy, Etsy.";

/// Valid configuration with `products` products and two languages, with
/// every data path inside `dir`.
pub fn config_in(dir: &Path, products: usize) -> BlogConfig {
    BlogConfig {
        site: SiteSettings::default(),
        llm: LlmSettings::default(),
        generation: GenerationSettings {
            quality_backoff_secs: 0,
            error_backoff_secs: 0,
            ..GenerationSettings::default()
        },
        products: (0..products)
            .map(|i| ProductConfig {
                id: format!("p{:02}", i),
                name: format!("Whipped Tallow Balm - Scent {}", i),
                scent_benefits: "Calming".to_string(),
                link: format!("https://shop.example/p{:02}", i),
                image: format!("p{:02}.png", i),
                price: 21.0,
            })
            .collect(),
        languages: vec![
            LanguageConfig {
                code: "en".to_string(),
                name: "English".to_string(),
            },
            LanguageConfig {
                code: "de".to_string(),
                name: "Deutsch".to_string(),
            },
        ],
        angles: vec![
            "problem_solution".to_string(),
            "heritage".to_string(),
            "routine".to_string(),
        ],
        tallow_knowledge: ProductKnowledge::default(),
        paths: PathSettings::default().resolved_against(dir),
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// An article for `task` with the given body and slug suffix.
pub fn article_for(task: &GenerationTask, body: &str, suffix: usize) -> Article {
    Article {
        title: format!("{} notes from my bathroom shelf", task.product),
        body: body.to_string(),
        product: task.product.clone(),
        product_name: format!("{} Balm", task.product),
        product_link: String::new(),
        product_image: String::new(),
        language: task.language.clone(),
        language_name: String::new(),
        angle: task.angle.clone(),
        slug: format!(
            "{}-{}-{}-20260301-{}",
            task.language,
            task.product,
            task.angle.replace('_', "-"),
            suffix
        ),
        generated_at: date(2026, 3, 1)
            .and_hms_opt(7, 45, 0)
            .expect("valid time"),
        season: Season::Spring,
        variation_seed: String::new(),
        useless_detail: String::new(),
        random_tangent: String::new(),
        quality: None,
    }
}
