//! Prompt construction for article generation.
//!
//! Building a prompt is a pure function of the task, the configuration, the
//! date and a caller-supplied random source. Passing a seeded `ChaCha8Rng`
//! makes the output reproducible.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};

use super::angles::angle_prompt;
use crate::config::BlogConfig;
use crate::error::{ConfigError, GenerationError};
use crate::generation::task::GenerationTask;

/// Number of "good for" facts sampled into each prompt.
const TALLOW_FACTS_PER_PROMPT: usize = 3;

/// System prompt shared by every article request.
pub const ARTICLE_SYSTEM_PROMPT: &str = r#"You write personal blog posts about skincare products you actually use.

## VOICE

You are an ordinary person in your thirties typing on a phone after a long day. You are not a
professional writer. You get distracted, circle back, contradict yourself a little and leave the
occasional thought unfinished. You compare things to oddly specific memories ("like the soap at
that hotel in Denver") instead of using polished adjectives.

## RHYTHM

- Vary sentence length hard: a three-word sentence, then a forty-word run-on with a detour in it.
- Never three sentences of similar length in a row, never three with the same opening.
- At least one fragment per paragraph. "Weird." "Whatever." "Just... no."

## WORD CHOICE

- Skip the obvious word. Say "big deal" instead of "important".
- Repeat a word awkwardly rather than reaching for a synonym.
- Name real brands and places instead of generic descriptions.

## NEVER WRITE

- Stock transitions and wrap-ups: "in conclusion", "to summarize", "all in all", "that being said",
  "at the end of the day", "it's important to note".
- Reflective clichés: "I found myself", "I couldn't help but", "it struck me that".
- Sensory clichés: "a hint of", "notes of", "smooth to the touch", "warm and inviting".
- Corporate vocabulary: delve, leverage, robust, unlock, unleash, journey, landscape, realm,
  seamless, holistic, game-changer, revolutionary, transformative, cutting-edge.
- Absolute claims: miracle, cure, guaranteed, perfect, instant, 100%.
- Sales language: "buy now", "click here", "order today", "limited time".

Output the title on the first line, then the article in markdown."#;

/// Hyper-specific details that make a scene feel lived in.
pub const USELESS_DETAILS: &[&str] = &[
    "it was almost midnight, 11:52 or so",
    "the $4.29 tube from CVS",
    "my left foot had gone numb",
    "the kitchen chair was freezing",
    "the fridge was doing its humming thing",
    "someone upstairs was vacuuming",
    "it was a Tuesday, possibly a Wednesday",
    "the pharmacy on Main, not the one by the mall",
    "the thermostat said 68",
    "my phone was on 9%",
    "there was a mug ring on the nightstand",
    "I had my brother's old flannel on",
    "the radiator kept ticking",
    "it was doing that fine misty rain",
];

/// Short off-topic asides.
pub const RANDOM_TANGENTS: &[&str] = &[
    "that reminds me of the soap at a B&B we stayed at once",
    "no idea why I remember that",
    "my tea has gone cold, great",
    "I really need to reorder soon",
    "sorry, went off on a tangent",
    "this is unrelated but",
    "the dog keeps sniffing the jar",
    "the weather has been so strange lately",
    "I told my cousin about this",
    "not the point though",
];

/// Broken-up, plain-spoken descriptions.
pub const FRAGMENTED_DESCRIPTIONS: &[&str] = &[
    "Texture was different. Good different.",
    "Smelled like. Hmm. Nice, anyway.",
    "Cold at first. Then it just disappears into your skin.",
    "Thick. Really thick. Not greasy though.",
    "My skin afterwards was. Just better.",
    "Soft, I guess. Is that the word. Yeah.",
    "Sort of waxy? Then it sinks in.",
    "It worked. Like, actually worked.",
    "Better than I expected, honestly.",
];

/// Mid-thought self-corrections.
pub const SELF_INTERRUPTIONS: &[&str] = &[
    "wait, where was I",
    "no, hang on, it was Thursday",
    "let me back up a bit",
    "I keep forgetting to say",
    "okay. Where was I. Right.",
    "anyway",
    "the thing is",
    "look",
    "I mean",
];

/// Informal connectives used in place of formal transitions.
pub const CASUAL_TRANSITIONS: &[&str] = &[
    "anyway",
    "so like",
    "but then",
    "I guess",
    "or whatever",
    "here's the thing",
    "and this is the weird part",
    "but get this",
    "so yeah",
    "I don't know",
];

const USER_PROMPT_TEMPLATE: &str = r#"Write {{ min_words }}-{{ max_words }} words in {{ language_name }} about this tallow skincare product.

PRODUCT: {{ product_name }}
SCENT: {{ scent_benefits }}

ANGLE: {{ angle_brief }}

TALLOW FACTS (mention them casually):
- {{ tallow_what }}
- Good for: {{ tallow_addresses }}

SEASON: {{ season }}

## STRUCTURE

1. Title on the first line. Include "tallow balm" or "tallow skincare" and the scent or product name.
   Casual, keyword-rich, never clickbait.
2. Mention "tallow balm" or "beef tallow skincare" within the first two or three sentences.
3. Three or four conversational subheadings written as `## Heading`.
4. Finish with a short FAQ section:

   ## Quick Questions I Get Asked

   **Is beef tallow good for your face?**
   Two or three casual sentences.

   **Does tallow balm clog pores?**
   Two or three casual sentences.

   **What does {{ product_name }} smell like?**
   Two or three casual sentences.

5. Mention the {{ marketplace }} shop naturally ONCE, somewhere in the middle. End with a soft, unpushy
   recommendation.

## TONE

You like this product. You were skeptical (beef fat on your face sounds odd), you tried it, it
surprised you, and now you use it all the time. Never say anything negative about the product, the
shop or the results.

## WORK THESE IN

- A useless detail: "{{ useless_detail }}"
- A brief tangent: "{{ random_tangent }}"
- A self-interruption: "{{ self_interruption }}"
- A plain description: "{{ fragmented_desc }}"
- Use transitions like "{{ casual_transition }}" instead of formal ones.

Seed: {{ seed }}"#;

/// Meteorological season for a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dec-Feb winter, Mar-May spring, Jun-Aug summer, otherwise autumn.
pub fn season_for(month: u32) -> Season {
    match month {
        12 | 1 | 2 => Season::Winter,
        3..=5 => Season::Spring,
        6..=8 => Season::Summer,
        _ => Season::Autumn,
    }
}

/// A rendered prompt plus the flavor choices recorded on the article.
#[derive(Debug, Clone)]
pub struct ArticlePrompt {
    pub system: String,
    pub user: String,
    pub season: Season,
    pub variation_seed: String,
    pub useless_detail: String,
    pub random_tangent: String,
}

fn pick<R: Rng + ?Sized>(list: &[&str], rng: &mut R) -> String {
    list.choose(rng).copied().unwrap_or_default().to_string()
}

/// Renders the user prompt for `task` on `date`.
///
/// Fails with [`ConfigError::UnknownId`] when the task names a product,
/// language or angle the configuration does not know.
pub fn build_article_prompt<R: Rng + ?Sized>(
    task: &GenerationTask,
    config: &BlogConfig,
    date: NaiveDate,
    rng: &mut R,
) -> Result<ArticlePrompt, GenerationError> {
    let product = config.product(&task.product)?;
    let language = config.language(&task.language)?;
    let angle_brief = angle_prompt(&task.angle).ok_or_else(|| ConfigError::UnknownId {
        kind: "angle",
        id: task.angle.clone(),
    })?;

    let season = season_for(date.month());
    let variation_seed = format!(
        "{}-{}-{}-{}-{}",
        date.format("%Y-%m-%d"),
        task.product,
        task.language,
        task.angle,
        rng.random_range(1000..=9999)
    );

    let useless_detail = pick(USELESS_DETAILS, rng);
    let random_tangent = pick(RANDOM_TANGENTS, rng);
    let self_interruption = pick(SELF_INTERRUPTIONS, rng);
    let fragmented_desc = pick(FRAGMENTED_DESCRIPTIONS, rng);
    let casual_transition = pick(CASUAL_TRANSITIONS, rng);

    let mut addresses = config.tallow_knowledge.addresses.clone();
    addresses.shuffle(rng);
    addresses.truncate(TALLOW_FACTS_PER_PROMPT);

    let mut context = Context::new();
    context.insert("min_words", &config.generation.min_words);
    context.insert("max_words", &config.generation.max_words);
    context.insert("language_name", &language.name);
    context.insert("product_name", &product.name);
    context.insert("scent_benefits", &product.scent_benefits);
    context.insert("angle_brief", angle_brief);
    context.insert("tallow_what", &config.tallow_knowledge.what_it_is);
    context.insert("tallow_addresses", &addresses.join(", "));
    context.insert("season", season.as_str());
    context.insert("marketplace", &config.site.marketplace);
    context.insert("useless_detail", &useless_detail);
    context.insert("random_tangent", &random_tangent);
    context.insert("self_interruption", &self_interruption);
    context.insert("fragmented_desc", &fragmented_desc);
    context.insert("casual_transition", &casual_transition);
    context.insert("seed", &variation_seed);

    let user = Tera::one_off(USER_PROMPT_TEMPLATE, &context, false)?;

    Ok(ArticlePrompt {
        system: ARTICLE_SYSTEM_PROMPT.to_string(),
        user,
        season,
        variation_seed,
        useless_detail,
        random_tangent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::sample_config;
    use rand_chacha::ChaCha8Rng;

    fn task() -> GenerationTask {
        GenerationTask::new("lemon", "fr", "heritage")
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).expect("valid date")
    }

    #[test]
    fn test_season_boundaries() {
        assert_eq!(season_for(12), Season::Winter);
        assert_eq!(season_for(2), Season::Winter);
        assert_eq!(season_for(3), Season::Spring);
        assert_eq!(season_for(8), Season::Summer);
        assert_eq!(season_for(9), Season::Autumn);
        assert_eq!(season_for(11), Season::Autumn);
    }

    #[test]
    fn test_prompt_contains_task_details() {
        let config = sample_config();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let prompt = build_article_prompt(&task(), &config, date(), &mut rng).expect("prompt");

        let product = config.product("lemon").expect("product");
        assert!(prompt.user.contains(&product.name));
        assert!(prompt.user.contains("Francais"));
        assert!(prompt.user.contains("SEASON: winter"));
        assert!(prompt.user.contains(angle_prompt("heritage").expect("angle")));
        assert!(prompt.user.contains(&prompt.useless_detail));
        assert!(prompt.user.contains(&prompt.random_tangent));
        assert!(prompt.user.ends_with(&format!("Seed: {}", prompt.variation_seed)));
        assert!(!prompt.user.contains("{{"));
        assert_eq!(prompt.season, Season::Winter);
        assert_eq!(prompt.system, ARTICLE_SYSTEM_PROMPT);
    }

    #[test]
    fn test_variation_seed_shape() {
        let config = sample_config();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let prompt = build_article_prompt(&task(), &config, date(), &mut rng).expect("prompt");

        let prefix = "2026-01-15-lemon-fr-heritage-";
        assert!(prompt.variation_seed.starts_with(prefix));
        let suffix: u32 = prompt.variation_seed[prefix.len()..]
            .parse()
            .expect("numeric suffix");
        assert!((1000..=9999).contains(&suffix));
    }

    #[test]
    fn test_same_seed_same_prompt() {
        let config = sample_config();
        let a = build_article_prompt(&task(), &config, date(), &mut ChaCha8Rng::seed_from_u64(42))
            .expect("prompt");
        let b = build_article_prompt(&task(), &config, date(), &mut ChaCha8Rng::seed_from_u64(42))
            .expect("prompt");
        assert_eq!(a.user, b.user);
        assert_eq!(a.variation_seed, b.variation_seed);
    }

    #[test]
    fn test_unknown_ids_rejected() {
        let config = sample_config();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let bad_product = GenerationTask::new("nope", "en", "heritage");
        assert!(matches!(
            build_article_prompt(&bad_product, &config, date(), &mut rng),
            Err(GenerationError::Config(ConfigError::UnknownId { kind: "product", .. }))
        ));

        let bad_angle = GenerationTask::new("lemon", "en", "nope");
        assert!(matches!(
            build_article_prompt(&bad_angle, &config, date(), &mut rng),
            Err(GenerationError::Config(ConfigError::UnknownId { kind: "angle", .. }))
        ));
    }
}
