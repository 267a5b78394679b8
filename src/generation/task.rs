//! Units of generation work.

use std::fmt;

use rand::prelude::*;
use serde::{Deserialize, Serialize};

/// One article to produce: `(product, language, angle)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenerationTask {
    pub product: String,
    pub language: String,
    pub angle: String,
}

impl GenerationTask {
    pub fn new(
        product: impl Into<String>,
        language: impl Into<String>,
        angle: impl Into<String>,
    ) -> Self {
        Self {
            product: product.into(),
            language: language.into(),
            angle: angle.into(),
        }
    }
}

impl fmt::Display for GenerationTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.language, self.product, self.angle)
    }
}

/// Cross product of `products` x `languages`, each pair getting
/// `min(angles_per_pair, angles.len())` distinct angles drawn at random.
pub fn expand_tasks<R: Rng + ?Sized>(
    products: &[String],
    languages: &[String],
    angles: &[String],
    angles_per_pair: usize,
    rng: &mut R,
) -> Vec<GenerationTask> {
    let take = angles_per_pair.min(angles.len());
    let mut tasks = Vec::with_capacity(products.len() * languages.len() * take);

    for product in products {
        for language in languages {
            let mut pool: Vec<&String> = angles.iter().collect();
            pool.shuffle(rng);
            for angle in pool.into_iter().take(take) {
                tasks.push(GenerationTask::new(product, language, angle));
            }
        }
    }

    tasks
}
