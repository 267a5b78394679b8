//! Article persistence.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::article::{is_valid_slug, Article};
use crate::error::StorageError;

/// Save/load contract for articles. Each article is keyed by its slug.
pub trait ArticleStore: Send + Sync {
    /// Persists `article` and returns where it was written.
    fn save(&self, article: &Article) -> Result<PathBuf, StorageError>;

    /// Every stored article, sorted by slug.
    fn load_all(&self) -> Result<Vec<Article>, StorageError>;
}

/// One pretty-printed JSON file per article, named `<slug>.json`.
#[derive(Debug, Clone)]
pub struct FileArticleStore {
    base_path: PathBuf,
}

impl FileArticleStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn ensure_directory(&self) -> Result<(), StorageError> {
        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path).map_err(|e| {
                StorageError::DirectoryCreationFailed(format!(
                    "Failed to create directory {:?}: {}",
                    self.base_path, e
                ))
            })?;
        }
        Ok(())
    }

    fn article_path(&self, slug: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", slug))
    }

    fn read_article(path: &Path) -> Result<Article, StorageError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl ArticleStore for FileArticleStore {
    fn save(&self, article: &Article) -> Result<PathBuf, StorageError> {
        if !is_valid_slug(&article.slug) {
            return Err(StorageError::InvalidSlug(article.slug.clone()));
        }
        self.ensure_directory()?;

        let path = self.article_path(&article.slug);
        let json = serde_json::to_string_pretty(article)?;
        fs::write(&path, json)?;

        Ok(path)
    }

    fn load_all(&self) -> Result<Vec<Article>, StorageError> {
        if !self.base_path.exists() {
            return Ok(Vec::new());
        }

        let mut articles = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            match Self::read_article(&path) {
                Ok(article) => articles.push(article),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable article");
                }
            }
        }

        articles.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::Season;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn article(slug: &str) -> Article {
        Article {
            title: "My Honest Take on Lemon Tallow Balm".to_string(),
            body: "Body".to_string(),
            product: "lemon".to_string(),
            product_name: "Lemon Balm".to_string(),
            product_link: "https://shop.example/lemon".to_string(),
            product_image: "lemon.png".to_string(),
            language: "en".to_string(),
            language_name: "English".to_string(),
            angle: "heritage".to_string(),
            slug: slug.to_string(),
            generated_at: NaiveDate::from_ymd_opt(2026, 2, 3)
                .and_then(|d| d.and_hms_opt(9, 30, 0))
                .expect("valid datetime"),
            season: Season::Winter,
            variation_seed: "seed".to_string(),
            useless_detail: "detail".to_string(),
            random_tangent: "tangent".to_string(),
            quality: None,
        }
    }

    #[test]
    fn test_save_and_load_all_sorted() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileArticleStore::new(temp_dir.path().join("articles"));

        let path = store
            .save(&article("fr-lemon-heritage-20260203-200"))
            .expect("save should succeed");
        store
            .save(&article("en-lemon-heritage-20260203-100"))
            .expect("save should succeed");

        assert!(path.ends_with("fr-lemon-heritage-20260203-200.json"));
        let loaded = store.load_all().expect("load");
        let slugs: Vec<&str> = loaded.iter().map(|a| a.slug.as_str()).collect();
        assert_eq!(
            slugs,
            vec!["en-lemon-heritage-20260203-100", "fr-lemon-heritage-20260203-200"]
        );
        assert_eq!(loaded[0], article("en-lemon-heritage-20260203-100"));
    }

    #[test]
    fn test_load_all_skips_bad_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileArticleStore::new(temp_dir.path());
        store.save(&article("en-a-heritage-20260203-100")).expect("save");
        fs::write(temp_dir.path().join("broken.json"), "{oops").expect("write");
        fs::write(temp_dir.path().join("notes.txt"), "ignored").expect("write");

        let loaded = store.load_all().expect("load");
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn test_load_all_missing_dir_is_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileArticleStore::new(temp_dir.path().join("nope"));
        assert!(store.load_all().expect("load").is_empty());
    }

    #[test]
    fn test_rejects_unsafe_slug() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileArticleStore::new(temp_dir.path());
        let result = store.save(&article("../escape"));
        assert!(matches!(result, Err(StorageError::InvalidSlug(_))));
    }

    #[test]
    fn test_memory_store() {
        use crate::testing::MemoryArticleStore;

        let store = MemoryArticleStore::new();
        assert!(store.is_empty());
        store.save(&article("b")).expect("save");
        store.save(&article("a")).expect("save");
        let slugs: Vec<String> = store
            .load_all()
            .expect("load")
            .into_iter()
            .map(|a| a.slug)
            .collect();
        assert_eq!(slugs, vec!["a", "b"]);

        let failing = MemoryArticleStore::failing();
        assert!(failing.save(&article("a")).is_err());
        assert!(failing.is_empty());
    }
}
