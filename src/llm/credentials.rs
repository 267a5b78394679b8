//! API key holder.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::config::LlmSettings;
use crate::error::LlmError;

/// Lazily resolved API key.
///
/// The key is looked up on first use: the environment variable wins, then
/// the key file. Once found it is cached and never re-read.
#[derive(Debug)]
pub struct ApiKey {
    env_var: String,
    file: PathBuf,
    value: OnceLock<String>,
}

impl ApiKey {
    pub fn new(env_var: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            env_var: env_var.into(),
            file: file.into(),
            value: OnceLock::new(),
        }
    }

    pub fn from_settings(settings: &LlmSettings) -> Self {
        Self::new(&settings.api_key_env, &settings.api_key_file)
    }

    /// A key that is already known.
    pub fn from_value(value: impl Into<String>) -> Self {
        let key = Self::new(String::new(), PathBuf::new());
        let _ = key.value.set(value.into());
        key
    }

    /// Returns the key, resolving it on first call.
    pub fn get(&self) -> Result<&str, LlmError> {
        if let Some(value) = self.value.get() {
            return Ok(value);
        }

        let resolved = self.resolve()?;
        Ok(self.value.get_or_init(|| resolved))
    }

    fn resolve(&self) -> Result<String, LlmError> {
        if !self.env_var.is_empty() {
            if let Ok(value) = env::var(&self.env_var) {
                let value = value.trim();
                if !value.is_empty() {
                    tracing::debug!(env_var = %self.env_var, "API key read from environment");
                    return Ok(value.to_string());
                }
            }
        }

        if self.file.is_file() {
            let content = fs::read_to_string(&self.file)?;
            let value = content.trim();
            if !value.is_empty() {
                tracing::debug!(file = %self.file.display(), "API key read from file");
                return Ok(value.to_string());
            }
        }

        Err(LlmError::MissingApiKey {
            env_var: self.env_var.clone(),
            file: self.file.clone(),
        })
    }

    /// Masked form for logs.
    pub fn masked(&self) -> String {
        match self.value.get() {
            Some(key) if key.chars().count() > 8 => {
                let chars: Vec<char> = key.chars().collect();
                let head: String = chars[..4].iter().collect();
                let tail: String = chars[chars.len() - 4..].iter().collect();
                format!("{}...{}", head, tail)
            }
            Some(key) => "*".repeat(key.chars().count()),
            None => "<unresolved>".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_value() {
        let key = ApiKey::from_value("sk-test-1234567890");
        assert_eq!(key.get().expect("key"), "sk-test-1234567890");
        assert_eq!(key.masked(), "sk-t...7890");
    }

    #[test]
    fn test_reads_file_when_env_unset() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file = temp_dir.path().join("key.txt");
        fs::write(&file, "  file-key\n").expect("write");

        let key = ApiKey::new("SEO_FORGE_TEST_UNSET_KEY_VAR", &file);
        assert_eq!(key.get().expect("key"), "file-key");
        assert_eq!(key.masked(), "********");
    }

    #[test]
    fn test_resolved_once() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file = temp_dir.path().join("key.txt");
        fs::write(&file, "first").expect("write");

        let key = ApiKey::new("SEO_FORGE_TEST_UNSET_KEY_VAR", &file);
        assert_eq!(key.get().expect("key"), "first");

        fs::write(&file, "second").expect("write");
        assert_eq!(key.get().expect("key"), "first");
    }

    #[test]
    fn test_missing_key() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let key = ApiKey::new(
            "SEO_FORGE_TEST_UNSET_KEY_VAR",
            temp_dir.path().join("missing.txt"),
        );

        let err = key.get().expect_err("no key available");
        assert!(matches!(err, LlmError::MissingApiKey { .. }));
        assert_eq!(key.masked(), "<unresolved>");
    }
}
