//! In-memory stand-ins for the stores and the status sink.
//!
//! Used by unit and integration tests to observe what a run persisted or
//! printed without touching the filesystem.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::error::{RotationError, StorageError};
use crate::generation::StatusSink;
use crate::rotation::{RotationState, RotationStore};
use crate::storage::{Article, ArticleStore};

/// Collects status lines.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Lines starting with `prefix`.
    pub fn matching(&self, prefix: &str) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|l| l.starts_with(prefix))
            .collect()
    }
}

impl StatusSink for MemorySink {
    fn line(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }
}

/// Keeps articles in memory. Can be told to fail every save.
#[derive(Debug, Default)]
pub struct MemoryArticleStore {
    articles: Mutex<Vec<Article>>,
    fail_saves: bool,
}

impl MemoryArticleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `save` always fails with an IO error.
    pub fn failing() -> Self {
        Self {
            articles: Mutex::new(Vec::new()),
            fail_saves: true,
        }
    }

    pub fn len(&self) -> usize {
        self.articles().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn articles(&self) -> Vec<Article> {
        self.articles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ArticleStore for MemoryArticleStore {
    fn save(&self, article: &Article) -> Result<PathBuf, StorageError> {
        if self.fail_saves {
            return Err(StorageError::Io(std::io::Error::other(
                "memory store configured to fail",
            )));
        }
        self.articles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(article.clone());
        Ok(PathBuf::from(&article.slug))
    }

    fn load_all(&self) -> Result<Vec<Article>, StorageError> {
        let mut articles = self.articles();
        articles.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(articles)
    }
}

/// Rotation state held in process, with a save counter.
#[derive(Debug, Default)]
pub struct MemoryRotationStore {
    state: Mutex<Option<RotationState>>,
    saves: Mutex<usize>,
}

impl MemoryRotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: RotationState) -> Self {
        Self {
            state: Mutex::new(Some(state)),
            saves: Mutex::new(0),
        }
    }

    /// Number of successful `save` calls.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Option<RotationState> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RotationStore for MemoryRotationStore {
    fn load(&self) -> Result<Option<RotationState>, RotationError> {
        Ok(self.snapshot())
    }

    fn save(&self, state: &RotationState) -> Result<(), RotationError> {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = Some(state.clone());
        *self.saves.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_memory_sink_keeps_whole_lines() {
        let sink = Arc::new(MemorySink::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let sink = Arc::clone(&sink);
                std::thread::spawn(move || {
                    for j in 0..50 {
                        sink.line(&format!("[OK] task-{}-{}", i, j));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread");
        }

        let lines = sink.lines();
        assert_eq!(lines.len(), 400);
        assert!(lines.iter().all(|l| l.starts_with("[OK] task-")));
        assert_eq!(sink.matching("[OK] task-3-").len(), 50);
    }

    #[test]
    fn test_sink_survives_poisoned_lock() {
        let sink = Arc::new(MemorySink::new());
        let poisoner = Arc::clone(&sink);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lines.lock().expect("first lock");
            panic!("poison the lock");
        })
        .join();

        sink.line("[OK] after poison");
        assert_eq!(sink.lines(), vec!["[OK] after poison"]);
    }
}
