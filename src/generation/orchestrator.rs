//! Generation/retry orchestrator.
//!
//! Each task gets one retry budget shared by generator errors and quality
//! failures. A task that still fails the gate on its last attempt is saved
//! anyway, with the failing rules recorded on the article, and reported as
//! a failure. Individual task failures never stop the batch.
//!
//! Two execution modes are available. [`ExecutionMode::Concurrent`] spawns
//! one async task per generation task. [`ExecutionMode::WorkerPool`] runs a
//! fixed number of workers that pull tasks from a shared queue. In both
//! modes a semaphore caps simultaneous generator calls.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use super::generator::ContentGenerator;
use super::status::{NullSink, StatusSink};
use super::task::GenerationTask;
use crate::config::GenerationSettings;
use crate::error::{GenerationError, StorageError};
use crate::quality::{QualityGate, Rule};
use crate::storage::{Article, ArticleStore};

/// Default per-call generator timeout.
const DEFAULT_GENERATOR_TIMEOUT: Duration = Duration::from_secs(180);

/// Attempt budget and backoff bases.
///
/// The delay before attempt `n + 1` is `base * n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub quality_backoff: Duration,
    pub error_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, quality_backoff: Duration, error_backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            quality_backoff,
            error_backoff,
        }
    }

    /// Retries without waiting.
    pub fn immediate(max_attempts: usize) -> Self {
        Self::new(max_attempts, Duration::ZERO, Duration::ZERO)
    }

    pub fn from_settings(settings: &GenerationSettings) -> Self {
        Self::new(
            settings.max_attempts as usize,
            Duration::from_secs(settings.quality_backoff_secs),
            Duration::from_secs(settings.error_backoff_secs),
        )
    }

    pub fn quality_delay(&self, attempt: usize) -> Duration {
        self.quality_backoff * attempt as u32
    }

    pub fn error_delay(&self, attempt: usize) -> Duration {
        self.error_backoff * attempt as u32
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_settings(&GenerationSettings::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One async task per generation task.
    Concurrent,
    /// A fixed number of workers draining a shared queue.
    WorkerPool { workers: usize },
}

impl ExecutionMode {
    pub fn label(&self) -> String {
        match self {
            ExecutionMode::Concurrent => "concurrent".to_string(),
            ExecutionMode::WorkerPool { workers } => format!("worker pool ({} workers)", workers),
        }
    }
}

/// How a single task ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    /// Saved, and passed the gate if gating was on.
    Accepted {
        slug: String,
        path: PathBuf,
        attempts: usize,
    },
    /// Saved after the last attempt still failed the gate. Counts as a failure.
    SavedWithFailures {
        slug: String,
        path: PathBuf,
        attempts: usize,
        failed_rules: Vec<Rule>,
    },
    /// Nothing was produced.
    Failed { attempts: usize, error: String },
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Accepted { .. })
    }

    pub fn attempts(&self) -> usize {
        match self {
            TaskOutcome::Accepted { attempts, .. }
            | TaskOutcome::SavedWithFailures { attempts, .. }
            | TaskOutcome::Failed { attempts, .. } => *attempts,
        }
    }

    pub fn slug(&self) -> Option<&str> {
        match self {
            TaskOutcome::Accepted { slug, .. } | TaskOutcome::SavedWithFailures { slug, .. } => {
                Some(slug)
            }
            TaskOutcome::Failed { .. } => None,
        }
    }
}

/// Result for one task. A persistence error is carried here rather than
/// aborting the batch.
#[derive(Debug)]
pub struct TaskReport {
    pub task: GenerationTask,
    pub outcome: Result<TaskOutcome, StorageError>,
}

impl TaskReport {
    pub fn is_success(&self) -> bool {
        self.outcome.as_ref().is_ok_and(TaskOutcome::is_success)
    }
}

/// Aggregate of a batch run, in completion order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub successes: usize,
    pub total: usize,
    pub reports: Vec<TaskReport>,
}

impl BatchReport {
    pub fn failures(&self) -> usize {
        self.total - self.successes
    }
}

/// Drives generation, gating, retries and persistence for a set of tasks.
pub struct Orchestrator {
    generator: Arc<dyn ContentGenerator>,
    store: Arc<dyn ArticleStore>,
    gate: Option<QualityGate>,
    policy: RetryPolicy,
    concurrency_limiter: Arc<Semaphore>,
    generator_timeout: Duration,
    sink: Arc<dyn StatusSink>,
}

impl Orchestrator {
    pub fn new(
        generator: Arc<dyn ContentGenerator>,
        store: Arc<dyn ArticleStore>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            generator,
            store,
            gate: None,
            policy,
            concurrency_limiter: Arc::new(Semaphore::new(
                GenerationSettings::default().max_concurrent,
            )),
            generator_timeout: DEFAULT_GENERATOR_TIMEOUT,
            sink: Arc::new(NullSink),
        }
    }

    /// Enables quality gating.
    pub fn with_quality_gate(mut self, gate: QualityGate) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Caps simultaneous generator calls across all tasks.
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limiter = Arc::new(Semaphore::new(limit.max(1)));
        self
    }

    pub fn with_generator_timeout(mut self, timeout: Duration) -> Self {
        self.generator_timeout = timeout;
        self
    }

    pub fn with_status_sink(mut self, sink: Arc<dyn StatusSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn gating_enabled(&self) -> bool {
        self.gate.is_some()
    }

    /// One generator call under the concurrency cap and timeout.
    async fn call_generator(&self, task: &GenerationTask) -> Result<Article, GenerationError> {
        let _permit = self
            .concurrency_limiter
            .acquire()
            .await
            .map_err(|e| GenerationError::PermitUnavailable(e.to_string()))?;

        tokio::time::timeout(self.generator_timeout, self.generator.generate(task))
            .await
            .map_err(|_| GenerationError::Timeout {
                seconds: self.generator_timeout.as_secs(),
            })?
    }

    fn persist(&self, article: &Article) -> Result<PathBuf, StorageError> {
        self.store.save(article).inspect_err(|e| {
            error!(slug = %article.slug, error = %e, "Failed to save article");
            self.sink
                .line(&format!("[ERROR] {}: failed to save: {}", article.slug, e));
        })
    }

    /// Runs one task to completion through its retry budget.
    pub async fn run_task(&self, task: &GenerationTask) -> Result<TaskOutcome, StorageError> {
        let max = self.policy.max_attempts;

        for attempt in 1..=max {
            debug!(task = %task, attempt, max_attempts = max, "Generating article");

            let mut article = match self.call_generator(task).await {
                Ok(article) => article,
                Err(e) => {
                    warn!(task = %task, attempt, error = %e, "Generation attempt failed");

                    if !e.is_transient() || attempt == max {
                        self.sink.line(&format!(
                            "[ERROR] {} failed after {} attempt(s): {}",
                            task, attempt, e
                        ));
                        return Ok(TaskOutcome::Failed {
                            attempts: attempt,
                            error: e.to_string(),
                        });
                    }

                    self.sink.line(&format!(
                        "[ERROR] {} attempt {}/{}: {}",
                        task, attempt, max, e
                    ));
                    tokio::time::sleep(self.policy.error_delay(attempt)).await;
                    continue;
                }
            };

            let Some(gate) = &self.gate else {
                let path = self.persist(&article)?;
                info!(task = %task, slug = %article.slug, attempt, "Article saved");
                self.sink.line(&format!("[OK] {}", article.slug));
                return Ok(TaskOutcome::Accepted {
                    slug: article.slug,
                    path,
                    attempts: attempt,
                });
            };

            let report = gate.validate(&article.title, &article.body);
            article.quality = Some(report.verdict());

            if report.overall_passed {
                let path = self.persist(&article)?;
                info!(task = %task, slug = %article.slug, attempt, "Article passed quality gate");
                self.sink.line(&format!("[VALIDATED] {}", article.slug));
                return Ok(TaskOutcome::Accepted {
                    slug: article.slug,
                    path,
                    attempts: attempt,
                });
            }

            let failed: Vec<&str> = report.failed_rules.iter().map(|r| r.name()).collect();
            warn!(task = %task, attempt, failed_rules = ?failed, "Article failed quality gate");

            if attempt < max {
                self.sink.line(&format!(
                    "[VALIDATION FAILED] {} attempt {}/{}: {}",
                    task,
                    attempt,
                    max,
                    failed.join(", ")
                ));
                tokio::time::sleep(self.policy.quality_delay(attempt)).await;
                continue;
            }

            let path = self.persist(&article)?;
            self.sink.line(&format!(
                "[VALIDATION FAILED] {} saved after {} attempts\n{}",
                article.slug, max, report.summary
            ));
            return Ok(TaskOutcome::SavedWithFailures {
                slug: article.slug,
                path,
                attempts: attempt,
                failed_rules: report.failed_rules,
            });
        }

        Ok(TaskOutcome::Failed {
            attempts: 0,
            error: "no attempts configured".to_string(),
        })
    }

    /// Runs every task and aggregates the results.
    pub async fn run_batch(
        self: Arc<Self>,
        tasks: Vec<GenerationTask>,
        mode: ExecutionMode,
    ) -> BatchReport {
        let total = tasks.len();
        let (results_tx, results_rx) = mpsc::channel::<TaskReport>(total.max(1));
        let mut set = JoinSet::new();

        match mode {
            ExecutionMode::Concurrent => {
                for task in tasks {
                    let this = Arc::clone(&self);
                    let results_tx = results_tx.clone();
                    set.spawn(async move {
                        let outcome = this.run_task(&task).await;
                        let _ = results_tx.send(TaskReport { task, outcome }).await;
                    });
                }
            }
            ExecutionMode::WorkerPool { workers } => {
                let (queue_tx, queue_rx) = mpsc::channel::<GenerationTask>(total.max(1));
                for task in tasks {
                    // Capacity covers every task, so this never waits.
                    if queue_tx.send(task).await.is_err() {
                        break;
                    }
                }
                drop(queue_tx);

                let queue = Arc::new(Mutex::new(queue_rx));
                for worker_id in 0..workers.max(1) {
                    let this = Arc::clone(&self);
                    let queue = Arc::clone(&queue);
                    let results_tx = results_tx.clone();
                    set.spawn(async move {
                        debug!(worker_id, "Worker started");
                        loop {
                            let next = queue.lock().await.recv().await;
                            let Some(task) = next else { break };
                            let outcome = this.run_task(&task).await;
                            if results_tx.send(TaskReport { task, outcome }).await.is_err() {
                                break;
                            }
                        }
                        debug!(worker_id, "Worker finished");
                    });
                }
            }
        }
        drop(results_tx);

        let report = self.collect(results_rx, total).await;

        while let Some(joined) = set.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "Generation task panicked");
            }
        }

        info!(
            successes = report.successes,
            total = report.total,
            mode = %mode.label(),
            "Batch finished"
        );
        report
    }

    async fn collect(&self, mut results: mpsc::Receiver<TaskReport>, total: usize) -> BatchReport {
        let mut report = BatchReport {
            successes: 0,
            total,
            reports: Vec::with_capacity(total),
        };

        while let Some(task_report) = results.recv().await {
            if task_report.is_success() {
                report.successes += 1;
            }
            report.reports.push(task_report);
            self.sink.line(&format!(
                "Progress: {}/{} (success: {})",
                report.reports.len(),
                total,
                report.successes
            ));
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use crate::prompts::Season;
    use crate::testing::{MemoryArticleStore, MemorySink};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const GOOD_BODY: &str = "Okay so my hands were a wreck. I didn't expect much.";
    const BAD_BODY: &str = "This miracle balm is a game-changer. Buy now.";

    fn article_for(task: &GenerationTask, body: &str, n: usize) -> Article {
        Article {
            title: "Lemon Tallow Balm Notes".to_string(),
            body: body.to_string(),
            product: task.product.clone(),
            product_name: "Lemon".to_string(),
            product_link: String::new(),
            product_image: String::new(),
            language: task.language.clone(),
            language_name: "English".to_string(),
            angle: task.angle.clone(),
            slug: format!("{}-{}-{}-20260101-{}", task.language, task.product, task.angle, n),
            generated_at: NaiveDate::from_ymd_opt(2026, 1, 1)
                .and_then(|d| d.and_hms_opt(8, 0, 0))
                .expect("valid datetime"),
            season: Season::Winter,
            variation_seed: String::new(),
            useless_detail: String::new(),
            random_tangent: String::new(),
            quality: None,
        }
    }

    /// Returns bodies from a script in call order; `None` is a transient error.
    struct ScriptedGenerator {
        script: Vec<Option<&'static str>>,
        calls: AtomicUsize,
    }

    impl ScriptedGenerator {
        fn new(script: Vec<Option<&'static str>>) -> Self {
            Self {
                script,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ContentGenerator for ScriptedGenerator {
        async fn generate(&self, task: &GenerationTask) -> Result<Article, GenerationError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let step = self.script.get(n).copied().flatten();
            match step {
                Some(body) => Ok(article_for(task, body, 100 + n)),
                None => Err(GenerationError::Llm(LlmError::RequestFailed(
                    "connection reset".to_string(),
                ))),
            }
        }
    }

    fn task() -> GenerationTask {
        GenerationTask::new("lemon", "en", "heritage")
    }

    #[tokio::test]
    async fn test_ungated_saves_first_success() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Some(BAD_BODY)]));
        let store = Arc::new(MemoryArticleStore::new());
        let sink = Arc::new(MemorySink::new());
        let orchestrator = Orchestrator::new(generator.clone(), store.clone(), RetryPolicy::immediate(3))
            .with_status_sink(sink.clone());

        let outcome = orchestrator.run_task(&task()).await.expect("no storage error");

        assert!(outcome.is_success());
        assert_eq!(outcome.attempts(), 1);
        assert_eq!(generator.calls(), 1);
        assert_eq!(store.len(), 1);
        assert!(store.articles()[0].quality.is_none());
        assert_eq!(sink.matching("[OK]").len(), 1);
    }

    #[tokio::test]
    async fn test_gate_failures_then_pass() {
        let generator = Arc::new(ScriptedGenerator::new(vec![
            Some(BAD_BODY),
            Some(BAD_BODY),
            Some(GOOD_BODY),
        ]));
        let store = Arc::new(MemoryArticleStore::new());
        let sink = Arc::new(MemorySink::new());
        let orchestrator = Orchestrator::new(generator.clone(), store.clone(), RetryPolicy::immediate(3))
            .with_quality_gate(QualityGate::new("Etsy"))
            .with_status_sink(sink.clone());

        let outcome = orchestrator.run_task(&task()).await.expect("no storage error");

        assert!(outcome.is_success());
        assert_eq!(outcome.attempts(), 3);
        assert_eq!(generator.calls(), 3);
        assert_eq!(store.len(), 1);
        let saved = &store.articles()[0];
        assert_eq!(saved.body, GOOD_BODY);
        assert!(saved.quality.as_ref().is_some_and(|q| q.passed));
        assert_eq!(sink.matching("[VALIDATION FAILED]").len(), 2);
        assert_eq!(sink.matching("[VALIDATED]").len(), 1);
    }

    #[tokio::test]
    async fn test_exhausted_gate_saves_with_failures() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Some(BAD_BODY); 3]));
        let store = Arc::new(MemoryArticleStore::new());
        let orchestrator = Orchestrator::new(generator.clone(), store.clone(), RetryPolicy::immediate(3))
            .with_quality_gate(QualityGate::new("Etsy"));

        let outcome = orchestrator.run_task(&task()).await.expect("no storage error");

        assert!(!outcome.is_success());
        match &outcome {
            TaskOutcome::SavedWithFailures { failed_rules, attempts, .. } => {
                assert_eq!(*attempts, 3);
                assert!(failed_rules.contains(&Rule::ForbiddenPhrases));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(store.len(), 1);
        let verdict = store.articles()[0].quality.clone().expect("verdict recorded");
        assert!(!verdict.passed);
        assert!(verdict.failed_rules.contains(&Rule::GenericClosing));
    }

    #[tokio::test]
    async fn test_errors_and_quality_share_budget() {
        let generator = Arc::new(ScriptedGenerator::new(vec![None, Some(BAD_BODY), None]));
        let store = Arc::new(MemoryArticleStore::new());
        let orchestrator = Orchestrator::new(generator.clone(), store.clone(), RetryPolicy::immediate(3))
            .with_quality_gate(QualityGate::new("Etsy"));

        let outcome = orchestrator.run_task(&task()).await.expect("no storage error");

        assert!(matches!(outcome, TaskOutcome::Failed { attempts: 3, .. }));
        assert_eq!(generator.calls(), 3);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_non_transient_error_fails_fast() {
        struct Broken;
        #[async_trait]
        impl ContentGenerator for Broken {
            async fn generate(&self, _task: &GenerationTask) -> Result<Article, GenerationError> {
                Err(GenerationError::Llm(LlmError::MissingApiKey {
                    env_var: "KEY".to_string(),
                    file: PathBuf::from("key.txt"),
                }))
            }
        }

        let orchestrator = Orchestrator::new(
            Arc::new(Broken),
            Arc::new(MemoryArticleStore::new()),
            RetryPolicy::immediate(5),
        );
        let outcome = orchestrator.run_task(&task()).await.expect("no storage error");
        assert!(matches!(outcome, TaskOutcome::Failed { attempts: 1, .. }));
    }

    #[tokio::test]
    async fn test_generator_timeout_counts_as_attempt() {
        struct Slow;
        #[async_trait]
        impl ContentGenerator for Slow {
            async fn generate(&self, task: &GenerationTask) -> Result<Article, GenerationError> {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(article_for(task, GOOD_BODY, 1))
            }
        }

        let orchestrator = Orchestrator::new(
            Arc::new(Slow),
            Arc::new(MemoryArticleStore::new()),
            RetryPolicy::immediate(2),
        )
        .with_generator_timeout(Duration::from_millis(10));

        let outcome = orchestrator.run_task(&task()).await.expect("no storage error");
        match outcome {
            TaskOutcome::Failed { attempts, error } => {
                assert_eq!(attempts, 2);
                assert!(error.contains("timed out"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_storage_error_returned_for_task() {
        let generator = Arc::new(ScriptedGenerator::new(vec![Some(GOOD_BODY)]));
        let orchestrator = Orchestrator::new(
            generator,
            Arc::new(MemoryArticleStore::failing()),
            RetryPolicy::immediate(3),
        );

        let result = orchestrator.run_task(&task()).await;
        assert!(matches!(result, Err(StorageError::Io(_))));
    }

    #[test]
    fn test_retry_policy_delays() {
        let policy = RetryPolicy::new(3, Duration::from_secs(2), Duration::from_secs(5));
        assert_eq!(policy.quality_delay(1), Duration::from_secs(2));
        assert_eq!(policy.quality_delay(2), Duration::from_secs(4));
        assert_eq!(policy.error_delay(2), Duration::from_secs(10));
        assert_eq!(RetryPolicy::immediate(0).max_attempts, 1);
    }
}
