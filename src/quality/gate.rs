//! Quality gate over generated articles.
//!
//! Runs every text metric on `title + "\n\n" + body`, turns each into a
//! rule result, and decides the overall verdict from the critical rules
//! only. Informational rules are recorded but never block an article.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::metrics::TextMetrics;

/// Maximum marketplace mentions before the article reads as an ad.
pub const MAX_MARKETPLACE_MENTIONS: usize = 1;
pub const MIN_CONTRACTIONS: usize = 5;
pub const MIN_RHETORICAL_QUESTIONS: usize = 2;
/// Burstiness must be strictly greater than this.
pub const MIN_BURSTINESS: f64 = 8.0;
pub const MIN_SENSORY_WORDS: usize = 3;
pub const MIN_EMOTIONAL_WORDS: usize = 2;

/// A named quality rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    ForbiddenPhrases,
    HyperbolicClaims,
    MarketplaceMentions,
    GenericOpening,
    GenericClosing,
    Contractions,
    RhetoricalQuestions,
    SentenceBurstiness,
    SensoryWords,
    EmotionalWords,
    BalancedPerspective,
    MessyTransitions,
    FreshnessSignals,
}

impl Rule {
    /// Rules that gate publication, in reporting order.
    pub const CRITICAL: [Rule; 5] = [
        Rule::ForbiddenPhrases,
        Rule::HyperbolicClaims,
        Rule::MarketplaceMentions,
        Rule::GenericOpening,
        Rule::GenericClosing,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Rule::ForbiddenPhrases => "forbidden_phrases",
            Rule::HyperbolicClaims => "hyperbolic_claims",
            Rule::MarketplaceMentions => "marketplace_mentions",
            Rule::GenericOpening => "generic_opening",
            Rule::GenericClosing => "generic_closing",
            Rule::Contractions => "contractions",
            Rule::RhetoricalQuestions => "rhetorical_questions",
            Rule::SentenceBurstiness => "sentence_burstiness",
            Rule::SensoryWords => "sensory_words",
            Rule::EmotionalWords => "emotional_words",
            Rule::BalancedPerspective => "balanced_perspective",
            Rule::MessyTransitions => "messy_transitions",
            Rule::FreshnessSignals => "freshness_signals",
        }
    }

    pub fn is_critical(&self) -> bool {
        Rule::CRITICAL.contains(self)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Rule::ForbiddenPhrases => "AI-typical phrases should be absent",
            Rule::HyperbolicClaims => "Hyperbolic terms should be absent",
            Rule::MarketplaceMentions => "Marketplace should be mentioned at most once",
            Rule::GenericOpening => "Opening should not be generic",
            Rule::GenericClosing => "Closing should not have hard-sell phrases",
            Rule::Contractions => "Should have at least 5 contractions",
            Rule::RhetoricalQuestions => "Should have at least 2 rhetorical questions",
            Rule::SentenceBurstiness => "Sentence length variation should be > 8",
            Rule::SensoryWords => "Should have at least 3 sensory words",
            Rule::EmotionalWords => "Should have at least 2 emotional words",
            Rule::BalancedPerspective => "Should include balanced perspective",
            Rule::MessyTransitions => "Should include natural/messy transitions",
            Rule::FreshnessSignals => "Should include freshness/currency signals",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Rule-specific evidence backing a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Evidence {
    Phrases(Vec<String>),
    Count(usize),
    Score(f64),
    Flag(bool),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleResult {
    pub passed: bool,
    pub evidence: Evidence,
}

impl RuleResult {
    fn new(passed: bool, evidence: Evidence) -> Self {
        Self { passed, evidence }
    }
}

/// Outcome of one validation call. Not persisted as-is.
#[derive(Debug, Clone)]
pub struct QualityReport {
    pub metric_results: BTreeMap<Rule, RuleResult>,
    /// Failing critical rules, in [`Rule::CRITICAL`] order.
    pub failed_rules: Vec<Rule>,
    pub overall_passed: bool,
    pub summary: String,
}

impl QualityReport {
    /// A passing report with no measurements, used when no metrics engine is wired.
    fn skipped() -> Self {
        Self {
            metric_results: BTreeMap::new(),
            failed_rules: Vec::new(),
            overall_passed: true,
            summary: "Quality metrics unavailable - validation skipped".to_string(),
        }
    }

    fn from_metrics(metrics: &TextMetrics) -> Self {
        let mut results = BTreeMap::new();

        results.insert(
            Rule::ForbiddenPhrases,
            RuleResult::new(
                metrics.forbidden_phrases.is_empty(),
                Evidence::Phrases(metrics.forbidden_phrases.clone()),
            ),
        );
        results.insert(
            Rule::HyperbolicClaims,
            RuleResult::new(
                metrics.hyperbolic_claims.is_empty(),
                Evidence::Phrases(metrics.hyperbolic_claims.clone()),
            ),
        );
        results.insert(
            Rule::MarketplaceMentions,
            RuleResult::new(
                metrics.marketplace_mentions <= MAX_MARKETPLACE_MENTIONS,
                Evidence::Count(metrics.marketplace_mentions),
            ),
        );
        results.insert(
            Rule::GenericOpening,
            RuleResult::new(!metrics.generic_opening, Evidence::Flag(metrics.generic_opening)),
        );
        results.insert(
            Rule::GenericClosing,
            RuleResult::new(!metrics.generic_closing, Evidence::Flag(metrics.generic_closing)),
        );
        results.insert(
            Rule::Contractions,
            RuleResult::new(
                metrics.contractions >= MIN_CONTRACTIONS,
                Evidence::Count(metrics.contractions),
            ),
        );
        results.insert(
            Rule::RhetoricalQuestions,
            RuleResult::new(
                metrics.rhetorical_questions >= MIN_RHETORICAL_QUESTIONS,
                Evidence::Count(metrics.rhetorical_questions),
            ),
        );
        results.insert(
            Rule::SentenceBurstiness,
            RuleResult::new(
                metrics.sentence_burstiness > MIN_BURSTINESS,
                Evidence::Score((metrics.sentence_burstiness * 100.0).round() / 100.0),
            ),
        );
        results.insert(
            Rule::SensoryWords,
            RuleResult::new(
                metrics.sensory_words >= MIN_SENSORY_WORDS,
                Evidence::Count(metrics.sensory_words),
            ),
        );
        results.insert(
            Rule::EmotionalWords,
            RuleResult::new(
                metrics.emotional_words >= MIN_EMOTIONAL_WORDS,
                Evidence::Count(metrics.emotional_words),
            ),
        );
        for (rule, flag) in [
            (Rule::BalancedPerspective, metrics.balanced_perspective),
            (Rule::MessyTransitions, metrics.messy_transitions),
            (Rule::FreshnessSignals, metrics.freshness_signals),
        ] {
            results.insert(rule, RuleResult::new(flag, Evidence::Flag(flag)));
        }

        let failed_rules: Vec<Rule> = Rule::CRITICAL
            .iter()
            .copied()
            .filter(|rule| results.get(rule).is_some_and(|r| !r.passed))
            .collect();

        let overall_passed = failed_rules.is_empty();
        let summary = build_summary(&failed_rules, metrics);

        Self {
            metric_results: results,
            failed_rules,
            overall_passed,
            summary,
        }
    }

    /// The compact verdict stored alongside a persisted article.
    pub fn verdict(&self) -> QualityVerdict {
        QualityVerdict {
            passed: self.overall_passed,
            failed_rules: self.failed_rules.clone(),
            summary: self.summary.clone(),
        }
    }

    /// One line per rule, for detailed console output.
    pub fn detail_lines(&self) -> Vec<String> {
        self.metric_results
            .iter()
            .map(|(rule, result)| {
                let mark = if result.passed { "✓" } else { "✗" };
                let tag = if rule.is_critical() { " [critical]" } else { "" };
                format!(
                    "{} {}{}: {} ({})",
                    mark,
                    rule,
                    tag,
                    rule.description(),
                    evidence_text(&result.evidence)
                )
            })
            .collect()
    }
}

fn evidence_text(evidence: &Evidence) -> String {
    match evidence {
        Evidence::Phrases(p) if p.is_empty() => "none found".to_string(),
        Evidence::Phrases(p) => format!("found: {}", p.join(", ")),
        Evidence::Count(c) => format!("count: {}", c),
        Evidence::Score(s) => format!("value: {:.2}", s),
        Evidence::Flag(f) => format!("{}", f),
    }
}

fn build_summary(failed: &[Rule], metrics: &TextMetrics) -> String {
    if failed.is_empty() {
        return "✓ All critical quality checks passed".to_string();
    }

    let names: Vec<&str> = failed.iter().map(|r| r.name()).collect();
    let mut summary = format!(
        "✗ Failed {} critical check(s): {}",
        failed.len(),
        names.join(", ")
    );

    for rule in failed {
        let detail = match rule {
            Rule::ForbiddenPhrases => format!(
                "  - Forbidden phrases found: {:?}",
                metrics.forbidden_phrases
            ),
            Rule::HyperbolicClaims => format!(
                "  - Hyperbolic terms found: {:?}",
                metrics.hyperbolic_claims
            ),
            Rule::MarketplaceMentions => format!(
                "  - Marketplace mentioned {} times (max {})",
                metrics.marketplace_mentions, MAX_MARKETPLACE_MENTIONS
            ),
            Rule::GenericOpening => "  - Opening is too generic".to_string(),
            Rule::GenericClosing => "  - Closing contains hard-sell phrases".to_string(),
            _ => continue,
        };
        summary.push('\n');
        summary.push_str(&detail);
    }

    summary
}

/// Gate verdict recorded on a persisted article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityVerdict {
    pub passed: bool,
    pub failed_rules: Vec<Rule>,
    pub summary: String,
}

/// Source of text metrics behind the gate.
pub trait MetricsEngine: Send + Sync {
    fn measure(&self, text: &str) -> TextMetrics;
}

/// The built-in lexical engine.
#[derive(Debug, Clone)]
pub struct LexicalMetrics {
    marketplace: String,
}

impl LexicalMetrics {
    pub fn new(marketplace: impl Into<String>) -> Self {
        Self {
            marketplace: marketplace.into(),
        }
    }
}

impl MetricsEngine for LexicalMetrics {
    fn measure(&self, text: &str) -> TextMetrics {
        TextMetrics::measure(text, &self.marketplace)
    }
}

/// Critical-rule gate for candidate articles.
///
/// Without an engine the gate fails open: every article passes.
#[derive(Clone)]
pub struct QualityGate {
    engine: Option<Arc<dyn MetricsEngine>>,
}

impl QualityGate {
    /// Gate backed by the lexical engine, counting mentions of `marketplace`.
    pub fn new(marketplace: impl Into<String>) -> Self {
        Self::with_engine(Arc::new(LexicalMetrics::new(marketplace)))
    }

    pub fn with_engine(engine: Arc<dyn MetricsEngine>) -> Self {
        Self {
            engine: Some(engine),
        }
    }

    /// A gate with no metrics engine; always passes.
    pub fn unavailable() -> Self {
        Self { engine: None }
    }

    pub fn is_available(&self) -> bool {
        self.engine.is_some()
    }

    /// Validates an article given as title and body.
    pub fn validate(&self, title: &str, body: &str) -> QualityReport {
        match &self.engine {
            Some(engine) => {
                let full = format!("{}\n\n{}", title, body);
                QualityReport::from_metrics(&engine.measure(&full))
            }
            None => QualityReport::skipped(),
        }
    }
}

impl fmt::Debug for QualityGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QualityGate")
            .field("available", &self.is_available())
            .finish()
    }
}
