//! Lexical quality checks for generated articles.
//!
//! [`metrics`] holds the pure text measurements; [`gate`] turns them into
//! per-rule verdicts and decides whether an article may be published.

pub mod gate;
pub mod metrics;

pub use gate::{
    Evidence, LexicalMetrics, MetricsEngine, QualityGate, QualityReport, QualityVerdict, Rule,
    RuleResult,
};
pub use metrics::TextMetrics;
