//! Article generation: task expansion, content generators, and the
//! retrying orchestrator that gates and persists their output.

pub mod generator;
pub mod orchestrator;
pub mod status;
pub mod task;

pub use generator::{parse_completion, ContentGenerator, LlmContentGenerator};
pub use orchestrator::{
    BatchReport, ExecutionMode, Orchestrator, RetryPolicy, TaskOutcome, TaskReport,
};
pub use status::{ConsoleSink, NullSink, StatusSink};
pub use task::{expand_tasks, GenerationTask};
