//! Command-line interface for seo-forge.
//!
//! Provides commands for article generation, rotation status, site
//! rendering, local preview and standalone quality checks.

mod commands;

pub use commands::{
    parse_cli, plan_batch, plan_single, run, run_with_cli, split_document, BatchPlan, Cli,
    Commands, ProductSelection,
};
