//! CLI command definitions for seo-forge.
//!
//! Generation runs are planned up front: every product, language and angle
//! id given on the command line is checked against the configuration before
//! the rotation moves or any request is sent.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use clap::Parser;
use rand::prelude::*;
use tracing::info;

use crate::config::{BlogConfig, DEFAULT_CONFIG_PATH};
use crate::generation::{
    expand_tasks, ConsoleSink, ContentGenerator, ExecutionMode, GenerationTask,
    LlmContentGenerator, Orchestrator, RetryPolicy,
};
use crate::llm::{ApiKey, ChatClient, LlmProvider};
use crate::quality::QualityGate;
use crate::rotation::{JsonFileRotationStore, RotationScheduler};
use crate::site::{self, server::DEFAULT_PORT};
use crate::storage::{ArticleStore, FileArticleStore};

/// Multilingual SEO article generator and static site builder.
#[derive(Parser)]
#[command(name = "seo-forge")]
#[command(about = "Generate multilingual product articles with an LLM and publish them as a static site")]
#[command(version)]
#[command(
    long_about = "seo-forge writes product articles in every configured language, gates them with\nlexical quality checks, and renders them into a static site.\n\nExample usage:\n  seo-forge generate --validate\n  seo-forge generate --single lavender en myth_busting\n  seo-forge daily"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,

    /// Path to the configuration file (.json, .yaml or .yml).
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, env = "SEO_FORGE_CONFIG", global = true)]
    pub config: PathBuf,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Generate articles (today's rotation batch by default).
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Show rotation status and the next products in line.
    Rotation,

    /// Render the static site from stored articles.
    Build,

    /// Serve the built site locally.
    Serve(ServeArgs),

    /// Generate today's rotation batch, then build the site.
    Daily(DailyArgs),

    /// Run the quality gate on a text file whose first line is the title.
    Check(CheckArgs),
}

/// Arguments for `seo-forge generate`.
#[derive(Parser, Debug, Default)]
pub struct GenerateArgs {
    /// Generate for one product in every language. Overrides the rotation.
    #[arg(long, conflicts_with_all = ["all", "single"])]
    pub product: Option<String>,

    /// Restrict generation to one language.
    #[arg(long, conflicts_with = "single")]
    pub lang: Option<String>,

    /// Generate for every product, ignoring the rotation.
    #[arg(long)]
    pub all: bool,

    /// Generate one article: PRODUCT LANG [ANGLE]. A random angle is used when omitted.
    #[arg(long, num_args = 2..=3, value_names = ["PRODUCT", "LANG", "ANGLE"])]
    pub single: Option<Vec<String>>,

    /// Use a fixed pool of workers instead of one task per article.
    #[arg(long)]
    pub sync: bool,

    /// Run the quality gate on every article and retry failures.
    #[arg(long)]
    pub validate: bool,

    /// Maximum simultaneous LLM calls (also the worker count with --sync).
    #[arg(long)]
    pub concurrency: Option<usize>,
}

/// Arguments for `seo-forge serve`.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Port to listen on.
    #[arg(default_value_t = DEFAULT_PORT)]
    pub port: u16,
}

/// Arguments for `seo-forge daily`.
#[derive(Parser, Debug, Default)]
pub struct DailyArgs {
    /// Run the quality gate on every article and retry failures.
    #[arg(long)]
    pub validate: bool,
}

/// Arguments for `seo-forge check`.
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Text or markdown file to check.
    pub file: PathBuf,
}

/// Parse CLI arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Run the CLI by parsing arguments and executing the command.
pub async fn run() -> anyhow::Result<()> {
    run_with_cli(parse_cli()).await
}

/// Run the CLI with the parsed arguments.
pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    let config = BlogConfig::load(&cli.config).map_err(|e| {
        anyhow::anyhow!("Failed to load config {}: {}", cli.config.display(), e)
    })?;
    info!(
        config = %cli.config.display(),
        products = config.products.len(),
        languages = config.languages.len(),
        "Configuration loaded"
    );

    match cli.command {
        Commands::Generate(args) => run_generate_command(&config, args).await,
        Commands::Rotation => run_rotation_command(&config),
        Commands::Build => run_build_command(&config),
        Commands::Serve(args) => run_serve_command(&config, args).await,
        Commands::Daily(args) => {
            let args = GenerateArgs {
                validate: args.validate,
                ..GenerateArgs::default()
            };
            run_generate_command(&config, args).await?;
            run_build_command(&config)
        }
        Commands::Check(args) => run_check_command(&config, &args.file),
    }
}

// ============================================================================
// Planning
// ============================================================================

/// Where the products of a batch run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductSelection {
    Rotation,
    All,
    One(String),
}

impl ProductSelection {
    pub fn from_args(args: &GenerateArgs) -> Self {
        match (&args.product, args.all) {
            (Some(product), _) => ProductSelection::One(product.clone()),
            (None, true) => ProductSelection::All,
            (None, false) => ProductSelection::Rotation,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProductSelection::Rotation => "rotation",
            ProductSelection::All => "all products",
            ProductSelection::One(_) => "single product",
        }
    }
}

/// A fully resolved batch run.
#[derive(Debug, Clone)]
pub struct BatchPlan {
    pub products: Vec<String>,
    pub languages: Vec<String>,
    pub tasks: Vec<GenerationTask>,
}

/// Checks ids and resolves products, languages and tasks.
///
/// The rotation is only consulted (and advanced) after every id given on
/// the command line has been found in the configuration.
pub fn plan_batch<R: Rng + ?Sized>(
    config: &BlogConfig,
    selection: &ProductSelection,
    language: Option<&str>,
    scheduler: &RotationScheduler,
    today: NaiveDate,
    rng: &mut R,
) -> anyhow::Result<BatchPlan> {
    if let ProductSelection::One(product) = selection {
        config.product(product)?;
    }
    if let Some(code) = language {
        config.language(code)?;
    }

    let products = match selection {
        ProductSelection::One(product) => vec![product.clone()],
        ProductSelection::All => config.product_ids(),
        ProductSelection::Rotation => scheduler.todays_batch(today)?,
    };
    let languages = match language {
        Some(code) => vec![code.to_string()],
        None => config.language_codes(),
    };

    let tasks = expand_tasks(
        &products,
        &languages,
        &config.angles,
        config.generation.articles_per_product_per_day,
        rng,
    );

    Ok(BatchPlan {
        products,
        languages,
        tasks,
    })
}

/// Resolves `--single PRODUCT LANG [ANGLE]` into a task.
pub fn plan_single<R: Rng + ?Sized>(
    config: &BlogConfig,
    values: &[String],
    rng: &mut R,
) -> anyhow::Result<GenerationTask> {
    let (product, language) = match values {
        [product, language, ..] => (product, language),
        _ => anyhow::bail!("--single needs PRODUCT and LANG"),
    };
    config.product(product)?;
    config.language(language)?;

    let angle = match values.get(2) {
        Some(angle) => {
            config.ensure_angle(angle)?;
            angle.clone()
        }
        None => config
            .angles
            .choose(rng)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("No angles configured"))?,
    };

    Ok(GenerationTask::new(product, language, angle))
}

// ============================================================================
// Generate
// ============================================================================

fn llm_provider(config: &BlogConfig) -> anyhow::Result<Arc<dyn LlmProvider>> {
    let api_key = Arc::new(ApiKey::from_settings(&config.llm));
    // Surface a missing credential before any work is planned.
    api_key.get()?;
    info!(key = %api_key.masked(), url = %config.llm.api_url, "Using chat completions endpoint");

    let client = ChatClient::from_settings(&config.llm, api_key)?;
    Ok(Arc::new(client))
}

fn rotation_scheduler(config: &BlogConfig) -> anyhow::Result<RotationScheduler> {
    let store = Arc::new(JsonFileRotationStore::new(&config.paths.rotation_file));
    Ok(RotationScheduler::from_config(config, store)?)
}

async fn run_generate_command(config: &BlogConfig, args: GenerateArgs) -> anyhow::Result<()> {
    let mut rng = rand::rng();

    if let Some(values) = &args.single {
        let task = plan_single(config, values, &mut rng)?;
        return run_single(config, &task, args.validate).await;
    }

    let selection = ProductSelection::from_args(&args);
    let scheduler = rotation_scheduler(config)?;
    let today = Local::now().date_naive();

    // Credential first: a missing key must not advance the rotation.
    let provider = llm_provider(config)?;
    let plan = plan_batch(
        config,
        &selection,
        args.lang.as_deref(),
        &scheduler,
        today,
        &mut rng,
    )?;

    let settings = &config.generation;
    let mode = if args.sync {
        ExecutionMode::WorkerPool {
            workers: args.concurrency.unwrap_or(settings.workers),
        }
    } else {
        ExecutionMode::Concurrent
    };
    let limit = args.concurrency.unwrap_or(settings.max_concurrent);

    println!("\n{}", "=".repeat(60));
    println!("GENERATING ARTICLES ({})", selection.label());
    println!("{}", "=".repeat(60));
    println!("  Products ({}): {}", plan.products.len(), plan.products.join(", "));
    println!("  Languages: {}", plan.languages.len());
    println!("  Tasks: {}", plan.tasks.len());
    println!("  Mode: {} (max {} concurrent calls)", mode.label(), limit);
    println!(
        "  Validation: {}",
        if args.validate { "ENABLED" } else { "disabled" }
    );
    println!("{}\n", "=".repeat(60));

    let config = Arc::new(config.clone());
    let generator: Arc<dyn ContentGenerator> =
        Arc::new(LlmContentGenerator::new(provider, Arc::clone(&config)));
    let store: Arc<dyn ArticleStore> = Arc::new(FileArticleStore::new(&config.paths.articles_dir));

    let mut orchestrator = Orchestrator::new(generator, store, RetryPolicy::from_settings(settings))
        .with_concurrency_limit(limit)
        .with_generator_timeout(config.llm.timeout())
        .with_status_sink(Arc::new(ConsoleSink::new()));
    if args.validate {
        orchestrator = orchestrator.with_quality_gate(QualityGate::new(&config.site.marketplace));
    }

    let start = std::time::Instant::now();
    let report = Arc::new(orchestrator).run_batch(plan.tasks, mode).await;

    println!("\n{}", "=".repeat(60));
    println!("COMPLETE: {}/{}", report.successes, report.total);
    println!("  Duration: {:.1}s", start.elapsed().as_secs_f64());
    if report.failures() > 0 {
        println!("  Failed: {}", report.failures());
    }
    println!("{}\n", "=".repeat(60));

    Ok(())
}

async fn run_single(config: &BlogConfig, task: &GenerationTask, validate: bool) -> anyhow::Result<()> {
    println!("Generating single: {}", task);

    let provider = llm_provider(config)?;
    let generator = LlmContentGenerator::new(provider, Arc::new(config.clone()));
    let mut article = generator.generate(task).await?;

    if validate {
        let report = QualityGate::new(&config.site.marketplace).validate(&article.title, &article.body);
        println!("\nValidation: {}", report.summary);
        if !report.overall_passed {
            println!("\nDetailed check results:");
            for line in report.detail_lines() {
                println!("  {}", line);
            }
        }
        article.quality = Some(report.verdict());
    }

    let path = FileArticleStore::new(&config.paths.articles_dir).save(&article)?;
    println!("✓ Saved {}", path.display());
    println!("Title: {}", article.title);
    println!("Words: ~{}", article.body.split_whitespace().count());
    Ok(())
}

// ============================================================================
// Rotation / Build / Serve / Check
// ============================================================================

fn run_rotation_command(config: &BlogConfig) -> anyhow::Result<()> {
    let status = rotation_scheduler(config)?.status()?;

    println!("\n{}", "=".repeat(50));
    println!("ROTATION STATUS");
    println!("{}", "=".repeat(50));
    println!("  Total products: {}", status.total_products);
    println!("  Products per day: {}", status.products_per_day);
    println!("  Days for full rotation: {}", status.days_for_full_rotation);
    println!("  Current rotation day: {}", status.current_day);
    println!(
        "  Last run: {}",
        status
            .last_run_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "never".to_string())
    );
    println!("\n  Next products to generate:");
    for (i, id) in status.next_batch.iter().enumerate() {
        let name = config.product(id).map(|p| p.name.as_str()).unwrap_or("?");
        println!("    {}. {} ({})", i + 1, id, name);
    }
    println!("{}\n", "=".repeat(50));
    Ok(())
}

fn run_build_command(config: &BlogConfig) -> anyhow::Result<()> {
    let articles = FileArticleStore::new(&config.paths.articles_dir).load_all()?;
    info!(count = articles.len(), "Collected articles");

    let summary = site::build_site(config, &articles, Local::now().date_naive())?;

    println!("\n{}", "=".repeat(50));
    println!("BUILD COMPLETE: {}", summary.output_dir.display());
    println!("{}", "=".repeat(50));
    println!(
        "  Images: {}{}",
        summary.images_copied,
        if summary.favicon { " + favicon" } else { "" }
    );
    println!("  Articles: {}", summary.articles);
    println!("  Sitemap URLs: {}", summary.sitemap_urls);
    println!();
    Ok(())
}

async fn run_serve_command(config: &BlogConfig, args: ServeArgs) -> anyhow::Result<()> {
    let dir = &config.paths.output_dir;
    if !dir.exists() {
        println!(
            "No output directory found at {}. Run 'seo-forge build' first.",
            dir.display()
        );
        return Ok(());
    }

    println!("Server running at http://localhost:{}", args.port);
    println!("Serving from: {}", dir.display());
    println!("Press Ctrl+C to stop");
    site::serve(dir, args.port).await?;
    Ok(())
}

/// Splits a document into its first line (title) and the rest (body).
pub fn split_document(text: &str) -> (String, String) {
    let text = text.trim_start();
    let (first, rest) = text.split_once('\n').unwrap_or((text, ""));
    (
        first.trim_matches(|c: char| c == '#' || c.is_whitespace()).to_string(),
        rest.trim().to_string(),
    )
}

fn run_check_command(config: &BlogConfig, file: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file.display(), e))?;
    let (title, body) = split_document(&text);

    let report = QualityGate::new(&config.site.marketplace).validate(&title, &body);

    println!("Checking: {}", title);
    for line in report.detail_lines() {
        println!("  {}", line);
    }
    println!("\n{}", report.summary);

    if !report.overall_passed {
        anyhow::bail!(
            "{} critical check(s) failed",
            report.failed_rules.len()
        );
    }
    Ok(())
}
