use crate::demo::{run_demo, DemoArgs};
use crate::infra::{print_json, read_answers};
use crate::sweep::{run_sweep, SweepArgs};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tripod_assess::assessment::{
    AssessmentEngine, Category, FormLabelIdentityExtractor, FormSubmission,
};
use tripod_assess::config::AppConfig;
use tripod_assess::error::AppError;
use tripod_assess::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "tripod-assess",
    about = "Score TRIPOD manager assessments and build per-manager scorecards",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Export the 36-question catalog
    Catalog(CatalogArgs),
    /// Score a single answer set without storing it
    Score(ScoreArgs),
    /// Import a spreadsheet export and aggregate every manager in it
    Sweep(SweepArgs),
    /// Run a synthetic end-to-end demo (default command)
    Demo(DemoArgs),
}

#[derive(Args, Debug)]
pub(crate) struct CatalogArgs {
    /// Only list questions from this category (Trusting, Tasking or Tending)
    #[arg(long, value_parser = parse_category)]
    pub(crate) category: Option<Category>,
    /// Print a grouped text listing instead of the JSON export
    #[arg(long)]
    pub(crate) text: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file mapping question labels to answers
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Manager name, when the answers do not carry it
    #[arg(long)]
    pub(crate) manager: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(environment = ?config.environment, "configuration loaded");

    let command = cli
        .command
        .unwrap_or_else(|| Command::Demo(DemoArgs::default()));

    match command {
        Command::Catalog(args) => run_catalog(args, &config),
        Command::Score(args) => run_score(args, &config),
        Command::Sweep(args) => run_sweep(args, &config),
        Command::Demo(args) => run_demo(args, &config).await,
    }
}

fn run_catalog(args: CatalogArgs, config: &AppConfig) -> Result<(), AppError> {
    let engine = AssessmentEngine::new(config.scoring.clone());
    let questions: Vec<_> = engine
        .catalog()
        .questions()
        .iter()
        .filter(|question| args.category.map_or(true, |c| question.category == c))
        .collect();

    if !args.text {
        return print_json(&questions);
    }

    let mut current = None;
    for question in questions {
        if current != Some(question.subcategory) {
            current = Some(question.subcategory);
            println!(
                "\n{} / {}",
                question.category.label(),
                question.subcategory.label()
            );
        }
        println!("  {:<7} {}", question.code.to_string(), question.text);
    }
    Ok(())
}

fn run_score(args: ScoreArgs, config: &AppConfig) -> Result<(), AppError> {
    let answers = read_answers(&args.answers)?;
    let submission = FormSubmission {
        manager_name: args.manager,
        answers,
        ..FormSubmission::default()
    };

    let engine = AssessmentEngine::new(config.scoring.clone());
    let identity = submission.identity(&FormLabelIdentityExtractor);
    let scored = engine.scorer().score_batch(&submission.answers, &identity);
    debug!(
        answered = scored.answered_count,
        total = scored.total_score,
        "answer set scored"
    );
    print_json(&scored)
}

fn parse_category(raw: &str) -> Result<Category, String> {
    Category::from_label(raw).ok_or_else(|| {
        format!("unknown category '{raw}' (expected Trusting, Tasking or Tending)")
    })
}
