//! Summarize command implementation

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use super::utils::parse_csv;
use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::domain::{normalize_extension, BatchStats, FileOutcome};
use crate::infer::OllamaClient;
use crate::output::SummaryWriter;
use crate::pipeline::SummaryPipeline;
use crate::scan::{FileScanner, ScanItem};

#[derive(Args)]
pub struct SummarizeArgs {
    /// Files or directories to summarize
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Append summaries to this file instead of printing them
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Model identifier passed to the inference server
    #[arg(short, long, value_name = "NAME")]
    pub model: Option<String>,

    /// Base URL of the inference server
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Whole-request timeout for one generation call
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Skip files larger than this (bytes)
    #[arg(long, value_name = "BYTES")]
    pub max_file_bytes: Option<u64>,

    /// Truncate file content so the prompt stays under this many tokens
    #[arg(long, value_name = "TOKENS")]
    pub max_prompt_tokens: Option<usize>,

    /// Include only these extensions when expanding directories
    /// (comma-separated, e.g. '.py,.rs')
    #[arg(short = 'i', long, value_name = "EXTS")]
    pub include_ext: Option<String>,

    /// Exclude paths matching these globs (comma-separated)
    #[arg(short = 'e', long, value_name = "GLOBS")]
    pub exclude_glob: Option<String>,

    /// Ignore .gitignore rules when expanding directories
    #[arg(long)]
    pub no_gitignore: bool,

    /// Follow symbolic links when expanding directories
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Omit the generation timestamp from summary blocks
    #[arg(long)]
    pub no_timestamp: bool,

    /// Path to config file (code-summarizer.toml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub fn run(args: SummarizeArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let file_config = load_config(&cwd, args.config.as_deref())?;

    let include_ext = parse_csv(&args.include_ext)
        .map(|entries| entries.iter().map(|ext| normalize_extension(ext)).collect());
    let exclude_glob = parse_csv(&args.exclude_glob).map(|entries| entries.into_iter().collect());

    let cli_overrides = CliOverrides {
        endpoint: args.endpoint.clone(),
        model: args.model.clone(),
        timeout_secs: args.timeout_secs,
        include_extensions: include_ext,
        exclude_globs: exclude_glob,
        max_file_bytes: args.max_file_bytes,
        max_prompt_tokens: args.max_prompt_tokens,
        respect_gitignore: if args.no_gitignore { Some(false) } else { None },
        follow_symlinks: if args.follow_symlinks { Some(true) } else { None },
        output: args.output.clone(),
        timestamp: if args.no_timestamp { Some(false) } else { None },
    };

    let config = merge_cli_with_config(file_config, cli_overrides);
    config.validate()?;

    let mut scanner = FileScanner::new()
        .include_extensions(config.include_extensions.clone())
        .exclude_globs(config.exclude_globs.clone())
        .max_file_bytes(config.max_file_bytes)
        .respect_gitignore(config.respect_gitignore)
        .follow_symlinks(config.follow_symlinks);
    let items = scanner.scan(&args.paths)?;

    let file_count = items.iter().filter(|item| matches!(item, ScanItem::File(_))).count();
    if items.is_empty() {
        eprintln!("{}", style("No matching source files found").yellow());
        return Ok(());
    }
    eprintln!(
        "{}",
        style(format!("Found {file_count} file(s) to summarize with {}", config.model)).cyan()
    );

    let client = OllamaClient::new(
        &config.endpoint,
        &config.model,
        Duration::from_secs(config.timeout_secs),
    );
    let mut writer = match &config.output {
        Some(path) => SummaryWriter::append_to(path, config.timestamp)?,
        None => SummaryWriter::stdout(config.timestamp),
    };

    let progress = ProgressBar::new(items.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("[{pos}/{len}] {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let pipeline = SummaryPipeline::new(&config, &client);
    let outcomes = pipeline.run_batch(items, &mut writer, Some(&progress));
    progress.finish_and_clear();

    for outcome in &outcomes {
        match outcome {
            FileOutcome::Failed { path, error } => {
                eprintln!("{} {path}: {error}", style("error:").red().bold());
            }
            FileOutcome::Skipped { path, reason } => {
                eprintln!("{} {path}: {reason}", style("skipped:").yellow());
            }
            FileOutcome::Summarized(_) => {}
        }
    }

    let stats = BatchStats::from_outcomes(&outcomes);
    eprintln!(
        "{} {} summarized, {} skipped, {} failed (of {})",
        style("Done:").green().bold(),
        stats.summarized,
        stats.skipped,
        stats.failed,
        stats.total
    );
    if let Some(path) = &config.output {
        eprintln!("Summaries appended to {}", path.display());
    }

    if stats.failed > 0 {
        anyhow::bail!("{} of {} files failed", stats.failed, stats.total);
    }
    Ok(())
}
