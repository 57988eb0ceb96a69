//! Info command implementation
//!
//! Dry run: shows what `summarize` would send to the server, without making
//! any network calls.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use console::style;

use super::utils::parse_csv;
use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::domain::normalize_extension;
use crate::scan::{FileScanner, ScanItem};
use crate::utils::{content_id, estimate_tokens, read_file_safe};

#[derive(Args)]
pub struct InfoArgs {
    /// Files or directories to inspect
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Include only these extensions when expanding directories
    /// (comma-separated, e.g. '.py,.rs')
    #[arg(short = 'i', long, value_name = "EXTS")]
    pub include_ext: Option<String>,

    /// Exclude paths matching these globs (comma-separated)
    #[arg(short = 'e', long, value_name = "GLOBS")]
    pub exclude_glob: Option<String>,

    /// Skip files larger than this (bytes)
    #[arg(long, value_name = "BYTES")]
    pub max_file_bytes: Option<u64>,

    /// Path to config file (code-summarizer.toml)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

pub fn run(args: InfoArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let file_config = load_config(&cwd, args.config.as_deref())?;

    let include_ext = parse_csv(&args.include_ext)
        .map(|entries| entries.iter().map(|ext| normalize_extension(ext)).collect());
    let exclude_glob = parse_csv(&args.exclude_glob).map(|entries| entries.into_iter().collect());

    let config = merge_cli_with_config(
        file_config,
        CliOverrides {
            include_extensions: include_ext,
            exclude_globs: exclude_glob,
            max_file_bytes: args.max_file_bytes,
            ..CliOverrides::default()
        },
    );

    let mut scanner = FileScanner::new()
        .include_extensions(config.include_extensions.clone())
        .exclude_globs(config.exclude_globs.clone())
        .max_file_bytes(config.max_file_bytes)
        .respect_gitignore(config.respect_gitignore)
        .follow_symlinks(config.follow_symlinks);
    let items = scanner.scan(&args.paths)?;

    println!("{}", style("Files selected for summarization:").bold());
    for item in &items {
        match item {
            ScanItem::File(file) => match read_file_safe(&file.path) {
                Ok(Some(content)) => {
                    let id = content_id(&file.relative_path, content.as_bytes());
                    let tokens = estimate_tokens(&content);
                    println!(
                        "  {id}  {tokens:>8} tokens  {}  [{}]",
                        file.relative_path, file.language
                    );
                }
                Ok(None) => {
                    println!(
                        "  {} {} (binary content)",
                        style("skipped:").yellow(),
                        file.relative_path
                    );
                }
                Err(error) => {
                    println!(
                        "  {} {}: {error}",
                        style("unreadable:").red(),
                        file.relative_path
                    );
                }
            },
            ScanItem::Missing { path, .. } => {
                println!("  {} {}", style("missing:").red(), path.display());
            }
            ScanItem::Skipped { path, reason } => {
                println!("  {} {path} ({reason})", style("skipped:").yellow());
            }
        }
    }

    let stats = scanner.stats();
    println!();
    println!("Statistics:");
    println!("  Files scanned:  {}", stats.files_scanned);
    println!("  Files selected: {}", stats.files_selected);
    println!(
        "  Skipped (extension/size/glob): {}/{}/{}",
        stats.files_skipped_extension, stats.files_skipped_size, stats.files_skipped_glob
    );
    if !stats.languages_detected.is_empty() {
        let mut languages: Vec<(&String, &usize)> = stats.languages_detected.iter().collect();
        languages.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        let rendered: Vec<String> =
            languages.iter().map(|(name, count)| format!("{name} ({count})")).collect();
        println!("  Languages: {}", rendered.join(", "));
    }

    Ok(())
}
