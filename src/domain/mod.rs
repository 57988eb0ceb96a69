//! Core domain types and models
//!
//! Defines SourceFile, SummaryRequest, SummaryResult, per-file outcomes, and
//! the tool configuration with its serde defaults.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{SummarizeError, SummarizeResult};

/// A source file selected for summarization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// Absolute (or as-typed) path to the file
    pub path: PathBuf,

    /// Display path: relative to the directory argument that selected the
    /// file, or the CLI argument itself for explicitly named files
    pub relative_path: String,

    /// File size in bytes
    pub size_bytes: u64,

    /// File extension (with leading dot)
    pub extension: String,

    /// Detected programming language
    pub language: String,

    /// Byte-based token estimate; refined once content is read
    #[serde(default)]
    pub token_estimate: usize,
}

/// A prompt ready to be submitted for one source file. Immutable; consumed by
/// the inference client.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub path: String,
    pub prompt: String,
}

/// The generated summary for one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub path: String,
    pub summary: String,
}

/// Why a file was set aside without contacting the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Larger than the configured `max_file_bytes`
    TooLarge { size_bytes: u64, limit: u64 },

    /// NUL bytes in the leading window
    Binary,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooLarge { size_bytes, limit } => {
                write!(f, "file size {size_bytes} B exceeds limit {limit} B")
            }
            SkipReason::Binary => write!(f, "binary content"),
        }
    }
}

/// Per-file result of the pipeline, collected in input order.
#[derive(Debug)]
pub enum FileOutcome {
    Summarized(SummaryResult),
    Skipped { path: String, reason: SkipReason },
    Failed { path: String, error: SummarizeError },
}

impl FileOutcome {
    pub fn path(&self) -> &str {
        match self {
            FileOutcome::Summarized(result) => &result.path,
            FileOutcome::Skipped { path, .. } | FileOutcome::Failed { path, .. } => path,
        }
    }
}

/// Batch counters derived from the ordered outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub total: usize,
    pub summarized: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchStats {
    pub fn from_outcomes(outcomes: &[FileOutcome]) -> Self {
        let mut stats = Self { total: outcomes.len(), ..Self::default() };
        for outcome in outcomes {
            match outcome {
                FileOutcome::Summarized(_) => stats.summarized += 1,
                FileOutcome::Skipped { .. } => stats.skipped += 1,
                FileOutcome::Failed { .. } => stats.failed += 1,
            }
        }
        stats
    }
}

/// Statistics from file discovery.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    /// Candidate files seen (including filtered ones)
    pub files_scanned: usize,

    /// Files selected for summarization
    pub files_selected: usize,

    #[serde(default)]
    pub files_skipped_extension: usize,

    #[serde(default)]
    pub files_skipped_size: usize,

    #[serde(default)]
    pub files_skipped_glob: usize,

    /// Language distribution of selected files (language -> count)
    #[serde(default)]
    pub languages_detected: HashMap<String, usize>,
}

/// Main configuration for code-summarizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the local inference server
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifier passed to the server
    #[serde(default = "default_model")]
    pub model: String,

    /// Whole-request timeout for one generation call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // Filtering options
    #[serde(
        default = "default_include_extensions",
        alias = "include_ext",
        deserialize_with = "deserialize_extensions"
    )]
    pub include_extensions: HashSet<String>,

    #[serde(
        default = "default_exclude_globs",
        alias = "exclude_glob",
        deserialize_with = "deserialize_globs"
    )]
    pub exclude_globs: HashSet<String>,

    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,

    /// File content is truncated so the whole prompt stays under this
    #[serde(default = "default_max_prompt_tokens")]
    pub max_prompt_tokens: usize,

    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    #[serde(default)]
    pub follow_symlinks: bool,

    // Output options
    /// Append summaries to this file instead of printing them
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Stamp each summary block with its generation time
    #[serde(default = "default_true")]
    pub timestamp: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            include_extensions: default_include_extensions(),
            exclude_globs: default_exclude_globs(),
            max_file_bytes: default_max_file_bytes(),
            max_prompt_tokens: default_max_prompt_tokens(),
            respect_gitignore: true,
            follow_symlinks: false,
            output: None,
            timestamp: true,
        }
    }
}

impl Config {
    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> SummarizeResult<()> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(SummarizeError::Config(format!(
                "endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if self.model.trim().is_empty() {
            return Err(SummarizeError::Config("model must not be empty".to_string()));
        }
        if self.max_prompt_tokens == 0 {
            return Err(SummarizeError::Config("max_prompt_tokens must be positive".to_string()));
        }
        Ok(())
    }
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3.2:latest".to_string()
}

fn default_timeout_secs() -> u64 {
    150
}

fn default_max_file_bytes() -> u64 {
    512_000 // 500 KiB
}

fn default_max_prompt_tokens() -> usize {
    6000
}

pub fn default_include_extensions() -> HashSet<String> {
    [
        ".py", ".js", ".ts", ".java", ".cpp", ".c", ".h", ".cs", ".php", ".rb", ".go", ".rs",
        ".html", ".css",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn default_exclude_globs() -> HashSet<String> {
    [
        // Build outputs
        "dist/**",
        "build/**",
        "out/**",
        "target/**",
        // Dependencies
        "node_modules/**",
        ".venv/**",
        "venv/**",
        "vendor/**",
        "__pycache__/**",
        // Version control
        ".git/**",
        // Minified bundles
        "*.min.js",
        "*.min.css",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Normalize an extension entry: trim, lowercase, ensure a leading dot.
pub fn normalize_extension(ext: &str) -> String {
    let trimmed = ext.trim().to_lowercase();
    if trimmed.starts_with('.') {
        trimmed
    } else {
        format!(".{trimmed}")
    }
}

/// Accepts a comma-separated string or a list, normalizing each entry to the
/// dot-prefixed lowercase form.
fn deserialize_extensions<'de, D>(deserializer: D) -> Result<HashSet<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(raw_entries(deserializer)?.iter().map(|e| normalize_extension(e)).collect())
}

/// Accepts a comma-separated string or a list of glob patterns.
fn deserialize_globs<'de, D>(deserializer: D) -> Result<HashSet<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(raw_entries(deserializer)?.into_iter().collect())
}

fn raw_entries<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Csv(String),
        List(Vec<String>),
    }

    let entries = match Raw::deserialize(deserializer)? {
        Raw::Csv(csv) => csv.split(',').map(str::to_string).collect(),
        Raw::List(list) => list,
    };
    Ok(entries.iter().map(|e| e.trim()).filter(|e| !e.is_empty()).map(str::to_string).collect())
}

/// Get language from file extension or special filename.
pub fn get_language(extension: &str, filename: &str) -> String {
    let ext = extension.to_lowercase();
    let lang = match ext.as_str() {
        ".py" => "python",
        ".js" => "javascript",
        ".ts" => "typescript",
        ".java" => "java",
        ".c" | ".h" => "c",
        ".cpp" | ".hpp" | ".cc" => "cpp",
        ".cs" => "csharp",
        ".php" => "php",
        ".rb" => "ruby",
        ".go" => "go",
        ".rs" => "rust",
        ".html" => "html",
        ".css" => "css",
        ".sh" | ".bash" => "bash",
        ".md" => "markdown",
        ".json" => "json",
        ".yaml" | ".yml" => "yaml",
        ".toml" => "toml",
        ".sql" => "sql",
        ".txt" => "text",
        _ => {
            let name = filename.to_lowercase();
            if name == "dockerfile" {
                return "dockerfile".to_string();
            }
            if name == "makefile" {
                return "makefile".to_string();
            }
            "text"
        }
    };
    lang.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_follow_the_local_server_conventions() {
        let config = Config::default();
        assert_eq!(config.endpoint, "http://localhost:11434");
        assert_eq!(config.model, "llama3.2:latest");
        assert_eq!(config.max_file_bytes, 512_000);
        assert!(config.include_extensions.contains(".py"));
        assert!(config.include_extensions.contains(".rs"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_http_endpoint() {
        let config = Config { endpoint: "localhost:11434".to_string(), ..Config::default() };
        assert!(matches!(config.validate(), Err(SummarizeError::Config(_))));
    }

    #[test]
    fn extensions_deserialize_from_csv_and_list() {
        #[derive(Deserialize)]
        struct Wrapper {
            #[serde(deserialize_with = "deserialize_extensions")]
            exts: HashSet<String>,
        }

        let from_csv: Wrapper = serde_json::from_value(serde_json::json!({"exts": "py, RS ,.go"}))
            .expect("csv form");
        assert_eq!(
            from_csv.exts,
            HashSet::from([".py".to_string(), ".rs".to_string(), ".go".to_string()])
        );

        let from_list: Wrapper =
            serde_json::from_value(serde_json::json!({"exts": [".py", "ts"]})).expect("list form");
        assert_eq!(from_list.exts, HashSet::from([".py".to_string(), ".ts".to_string()]));
    }

    #[test]
    fn language_detection_covers_the_default_set() {
        assert_eq!(get_language(".py", "main.py"), "python");
        assert_eq!(get_language(".RS", "lib.RS"), "rust");
        assert_eq!(get_language("", "Dockerfile"), "dockerfile");
        assert_eq!(get_language(".weird", "x.weird"), "text");
    }

    #[test]
    fn batch_stats_count_each_outcome_kind() {
        let outcomes = vec![
            FileOutcome::Summarized(SummaryResult {
                path: "a.py".to_string(),
                summary: "ok".to_string(),
            }),
            FileOutcome::Skipped { path: "b.bin".to_string(), reason: SkipReason::Binary },
            FileOutcome::Failed {
                path: "c.py".to_string(),
                error: SummarizeError::Inference("down".to_string()),
            },
        ];
        let stats = BatchStats::from_outcomes(&outcomes);
        assert_eq!(stats, BatchStats { total: 3, summarized: 1, skipped: 1, failed: 1 });
    }
}
