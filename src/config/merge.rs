//! CLI argument merging with config

use std::collections::HashSet;
use std::path::PathBuf;

use crate::domain::Config;

#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub timeout_secs: Option<u64>,
    pub include_extensions: Option<HashSet<String>>,
    pub exclude_globs: Option<HashSet<String>>,
    pub max_file_bytes: Option<u64>,
    pub max_prompt_tokens: Option<usize>,
    pub respect_gitignore: Option<bool>,
    pub follow_symlinks: Option<bool>,
    pub output: Option<PathBuf>,
    pub timestamp: Option<bool>,
}

pub fn merge_cli_with_config(mut base_config: Config, cli: CliOverrides) -> Config {
    if let Some(endpoint) = cli.endpoint {
        base_config.endpoint = endpoint;
    }
    if let Some(model) = cli.model {
        base_config.model = model;
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        base_config.timeout_secs = timeout_secs;
    }

    if let Some(include_extensions) = cli.include_extensions {
        base_config.include_extensions = include_extensions;
    }
    if let Some(exclude_globs) = cli.exclude_globs {
        base_config.exclude_globs = exclude_globs;
    }

    if let Some(max_file_bytes) = cli.max_file_bytes {
        base_config.max_file_bytes = max_file_bytes;
    }
    if let Some(max_prompt_tokens) = cli.max_prompt_tokens {
        base_config.max_prompt_tokens = max_prompt_tokens;
    }
    if let Some(respect_gitignore) = cli.respect_gitignore {
        base_config.respect_gitignore = respect_gitignore;
    }
    if let Some(follow_symlinks) = cli.follow_symlinks {
        base_config.follow_symlinks = follow_symlinks;
    }

    if let Some(output) = cli.output {
        base_config.output = Some(output);
    }
    if let Some(timestamp) = cli.timestamp {
        base_config.timestamp = timestamp;
    }

    base_config
}
