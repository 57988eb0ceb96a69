//! Configuration loading
//!
//! Layering: built-in defaults, then the first config file found next to the
//! working directory (or an explicit `-c` path), then `CODE_SUMMARIZER_*`
//! environment variables. CLI flags are merged last in `merge`.

mod merge;

pub use merge::{merge_cli_with_config, CliOverrides};

use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Toml, Yaml};
use figment::Figment;

use crate::domain::Config;

const CONFIG_CANDIDATES: &[&str] =
    &["code-summarizer.toml", ".code-summarizer.toml", ".code-summarizer.yml"];

pub fn load_config(anchor: &Path, explicit: Option<&Path>) -> Result<Config> {
    // every Config field has a serde default, so the file and environment
    // layers are enough
    let mut figment = Figment::new();

    let file = match explicit {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Some(path.to_path_buf())
        }
        None => CONFIG_CANDIDATES.iter().map(|name| anchor.join(name)).find(|p| p.exists()),
    };

    if let Some(path) = file {
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| matches!(ext, "yml" | "yaml"));
        figment = if is_yaml {
            figment.merge(Yaml::file(&path))
        } else {
            figment.merge(Toml::file(&path))
        };
    }

    figment = figment.merge(Env::prefixed("CODE_SUMMARIZER_"));

    figment.extract().context("Invalid configuration")
}
