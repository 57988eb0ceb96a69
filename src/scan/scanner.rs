//! Scanner that turns CLI paths into an ordered list of summarization inputs.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use tracing::debug;

use crate::domain::{get_language, Config, ScanStats, SkipReason, SourceFile};
use crate::utils::normalize_path;

/// One resolved input, in CLI order. Directories expand in place.
#[derive(Debug)]
pub enum ScanItem {
    File(SourceFile),
    Missing { path: PathBuf, error: io::Error },
    Skipped { path: String, reason: SkipReason },
}

/// Resolves files and directories into `ScanItem`s.
///
/// Directory expansion respects `.gitignore` (unless disabled), filters by
/// the extension set and exclude globs, and yields files in sorted order.
/// Explicitly named files bypass the extension filter but not the size limit.
pub struct FileScanner {
    include_extensions: HashSet<String>,
    exclude_globs: HashSet<String>,
    max_file_bytes: u64,
    respect_gitignore: bool,
    follow_symlinks: bool,
    stats: ScanStats,
}

impl Default for FileScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl FileScanner {
    pub fn new() -> Self {
        let defaults = Config::default();
        Self {
            include_extensions: defaults.include_extensions,
            exclude_globs: defaults.exclude_globs,
            max_file_bytes: defaults.max_file_bytes,
            respect_gitignore: defaults.respect_gitignore,
            follow_symlinks: defaults.follow_symlinks,
            stats: ScanStats::default(),
        }
    }

    pub fn include_extensions(mut self, extensions: HashSet<String>) -> Self {
        self.include_extensions = extensions;
        self
    }

    pub fn exclude_globs(mut self, globs: HashSet<String>) -> Self {
        self.exclude_globs = globs;
        self
    }

    pub fn max_file_bytes(mut self, limit: u64) -> Self {
        self.max_file_bytes = limit;
        self
    }

    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }

    /// Resolve the CLI paths into an ordered item list.
    pub fn scan(&mut self, inputs: &[PathBuf]) -> Result<Vec<ScanItem>> {
        let exclude = build_globset(&self.exclude_globs)?;
        let mut items = Vec::new();

        for input in inputs {
            match fs::metadata(input) {
                Err(error) => items.push(ScanItem::Missing { path: input.clone(), error }),
                Ok(meta) if meta.is_dir() => self.scan_directory(input, &exclude, &mut items),
                Ok(meta) => {
                    self.stats.files_scanned += 1;
                    let relative = normalize_path(input);
                    items.push(self.admit(input.clone(), relative, meta.len()));
                }
            }
        }

        debug!(
            scanned = self.stats.files_scanned,
            selected = self.stats.files_selected,
            "scan finished"
        );
        Ok(items)
    }

    fn scan_directory(&mut self, root: &Path, exclude: &GlobSet, items: &mut Vec<ScanItem>) {
        let mut walker = WalkBuilder::new(root);
        walker
            .follow_links(self.follow_symlinks)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .ignore(self.respect_gitignore)
            .parents(self.respect_gitignore)
            .hidden(true);

        let mut paths: Vec<PathBuf> = walker
            .build()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .map(|entry| entry.into_path())
            .collect();
        paths.sort();

        for path in paths {
            self.stats.files_scanned += 1;
            let relative = match path.strip_prefix(root) {
                Ok(rel) => normalize_path(rel),
                Err(_) => normalize_path(&path),
            };

            if exclude.is_match(&relative) {
                self.stats.files_skipped_glob += 1;
                continue;
            }
            if !self.include_extensions.contains(&file_extension(&path)) {
                self.stats.files_skipped_extension += 1;
                continue;
            }

            let size = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
            items.push(self.admit(path, relative, size));
        }
    }

    fn admit(&mut self, path: PathBuf, relative_path: String, size_bytes: u64) -> ScanItem {
        if size_bytes > self.max_file_bytes {
            self.stats.files_skipped_size += 1;
            return ScanItem::Skipped {
                path: relative_path,
                reason: SkipReason::TooLarge { size_bytes, limit: self.max_file_bytes },
            };
        }

        let extension = file_extension(&path);
        let file_name = path.file_name().and_then(|name| name.to_str()).unwrap_or_default();
        let language = get_language(&extension, file_name);
        *self.stats.languages_detected.entry(language.clone()).or_insert(0) += 1;
        self.stats.files_selected += 1;

        ScanItem::File(SourceFile {
            token_estimate: (size_bytes as usize).div_ceil(4),
            path,
            relative_path,
            size_bytes,
            extension,
            language,
        })
    }
}

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

fn build_globset(patterns: &HashSet<String>) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    let mut sorted: Vec<&String> = patterns.iter().collect();
    sorted.sort();
    for pattern in sorted {
        let glob =
            Glob::new(pattern).with_context(|| format!("Invalid exclude glob: {pattern}"))?;
        builder.add(glob);
    }
    builder.build().context("Cannot compile exclude globs")
}
