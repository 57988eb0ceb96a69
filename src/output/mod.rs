//! Summary output rendering and writing.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::domain::SummaryResult;
use crate::error::{SummarizeError, SummarizeResult};

const RULE_WIDTH: usize = 80;

enum SummarySink {
    Stdout,
    File { path: PathBuf, file: File },
}

/// Writes summary blocks to standard output or an append-only file.
pub struct SummaryWriter {
    sink: SummarySink,
    timestamp: bool,
}

impl SummaryWriter {
    /// Writer printing blocks to standard output.
    pub fn stdout(timestamp: bool) -> Self {
        Self { sink: SummarySink::Stdout, timestamp }
    }

    /// Writer appending blocks to `path`, creating the file when missing.
    /// Prior content is preserved.
    pub fn append_to(path: &Path, timestamp: bool) -> SummarizeResult<Self> {
        let file = OpenOptions::new().append(true).create(true).open(path).map_err(|source| {
            SummarizeError::OutputWrite { target: path.display().to_string(), source }
        })?;
        Ok(Self { sink: SummarySink::File { path: path.to_path_buf(), file }, timestamp })
    }

    pub fn target(&self) -> String {
        match &self.sink {
            SummarySink::Stdout => "stdout".to_string(),
            SummarySink::File { path, .. } => path.display().to_string(),
        }
    }

    /// Write one block and flush, so the write completes before the next
    /// file is processed.
    pub fn write(&mut self, result: &SummaryResult) -> SummarizeResult<()> {
        let stamp =
            self.timestamp.then(|| Local::now().format("%Y-%m-%d %H:%M:%S").to_string());
        let block = format_block(result, stamp.as_deref());

        match &mut self.sink {
            SummarySink::Stdout => {
                let stdout = io::stdout();
                let mut handle = stdout.lock();
                handle
                    .write_all(block.as_bytes())
                    .and_then(|_| handle.flush())
                    .map_err(|source| SummarizeError::OutputWrite {
                        target: "stdout".to_string(),
                        source,
                    })
            }
            SummarySink::File { path, file } => file
                .write_all(block.as_bytes())
                .and_then(|_| file.flush())
                .map_err(|source| SummarizeError::OutputWrite {
                    target: path.display().to_string(),
                    source,
                }),
        }
    }
}

/// Render one summary block: rule, source path (and optional generation
/// stamp), rule, blank line, summary text.
pub fn format_block(result: &SummaryResult, generated_at: Option<&str>) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut block = String::new();
    block.push_str(&rule);
    block.push('\n');
    block.push_str(&result.path);
    block.push('\n');
    if let Some(stamp) = generated_at {
        block.push_str("generated: ");
        block.push_str(stamp);
        block.push('\n');
    }
    block.push_str(&rule);
    block.push_str("\n\n");
    block.push_str(result.summary.trim_end());
    block.push_str("\n\n");
    block
}
