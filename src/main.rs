//! code-summarizer: summarize source files with a local language model
//!
//! Reads code files, sends their contents to a locally hosted inference
//! server, and writes the generated summaries to the terminal or an
//! append-only report file.

use anyhow::Result;

fn main() -> Result<()> {
    code_summarizer::cli::run()
}
