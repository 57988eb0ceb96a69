//! The sequential summarization pipeline.
//!
//! Each input runs read → prompt → generate → write to completion before the
//! next input starts. A failure at any stage becomes that file's outcome;
//! the batch always continues with the next file.

use indicatif::ProgressBar;
use tracing::{debug, warn};

use crate::domain::{Config, FileOutcome, SkipReason, SourceFile, SummaryRequest, SummaryResult};
use crate::error::SummarizeError;
use crate::infer::InferenceClient;
use crate::output::SummaryWriter;
use crate::prompt::build_prompt;
use crate::scan::ScanItem;
use crate::utils::{content_id, normalize_path, read_file_safe};

pub struct SummaryPipeline<'a> {
    config: &'a Config,
    client: &'a dyn InferenceClient,
}

impl<'a> SummaryPipeline<'a> {
    pub fn new(config: &'a Config, client: &'a dyn InferenceClient) -> Self {
        Self { config, client }
    }

    /// Run the batch in input order, returning one outcome per item.
    pub fn run_batch(
        &self,
        items: Vec<ScanItem>,
        writer: &mut SummaryWriter,
        progress: Option<&ProgressBar>,
    ) -> Vec<FileOutcome> {
        let mut outcomes = Vec::with_capacity(items.len());

        for item in items {
            let outcome = match item {
                ScanItem::Missing { path, error } => FileOutcome::Failed {
                    path: normalize_path(&path),
                    error: SummarizeError::FileAccess { path, source: error },
                },
                ScanItem::Skipped { path, reason } => FileOutcome::Skipped { path, reason },
                ScanItem::File(file) => self.process_file(&file, writer),
            };

            if let Some(bar) = progress {
                bar.set_message(outcome.path().to_string());
                bar.inc(1);
            }
            log_outcome(&outcome);
            outcomes.push(outcome);
        }

        outcomes
    }

    /// read → prompt → generate → write for a single file.
    fn process_file(&self, file: &SourceFile, writer: &mut SummaryWriter) -> FileOutcome {
        let content = match read_file_safe(&file.path) {
            Ok(Some(content)) => content,
            Ok(None) => {
                return FileOutcome::Skipped {
                    path: file.relative_path.clone(),
                    reason: SkipReason::Binary,
                }
            }
            Err(source) => {
                return FileOutcome::Failed {
                    path: file.relative_path.clone(),
                    error: SummarizeError::FileAccess { path: file.path.clone(), source },
                }
            }
        };

        debug!(
            path = %file.relative_path,
            id = %content_id(&file.relative_path, content.as_bytes()),
            language = %file.language,
            "read file"
        );

        let request = SummaryRequest {
            path: file.relative_path.clone(),
            prompt: build_prompt(&file.language, &content, self.config.max_prompt_tokens),
        };

        let summary = match self.client.generate(&request.prompt) {
            Ok(summary) => summary,
            Err(error) => return FileOutcome::Failed { path: request.path, error },
        };

        let result = SummaryResult { path: request.path, summary };
        if let Err(error) = writer.write(&result) {
            return FileOutcome::Failed { path: result.path, error };
        }
        FileOutcome::Summarized(result)
    }
}

fn log_outcome(outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Summarized(result) => debug!(path = %result.path, "summarized"),
        FileOutcome::Skipped { path, reason } => debug!(path = %path, %reason, "skipped"),
        FileOutcome::Failed { path, error } => warn!(path = %path, %error, "failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::SummaryPipeline;
    use crate::domain::{Config, FileOutcome, SkipReason};
    use crate::error::{SummarizeError, SummarizeResult};
    use crate::infer::InferenceClient;
    use crate::output::SummaryWriter;
    use crate::scan::FileScanner;
    use std::cell::Cell;
    use std::fs;
    use std::path::{Path, PathBuf};

    /// Returns a fixed summary for every prompt.
    struct FixedClient(&'static str);

    impl InferenceClient for FixedClient {
        fn generate(&self, _prompt: &str) -> SummarizeResult<String> {
            Ok(self.0.to_string())
        }
    }

    /// Fails the first `failures` calls, then behaves like `FixedClient`.
    struct FlakyClient {
        failures: Cell<usize>,
    }

    impl InferenceClient for FlakyClient {
        fn generate(&self, _prompt: &str) -> SummarizeResult<String> {
            let remaining = self.failures.get();
            if remaining > 0 {
                self.failures.set(remaining - 1);
                return Err(SummarizeError::Inference("server returned 500".to_string()));
            }
            Ok("recovered".to_string())
        }
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("alpha.py"), "print('a')\n").expect("write alpha");
        fs::write(dir.path().join("beta.py"), "print('b')\n").expect("write beta");
        dir
    }

    fn run(
        inputs: &[PathBuf],
        client: &dyn InferenceClient,
        output: &Path,
    ) -> Vec<FileOutcome> {
        let config = Config::default();
        let mut scanner = FileScanner::new();
        let items = scanner.scan(inputs).expect("scan");
        let mut writer = SummaryWriter::append_to(output, false).expect("open writer");
        SummaryPipeline::new(&config, client).run_batch(items, &mut writer, None)
    }

    #[test]
    fn one_outcome_per_file_in_input_order() {
        let dir = fixture();
        let out = dir.path().join("out.txt");
        let inputs =
            vec![dir.path().join("beta.py"), dir.path().join("alpha.py")];
        let outcomes = run(&inputs, &FixedClient("A summary."), &out);

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].path().ends_with("beta.py"));
        assert!(outcomes[1].path().ends_with("alpha.py"));
        assert!(outcomes.iter().all(|o| matches!(o, FileOutcome::Summarized(_))));
    }

    #[test]
    fn summary_text_equals_the_client_response() {
        let dir = fixture();
        let out = dir.path().join("out.txt");
        let outcomes = run(
            &[dir.path().join("alpha.py")],
            &FixedClient("Exactly this text."),
            &out,
        );
        match &outcomes[0] {
            FileOutcome::Summarized(result) => assert_eq!(result.summary, "Exactly this text."),
            other => panic!("expected a summary, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_fails_and_the_batch_continues() {
        let dir = fixture();
        let out = dir.path().join("out.txt");
        let inputs = vec![dir.path().join("nope.py"), dir.path().join("alpha.py")];
        let outcomes = run(&inputs, &FixedClient("Still works."), &out);

        assert!(matches!(
            &outcomes[0],
            FileOutcome::Failed { error: SummarizeError::FileAccess { .. }, .. }
        ));
        assert!(matches!(&outcomes[1], FileOutcome::Summarized(_)));

        let written = fs::read_to_string(&out).expect("read output");
        assert!(written.contains("Still works."));
    }

    #[test]
    fn inference_failure_does_not_abort_the_batch() {
        let dir = fixture();
        let out = dir.path().join("out.txt");
        let client = FlakyClient { failures: Cell::new(1) };
        let inputs = vec![dir.path().join("alpha.py"), dir.path().join("beta.py")];
        let outcomes = run(&inputs, &client, &out);

        assert!(matches!(
            &outcomes[0],
            FileOutcome::Failed { error: SummarizeError::Inference(_), .. }
        ));
        match &outcomes[1] {
            FileOutcome::Summarized(result) => assert_eq!(result.summary, "recovered"),
            other => panic!("expected recovery, got {other:?}"),
        }
    }

    #[test]
    fn binary_file_is_skipped_without_calling_the_server() {
        let dir = fixture();
        let blob = dir.path().join("blob.py");
        fs::write(&blob, b"\x00\x01\x02").expect("write blob");
        let out = dir.path().join("out.txt");

        struct PanicClient;
        impl InferenceClient for PanicClient {
            fn generate(&self, _prompt: &str) -> SummarizeResult<String> {
                panic!("the server must not be contacted for binary files");
            }
        }

        let outcomes = run(&[blob], &PanicClient, &out);
        assert!(matches!(
            &outcomes[0],
            FileOutcome::Skipped { reason: SkipReason::Binary, .. }
        ));
    }

    #[test]
    fn fixed_stub_makes_the_run_deterministic() {
        let dir = fixture();
        let out_a = dir.path().join("a.txt");
        let out_b = dir.path().join("b.txt");
        let inputs = vec![dir.path().to_path_buf()];

        run(&inputs, &FixedClient("Echo."), &out_a);
        run(&inputs, &FixedClient("Echo."), &out_b);

        let first = fs::read_to_string(&out_a).expect("read a");
        let second = fs::read_to_string(&out_b).expect("read b");
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }
}
