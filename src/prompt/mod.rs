//! Prompt construction for the inference server.
//!
//! Pure functions; truncation keeps the whole prompt under the configured
//! token estimate so large files never overflow the model context.

use crate::utils::estimate_tokens;

/// Build the analysis prompt for one file, embedding the (possibly
/// truncated) content.
pub fn build_prompt(language: &str, content: &str, max_prompt_tokens: usize) -> String {
    let scaffold_tokens = estimate_tokens(&render(language, ""));
    let budget = max_prompt_tokens.saturating_sub(scaffold_tokens);

    let (kept, omitted_lines) = truncate_to_tokens(content, budget);
    let body = if omitted_lines > 0 {
        format!("{kept}\n[... {omitted_lines} more lines omitted ...]")
    } else {
        kept.to_string()
    };

    render(language, &body)
}

fn render(language: &str, body: &str) -> String {
    format!(
        "Analyze this {language} source file and provide a technical summary covering:\n\
         \n\
         1. Overall purpose: what the code does\n\
         2. Main components: the key types, functions, or modules\n\
         3. Implementation details: notable algorithms, patterns, or techniques\n\
         4. Dependencies: external libraries or systems required\n\
         5. Technical highlights: anything notable or unusual\n\
         \n\
         Code to analyze:\n\
         \n\
         {body}\n\
         \n\
         Structure the response in clear sections using the numbers above."
    )
}

/// Cut `content` at a line boundary so its estimated token count fits
/// `max_tokens`. Returns the kept prefix and the number of omitted lines.
fn truncate_to_tokens(content: &str, max_tokens: usize) -> (&str, usize) {
    if estimate_tokens(content) <= max_tokens {
        return (content, 0);
    }

    let mut kept_bytes = 0;
    let mut used_tokens = 0;
    for line in content.split_inclusive('\n') {
        let line_tokens = estimate_tokens(line);
        if used_tokens + line_tokens > max_tokens {
            break;
        }
        used_tokens += line_tokens;
        kept_bytes += line.len();
    }

    let omitted = content[kept_bytes..].lines().count();
    (&content[..kept_bytes], omitted)
}
