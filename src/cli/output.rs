use crate::{CheckResult, SpellError};
use colored::*;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonError<'a> {
    file: String,
    line: usize,
    column: usize,
    word: &'a str,
    suggestions: &'a [String],
    context: &'a str,
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    files_checked: usize,
    total_errors: usize,
    errors: Vec<JsonError<'a>>,
}

/// Render every file's findings as one JSON document.
pub fn render_json(reports: &[(PathBuf, CheckResult)]) -> serde_json::Result<String> {
    let errors = reports
        .iter()
        .flat_map(|(path, result)| {
            result.errors.iter().map(move |e| JsonError {
                file: path.display().to_string(),
                line: e.line,
                column: e.column,
                word: &e.word,
                suggestions: &e.suggestions,
                context: &e.context,
            })
        })
        .collect();

    let output = JsonOutput {
        files_checked: reports.len(),
        total_errors: reports.iter().map(|(_, r)| r.error_count).sum(),
        errors,
    };

    serde_json::to_string_pretty(&output)
}

pub fn print_text_errors(file_path: &Path, result: &CheckResult, colored_output: bool) {
    if result.errors.is_empty() {
        return;
    }

    let file_name = file_path.display().to_string();
    if colored_output {
        println!("\n{}", file_name.bold().underline());
    } else {
        println!("\n{}", file_name);
    }

    for error in &result.errors {
        println!("{}", format_error(error, colored_output));
    }
}

fn format_error(error: &SpellError, colored_output: bool) -> String {
    let line_info = format!("{}:{}", error.line, error.column);
    let suggestions = error.suggestions.iter().take(5);

    if colored_output {
        let mut out = format!(
            "  {} {} {}",
            line_info.blue().bold(),
            error.word.red().bold(),
            highlight(&error.context, error.column, &error.word)
        );
        if !error.suggestions.is_empty() {
            let joined = suggestions
                .map(|s| s.green().to_string())
                .collect::<Vec<_>>()
                .join(&", ".dimmed().to_string());
            out.push_str(&format!("\n    {} {}", "→".dimmed(), joined));
        }
        out
    } else {
        let mut out = format!("  {} {} {}", line_info, error.word, error.context);
        if !error.suggestions.is_empty() {
            let joined = suggestions.cloned().collect::<Vec<_>>().join(", ");
            out.push_str(&format!("\n    → {}", joined));
        }
        out
    }
}

/// Highlight the flagged occurrence at `column` (1-based chars), not every
/// copy of the word in the line.
fn highlight(context: &str, column: usize, word: &str) -> String {
    let start = context
        .char_indices()
        .nth(column.saturating_sub(1))
        .map_or(context.len(), |(i, _)| i);
    match context[start..].strip_prefix(word) {
        Some(rest) => format!("{}{}{}", &context[..start], word.red().bold(), rest),
        None => context.to_string(),
    }
}

pub fn print_check_summary(total_errors: usize, files: &[impl AsRef<Path>], colored: bool) {
    println!();
    let file_word = if files.len() == 1 { "file" } else { "files" };
    if total_errors == 0 {
        if colored {
            println!("{}", "✓ No spelling errors found!".green().bold());
        } else {
            println!("✓ No spelling errors found!");
        }
    } else {
        let error_word = if total_errors == 1 { "error" } else { "errors" };
        if colored {
            println!(
                "{} {} {} found in {} {}",
                "✗".red().bold(),
                total_errors.to_string().red().bold(),
                error_word,
                files.len(),
                file_word
            );
        } else {
            println!(
                "✗ {} {} found in {} {}",
                total_errors,
                error_word,
                files.len(),
                file_word
            );
        }
    }
}
