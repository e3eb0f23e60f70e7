pub mod output;

use crate::checker::dictionary::{Dictionary, FstDictionary};
use crate::checker::{EngineOptions, SpellCheckEngine};
use crate::host::memory::MemoryHost;
use crate::host::HostAdapter;
use crate::{CheckResult, Config, SpellError};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::rc::Rc;

/// Load the dictionary named by the config, with its personal overlay.
pub fn load_dictionary(config: &Config) -> Result<FstDictionary> {
    let path = config
        .dictionary
        .as_deref()
        .context("No dictionary specified. Use --dictionary or set `dictionary` in .livespell.toml")?;

    let mut dictionary = FstDictionary::load_from_path(path)?
        .case_sensitive(config.case_sensitive())
        .max_suggestions(config.max_suggestions());

    if let Some(personal) = &config.personal_dictionary {
        if personal.exists() {
            dictionary = dictionary.with_personal_dictionary(personal)?;
        } else {
            tracing::warn!("Personal dictionary not found: {}", personal.display());
        }
    }

    Ok(dictionary)
}

/// Attach an engine to the file's contents and report what it flags.
pub fn check_file(
    file_path: &Path,
    dictionary: Rc<dyn Dictionary>,
    options: &EngineOptions,
) -> Result<CheckResult> {
    let content = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read file: {}", file_path.display()))?;

    let host = MemoryHost::new(&content);
    let engine = SpellCheckEngine::new(host.clone(), dictionary, options.clone())?;
    if !engine.is_enabled() {
        engine.enable();
    }

    let lines = host.lines()?;
    let errors: Vec<SpellError> = engine
        .misspellings()
        .into_iter()
        .map(|misspelling| {
            let line = misspelling.range.line;
            let suggestions = engine.suggest(&misspelling.word).unwrap_or_default();
            SpellError {
                line: line + 1,
                column: misspelling.column + 1,
                context: lines.get(line).cloned().unwrap_or_default(),
                word: misspelling.word,
                suggestions,
            }
        })
        .collect();

    Ok(CheckResult {
        error_count: errors.len(),
        errors,
    })
}
