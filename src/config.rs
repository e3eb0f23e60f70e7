use crate::checker::tokenizer::TokenizerPolicy;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const LOCAL_CONFIG_FILE: &str = ".livespell.toml";

const DEFAULT_MAX_SUGGESTIONS: usize = 5;
const DEFAULT_STYLE: &str = "misspelled";

/// Settings as read from one config layer.
///
/// Every field is optional so a later layer can set a value back to its
/// default over an earlier one. Read resolved values through the accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dictionary: Option<PathBuf>,

    pub personal_dictionary: Option<PathBuf>,

    pub ignore_patterns: Option<Vec<String>>,

    pub tokenizer: Option<TokenizerPolicy>,

    pub max_suggestions: Option<usize>,

    pub case_sensitive: Option<bool>,

    pub styles: StyleConfig,

    /// Turn spell-check on as soon as an engine is attached.
    pub enable_on_attach: Option<bool>,
}

/// Style tags handed to the host for each kind of annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub marker: Option<String>,

    pub line_indicator: Option<String>,
}

impl StyleConfig {
    pub fn marker(&self) -> &str {
        self.marker.as_deref().unwrap_or(DEFAULT_STYLE)
    }

    pub fn line_indicator(&self) -> &str {
        self.line_indicator.as_deref().unwrap_or(DEFAULT_STYLE)
    }
}

impl Config {
    /// Load configuration with priority: local config > global config > defaults.
    ///
    /// Command-line overrides are applied by the caller on the result.
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                config = config.merge(Self::from_file(&global_path)?);
            }
        }

        let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_path.exists() {
            config = config.merge(Self::from_file(&local_path)?);
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Overlay `other` on `self`. Anything `other` sets wins, even when it
    /// is the default value.
    pub fn merge(self, other: Self) -> Self {
        Self {
            dictionary: other.dictionary.or(self.dictionary),
            personal_dictionary: other.personal_dictionary.or(self.personal_dictionary),
            ignore_patterns: other.ignore_patterns.or(self.ignore_patterns),
            tokenizer: other.tokenizer.or(self.tokenizer),
            max_suggestions: other.max_suggestions.or(self.max_suggestions),
            case_sensitive: other.case_sensitive.or(self.case_sensitive),
            styles: StyleConfig {
                marker: other.styles.marker.or(self.styles.marker),
                line_indicator: other.styles.line_indicator.or(self.styles.line_indicator),
            },
            enable_on_attach: other.enable_on_attach.or(self.enable_on_attach),
        }
    }

    pub fn ignore_patterns(&self) -> &[String] {
        self.ignore_patterns.as_deref().unwrap_or_default()
    }

    pub fn tokenizer(&self) -> TokenizerPolicy {
        self.tokenizer.unwrap_or_default()
    }

    pub fn max_suggestions(&self) -> usize {
        self.max_suggestions.unwrap_or(DEFAULT_MAX_SUGGESTIONS)
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive.unwrap_or(false)
    }

    pub fn enable_on_attach(&self) -> bool {
        self.enable_on_attach.unwrap_or(false)
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "livespell").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
