use crate::checker::classifier::Classifier;
use crate::checker::dictionary::Dictionary;
use crate::checker::tokenizer::TokenizerPolicy;
use crate::error::Result;
use crate::host::HostAdapter;
use crate::{AnnotationHandle, Misspelling, MisspellingRange};
use std::collections::BTreeSet;

/// Counts from one rebuild, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshSummary {
    pub lines: usize,
    pub markers: usize,
    pub flagged_lines: usize,
}

/// Owns every marker and line indicator the engine has put on a host.
///
/// Hosts never clean these up on their own. Each refresh removes all of them
/// and rebuilds from the current text; nothing is diffed or shifted.
#[derive(Debug)]
pub struct AnnotationManager {
    active: BTreeSet<AnnotationHandle>,
    indicated_lines: BTreeSet<usize>,
    flagged: Vec<Misspelling>,
    marker_style: String,
    line_style: String,
}

impl AnnotationManager {
    pub fn new(marker_style: impl Into<String>, line_style: impl Into<String>) -> Self {
        Self {
            active: BTreeSet::new(),
            indicated_lines: BTreeSet::new(),
            flagged: Vec::new(),
            marker_style: marker_style.into(),
            line_style: line_style.into(),
        }
    }

    pub fn handles(&self) -> impl Iterator<Item = AnnotationHandle> + '_ {
        self.active.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.indicated_lines.is_empty()
    }

    /// Ranges flagged by the last successful refresh.
    pub fn flagged(&self) -> impl Iterator<Item = MisspellingRange> + '_ {
        self.flagged.iter().map(|misspelling| misspelling.range)
    }

    pub fn misspellings(&self) -> &[Misspelling] {
        &self.flagged
    }

    /// Clear every annotation and rebuild from the host's current text.
    ///
    /// The document is read before anything is touched, so an unreadable
    /// host leaves the existing annotations exactly as they were.
    ///
    /// # Errors
    ///
    /// [`crate::Error::HostUnavailable`] if the document cannot be read or a
    /// marker cannot be created.
    pub fn refresh<H, D>(
        &mut self,
        host: &H,
        dictionary: &D,
        tokenizer: TokenizerPolicy,
        classifier: &Classifier,
    ) -> Result<RefreshSummary>
    where
        H: HostAdapter + ?Sized,
        D: Dictionary + ?Sized,
    {
        let lines = host.lines()?;

        let flagged: Vec<Misspelling> = lines
            .iter()
            .enumerate()
            .flat_map(|(index, line)| {
                classifier.find_misspellings(dictionary, index, tokenizer.tokenize(line))
            })
            .collect();
        let ranges: Vec<MisspellingRange> = flagged.iter().map(|m| m.range).collect();

        self.clear_indicators(host, lines.len());
        self.flagged.clear();
        let stale: Vec<AnnotationHandle> = std::mem::take(&mut self.active).into_iter().collect();
        let fresh = host.replace_range_markers(&stale, &ranges, &self.marker_style)?;
        self.active.extend(fresh);

        if host.supports_line_indicators() {
            let flagged_lines: BTreeSet<usize> = ranges.iter().map(|range| range.line).collect();
            for &line in &flagged_lines {
                host.set_line_indicator(line, &self.line_style);
            }
            self.indicated_lines = flagged_lines;
        }

        let summary = RefreshSummary {
            lines: lines.len(),
            markers: self.active.len(),
            flagged_lines: ranges
                .iter()
                .map(|range| range.line)
                .collect::<BTreeSet<_>>()
                .len(),
        };
        self.flagged = flagged;
        Ok(summary)
    }

    /// Remove every marker and indicator. Never fails: handles are forgotten
    /// even when the host can no longer be read.
    pub fn clear<H: HostAdapter + ?Sized>(&mut self, host: &H) {
        for handle in std::mem::take(&mut self.active) {
            host.remove_range_marker(handle);
        }
        let line_count = match host.lines() {
            Ok(lines) => lines.len(),
            Err(err) => {
                tracing::warn!("Clearing annotations without document access: {}", err);
                0
            }
        };
        self.clear_indicators(host, line_count);
        self.flagged.clear();
    }

    /// Clear the indicator on every current line, plus any line we flagged
    /// that no longer exists.
    fn clear_indicators<H: HostAdapter + ?Sized>(&mut self, host: &H, line_count: usize) {
        if host.supports_line_indicators() {
            let beyond_end = self.indicated_lines.range(line_count..);
            for line in (0..line_count).chain(beyond_end.copied()) {
                host.clear_line_indicator(line, &self.line_style);
            }
        }
        self.indicated_lines.clear();
    }
}
