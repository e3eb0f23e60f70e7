pub mod annotations;
pub mod classifier;
pub mod dictionary;
pub mod scheduler;
pub mod suggestions;
pub mod tokenizer;

use crate::error::{Error, Result};
use crate::host::{HostAdapter, Subscription};
use crate::{AnnotationHandle, Config, Misspelling, MisspellingRange};
use annotations::AnnotationManager;
use classifier::Classifier;
use dictionary::Dictionary;
use scheduler::{CheckState, Scheduler, Skip};
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::{Rc, Weak};
use tokenizer::TokenizerPolicy;

/// Engine-facing slice of [`Config`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    pub tokenizer: TokenizerPolicy,
    pub marker_style: String,
    pub line_indicator_style: String,
    pub ignore_patterns: Vec<String>,
    pub enable_on_attach: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for EngineOptions {
    fn from(config: &Config) -> Self {
        Self {
            tokenizer: config.tokenizer(),
            marker_style: config.styles.marker().to_string(),
            line_indicator_style: config.styles.line_indicator().to_string(),
            ignore_patterns: config.ignore_patterns().to_vec(),
            enable_on_attach: config.enable_on_attach(),
        }
    }
}

/// Snapshot of the engine's bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineState {
    pub enabled: bool,
    pub dictionary_ready: bool,
    pub contents_dirty: bool,
    pub check_in_progress: bool,
    pub active_handles: BTreeSet<AnnotationHandle>,
}

/// Spell-check engine attached to one host editor.
///
/// Everything runs synchronously on the caller's thread, inside either a
/// toggle call or the host's change notification. Two engines never share
/// state, even when they share a dictionary.
pub struct SpellCheckEngine<H: HostAdapter + 'static> {
    inner: Rc<EngineInner<H>>,
}

struct EngineInner<H: HostAdapter> {
    host: H,
    dictionary: Rc<dyn Dictionary>,
    tokenizer: TokenizerPolicy,
    classifier: Classifier,
    scheduler: Scheduler,
    annotations: RefCell<AnnotationManager>,
    enabled: Cell<bool>,
    subscription: Cell<Option<Subscription>>,
}

impl<H: HostAdapter + 'static> SpellCheckEngine<H> {
    /// Attach an engine to `host`.
    ///
    /// If the host already has spell-check switched on, or the options ask
    /// for it, the engine is enabled straight away.
    ///
    /// # Errors
    ///
    /// [`crate::Error::InvalidPattern`] if an ignore pattern does not compile.
    pub fn new(host: H, dictionary: Rc<dyn Dictionary>, options: EngineOptions) -> Result<Self> {
        let classifier = Classifier::with_ignore_patterns(&options.ignore_patterns)?;
        let enable_now = options.enable_on_attach || host.is_spell_check_enabled();

        let engine = Self {
            inner: Rc::new(EngineInner {
                host,
                dictionary,
                tokenizer: options.tokenizer,
                classifier,
                scheduler: Scheduler::new(),
                annotations: RefCell::new(AnnotationManager::new(
                    options.marker_style,
                    options.line_indicator_style,
                )),
                enabled: Cell::new(false),
                subscription: Cell::new(None),
            }),
        };

        if enable_now {
            engine.enable();
        }
        Ok(engine)
    }

    /// Turn spell-check on and annotate the current content immediately.
    pub fn enable(&self) {
        let inner = &self.inner;
        inner.enabled.set(true);
        inner.host.set_spell_check_enabled(true);

        if inner.subscription.get().is_none() {
            let weak: Weak<EngineInner<H>> = Rc::downgrade(inner);
            let subscription = inner.host.on_content_changed(Rc::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.content_changed();
                }
            }));
            inner.subscription.set(Some(subscription));
        }

        inner.scheduler.mark_dirty();
        inner.spell_check();
    }

    /// Turn spell-check off and remove every annotation.
    ///
    /// The change listener stays registered and idles while disabled.
    pub fn disable(&self) {
        let inner = &self.inner;
        inner.enabled.set(false);
        inner.host.set_spell_check_enabled(false);
        inner.clear_after_disable();
    }

    /// Flip spell-check based on the host's flag.
    pub fn toggle(&self) {
        if self.inner.host.is_spell_check_enabled() {
            self.disable();
        } else {
            self.enable();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.get()
    }

    /// Ranked replacements for a misspelled word.
    ///
    /// `None` when the word is spelled correctly, the dictionary has nothing
    /// to offer, or the dictionary is not ready yet.
    pub fn suggest(&self, word: &str) -> Option<Vec<String>> {
        let dictionary = &self.inner.dictionary;
        if !dictionary.is_ready() || dictionary.check(word) {
            return None;
        }
        let suggestions = dictionary.suggest(word);
        if suggestions.is_empty() {
            None
        } else {
            Some(suggestions)
        }
    }

    /// Run a check pass now if the contents are dirty.
    ///
    /// Use this when the dictionary becomes ready, so pending content is
    /// annotated without waiting for the next edit.
    pub fn spell_check(&self) {
        self.inner.spell_check();
    }

    /// Deliver a content change, for hosts that route events themselves
    /// rather than through [`HostAdapter::on_content_changed`].
    pub fn notify_content_changed(&self) {
        self.inner.content_changed();
    }

    pub fn check_state(&self) -> CheckState {
        self.inner.scheduler.state()
    }

    /// Current bookkeeping.
    ///
    /// Called from inside a running pass (from a host callback), the handle
    /// set is reported empty because it is being rebuilt.
    pub fn state(&self) -> EngineState {
        let inner = &self.inner;
        let active_handles = inner
            .annotations
            .try_borrow()
            .map(|annotations| annotations.handles().collect())
            .unwrap_or_default();
        EngineState {
            enabled: inner.enabled.get(),
            dictionary_ready: inner.dictionary.is_ready(),
            contents_dirty: inner.scheduler.is_dirty(),
            check_in_progress: inner.scheduler.in_progress(),
            active_handles,
        }
    }

    /// Ranges flagged by the last completed pass.
    pub fn flagged(&self) -> Vec<MisspellingRange> {
        self.inner
            .annotations
            .try_borrow()
            .map(|annotations| annotations.flagged().collect())
            .unwrap_or_default()
    }

    /// Words flagged by the last completed pass, with their true columns.
    pub fn misspellings(&self) -> Vec<Misspelling> {
        self.inner
            .annotations
            .try_borrow()
            .map(|annotations| annotations.misspellings().to_vec())
            .unwrap_or_default()
    }

    pub fn host(&self) -> &H {
        &self.inner.host
    }
}

impl<H: HostAdapter + 'static> Drop for SpellCheckEngine<H> {
    /// Detaching removes everything the engine put on the host, including
    /// its change listener.
    fn drop(&mut self) {
        let inner = &self.inner;
        inner.enabled.set(false);

        let annotated = inner
            .annotations
            .try_borrow()
            .map_or(false, |annotations| !annotations.is_empty());
        if annotated {
            inner.clear_annotations();
        }

        if let Some(subscription) = inner.subscription.take() {
            inner.host.unsubscribe(subscription);
        }
    }
}

impl<H: HostAdapter> EngineInner<H> {
    fn content_changed(&self) {
        if !self.host.is_spell_check_enabled() {
            return;
        }
        self.scheduler.mark_dirty();
        self.spell_check();
    }

    fn spell_check(&self) {
        if !self.enabled.get() {
            return;
        }

        let guard = match self.scheduler.try_begin(self.dictionary.is_ready()) {
            Ok(guard) => guard,
            Err(Skip::DictionaryNotReady) => {
                tracing::debug!("Spell check deferred: {}", Error::DictionaryUnavailable);
                return;
            }
            Err(skip) => {
                tracing::debug!(?skip, "Spell check pass skipped");
                return;
            }
        };

        let refreshed = self.annotations.borrow_mut().refresh(
            &self.host,
            self.dictionary.as_ref(),
            self.tokenizer,
            &self.classifier,
        );

        match refreshed {
            Ok(summary) => {
                tracing::trace!(
                    lines = summary.lines,
                    markers = summary.markers,
                    flagged_lines = summary.flagged_lines,
                    "Spell check pass complete"
                );
                guard.complete();
            }
            Err(err) => {
                tracing::warn!("Spell check pass aborted: {}", err);
                drop(guard);
            }
        }

        // disabled from a host callback while the pass was running
        if !self.enabled.get() {
            self.clear_after_disable();
        }
    }

    fn clear_after_disable(&self) {
        // a running pass sees the flag and clears on its way out
        if !self.clear_annotations() {
            return;
        }
        // re-enabled by a host callback during the clear
        if self.enabled.get() {
            self.spell_check();
        }
    }

    /// Remove every annotation under the pass lock, so host callbacks made
    /// while markers are removed cannot start a rebuild. Returns false when
    /// a pass is running.
    fn clear_annotations(&self) -> bool {
        let Some(guard) = self.scheduler.hold() else {
            return false;
        };
        if let Ok(mut annotations) = self.annotations.try_borrow_mut() {
            annotations.clear(&self.host);
        }
        drop(guard);
        true
    }
}
