use crate::error::{Error, Result};
use crate::host::{ChangeListener, HostAdapter, Subscription};
use crate::{AnnotationHandle, MisspellingRange};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

/// An editor surface backed by a plain line buffer.
///
/// Cloning yields another handle to the same buffer, so a caller can keep
/// editing the document after handing a clone to an engine.
#[derive(Clone)]
pub struct MemoryHost {
    inner: Rc<Inner>,
}

struct Inner {
    lines: RefCell<Vec<String>>,
    markers: RefCell<BTreeMap<AnnotationHandle, (MisspellingRange, String)>>,
    indicators: RefCell<BTreeSet<(usize, String)>>,
    listeners: RefCell<Vec<(Subscription, ChangeListener)>>,
    next_id: Cell<u64>,
    spell_check_enabled: Cell<bool>,
    line_indicators: Cell<bool>,
    disposed: Cell<bool>,
}

impl MemoryHost {
    pub fn new(text: &str) -> Self {
        Self::from_lines(split_lines(text))
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inner: Rc::new(Inner {
                lines: RefCell::new(lines.into_iter().map(Into::into).collect()),
                markers: RefCell::default(),
                indicators: RefCell::default(),
                listeners: RefCell::default(),
                next_id: Cell::new(1),
                spell_check_enabled: Cell::new(false),
                line_indicators: Cell::new(true),
                disposed: Cell::new(false),
            }),
        }
    }

    /// Drop line indicator support, leaving range markers as the only
    /// visual signal.
    pub fn without_line_indicators(self) -> Self {
        self.inner.line_indicators.set(false);
        self
    }

    /// Start with the editor's spell-check flag already on.
    pub fn with_spell_check(self, enabled: bool) -> Self {
        self.inner.spell_check_enabled.set(enabled);
        self
    }

    pub fn text(&self) -> String {
        self.inner.lines.borrow().join("\n")
    }

    /// Replace the whole document and notify listeners.
    pub fn set_text(&self, text: &str) {
        *self.inner.lines.borrow_mut() = split_lines(text);
        self.notify();
    }

    /// Replace one line and notify listeners. Out-of-range lines are appended.
    pub fn set_line(&self, line: usize, text: &str) {
        {
            let mut lines = self.inner.lines.borrow_mut();
            match lines.get_mut(line) {
                Some(existing) => *existing = text.to_string(),
                None => lines.push(text.to_string()),
            }
        }
        self.notify();
    }

    pub fn insert_line(&self, line: usize, text: &str) {
        {
            let mut lines = self.inner.lines.borrow_mut();
            let at = line.min(lines.len());
            lines.insert(at, text.to_string());
        }
        self.notify();
    }

    pub fn remove_line(&self, line: usize) {
        {
            let mut lines = self.inner.lines.borrow_mut();
            if line < lines.len() {
                lines.remove(line);
            }
        }
        self.notify();
    }

    /// Live markers, in creation order.
    pub fn markers(&self) -> Vec<(MisspellingRange, String)> {
        self.inner.markers.borrow().values().cloned().collect()
    }

    pub fn marker_count(&self) -> usize {
        self.inner.markers.borrow().len()
    }

    /// Lines currently carrying an indicator.
    pub fn indicator_lines(&self) -> Vec<usize> {
        let lines: BTreeSet<usize> = self
            .inner
            .indicators
            .borrow()
            .iter()
            .map(|(line, _)| *line)
            .collect();
        lines.into_iter().collect()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Tear the editor down: the document becomes unreadable and every
    /// marker goes with it.
    pub fn dispose(&self) {
        self.inner.disposed.set(true);
        self.inner.markers.borrow_mut().clear();
        self.inner.indicators.borrow_mut().clear();
    }

    fn next_id(&self) -> u64 {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        id
    }

    fn notify(&self) {
        // snapshot so a listener may subscribe or unsubscribe while running
        let listeners: Vec<ChangeListener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }
    }

    fn ensure_live(&self) -> Result<()> {
        if self.inner.disposed.get() {
            return Err(Error::HostUnavailable("editor has been disposed".to_string()));
        }
        Ok(())
    }
}

impl HostAdapter for MemoryHost {
    fn lines(&self) -> Result<Vec<String>> {
        self.ensure_live()?;
        Ok(self.inner.lines.borrow().clone())
    }

    fn on_content_changed(&self, listener: ChangeListener) -> Subscription {
        let subscription = Subscription(self.next_id());
        self.inner
            .listeners
            .borrow_mut()
            .push((subscription, listener));
        subscription
    }

    fn unsubscribe(&self, subscription: Subscription) {
        self.inner
            .listeners
            .borrow_mut()
            .retain(|(id, _)| *id != subscription);
    }

    fn create_range_marker(&self, range: &MisspellingRange, style: &str) -> Result<AnnotationHandle> {
        self.ensure_live()?;
        let handle = AnnotationHandle(self.next_id());
        self.inner
            .markers
            .borrow_mut()
            .insert(handle, (*range, style.to_string()));
        Ok(handle)
    }

    fn remove_range_marker(&self, handle: AnnotationHandle) {
        self.inner.markers.borrow_mut().remove(&handle);
    }

    fn supports_line_indicators(&self) -> bool {
        self.inner.line_indicators.get()
    }

    fn set_line_indicator(&self, line: usize, style: &str) {
        self.inner
            .indicators
            .borrow_mut()
            .insert((line, style.to_string()));
    }

    fn clear_line_indicator(&self, line: usize, style: &str) {
        self.inner
            .indicators
            .borrow_mut()
            .remove(&(line, style.to_string()));
    }

    fn is_spell_check_enabled(&self) -> bool {
        self.inner.spell_check_enabled.get()
    }

    fn set_spell_check_enabled(&self, enabled: bool) {
        self.inner.spell_check_enabled.set(enabled);
    }
}

fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}
