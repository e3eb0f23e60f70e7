#![allow(dead_code)]

use livespell::host::ChangeListener;
use livespell::{AnnotationHandle, Dictionary, Error, HostAdapter, MisspellingRange, Subscription};
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;

/// Every call the engine makes on a [`RecordingHost`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(MisspellingRange, String),
    Remove(AnnotationHandle),
    SetIndicator(usize),
    ClearIndicator(usize),
}

/// Host double that logs calls and can misbehave on request.
#[derive(Clone)]
pub struct RecordingHost {
    state: Rc<State>,
}

struct State {
    lines: RefCell<Vec<String>>,
    calls: RefCell<Vec<Call>>,
    live: RefCell<BTreeSet<AnnotationHandle>>,
    listeners: RefCell<Vec<(Subscription, ChangeListener)>>,
    on_create: RefCell<Option<Rc<dyn Fn()>>>,
    on_remove: RefCell<Option<Rc<dyn Fn()>>>,
    next_id: Cell<u64>,
    enabled: Cell<bool>,
    available: Cell<bool>,
    indicators: Cell<bool>,
}

impl RecordingHost {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            state: Rc::new(State {
                lines: RefCell::new(lines.iter().map(|l| l.to_string()).collect()),
                calls: RefCell::default(),
                live: RefCell::default(),
                listeners: RefCell::default(),
                on_create: RefCell::new(None),
                on_remove: RefCell::new(None),
                next_id: Cell::new(100),
                enabled: Cell::new(false),
                available: Cell::new(true),
                indicators: Cell::new(true),
            }),
        }
    }

    pub fn without_line_indicators(self) -> Self {
        self.state.indicators.set(false);
        self
    }

    /// Replace the document and notify every listener.
    pub fn edit(&self, lines: &[&str]) {
        *self.state.lines.borrow_mut() = lines.iter().map(|l| l.to_string()).collect();
        self.notify();
    }

    pub fn notify(&self) {
        let listeners: Vec<ChangeListener> = self
            .state
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }
    }

    /// Run `hook` right after each marker is created.
    pub fn on_create(&self, hook: impl Fn() + 'static) {
        *self.state.on_create.borrow_mut() = Some(Rc::new(hook));
    }

    /// Run `hook` right after each marker is removed.
    pub fn on_remove(&self, hook: impl Fn() + 'static) {
        *self.state.on_remove.borrow_mut() = Some(Rc::new(hook));
    }

    /// Fire the change listeners from inside marker creation.
    pub fn reenter_on_create(&self) {
        let host = self.clone();
        self.on_create(move || host.notify());
    }

    pub fn set_available(&self, available: bool) {
        self.state.available.set(available);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.calls.borrow().clone()
    }

    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.state.calls.borrow_mut())
    }

    pub fn created(&self) -> Vec<MisspellingRange> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Create(range, _) => Some(range),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.state.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn live_markers(&self) -> usize {
        self.state.live.borrow().len()
    }

    pub fn listener_count(&self) -> usize {
        self.state.listeners.borrow().len()
    }
}

impl HostAdapter for RecordingHost {
    fn lines(&self) -> livespell::Result<Vec<String>> {
        if !self.state.available.get() {
            return Err(Error::HostUnavailable("editor detached".to_string()));
        }
        Ok(self.state.lines.borrow().clone())
    }

    fn on_content_changed(&self, listener: ChangeListener) -> Subscription {
        let subscription = Subscription(self.state.next_id.get());
        self.state.next_id.set(subscription.0 + 1);
        self.state
            .listeners
            .borrow_mut()
            .push((subscription, listener));
        subscription
    }

    fn unsubscribe(&self, subscription: Subscription) {
        self.state
            .listeners
            .borrow_mut()
            .retain(|(id, _)| *id != subscription);
    }

    fn create_range_marker(
        &self,
        range: &MisspellingRange,
        style: &str,
    ) -> livespell::Result<AnnotationHandle> {
        if !self.state.available.get() {
            return Err(Error::HostUnavailable("editor detached".to_string()));
        }
        let handle = AnnotationHandle(self.state.next_id.get());
        self.state.next_id.set(handle.0 + 1);
        self.state
            .calls
            .borrow_mut()
            .push(Call::Create(*range, style.to_string()));
        self.state.live.borrow_mut().insert(handle);

        let hook = self.state.on_create.borrow().clone();
        if let Some(hook) = hook {
            hook();
        }
        Ok(handle)
    }

    fn remove_range_marker(&self, handle: AnnotationHandle) {
        self.state.calls.borrow_mut().push(Call::Remove(handle));
        self.state.live.borrow_mut().remove(&handle);

        let hook = self.state.on_remove.borrow().clone();
        if let Some(hook) = hook {
            hook();
        }
    }

    fn supports_line_indicators(&self) -> bool {
        self.state.indicators.get()
    }

    fn set_line_indicator(&self, line: usize, _style: &str) {
        self.state.calls.borrow_mut().push(Call::SetIndicator(line));
    }

    fn clear_line_indicator(&self, line: usize, _style: &str) {
        self.state.calls.borrow_mut().push(Call::ClearIndicator(line));
    }

    fn is_spell_check_enabled(&self) -> bool {
        self.state.enabled.get()
    }

    fn set_spell_check_enabled(&self, enabled: bool) {
        self.state.enabled.set(enabled);
    }
}

/// Case-insensitive word list that counts lookups.
pub struct Known {
    words: Vec<&'static str>,
    lookups: Cell<usize>,
}

impl Known {
    pub fn new(words: &[&'static str]) -> Self {
        Self {
            words: words.to_vec(),
            lookups: Cell::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }
}

impl Dictionary for Known {
    fn check(&self, word: &str) -> bool {
        self.lookups.set(self.lookups.get() + 1);
        self.words.iter().any(|known| known.eq_ignore_ascii_case(word))
    }

    fn suggest(&self, word: &str) -> Vec<String> {
        match word {
            "teh" => vec!["the".to_string(), "ten".to_string()],
            _ => Vec::new(),
        }
    }
}
