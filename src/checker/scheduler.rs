use std::cell::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Idle,
    Dirty,
    Checking,
}

/// Why a trigger did not start a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// A pass is already running; the trigger is dropped, not queued.
    Reentrant,
    /// Nothing changed since the last completed pass.
    Clean,
    /// The dictionary is not ready; stays dirty for the next trigger.
    DictionaryNotReady,
}

/// Coalesces change notifications into check passes.
///
/// All state lives in `Cell`s so a notification delivered from inside a
/// running pass (a host calling back while markers are being created) can
/// be recorded through a shared reference.
#[derive(Debug)]
pub struct Scheduler {
    dirty: Cell<bool>,
    in_progress: Cell<bool>,
    changed_during_pass: Cell<bool>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            dirty: Cell::new(false),
            in_progress: Cell::new(false),
            changed_during_pass: Cell::new(false),
        }
    }

    pub fn state(&self) -> CheckState {
        if self.in_progress.get() {
            CheckState::Checking
        } else if self.dirty.get() {
            CheckState::Dirty
        } else {
            CheckState::Idle
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    pub fn in_progress(&self) -> bool {
        self.in_progress.get()
    }

    pub fn mark_dirty(&self) {
        self.dirty.set(true);
        if self.in_progress.get() {
            self.changed_during_pass.set(true);
        }
    }

    /// Try to start a pass. Works like a non-blocking try-lock: the returned
    /// guard holds the `Checking` state until it is dropped.
    pub fn try_begin(&self, dictionary_ready: bool) -> Result<PassGuard<'_>, Skip> {
        if self.in_progress.get() {
            return Err(Skip::Reentrant);
        }
        if !self.dirty.get() {
            return Err(Skip::Clean);
        }
        if !dictionary_ready {
            return Err(Skip::DictionaryNotReady);
        }

        self.in_progress.set(true);
        self.changed_during_pass.set(false);
        Ok(PassGuard {
            scheduler: self,
            completed: false,
        })
    }

    /// Take the pass lock without starting a pass, for work that must not
    /// interleave with one. The guard is never completed, so the dirty flag
    /// is left as it was, plus any change that arrives while it is held.
    pub fn hold(&self) -> Option<PassGuard<'_>> {
        if self.in_progress.get() {
            return None;
        }
        self.in_progress.set(true);
        self.changed_during_pass.set(false);
        Some(PassGuard {
            scheduler: self,
            completed: false,
        })
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Held for the duration of one pass.
///
/// Dropping a completed guard returns to `Idle`, or to `Dirty` if a change
/// arrived mid-pass. Dropping an uncompleted guard (aborted pass) leaves the
/// contents dirty.
#[must_use]
pub struct PassGuard<'a> {
    scheduler: &'a Scheduler,
    completed: bool,
}

impl PassGuard<'_> {
    pub fn complete(mut self) {
        self.completed = true;
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        let scheduler = self.scheduler;
        if self.completed {
            scheduler.dirty.set(scheduler.changed_during_pass.get());
        }
        scheduler.changed_during_pass.set(false);
        scheduler.in_progress.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_dirty_checking_idle() {
        let scheduler = Scheduler::new();
        assert_eq!(scheduler.state(), CheckState::Idle);

        scheduler.mark_dirty();
        scheduler.mark_dirty();
        assert_eq!(scheduler.state(), CheckState::Dirty);

        let guard = scheduler.try_begin(true).unwrap();
        assert_eq!(scheduler.state(), CheckState::Checking);
        guard.complete();
        assert_eq!(scheduler.state(), CheckState::Idle);
    }

    #[test]
    fn test_clean_trigger_is_noop() {
        let scheduler = Scheduler::new();
        assert_eq!(scheduler.try_begin(true).err(), Some(Skip::Clean));
        assert_eq!(scheduler.state(), CheckState::Idle);
    }

    #[test]
    fn test_unready_dictionary_stays_dirty() {
        let scheduler = Scheduler::new();
        scheduler.mark_dirty();
        assert_eq!(scheduler.try_begin(false).err(), Some(Skip::DictionaryNotReady));
        assert_eq!(scheduler.state(), CheckState::Dirty);
    }

    #[test]
    fn test_reentrant_trigger_dropped() {
        let scheduler = Scheduler::new();
        scheduler.mark_dirty();
        let guard = scheduler.try_begin(true).unwrap();
        assert_eq!(scheduler.try_begin(true).err(), Some(Skip::Reentrant));
        guard.complete();
        assert_eq!(scheduler.state(), CheckState::Idle);
    }

    #[test]
    fn test_change_during_pass_leaves_dirty() {
        let scheduler = Scheduler::new();
        scheduler.mark_dirty();
        let guard = scheduler.try_begin(true).unwrap();
        scheduler.mark_dirty();
        assert_eq!(scheduler.state(), CheckState::Checking);
        guard.complete();
        assert_eq!(scheduler.state(), CheckState::Dirty);

        // the follow-up pass sees no new edit
        scheduler.try_begin(true).unwrap().complete();
        assert_eq!(scheduler.state(), CheckState::Idle);
    }

    #[test]
    fn test_aborted_pass_stays_dirty() {
        let scheduler = Scheduler::new();
        scheduler.mark_dirty();
        drop(scheduler.try_begin(true).unwrap());
        assert_eq!(scheduler.state(), CheckState::Dirty);
        assert!(!scheduler.in_progress());
    }

    #[test]
    fn test_hold_blocks_passes_and_keeps_dirty_flag() {
        let scheduler = Scheduler::new();
        let guard = scheduler.hold().unwrap();
        assert!(scheduler.hold().is_none());

        scheduler.mark_dirty();
        assert_eq!(scheduler.try_begin(true).err(), Some(Skip::Reentrant));
        drop(guard);
        assert_eq!(scheduler.state(), CheckState::Dirty);

        scheduler.try_begin(true).unwrap().complete();
        drop(scheduler.hold());
        assert_eq!(scheduler.state(), CheckState::Idle);
    }
}
