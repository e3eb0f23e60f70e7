pub mod memory;

use crate::error::Result;
use crate::{AnnotationHandle, MisspellingRange};
use std::rc::Rc;

/// Callback invoked by the host after any edit. The payload is not needed:
/// every pass re-reads the whole document.
pub type ChangeListener = Rc<dyn Fn()>;

/// Registration token returned by [`HostAdapter::on_content_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(pub u64);

/// What the engine needs from the editor it is attached to.
///
/// Methods take `&self`: editors are shared objects and may call back into
/// the engine (through a registered listener) while one of these methods is
/// running. Implementations keep their own interior mutability.
///
/// Columns are 0-based char offsets. Hosts with 1-based columns convert here.
pub trait HostAdapter {
    /// Current document content, one entry per line.
    ///
    /// # Errors
    ///
    /// [`crate::Error::HostUnavailable`] if the document can no longer be read.
    fn lines(&self) -> Result<Vec<String>>;

    fn on_content_changed(&self, listener: ChangeListener) -> Subscription;

    /// Drop a listener registered with [`HostAdapter::on_content_changed`].
    /// Engines call this when they are dropped.
    fn unsubscribe(&self, _subscription: Subscription) {}

    /// # Errors
    ///
    /// [`crate::Error::HostUnavailable`] if the editor cannot take markers.
    fn create_range_marker(&self, range: &MisspellingRange, style: &str) -> Result<AnnotationHandle>;

    fn remove_range_marker(&self, handle: AnnotationHandle);

    /// Swap one marker set for another.
    ///
    /// Hosts with a batched decoration API override this. The default removes
    /// every stale handle, then creates every fresh marker in order. On
    /// failure no fresh marker survives.
    fn replace_range_markers(
        &self,
        stale: &[AnnotationHandle],
        fresh: &[MisspellingRange],
        style: &str,
    ) -> Result<Vec<AnnotationHandle>> {
        for handle in stale {
            self.remove_range_marker(*handle);
        }

        let mut created = Vec::with_capacity(fresh.len());
        for range in fresh {
            match self.create_range_marker(range, style) {
                Ok(handle) => created.push(handle),
                Err(err) => {
                    // leave nothing half-built behind
                    for handle in created {
                        self.remove_range_marker(handle);
                    }
                    return Err(err);
                }
            }
        }
        Ok(created)
    }

    /// Whether the host shows per-line indicators (gutter marks). When false
    /// the indicator methods are never called.
    fn supports_line_indicators(&self) -> bool {
        false
    }

    fn set_line_indicator(&self, _line: usize, _style: &str) {}

    fn clear_line_indicator(&self, _line: usize, _style: &str) {}

    fn is_spell_check_enabled(&self) -> bool;

    fn set_spell_check_enabled(&self, enabled: bool);
}
