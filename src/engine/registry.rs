//! Cell Registry - Index → focus handle map for one OTP field.
//!
//! Each rendered cell binds a capability-scoped handle at its index when it
//! mounts and drops it when it unmounts. The registry never owns any part of
//! the OTP value; it only knows how to ask a cell to take or drop focus.
//!
//! - Re-registering an index replaces the previous handle (remount)
//! - Focusing an index with no handle is a no-op, not a fault
//! - No borrow is held while a handle runs, so handles may call back into
//!   the field synchronously

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

// =============================================================================
// Cell Handle
// =============================================================================

/// Imperative handle to one host input surface.
///
/// Implemented by whatever renders the cell (terminal widget, test double).
pub trait CellHandle {
    /// Ask the host surface to take keyboard focus.
    fn request_focus(&self);

    /// Ask the host surface to drop keyboard focus.
    fn blur(&self) {}
}

impl<F: Fn()> CellHandle for F {
    fn request_focus(&self) {
        self()
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Handles for the cells of a single OTP field, keyed by cell index.
#[derive(Default)]
pub struct CellRegistry {
    handles: RefCell<HashMap<usize, Rc<dyn CellHandle>>>,
}

impl CellRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handle` to `index`, replacing any prior binding.
    ///
    /// Returns the handle that was replaced, if any.
    pub fn register(&self, index: usize, handle: Rc<dyn CellHandle>) -> Option<Rc<dyn CellHandle>> {
        let previous = self.handles.borrow_mut().insert(index, handle);
        tracing::trace!(index, replaced = previous.is_some(), "cell handle registered");
        previous
    }

    /// Drop the binding at `index` (cell unmounted).
    pub fn unregister(&self, index: usize) -> Option<Rc<dyn CellHandle>> {
        let removed = self.handles.borrow_mut().remove(&index);
        tracing::trace!(index, removed = removed.is_some(), "cell handle unregistered");
        removed
    }

    /// Drop `handle` at `index` only if it is still the bound one.
    ///
    /// A cell that remounted under the same index must not be unbound by the
    /// stale cleanup of its previous mount.
    pub fn unregister_if_same(&self, index: usize, handle: &Rc<dyn CellHandle>) -> bool {
        let mut handles = self.handles.borrow_mut();
        match handles.get(&index) {
            Some(current) if Rc::ptr_eq(current, handle) => {
                handles.remove(&index);
                true
            }
            _ => false,
        }
    }

    /// Get the handle bound at `index`.
    pub fn get(&self, index: usize) -> Option<Rc<dyn CellHandle>> {
        self.handles.borrow().get(&index).cloned()
    }

    /// Ask the cell at `index` to take focus.
    ///
    /// Returns false (and does nothing) when no handle is registered there.
    pub fn focus(&self, index: usize) -> bool {
        // Clone out before calling so the handle can re-enter the registry.
        let Some(handle) = self.get(index) else {
            tracing::trace!(index, "focus requested on unregistered cell; ignored");
            return false;
        };
        handle.request_focus();
        true
    }

    /// Ask the cell at `index` to drop focus. No-op when unregistered.
    pub fn blur(&self, index: usize) -> bool {
        let Some(handle) = self.get(index) else {
            return false;
        };
        handle.blur();
        true
    }

    /// Check if a handle is bound at `index`.
    pub fn is_registered(&self, index: usize) -> bool {
        self.handles.borrow().contains_key(&index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counting_handle() -> (Rc<dyn CellHandle>, Rc<Cell<usize>>) {
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let handle: Rc<dyn CellHandle> = Rc::new(move || count_clone.set(count_clone.get() + 1));
        (handle, count)
    }

    #[test]
    fn test_focus_registered_cell() {
        let registry = CellRegistry::new();
        let (handle, count) = counting_handle();
        registry.register(0, handle);

        assert!(registry.focus(0));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_focus_unregistered_is_noop() {
        let registry = CellRegistry::new();
        assert!(!registry.focus(3));
        assert!(!registry.blur(3));
        assert!(!registry.is_registered(3));
    }

    #[test]
    fn test_register_replaces() {
        let registry = CellRegistry::new();
        let (first, first_count) = counting_handle();
        let (second, second_count) = counting_handle();

        assert!(registry.register(1, first).is_none());
        assert!(registry.register(1, second).is_some());

        registry.focus(1);
        assert_eq!(first_count.get(), 0);
        assert_eq!(second_count.get(), 1);
    }

    #[test]
    fn test_register_same_handle_twice() {
        let registry = CellRegistry::new();
        let (handle, count) = counting_handle();

        registry.register(2, handle.clone());
        registry.register(2, handle);
        assert!(registry.is_registered(2));

        registry.focus(2);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_unregister_if_same() {
        let registry = CellRegistry::new();
        let (handle, count) = counting_handle();
        registry.register(0, handle.clone());

        assert!(registry.unregister_if_same(0, &handle));
        assert!(!registry.is_registered(0));
        assert!(!registry.focus(0));
        assert_eq!(count.get(), 0);
        assert!(!registry.unregister_if_same(0, &handle));
    }

    #[test]
    fn test_stale_unregister_keeps_remounted_handle() {
        let registry = CellRegistry::new();
        let (old, _) = counting_handle();
        let (new, new_count) = counting_handle();

        registry.register(0, old.clone());
        registry.register(0, new);

        assert!(!registry.unregister_if_same(0, &old));
        assert!(registry.focus(0));
        assert_eq!(new_count.get(), 1);
    }

    #[test]
    fn test_blur_reaches_handle() {
        struct Surface {
            blurred: Cell<bool>,
        }
        impl CellHandle for Surface {
            fn request_focus(&self) {}
            fn blur(&self) {
                self.blurred.set(true);
            }
        }

        let registry = CellRegistry::new();
        let surface = Rc::new(Surface { blurred: Cell::new(false) });
        registry.register(1, surface.clone());

        assert!(registry.blur(1));
        assert!(surface.blurred.get());
    }

    #[test]
    fn test_handle_can_reenter_registry() {
        let registry = Rc::new(CellRegistry::new());
        let registry_clone = registry.clone();
        let seen = Rc::new(Cell::new(false));
        let seen_clone = seen.clone();

        let handle: Rc<dyn CellHandle> = Rc::new(move || {
            // Reading the registry from inside a focus call must not panic
            seen_clone.set(registry_clone.is_registered(0));
        });
        registry.register(0, handle);

        assert!(registry.focus(0));
        assert!(seen.get());
    }
}
