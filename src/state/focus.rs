//! Focus System - Which cell of a field the host reports as focused
//!
//! The focused index is observational: hosts report `gain(index)` / `lose()`
//! from their surfaces' focus callbacks and the field reads it back to pick
//! the highlighted cell. It never decides where edits go.
//!
//! - `index` signal (currently focused cell, `None` if none)
//! - Focus callbacks per cell (on_focus / on_blur)
//!
//! # Example
//!
//! ```ignore
//! use spark_otp::state::{FocusState, FocusCallbacks};
//!
//! let focus = FocusState::new();
//! let cleanup = focus.register_callbacks(0, FocusCallbacks {
//!     on_focus: Some(Box::new(|| println!("cell 0 focused"))),
//!     on_blur: None,
//! });
//! focus.gain(0);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use spark_signals::{signal, Signal};

// =============================================================================
// FOCUS CALLBACKS
// =============================================================================

/// Callbacks fired when focus changes
#[derive(Default)]
pub struct FocusCallbacks {
    pub on_focus: Option<Box<dyn Fn()>>,
    pub on_blur: Option<Box<dyn Fn()>>,
}

/// One registration; `id` is unique for the lifetime of the state.
struct CallbackEntry {
    id: u64,
    callbacks: Rc<FocusCallbacks>,
}

type CallbackRegistry = Rc<RefCell<HashMap<usize, Vec<CallbackEntry>>>>;

// =============================================================================
// FOCUS STATE
// =============================================================================

/// Focus tracking for the cells of one field.
pub struct FocusState {
    index: Signal<Option<usize>>,
    // Multiple callbacks per index supported
    callbacks: CallbackRegistry,
    next_callback_id: Cell<u64>,
}

impl Default for FocusState {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusState {
    /// No cell focused.
    pub fn new() -> Self {
        Self {
            index: signal(None),
            callbacks: Rc::new(RefCell::new(HashMap::new())),
            next_callback_id: Cell::new(0),
        }
    }

    /// Get the currently focused cell
    pub fn get(&self) -> Option<usize> {
        self.index.get()
    }

    /// The reactive signal behind [`FocusState::get`].
    pub fn signal(&self) -> Signal<Option<usize>> {
        self.index.clone()
    }

    /// Check if any cell is focused
    pub fn has_focus(&self) -> bool {
        self.get().is_some()
    }

    /// Check if a specific cell is focused
    pub fn is_focused(&self, index: usize) -> bool {
        self.get() == Some(index)
    }

    /// The host reports that the cell at `index` gained focus.
    pub fn gain(&self, index: usize) {
        self.set_focus_with_callbacks(Some(index));
    }

    /// The host reports that the focused cell lost focus.
    pub fn lose(&self) {
        self.set_focus_with_callbacks(None);
    }

    /// Register focus callbacks for a cell.
    /// Returns cleanup function to unregister.
    pub fn register_callbacks(&self, index: usize, callbacks: FocusCallbacks) -> impl FnOnce() + use<> {
        let id = self.next_callback_id.get();
        self.next_callback_id.set(id + 1);

        self.callbacks.borrow_mut().entry(index).or_default().push(CallbackEntry {
            id,
            callbacks: Rc::new(callbacks),
        });

        let registry = self.callbacks.clone();
        move || {
            let mut reg = registry.borrow_mut();
            if let Some(list) = reg.get_mut(&index) {
                list.retain(|entry| entry.id != id);
                if list.is_empty() {
                    reg.remove(&index);
                }
            }
        }
    }

    /// Set focus and fire callbacks at the source
    fn set_focus_with_callbacks(&self, new_index: Option<usize>) {
        let old_index = self.get();

        // No change, no callbacks
        if old_index == new_index {
            return;
        }

        if let Some(old) = old_index {
            self.fire(old, |cb| cb.on_blur.as_ref());
        }

        self.index.set(new_index);
        tracing::trace!(?old_index, ?new_index, "cell focus changed");

        if let Some(new) = new_index {
            self.fire(new, |cb| cb.on_focus.as_ref());
        }
    }

    fn fire(&self, index: usize, pick: impl Fn(&FocusCallbacks) -> Option<&Box<dyn Fn()>>) {
        // Snapshot first: callbacks may register or clean up callbacks.
        let snapshot: Vec<Rc<FocusCallbacks>> = match self.callbacks.borrow().get(&index) {
            Some(list) => list.iter().map(|entry| entry.callbacks.clone()).collect(),
            None => return,
        };
        for cb in &snapshot {
            if let Some(f) = pick(cb) {
                f();
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
