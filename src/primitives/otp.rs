//! OTP Primitive - N single-character cells behaving as one code.
//!
//! The field owns the value (one slot per cell), a registry of per-cell focus
//! handles, and a derived "every cell filled" flag. Hosts forward each cell's
//! raw events; the field decides what the value becomes and which cell is
//! asked to take focus next.
//!
//! # Features
//!
//! - Two-way value binding via `Signal<Vec<String>>`
//! - Focus advances on entry and retreats on deletion
//! - Backspace on an empty cell moves to the previous cell
//! - A full-length paste/autofill fills every cell, from any cell
//! - Derived completion flag driving the completion border color
//!
//! # Example
//!
//! ```ignore
//! use spark_otp::primitives::{otp_field, OtpProps};
//! use spark_signals::effect;
//!
//! let field = otp_field(OtpProps::from_initial(vec![String::new(); 4], 4));
//! for index in 0..4 {
//!     let _cleanup = field.register_cell(index, host_handle(index));
//! }
//! field.mount(); // focuses cell 0
//!
//! let watched = field.clone();
//! let _stop = effect(move || {
//!     if watched.is_complete() {
//!         submit(watched.code());
//!     }
//! });
//!
//! field.on_value_change("5", 0);
//! field.on_value_change("9081", 1); // fills all four cells
//! ```

use std::cell::Cell;
use std::rc::{Rc, Weak};
use spark_signals::{derived, Signal};

use crate::engine::{CellHandle, CellRegistry};
use crate::error::{OtpError, Result};
use crate::state::clipboard::{self, ClipboardSource, InternalClipboard};
use crate::state::{FocusCallbacks, FocusState, InputEvent, KeyboardEvent};
use crate::types::{BorderStyle, CellFlags, KeyboardClass, Rgba};
use super::types::{CellStyle, CellVisual, Cleanup, OtpProps, PropValue};

// =============================================================================
// Edit Planning
// =============================================================================

/// Which rule an edit was handled by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// Payload (spaces removed) is exactly N characters: fill every cell.
    FullCode,
    /// One character typed into the cell.
    Single,
    /// Several characters but not a full code: keep the last one.
    LastChar,
    /// Cell emptied.
    Clear,
}

/// Result of planning one value change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Which rule applied.
    pub kind: EditKind,
    /// The complete new value to commit.
    pub value: Vec<String>,
    /// Cell to focus after committing, if any.
    pub focus: Option<usize>,
}

/// Write `text` into slot `index`, growing the sequence with empty slots when
/// a caller seeded it too short.
fn write_slot(value: &mut Vec<String>, index: usize, text: String) {
    if index >= value.len() {
        value.resize(index + 1, String::new());
    }
    value[index] = text;
}

/// Trimmed form of one pasted character ("" for whitespace).
fn trimmed(ch: char) -> String {
    if ch.is_whitespace() {
        String::new()
    } else {
        ch.to_string()
    }
}

/// Decide what a raw value change at `index` does to `current`.
///
/// Pure: the caller commits `Edit::value` and then issues `Edit::focus`.
pub fn plan_value_change(current: &[String], raw: &str, index: usize, cell_count: usize) -> Edit {
    let mut value = current.to_vec();

    // Full-code paste wins over everything else, whatever cell received it
    if raw.chars().filter(|c| *c != ' ').count() == cell_count {
        for (slot, ch) in raw.chars().take(cell_count).enumerate() {
            write_slot(&mut value, slot, trimmed(ch));
        }
        return Edit {
            kind: EditKind::FullCode,
            value,
            focus: cell_count.checked_sub(1),
        };
    }

    let (kind, text) = match raw.chars().count() {
        0 => (EditKind::Clear, String::new()),
        1 => (EditKind::Single, raw.to_string()),
        _ => (
            EditKind::LastChar,
            raw.chars().last().map(String::from).unwrap_or_default(),
        ),
    };
    write_slot(&mut value, index, text);

    let focus = if kind == EditKind::Clear {
        index.checked_sub(1)
    } else if index + 1 < cell_count {
        Some(index + 1)
    } else {
        None
    };

    Edit { kind, value, focus }
}

/// Decide whether a key press at `index` moves focus on its own.
///
/// Only Backspace on an already-empty cell (past the first) does: the value
/// change that would normally retreat focus never fires for an empty cell.
pub fn plan_key_event(current: &[String], event: &KeyboardEvent, index: usize) -> Option<usize> {
    if !event.is_press() || !event.is_backspace() || index == 0 {
        return None;
    }
    match current.get(index) {
        Some(slot) if slot.is_empty() => Some(index - 1),
        _ => None,
    }
}

/// True iff every slot holds something.
pub fn is_filled(value: &[String]) -> bool {
    value.iter().all(|slot| !slot.is_empty())
}

// =============================================================================
// Field IDs
// =============================================================================

thread_local! {
    /// Counter for generating unique field IDs.
    static ID_COUNTER: Cell<usize> = const { Cell::new(0) };
}

fn next_id() -> String {
    ID_COUNTER.with(|counter| {
        let id = counter.get();
        counter.set(id + 1);
        format!("otp{}", id)
    })
}

// =============================================================================
// OTP Field
// =============================================================================

/// Progress of the one-time autofocus of cell 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MountState {
    Unmounted,
    /// `mount` ran before cell 0 had a handle; its registration finishes it.
    AwaitingFirstCell,
    Mounted,
}

struct FieldState {
    id: String,
    cell_count: usize,
    keyboard: KeyboardClass,
    auto_focus: bool,
    placeholder: Option<String>,

    value: Signal<Vec<String>>,
    complete: Rc<dyn Fn() -> bool>,
    focus: FocusState,
    registry: CellRegistry,
    mount_state: Cell<MountState>,

    active_border_color: Option<PropValue<Rgba>>,
    inactive_border_color: Option<PropValue<Rgba>>,
    completion_border_color: PropValue<Rgba>,
    placeholder_color: Option<PropValue<Rgba>>,
    box_style: Option<CellStyle>,
}

/// A mounted OTP field. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct OtpField {
    inner: Rc<FieldState>,
}

/// Create an OTP field.
///
/// The field does not check that the initial value has one slot per cell;
/// a mismatch is logged and left to the caller (see [`OtpProps::validate`]).
/// Call [`OtpField::mount`] once the cells are registered to focus cell 0.
pub fn otp_field(props: OtpProps) -> OtpField {
    let id = props.id.clone().unwrap_or_else(next_id);
    let cell_count = props.number_of_inputs;

    let initial_len = props.value.get().len();
    if initial_len != cell_count {
        tracing::warn!(
            field = %id,
            expected = cell_count,
            found = initial_len,
            "initial OTP value length does not match cell count"
        );
    }

    // Completion is a projection of the value, never set on its own
    let value_for_complete = props.value.clone();
    let complete_derived = derived(move || is_filled(&value_for_complete.get()));
    let complete: Rc<dyn Fn() -> bool> = Rc::new(move || complete_derived.get());

    tracing::debug!(field = %id, cells = cell_count, "otp field created");

    OtpField {
        inner: Rc::new(FieldState {
            id,
            cell_count,
            keyboard: props.keyboard,
            auto_focus: props.auto_focus,
            placeholder: props.placeholder,
            value: props.value,
            complete,
            focus: FocusState::new(),
            registry: CellRegistry::new(),
            mount_state: Cell::new(MountState::Unmounted),
            active_border_color: props.active_border_color,
            inactive_border_color: props.inactive_border_color,
            completion_border_color: props.completion_border_color,
            placeholder_color: props.placeholder_color,
            box_style: props.box_style,
        }),
    }
}

impl OtpField {
    // =========================================================================
    // Identity / configuration
    // =========================================================================

    /// Field ID.
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Number of cells (N).
    pub fn cell_count(&self) -> usize {
        self.inner.cell_count
    }

    /// Characters a host surface should accept per cell: N, so a full code
    /// can be pasted into any single cell.
    pub fn max_length(&self) -> usize {
        self.inner.cell_count
    }

    /// Keyboard class each cell offers.
    pub fn keyboard(&self) -> KeyboardClass {
        self.inner.keyboard
    }

    // =========================================================================
    // Value
    // =========================================================================

    /// Current value, one slot per cell.
    pub fn value(&self) -> Vec<String> {
        self.inner.value.get()
    }

    /// The value signal (shared with the caller's props).
    pub fn value_signal(&self) -> Signal<Vec<String>> {
        self.inner.value.clone()
    }

    /// The code as one string (empty slots contribute nothing).
    pub fn code(&self) -> String {
        self.value().concat()
    }

    /// Contents of one slot.
    pub fn slot(&self, index: usize) -> Option<String> {
        self.value().get(index).cloned()
    }

    /// Whether every cell is filled. Tracked when read inside a derived/effect.
    pub fn is_complete(&self) -> bool {
        (self.inner.complete)()
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Cell the host last reported as focused.
    pub fn focused_index(&self) -> Option<usize> {
        self.inner.focus.get()
    }

    /// Reactive focused-cell signal.
    pub fn focus_signal(&self) -> Signal<Option<usize>> {
        self.inner.focus.signal()
    }

    /// Host callback: the cell at `index` gained focus.
    pub fn on_focus_gained(&self, index: usize) {
        self.inner.focus.gain(index);
    }

    /// Host callback: the focused cell lost focus.
    pub fn on_focus_lost(&self) {
        self.inner.focus.lose();
    }

    /// Register focus callbacks for one cell.
    pub fn register_focus_callbacks(&self, index: usize, callbacks: FocusCallbacks) -> impl FnOnce() + use<> {
        self.inner.focus.register_callbacks(index, callbacks)
    }

    /// Ask the cell at `index` to take focus. No-op if it is not mounted.
    pub fn focus_cell(&self, index: usize) -> bool {
        self.inner.registry.focus(index)
    }

    /// Ask the cell at `index` to drop focus. No-op if it is not mounted.
    pub fn blur_cell(&self, index: usize) -> bool {
        self.inner.registry.blur(index)
    }

    // =========================================================================
    // Cell lifecycle
    // =========================================================================

    /// Bind the focus handle of the cell at `index` (cell mounted).
    ///
    /// Re-registering an index replaces the old handle. The returned cleanup
    /// unbinds this handle, unless the cell has since remounted.
    pub fn register_cell(&self, index: usize, handle: Rc<dyn CellHandle>) -> Cleanup {
        self.inner.registry.register(index, handle.clone());
        if index == 0 && self.inner.mount_state.get() == MountState::AwaitingFirstCell {
            self.autofocus();
        }

        let weak: Weak<FieldState> = Rc::downgrade(&self.inner);
        Box::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.registry.unregister_if_same(index, &handle);
            }
        })
    }

    /// Unbind whatever handle is at `index`, whichever mount registered it.
    pub fn unregister_cell(&self, index: usize) -> bool {
        self.inner.registry.unregister(index).is_some()
    }

    /// Whether a handle is bound at `index`.
    pub fn is_cell_registered(&self, index: usize) -> bool {
        self.inner.registry.is_registered(index)
    }

    /// Finish mounting: focus cell 0 (once, and only with `auto_focus`).
    ///
    /// If cell 0 has no handle yet, the focus happens when it registers.
    /// Later calls do nothing.
    pub fn mount(&self) {
        if self.inner.mount_state.get() != MountState::Unmounted {
            return;
        }
        if self.inner.auto_focus {
            self.autofocus();
        } else {
            self.inner.mount_state.set(MountState::Mounted);
        }
    }

    fn autofocus(&self) {
        let focused = self.inner.registry.focus(0);
        self.inner.mount_state.set(if focused {
            MountState::Mounted
        } else {
            MountState::AwaitingFirstCell
        });
        tracing::debug!(field = %self.inner.id, focused, "otp field mounted");
    }

    // =========================================================================
    // Edit dispatch
    // =========================================================================

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.inner.cell_count {
            return Err(OtpError::CellOutOfRange {
                index,
                cell_count: self.inner.cell_count,
            });
        }
        Ok(())
    }

    /// Host callback: the raw text of the cell at `index` changed.
    ///
    /// Commits the new value, then issues at most one focus command.
    pub fn on_value_change(&self, raw: &str, index: usize) {
        if let Err(err) = self.check_index(index) {
            tracing::warn!(field = %self.inner.id, error = %err, "value change ignored");
            return;
        }

        let edit = plan_value_change(&self.value(), raw, index, self.inner.cell_count);
        tracing::debug!(
            field = %self.inner.id,
            index,
            kind = ?edit.kind,
            focus = ?edit.focus,
            "otp edit"
        );

        self.inner.value.set(edit.value);
        if let Some(next) = edit.focus {
            self.inner.registry.focus(next);
        }
    }

    /// Host callback: a key was pressed in the cell at `index`.
    pub fn on_key_event(&self, event: &KeyboardEvent, index: usize) {
        if index >= self.inner.cell_count {
            return;
        }
        if let Some(previous) = plan_key_event(&self.value(), event, index) {
            tracing::debug!(field = %self.inner.id, index, focus = previous, "backspace on empty cell");
            self.inner.registry.focus(previous);
        }
    }

    // =========================================================================
    // Paste / autofill
    // =========================================================================

    /// Read `source` and feed its text to the cell at `index`.
    ///
    /// On error the value is left untouched.
    pub fn try_paste(&self, source: &dyn ClipboardSource, index: usize) -> Result<()> {
        self.check_index(index)?;
        let text = source.read_text()?;
        self.paste_text(&text, index)
    }

    /// Feed pasted text to the cell at `index` the way its surface would:
    /// trimmed, validated and cut to `max_length` characters.
    fn paste_text(&self, text: &str, index: usize) -> Result<()> {
        self.check_index(index)?;
        let text = clipboard::validate_payload(text)?;
        let capped: String = text.chars().take(self.max_length()).collect();
        self.on_value_change(&capped, index);
        Ok(())
    }

    /// Best-effort [`OtpField::try_paste`]: failures are logged and dropped.
    pub fn paste_from(&self, source: &dyn ClipboardSource, index: usize) {
        if let Err(err) = self.try_paste(source, index) {
            tracing::warn!(field = %self.inner.id, index, error = %err, "paste failed; OTP value unchanged");
        }
    }

    // =========================================================================
    // Host surface emulation
    // =========================================================================

    /// Route a terminal event to the focused cell, acting as its text surface.
    ///
    /// - Accepted characters produce the raw value `slot + char` (capped at
    ///   `max_length`), so typing over a filled cell keeps the newest digit
    /// - Backspace reports the key, then empties a non-empty cell
    /// - Arrow keys, Home and End move between cells
    /// - Escape asks the focused cell to drop focus
    /// - Ctrl+V pastes from the internal clipboard
    /// - Pastes, bracketed or from the clipboard, are cut to `max_length`
    ///   and delivered to the focused cell in one piece
    ///
    /// Returns true if the event was consumed.
    pub fn route_event(&self, event: &InputEvent) -> bool {
        let Some(index) = self.focused_index() else {
            return false;
        };
        if index >= self.inner.cell_count {
            return false;
        }

        match event {
            InputEvent::Key(key) => self.route_key(key, index),
            InputEvent::Paste(text) => {
                if let Err(err) = self.paste_text(text, index) {
                    tracing::warn!(field = %self.inner.id, index, error = %err, "paste failed; OTP value unchanged");
                }
                true
            }
            InputEvent::None => false,
        }
    }

    fn route_key(&self, event: &KeyboardEvent, index: usize) -> bool {
        if !event.is_press() {
            return false;
        }

        let last = self.inner.cell_count - 1;
        let slot = self.slot(index).unwrap_or_default();

        if event.modifiers.ctrl {
            return match event.key.as_str() {
                "v" | "V" => {
                    self.paste_from(&InternalClipboard, index);
                    true
                }
                _ => false,
            };
        }

        match event.key.as_str() {
            "Backspace" => {
                self.on_key_event(event, index);
                if !slot.is_empty() {
                    self.on_value_change("", index);
                }
                true
            }
            "Escape" => {
                self.blur_cell(index);
                true
            }
            "ArrowLeft" => {
                if index > 0 {
                    self.inner.registry.focus(index - 1);
                }
                true
            }
            "ArrowRight" => {
                if index < last {
                    self.inner.registry.focus(index + 1);
                }
                true
            }
            "Home" => {
                self.inner.registry.focus(0);
                true
            }
            "End" => {
                self.inner.registry.focus(last);
                true
            }
            _ => {
                self.on_key_event(event, index);
                match event.char() {
                    Some(ch) if self.inner.keyboard.accepts(ch) => {
                        let raw: String = slot
                            .chars()
                            .chain(std::iter::once(ch))
                            .take(self.max_length())
                            .collect();
                        self.on_value_change(&raw, index);
                        true
                    }
                    _ => false,
                }
            }
        }
    }

    // =========================================================================
    // Visuals
    // =========================================================================

    /// State flags of the cell at `index`.
    pub fn cell_flags(&self, index: usize) -> CellFlags {
        let mut flags = CellFlags::NONE;
        if self.inner.focus.is_focused(index) {
            flags |= CellFlags::FOCUSED;
        }
        if self.slot(index).is_some_and(|slot| !slot.is_empty()) {
            flags |= CellFlags::FILLED;
        }
        if self.is_complete() {
            flags |= CellFlags::COMPLETE;
        }
        flags
    }

    /// Border color of the cell at `index`.
    ///
    /// Completion color beats focus; focus picks active vs inactive.
    pub fn border_color(&self, index: usize) -> Rgba {
        if self.is_complete() {
            return self.inner.completion_border_color.get();
        }
        let color = if self.inner.focus.is_focused(index) {
            &self.inner.active_border_color
        } else {
            &self.inner.inactive_border_color
        };
        color.as_ref().map(PropValue::get).unwrap_or(Rgba::TERMINAL_DEFAULT)
    }

    /// Reactive border color of the cell at `index`, for binding to a renderer.
    pub fn border_color_prop(&self, index: usize) -> PropValue<Rgba> {
        let field = self.clone();
        PropValue::Getter(Rc::new(move || field.border_color(index)))
    }

    /// Text shown in the cell: the digit, or the placeholder when empty.
    pub fn display_text(&self, index: usize) -> String {
        let slot = self.slot(index).unwrap_or_default();
        if slot.is_empty() {
            if let Some(ref placeholder) = self.inner.placeholder {
                return placeholder.clone();
            }
        }
        slot
    }

    /// Everything needed to draw the cell at `index`.
    ///
    /// Layers, lowest first: `box_style`, base cell style, focus border,
    /// completion color.
    pub fn cell_visual(&self, index: usize) -> CellVisual {
        let flags = self.cell_flags(index);
        let is_placeholder = !flags.contains(CellFlags::FILLED) && self.inner.placeholder.is_some();

        let focus_border = CellStyle {
            border: Some(if flags.contains(CellFlags::FOCUSED) {
                BorderStyle::Bold
            } else {
                BorderStyle::Rounded
            }),
            border_color: Some(self.border_color(index)),
            ..CellStyle::default()
        };

        let mut style = self
            .inner
            .box_style
            .unwrap_or_default()
            .merge(&CellStyle::BASE)
            .merge(&focus_border);

        if is_placeholder {
            let color = match self.inner.placeholder_color {
                Some(ref color) => color.get(),
                None => style.fg.unwrap_or(Rgba::TERMINAL_DEFAULT).dim(0.5),
            };
            style.fg = Some(color);
        }

        CellVisual {
            style,
            flags,
            text: self.display_text(index),
            is_placeholder,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
