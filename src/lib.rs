//! # spark-otp
//!
//! Reactive multi-cell one-time-code entry for terminal UIs.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for fine-grained reactivity.
//!
//! ## Architecture
//!
//! A field is N single-character cells addressed by index. The value lives in
//! one `Signal<Vec<String>>`; completion is a derived of it. Hosts forward each
//! cell's raw text changes and key presses, and the field answers with a new
//! value plus at most one "focus this cell" command:
//!
//! ```text
//! host surface ─ raw text / key ─→ edit dispatcher ─→ value signal ─→ completion derived
//!                                         │
//!                                         └─ focus command ─→ cell registry ─→ host surface
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Colors, border styles, cell flags, keyboard class
//! - [`error`] - `OtpError` and the crate `Result`
//! - [`engine`] - Cell registry (index → focus handle)
//! - [`primitives`] - `otp_field`, props and per-cell visuals
//! - [`state`] - Focus tracking, key events, clipboard, crossterm input

pub mod engine;
pub mod error;
pub mod primitives;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{OtpError, Result};

pub use engine::{CellHandle, CellRegistry};

pub use primitives::{
    is_filled, otp_field, plan_key_event, plan_value_change, CellStyle, CellVisual, Cleanup,
    Edit, EditKind, OtpField, OtpProps, PropValue,
};

pub use state::{
    // Focus
    FocusCallbacks, FocusState,
    // Keyboard
    KeyboardEvent, KeyState, Modifiers,
    // Clipboard / input
    ClipboardSource, InternalClipboard, InputEvent,
};
