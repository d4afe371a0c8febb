//! State Module - Runtime state around a field
//!
//! - **Focus** - Focused cell signal, focus callbacks
//! - **Keyboard** - Key-level event types
//! - **Clipboard** - Paste/autofill sources, internal buffer
//! - **Input** - crossterm event conversion, bracketed paste

pub mod clipboard;
mod focus;
pub mod input;
mod keyboard;

pub use clipboard::{ClipboardSource, InternalClipboard};
pub use focus::*;
pub use input::InputEvent;
pub use keyboard::*;
