//! Clipboard Module - Best-effort paste/autofill source
//!
//! Reading a clipboard (or an SMS autofill provider) is the one boundary of the
//! OTP field that can fail. Sources implement [`ClipboardSource`]; the field
//! feeds a successful read into the same path as a typed full-code paste and
//! swallows failures.
//!
//! An internal buffer is provided for hosts without a system clipboard and
//! for tests.
//!
//! # Example
//!
//! ```ignore
//! use spark_otp::state::clipboard::{self, InternalClipboard, ClipboardSource};
//!
//! clipboard::copy("4821");
//! assert_eq!(InternalClipboard.read_text().unwrap(), "4821");
//! ```

use std::cell::RefCell;

use crate::error::{OtpError, Result};

// =============================================================================
// Source Trait
// =============================================================================

/// Something that can hand over a pasted or autofilled code.
pub trait ClipboardSource {
    /// Read the current text. Fails when the provider is unavailable or empty.
    fn read_text(&self) -> Result<String>;
}

impl<F: Fn() -> Result<String>> ClipboardSource for F {
    fn read_text(&self) -> Result<String> {
        self()
    }
}

// =============================================================================
// Internal Buffer
// =============================================================================

thread_local! {
    /// Internal clipboard buffer.
    /// Used as fallback when system clipboard is unavailable.
    static CLIPBOARD_BUFFER: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// The thread-local internal buffer as a [`ClipboardSource`].
#[derive(Debug, Clone, Copy, Default)]
pub struct InternalClipboard;

impl ClipboardSource for InternalClipboard {
    fn read_text(&self) -> Result<String> {
        paste().ok_or(OtpError::ClipboardEmpty)
    }
}

/// Copy text to clipboard.
///
/// Empty strings are ignored (clipboard not modified).
pub fn copy(text: &str) {
    if text.is_empty() {
        return;
    }

    CLIPBOARD_BUFFER.with(|buf| {
        *buf.borrow_mut() = Some(text.to_string());
    });
}

/// Paste text from clipboard.
///
/// Returns the most recently copied text, or None if clipboard is empty.
pub fn paste() -> Option<String> {
    CLIPBOARD_BUFFER.with(|buf| buf.borrow().clone())
}

/// Clear the clipboard.
pub fn clear() {
    CLIPBOARD_BUFFER.with(|buf| {
        *buf.borrow_mut() = None;
    });
}

// =============================================================================
// Payload Validation
// =============================================================================

/// Check that a pasted payload is plain text worth handing to the dispatcher.
///
/// Surrounding whitespace (an SMS body's trailing newline) is trimmed off and
/// the remaining text returned. Rejects payloads that are empty after
/// trimming and anything carrying non-whitespace control characters. The
/// keyboard class is not enforced here.
pub fn validate_payload(text: &str) -> Result<&str> {
    let text = text.trim();
    if text.is_empty() {
        return Err(OtpError::ClipboardEmpty);
    }
    if let Some(bad) = text.chars().find(|c| c.is_control() && !c.is_whitespace()) {
        return Err(OtpError::MalformedPaste {
            detail: format!("contains control character U+{:04X}", bad as u32),
        });
    }
    Ok(text)
}

// =============================================================================
// Tests
// =============================================================================
