//! Keyboard Module - Key-level events delivered to a cell.
//!
//! A cell reports two kinds of input: value changes (the raw text now in the
//! surface) and raw key presses. This module defines the latter. Key names
//! follow the DOM convention ("a", "Backspace", "ArrowLeft", ...).
//!
//! # Example
//!
//! ```ignore
//! use spark_otp::state::{KeyboardEvent, Modifiers};
//!
//! let event = KeyboardEvent::new("Backspace");
//! assert!(event.is_backspace());
//!
//! let paste = KeyboardEvent::with_modifiers("v", Modifiers::ctrl());
//! assert!(paste.modifiers.ctrl);
//! ```

// =============================================================================
// KEY NAMES
// =============================================================================

/// Key name reported for the backspace key.
pub const BACKSPACE: &str = "Backspace";

// =============================================================================
// TYPES
// =============================================================================

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Create empty modifiers
    pub fn none() -> Self {
        Self::default()
    }

    /// Create modifiers with ctrl
    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    /// Create modifiers with alt
    pub fn alt() -> Self {
        Self { alt: true, ..Self::default() }
    }

    /// Create modifiers with shift
    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }

    /// Any modifier that turns a key into a shortcut rather than text.
    pub fn is_command(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Keyboard event
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// The key that was pressed (e.g., "5", "Backspace", "ArrowLeft")
    pub key: String,
    /// Modifier keys state
    pub modifiers: Modifiers,
    /// Press/repeat/release state
    pub state: KeyState,
}

impl KeyboardEvent {
    /// Create a simple key press event
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
            state: KeyState::Press,
        }
    }

    /// Create a key press with modifiers
    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            state: KeyState::Press,
        }
    }

    /// Check if this is a press (or auto-repeat) rather than a release
    pub fn is_press(&self) -> bool {
        self.state != KeyState::Release
    }

    /// Check if this is the backspace key
    pub fn is_backspace(&self) -> bool {
        self.key == BACKSPACE
    }

    /// The typed character, if the key is a single printable character
    /// without command modifiers.
    pub fn char(&self) -> Option<char> {
        if self.modifiers.is_command() {
            return None;
        }
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if !ch.is_control() => Some(ch),
            _ => None,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_press() {
        let event = KeyboardEvent::new("5");
        assert_eq!(event.state, KeyState::Press);
        assert!(event.is_press());
        assert_eq!(event.modifiers, Modifiers::none());
    }

    #[test]
    fn test_repeat_counts_as_press() {
        let mut event = KeyboardEvent::new(BACKSPACE);
        event.state = KeyState::Repeat;
        assert!(event.is_press());

        event.state = KeyState::Release;
        assert!(!event.is_press());
    }

    #[test]
    fn test_backspace() {
        assert!(KeyboardEvent::new("Backspace").is_backspace());
        assert!(!KeyboardEvent::new("Delete").is_backspace());
        assert!(!KeyboardEvent::new("b").is_backspace());
    }

    #[test]
    fn test_char_extraction() {
        assert_eq!(KeyboardEvent::new("7").char(), Some('7'));
        assert_eq!(KeyboardEvent::new("é").char(), Some('é'));
        assert_eq!(KeyboardEvent::new("Enter").char(), None);
        assert_eq!(KeyboardEvent::new("").char(), None);
        assert_eq!(KeyboardEvent::new("\t").char(), None);
    }

    #[test]
    fn test_char_ignores_shortcuts() {
        assert_eq!(KeyboardEvent::with_modifiers("v", Modifiers::ctrl()).char(), None);
        assert_eq!(KeyboardEvent::with_modifiers("v", Modifiers::alt()).char(), None);
        // Shift still types a character
        assert_eq!(KeyboardEvent::with_modifiers("V", Modifiers::shift()).char(), Some('V'));
    }
}
