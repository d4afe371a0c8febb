//! Input Module - Event conversion and polling
//!
//! Bridges crossterm's event system with the OTP field. Key presses become
//! [`KeyboardEvent`]s; bracketed pastes (and terminal autofill, which arrives
//! the same way) become [`InputEvent::Paste`].
//!
//! # API
//!
//! - `convert_key_event` - Convert crossterm KeyEvent to our KeyboardEvent
//! - `convert_event` - Convert any crossterm Event to our InputEvent
//! - `poll_event` - Non-blocking event check with timeout
//! - `read_event` - Blocking event read
//! - `enable_bracketed_paste` / `disable_bracketed_paste` - Control paste capture
//!
//! # Example
//!
//! ```ignore
//! use spark_otp::state::input::{poll_event, enable_bracketed_paste};
//! use std::time::Duration;
//!
//! enable_bracketed_paste()?;
//! loop {
//!     if let Ok(Some(event)) = poll_event(Duration::from_millis(16)) {
//!         field.route_event(&event);
//!     }
//! }
//! ```

use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, Event as CrosstermEvent, KeyCode,
    KeyEvent as CrosstermKeyEvent, KeyEventKind, KeyModifiers, poll, read,
};
use crossterm::execute;
use std::io::stdout;
use std::time::Duration;

use super::keyboard::{KeyState, KeyboardEvent, Modifiers};

// =============================================================================
// INPUT EVENT ENUM
// =============================================================================

/// Unified event type delivered to a field
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Keyboard event (key press, release, etc.)
    Key(KeyboardEvent),
    /// Text pasted or autofilled in one piece
    Paste(String),
    /// No event or unhandled event type
    None,
}

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Convert crossterm KeyEvent to our KeyboardEvent
pub fn convert_key_event(event: CrosstermKeyEvent) -> KeyboardEvent {
    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        _ => String::new(),
    };

    let state = match event.kind {
        KeyEventKind::Press => KeyState::Press,
        KeyEventKind::Repeat => KeyState::Repeat,
        KeyEventKind::Release => KeyState::Release,
    };

    let mut modifiers = convert_modifiers(event.modifiers);
    if event.code == KeyCode::BackTab {
        modifiers.shift = true;
    }

    KeyboardEvent {
        key,
        modifiers,
        state,
    }
}

/// Convert crossterm KeyModifiers to our Modifiers
fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
        meta: mods.contains(KeyModifiers::SUPER) || mods.contains(KeyModifiers::META),
    }
}

/// Convert any crossterm event to our InputEvent
pub fn convert_event(event: CrosstermEvent) -> InputEvent {
    match event {
        CrosstermEvent::Key(key) => InputEvent::Key(convert_key_event(key)),
        CrosstermEvent::Paste(text) => InputEvent::Paste(text),
        _ => InputEvent::None,
    }
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for an event with timeout.
/// Returns None if no event within timeout.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<InputEvent>> {
    if poll(timeout)? {
        Ok(Some(read_event()?))
    } else {
        Ok(None)
    }
}

/// Read the next event (blocking).
pub fn read_event() -> std::io::Result<InputEvent> {
    Ok(convert_event(read()?))
}

// =============================================================================
// PASTE CAPTURE
// =============================================================================

/// Enable bracketed paste so pasted codes arrive as one event.
pub fn enable_bracketed_paste() -> std::io::Result<()> {
    execute!(stdout(), EnableBracketedPaste)
}

/// Disable bracketed paste.
pub fn disable_bracketed_paste() -> std::io::Result<()> {
    execute!(stdout(), DisableBracketedPaste)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> CrosstermKeyEvent {
        CrosstermKeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_convert_key_digit() {
        let event = convert_key_event(key(KeyCode::Char('7'), KeyModifiers::empty()));

        assert_eq!(event.key, "7");
        assert_eq!(event.state, KeyState::Press);
        assert!(!event.modifiers.ctrl);
        assert_eq!(event.char(), Some('7'));
    }

    #[test]
    fn test_convert_key_special() {
        let keys = [
            (KeyCode::Backspace, "Backspace"),
            (KeyCode::Delete, "Delete"),
            (KeyCode::Enter, "Enter"),
            (KeyCode::Tab, "Tab"),
            (KeyCode::Esc, "Escape"),
            (KeyCode::Left, "ArrowLeft"),
            (KeyCode::Right, "ArrowRight"),
            (KeyCode::Home, "Home"),
            (KeyCode::End, "End"),
        ];

        for (code, expected) in keys {
            let event = convert_key_event(key(code, KeyModifiers::empty()));
            assert_eq!(event.key, expected);
        }
    }

    #[test]
    fn test_convert_back_tab() {
        let event = convert_key_event(key(KeyCode::BackTab, KeyModifiers::empty()));
        assert_eq!(event.key, "Tab");
        assert!(event.modifiers.shift);
    }

    #[test]
    fn test_convert_unknown_key() {
        let event = convert_key_event(key(KeyCode::F(5), KeyModifiers::empty()));
        assert_eq!(event.key, "");
        assert_eq!(event.char(), None);
    }

    #[test]
    fn test_convert_key_with_ctrl() {
        let event = convert_key_event(key(KeyCode::Char('v'), KeyModifiers::CONTROL));

        assert_eq!(event.key, "v");
        assert!(event.modifiers.ctrl);
        assert!(!event.modifiers.alt);
        assert_eq!(event.char(), None);
    }

    #[test]
    fn test_convert_key_states() {
        let states = [
            (KeyEventKind::Press, KeyState::Press),
            (KeyEventKind::Repeat, KeyState::Repeat),
            (KeyEventKind::Release, KeyState::Release),
        ];

        for (kind, expected) in states {
            let mut crossterm_event = key(KeyCode::Char('1'), KeyModifiers::empty());
            crossterm_event.kind = kind;
            assert_eq!(convert_key_event(crossterm_event).state, expected);
        }
    }

    #[test]
    fn test_convert_paste_event() {
        let event = convert_event(CrosstermEvent::Paste("482913".to_string()));
        assert_eq!(event, InputEvent::Paste("482913".to_string()));
    }

    #[test]
    fn test_convert_other_events() {
        assert_eq!(convert_event(CrosstermEvent::Resize(80, 24)), InputEvent::None);
        assert_eq!(convert_event(CrosstermEvent::FocusGained), InputEvent::None);
    }

    #[test]
    fn test_convert_key_through_event() {
        let event = convert_event(CrosstermEvent::Key(key(KeyCode::Backspace, KeyModifiers::empty())));
        assert_eq!(event, InputEvent::Key(KeyboardEvent::new("Backspace")));
    }
}
