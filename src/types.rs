//! Core types for spark-otp.
//!
//! Colors, border styles and the small enums/bitflags that describe how a
//! cell should look. None of these carry behavior of the OTP state machine;
//! they are what the field hands to whatever draws it.

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels (0-255).
///
/// Using integers for exact comparison - no floating point epsilon needed.
/// Alpha 255 = fully opaque, 0 = fully transparent.
/// Special value: r=-1 means "terminal default" (let terminal pick).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: i16,
    pub g: i16,
    pub b: i16,
    pub a: i16,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as i16,
            g: g as i16,
            b: b as i16,
            a: a as i16,
        }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Terminal default color (let terminal decide).
    pub const TERMINAL_DEFAULT: Self = Self {
        r: -1,
        g: -1,
        b: -1,
        a: -1,
    };

    // Standard colors
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);

    /// Create an ANSI palette color (0-255).
    ///
    /// Uses special marker: r=-2, g=palette_index.
    pub const fn ansi(index: u8) -> Self {
        Self {
            r: -2,
            g: index as i16,
            b: 0,
            a: 255,
        }
    }

    /// Check if this is the terminal default color.
    #[inline]
    pub const fn is_terminal_default(&self) -> bool {
        self.r == -1
    }

    /// Check if this is an ANSI palette color.
    #[inline]
    pub const fn is_ansi(&self) -> bool {
        self.r == -2
    }

    /// Dim the color by a factor (0.0 = black, 1.0 = unchanged).
    #[inline]
    pub fn dim(self, factor: f32) -> Self {
        if self.is_terminal_default() {
            return Self::GRAY;
        }
        if self.is_ansi() {
            return self; // Can't dim ANSI colors
        }
        Self {
            r: (self.r as f32 * factor).clamp(0.0, 255.0) as i16,
            g: (self.g as f32 * factor).clamp(0.0, 255.0) as i16,
            b: (self.b as f32 * factor).clamp(0.0, 255.0) as i16,
            a: self.a,
        }
    }
}

// =============================================================================
// Border Style
// =============================================================================

/// Border drawing style of a cell.
///
/// Unfocused cells use a thin border, the focused cell a heavy one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum BorderStyle {
    #[default]
    None = 0,
    /// ─ │ ┌ ┐ └ ┘
    Single = 1,
    /// ─ │ ╭ ╮ ╰ ╯
    Rounded = 2,
    /// ━ ┃ ┏ ┓ ┗ ┛
    Bold = 3,
}

impl BorderStyle {
    /// Get the border characters for this style.
    ///
    /// Returns: (horizontal, vertical, top_left, top_right, bottom_right, bottom_left)
    pub const fn chars(&self) -> (&'static str, &'static str, &'static str, &'static str, &'static str, &'static str) {
        match self {
            Self::None => (" ", " ", " ", " ", " ", " "),
            Self::Single => ("─", "│", "┌", "┐", "┘", "└"),
            Self::Rounded => ("─", "│", "╭", "╮", "╯", "╰"),
            Self::Bold => ("━", "┃", "┏", "┓", "┛", "┗"),
        }
    }

    /// Border width in cells (0 or 1).
    pub const fn width(&self) -> u16 {
        match self {
            Self::None => 0,
            _ => 1,
        }
    }
}

// =============================================================================
// Cell State Flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Per-cell visual state as a bitfield.
    ///
    /// `COMPLETE` is set on every cell at once, when the whole code is filled.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CellFlags: u8 {
        const NONE = 0;
        const FOCUSED = 1 << 0;
        const FILLED = 1 << 1;
        const COMPLETE = 1 << 2;
    }
}

// =============================================================================
// Keyboard Class
// =============================================================================

/// Which characters the host input surface offers for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyboardClass {
    /// ASCII digits only.
    #[default]
    Numeric,
    /// ASCII letters and digits.
    AlphaNumeric,
}

impl KeyboardClass {
    /// Whether a typed character belongs to this keyboard class.
    pub fn accepts(&self, ch: char) -> bool {
        match self {
            Self::Numeric => ch.is_ascii_digit(),
            Self::AlphaNumeric => ch.is_ascii_alphanumeric(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
