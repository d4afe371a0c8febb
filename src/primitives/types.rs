//! Primitive types - Props, styles and cleanup.
//!
//! These types define the interface for the OTP field's props.
//! Props support static values, signals, and getters for reactivity.

use std::rc::Rc;
use spark_signals::{signal, Signal};

use crate::error::{OtpError, Result};
use crate::types::{BorderStyle, CellFlags, KeyboardClass, Rgba};

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned when a cell mounts.
///
/// Call this to unmount the cell and release its handle.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Prop Value - Reactive property wrapper
// =============================================================================

/// A property value that can be static, a signal, or a getter.
///
/// Reading through [`PropValue::get`] inside a derived or effect tracks the
/// underlying signal, so visuals recompute when a color signal changes.
#[derive(Clone)]
pub enum PropValue<T: Clone + PartialEq + 'static> {
    /// Static value (not reactive).
    Static(T),
    /// Reactive signal (changes propagate automatically).
    Signal(Signal<T>),
    /// Getter function (called each time value is needed).
    Getter(Rc<dyn Fn() -> T>),
}

impl<T: Clone + PartialEq + 'static> PropValue<T> {
    /// Get the current value (for immediate reads).
    pub fn get(&self) -> T {
        match self {
            PropValue::Static(v) => v.clone(),
            PropValue::Signal(s) => s.get(),
            PropValue::Getter(f) => f(),
        }
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for PropValue<T> {
    fn default() -> Self {
        PropValue::Static(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> From<T> for PropValue<T> {
    fn from(value: T) -> Self {
        PropValue::Static(value)
    }
}

impl<T: Clone + PartialEq + 'static> From<Signal<T>> for PropValue<T> {
    fn from(signal: Signal<T>) -> Self {
        PropValue::Signal(signal)
    }
}

// =============================================================================
// Cell Style
// =============================================================================

/// Style of one cell. Every field is optional so styles can be layered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStyle {
    /// Digit color.
    pub fg: Option<Rgba>,
    /// Cell background.
    pub bg: Option<Rgba>,
    /// Border drawing style.
    pub border: Option<BorderStyle>,
    /// Border color.
    pub border_color: Option<Rgba>,
    /// Width in terminal cells.
    pub width: Option<u16>,
    /// Height in terminal cells.
    pub height: Option<u16>,
    /// Gap after the cell.
    pub margin_right: Option<u16>,
}

impl CellStyle {
    /// Style every cell starts from before focus and completion are applied.
    pub const BASE: Self = Self {
        fg: None,
        bg: None,
        border: Some(BorderStyle::Rounded),
        border_color: None,
        width: Some(5),
        height: Some(3),
        margin_right: Some(1),
    };

    /// Layer `over` on top of `self`; fields set in `over` win.
    pub fn merge(&self, over: &CellStyle) -> CellStyle {
        CellStyle {
            fg: over.fg.or(self.fg),
            bg: over.bg.or(self.bg),
            border: over.border.or(self.border),
            border_color: over.border_color.or(self.border_color),
            width: over.width.or(self.width),
            height: over.height.or(self.height),
            margin_right: over.margin_right.or(self.margin_right),
        }
    }
}

// =============================================================================
// Cell Visual
// =============================================================================

/// Everything a renderer needs to draw one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellVisual {
    /// Fully layered style.
    pub style: CellStyle,
    /// Focused / filled / complete state.
    pub flags: CellFlags,
    /// Digit, or the placeholder when the cell is empty.
    pub text: String,
    /// Whether `text` is the placeholder.
    pub is_placeholder: bool,
}

// =============================================================================
// OTP Props
// =============================================================================

/// Properties for the OTP field.
///
/// # Example
///
/// ```ignore
/// use spark_otp::primitives::{otp_field, OtpProps};
/// use spark_otp::Rgba;
/// use spark_signals::signal;
///
/// let code = signal(vec![String::new(); 4]);
///
/// let field = otp_field(OtpProps {
///     active_border_color: Some(Rgba::BLUE.into()),
///     inactive_border_color: Some(Rgba::BLACK.into()),
///     ..OtpProps::new(code.clone(), 4)
/// });
///
/// // Later: read the assembled code
/// let digits: String = code.get().concat();
/// ```
pub struct OtpProps {
    // =========================================================================
    // Identity
    // =========================================================================

    /// Optional field ID (shows up in logs).
    pub id: Option<String>,

    // =========================================================================
    // Value (Required)
    // =========================================================================

    /// One slot per cell, seeded with the initial code. Two-way bound: the
    /// field writes every edit here and consumers read the code from it.
    pub value: Signal<Vec<String>>,

    /// Number of cells (N).
    pub number_of_inputs: usize,

    // =========================================================================
    // Input Behavior
    // =========================================================================

    /// Keyboard class offered by each cell (default: numeric).
    pub keyboard: KeyboardClass,

    /// Text shown in an empty cell (default: "0").
    pub placeholder: Option<String>,

    /// Focus the first cell on mount (default: true).
    pub auto_focus: bool,

    // =========================================================================
    // Visual
    // =========================================================================

    /// Border color of the focused cell.
    pub active_border_color: Option<PropValue<Rgba>>,

    /// Border color of unfocused cells.
    pub inactive_border_color: Option<PropValue<Rgba>>,

    /// Border color of every cell once all cells are filled.
    /// Overrides active/inactive colors.
    pub completion_border_color: PropValue<Rgba>,

    /// Placeholder color (default: dimmed digit color).
    pub placeholder_color: Option<PropValue<Rgba>>,

    /// Per-cell style overrides, layered under the field's own styling.
    pub box_style: Option<CellStyle>,
}

impl OtpProps {
    /// Props bound to an existing value signal.
    pub fn new(value: Signal<Vec<String>>, number_of_inputs: usize) -> Self {
        Self {
            id: None,
            value,
            number_of_inputs,
            keyboard: KeyboardClass::Numeric,
            placeholder: Some("0".to_string()),
            auto_focus: true,
            active_border_color: None,
            inactive_border_color: None,
            completion_border_color: PropValue::Static(Rgba::GREEN),
            placeholder_color: None,
            box_style: None,
        }
    }

    /// Props seeded from a plain initial sequence.
    pub fn from_initial(initial_otp: Vec<String>, number_of_inputs: usize) -> Self {
        Self::new(signal(initial_otp), number_of_inputs)
    }

    /// Check that the initial value has exactly one slot per cell.
    ///
    /// `otp_field` does not call this; a mismatch there is only logged.
    pub fn validate(&self) -> Result<()> {
        let found = self.value.get().len();
        if found != self.number_of_inputs {
            return Err(OtpError::CellCountMismatch {
                expected: self.number_of_inputs,
                found,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prop_value_static() {
        let prop: PropValue<Rgba> = Rgba::BLUE.into();
        assert_eq!(prop.get(), Rgba::BLUE);
    }

    #[test]
    fn test_prop_value_signal_follows_updates() {
        let color = signal(Rgba::RED);
        let prop: PropValue<Rgba> = color.clone().into();
        assert_eq!(prop.get(), Rgba::RED);

        color.set(Rgba::GREEN);
        assert_eq!(prop.get(), Rgba::GREEN);
    }

    #[test]
    fn test_prop_value_getter() {
        let prop: PropValue<u16> = PropValue::Getter(Rc::new(|| 7));
        assert_eq!(prop.get(), 7);
        assert_eq!(PropValue::<u16>::default().get(), 0);
    }

    #[test]
    fn test_style_merge_over_wins() {
        let under = CellStyle {
            width: Some(9),
            border_color: Some(Rgba::RED),
            bg: Some(Rgba::BLACK),
            ..CellStyle::default()
        };
        let over = CellStyle {
            border_color: Some(Rgba::BLUE),
            ..CellStyle::default()
        };

        let merged = under.merge(&over);
        assert_eq!(merged.border_color, Some(Rgba::BLUE));
        assert_eq!(merged.width, Some(9));
        assert_eq!(merged.bg, Some(Rgba::BLACK));
        assert_eq!(merged.fg, None);
    }

    #[test]
    fn test_props_defaults() {
        let props = OtpProps::from_initial(vec![String::new(); 4], 4);
        assert_eq!(props.number_of_inputs, 4);
        assert_eq!(props.keyboard, KeyboardClass::Numeric);
        assert_eq!(props.placeholder.as_deref(), Some("0"));
        assert!(props.auto_focus);
        assert_eq!(props.completion_border_color.get(), Rgba::GREEN);
        assert!(props.box_style.is_none());
    }

    #[test]
    fn test_props_validate() {
        assert!(OtpProps::from_initial(vec![String::new(); 6], 6).validate().is_ok());

        let err = OtpProps::from_initial(vec![String::new(); 3], 4)
            .validate()
            .unwrap_err();
        assert_eq!(err, OtpError::CellCountMismatch { expected: 4, found: 3 });
    }
}
