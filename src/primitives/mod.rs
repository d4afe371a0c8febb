//! OTP Primitives - The field and its props.
//!
//! - [`otp_field`] - N single-character cells bound to one value signal
//! - [`OtpProps`] / [`CellStyle`] / [`PropValue`] - Configuration
//!
//! # Reactivity
//!
//! Colors can be:
//! - Static values: `Rgba::BLUE.into()`
//! - Signals: `color_signal.into()` (stays connected!)
//! - Getters: `PropValue::Getter(Rc::new(|| pick_color()))`
//!
//! Pass signals directly - don't extract values before building props:
//!
//! ```ignore
//! // CORRECT - signal stays connected
//! OtpProps { active_border_color: Some(accent.clone().into()), ..props };
//!
//! // WRONG - extracts value, the border never follows `accent`
//! OtpProps { active_border_color: Some(accent.get().into()), ..props };
//! ```

mod types;
mod otp;

pub use types::*;
pub use otp::*;
