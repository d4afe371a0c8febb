//! OTP Engine - Cell registry.
//!
//! A field is not one object but N cells addressed by index:
//!
//! ```text
//! Index 0: handle → host surface 0   value[0] = "5"
//! Index 1: handle → host surface 1   value[1] = ""
//! Index 2: (not mounted yet)         value[2] = ""
//! ```
//!
//! The registry maps an index to the handle used to move keyboard focus there.
//! The value itself lives in a signal owned by the field.

mod registry;

pub use registry::*;
