//! Error type for the fallible edges of the OTP field.
//!
//! The edit state machine itself never fails. Errors only come from the
//! clipboard/autofill boundary and from optional configuration checks.

/// Everything that can go wrong around an OTP field.
///
/// `OtpField::paste_from` swallows the paste variants and logs them; they are
/// only surfaced to callers that opt into `OtpField::try_paste`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OtpError {
    /// The clipboard or autofill provider could not be read.
    #[error("Clipboard unavailable: {reason}. The OTP value was left unchanged.")]
    ClipboardUnavailable {
        /// Why the provider failed.
        reason: String,
    },

    /// The clipboard was readable but held nothing.
    #[error("Clipboard is empty. Copy the code before pasting.")]
    ClipboardEmpty,

    /// The pasted payload is not plain characters.
    #[error("Malformed paste payload: {detail}. Only printable characters can be pasted.")]
    MalformedPaste {
        /// What was wrong with the payload.
        detail: String,
    },

    /// The initial value does not have one slot per cell.
    #[error(
        "Initial OTP value has {found} slots but the field has {expected} cells. Pass one (possibly empty) string per cell."
    )]
    CellCountMismatch {
        /// Configured cell count.
        expected: usize,
        /// Length of the initial value.
        found: usize,
    },

    /// A cell index outside `0..cell_count` was used.
    #[error("Cell index {index} is out of range for a field of {cell_count} cells.")]
    CellOutOfRange {
        /// Offending index.
        index: usize,
        /// Configured cell count.
        cell_count: usize,
    },
}

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, OtpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_actionable() {
        let err = OtpError::CellCountMismatch { expected: 4, found: 3 };
        let msg = err.to_string();
        assert!(msg.contains("3 slots"));
        assert!(msg.contains("4 cells"));

        let err = OtpError::ClipboardUnavailable { reason: "no display".into() };
        assert!(err.to_string().contains("no display"));
    }

    #[test]
    fn test_out_of_range_message() {
        let err = OtpError::CellOutOfRange { index: 9, cell_count: 6 };
        assert_eq!(
            err.to_string(),
            "Cell index 9 is out of range for a field of 6 cells."
        );
    }
}
