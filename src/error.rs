use thiserror::Error;

/// Errors reported by the value-marshaling layer.
///
/// Every failure is reported synchronously to the immediate caller; nothing
/// is retried or silently coerced at this level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarshalError {
    /// The requested logical type has no codec for the given direction
    /// and/or wire format.
    #[error("conversion to {type_name} is not supported")]
    UnsupportedConversion { type_name: &'static str },

    /// A binary-only decoder was invoked with a text-format buffer.
    #[error("{type_name} decoding requires binary format")]
    BinaryFormatRequired { type_name: &'static str },

    /// The declared array dimension count differs from the statically
    /// expected one.
    #[error("array dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: i32 },

    /// A fixed-width type was handed a buffer of the wrong size.
    #[error("invalid length for {type_name}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        type_name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A declared element or field length would read past the supplied
    /// buffer.
    #[error("unexpected end of buffer: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    /// A container index was out of range.
    #[error("index {index} out of bounds for parameter list of size {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// The buffer had the right shape but its contents could not be
    /// interpreted as a value of the target type.
    #[error("invalid {type_name} value: {reason}")]
    InvalidValue {
        type_name: &'static str,
        reason: String,
    },
}

impl MarshalError {
    pub(crate) fn invalid(type_name: &'static str, reason: impl Into<String>) -> Self {
        MarshalError::InvalidValue {
            type_name,
            reason: reason.into(),
        }
    }
}
