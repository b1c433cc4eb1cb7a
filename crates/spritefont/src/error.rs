//! Error types for sprite font building and persistence.

use std::fmt;

/// Errors that can occur while building, encoding or decoding a sprite font.
#[derive(Debug)]
pub enum BuildError {
    /// A character range whose start lies after its end, or an unparsable range item.
    InvalidRange {
        /// The offending input, as written by the caller.
        range: String,
        /// Why the range was rejected.
        reason: String,
    },

    /// A glyph border outside `0..=MAX_GLYPH_BORDER`.
    InvalidBorder {
        /// Which axis the border belongs to ("x" or "y").
        axis: &'static str,
        /// The rejected value.
        value: i32,
    },

    /// A character outside the 16-bit code unit domain, or malformed character input.
    InvalidCharacter {
        /// Description of the rejected input.
        reason: String,
    },

    /// The canvas growth loop exceeded the configured maximum dimension.
    AtlasTooLarge {
        /// The row width that would have been tried next.
        requested: u64,
        /// The configured upper bound.
        max_dimension: u32,
    },

    /// Decoding met an unrecognized format tag, bad magic or truncated buffer.
    CodecMismatch {
        /// Description of the mismatch.
        reason: String,
    },

    /// A contract violation by the caller (negative sizes, empty input, ...).
    InvalidArgument {
        /// Description of the violated contract.
        reason: String,
    },

    /// A measured advance width does not fit the signed 16-bit width field.
    GlyphTooWide {
        /// The character being measured.
        character: u32,
        /// The measured advance.
        width: i32,
    },

    /// The glyph metrics source or rasterizer failed.
    Collaborator {
        /// Description of the failure.
        message: String,
    },

    /// The JSON projection could not be parsed.
    Json(serde_json::Error),

    /// Reading or writing an archive failed.
    Io(std::io::Error),
}

impl BuildError {
    pub(crate) fn mismatch(reason: impl Into<String>) -> Self {
        BuildError::CodecMismatch {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_argument(reason: impl Into<String>) -> Self {
        BuildError::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_character(reason: impl Into<String>) -> Self {
        BuildError::InvalidCharacter {
            reason: reason.into(),
        }
    }

    /// Wrap a failure reported by a metrics source or rasterizer.
    pub fn collaborator(message: impl Into<String>) -> Self {
        BuildError::Collaborator {
            message: message.into(),
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::InvalidRange { range, reason } => {
                write!(f, "Invalid character range '{}': {}", range, reason)
            }
            BuildError::InvalidBorder { axis, value } => write!(
                f,
                "Invalid glyph {} border {}: expected 0..={}",
                axis,
                value,
                crate::MAX_GLYPH_BORDER
            ),
            BuildError::InvalidCharacter { reason } => write!(f, "Invalid character: {}", reason),
            BuildError::AtlasTooLarge {
                requested,
                max_dimension,
            } => write!(
                f,
                "Atlas too large: row width {} exceeds the maximum of {}",
                requested, max_dimension
            ),
            BuildError::CodecMismatch { reason } => write!(f, "Codec mismatch: {}", reason),
            BuildError::InvalidArgument { reason } => write!(f, "Invalid argument: {}", reason),
            BuildError::GlyphTooWide { character, width } => write!(
                f,
                "Glyph U+{:04X} is {} pixels wide, which does not fit a 16-bit width",
                character, width
            ),
            BuildError::Collaborator { message } => write!(f, "Glyph backend failed: {}", message),
            BuildError::Json(err) => write!(f, "JSON error: {}", err),
            BuildError::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Json(err) => Some(err),
            BuildError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BuildError {
    fn from(err: std::io::Error) -> Self {
        BuildError::Io(err)
    }
}

impl From<serde_json::Error> for BuildError {
    fn from(err: serde_json::Error) -> Self {
        BuildError::Json(err)
    }
}

/// Result type for sprite font operations.
pub type BuildResult<T> = Result<T, BuildError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = BuildError::InvalidBorder {
            axis: "x",
            value: 11,
        };
        assert_eq!(err.to_string(), "Invalid glyph x border 11: expected 0..=10");

        let err = BuildError::GlyphTooWide {
            character: 0x41,
            width: 40000,
        };
        assert!(err.to_string().contains("U+0041"));
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error;

        let err: BuildError = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof").into();
        assert!(err.source().is_some());
        assert!(matches!(err, BuildError::Io(_)));
    }
}
