//! Errors raised while encoding or decoding animation files

/// Error type for animation encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("Value {value} does not fit the {field} field (max {max})")]
    FieldOverflow {
        field: &'static str,
        value: u64,
        max: u64,
    },

    #[error("Bone count 255 is reserved")]
    ReservedBoneCount,

    #[error("Invalid bone name {name:?}: {reason}")]
    InvalidBoneName { name: String, reason: &'static str },

    #[error("Bone '{bone}' has {actual} frames, expected {expected}")]
    TrackLength {
        bone: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid file type tag {0:#04x}, expected 'A'")]
    InvalidTag(u8),

    #[error("Unexpected end of data at offset {offset} (needed {needed} more bytes)")]
    UnexpectedEof { offset: usize, needed: usize },

    #[error("Unterminated bone name starting at offset {offset}")]
    MissingDelimiter { offset: usize },

    #[error("{0} trailing bytes after the last bone track")]
    TrailingBytes(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
