//! Compiled animation track format (.low, tag 'A')
//!
//! Skeletal animation sampled to one parent-relative matrix per bone per frame.
//! No compression, no checksum; the single tag byte is the only versioning.
//!
//! # Layout
//! ```text
//! Header (6 bytes):
//! 0x00: tag u8              - b'A'
//! 0x01: bone_count u8       - Number of bone tracks (0..=254, 255 reserved)
//! 0x02: frame_count u32 BE  - Frames per bone track
//!
//! Bone tracks (bone_count times, in bone order):
//! name bytes (ASCII) + b'#'
//! frame_count × mat4 (16 × f32 BE, column-major = 64 bytes)
//! ```
//!
//! Track data is stored bone-major: [bone0_frame0, bone0_frame1, ..., bone1_frame0, ...]

mod encoding;
mod error;
mod header;
mod types;

#[cfg(test)]
mod tests;

// Re-export public API
pub use encoding::{decode_matrix, encode_matrix, read_animation, validate_bone_name, write_animation};
pub use error::FormatError;
pub use header::AnimationHeader;
pub use types::{AnimationClip, BoneTrack, ANIMATION_TAG, MATRIX_SIZE, MAX_BONES, NAME_DELIMITER};
