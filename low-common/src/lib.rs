//! Shared types and utilities for compiled `.low` assets
//!
//! This crate provides the binary formats shared between:
//! - `low-export` (asset compiler)
//! - runtimes that load compiled animation tracks
//!
//! # Modules
//!
//! - [`formats`] - binary asset formats (animation tracks)

pub mod formats;

// Re-export commonly used format items
pub use formats::{
    ANIMATION_EXT,
    ANIMATION_TAG,
    // Types
    AnimationClip,
    AnimationHeader,
    BoneTrack,
    FormatError,
    MATRIX_SIZE,
    MAX_BONES,
    NAME_DELIMITER,
    // Encoding
    read_animation,
    write_animation,
};
