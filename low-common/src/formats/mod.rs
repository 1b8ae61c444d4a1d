//! Binary asset formats for compiled `.low` files
//!
//! Every compiled file starts with a single type-tag byte identifying its
//! contents. All multi-byte values are big-endian.

pub mod animation;

pub use animation::*;

/// File extension (without dot) for compiled animation tracks
pub const ANIMATION_EXT: &str = "low";
