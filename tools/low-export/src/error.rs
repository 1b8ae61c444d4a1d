//! Error taxonomy for the animation compiler

use std::path::PathBuf;

use low_common::FormatError;

/// Errors raised while compiling one animation asset.
///
/// Every variant is fatal for the asset being processed; the batch driver
/// decides whether the remaining assets still run.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No armature found in scene")]
    MissingArmature,

    #[error("No actions found in scene")]
    NoActions,

    #[error("Armature has {count} bones, must have less than 255")]
    TooManyBones { count: usize },

    #[error("Clip of {bones} bones and {frames} frames is too large to sample")]
    ClipTooLarge { bones: usize, frames: usize },

    #[error("Invalid armature: {0}")]
    InvalidArmature(String),

    #[error("Frame rate must be a positive number, got {0}")]
    InvalidFrameRate(f32),

    #[error("Action '{name}' not found. Available actions: {available:?}")]
    ActionNotFound {
        name: String,
        available: Vec<String>,
    },

    #[error("Failed to load glTF {path:?}")]
    Import {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// True when a fixed-width output field could not hold a value
    pub fn is_field_overflow(&self) -> bool {
        matches!(self, Self::Format(FormatError::FieldOverflow { .. }))
    }
}
