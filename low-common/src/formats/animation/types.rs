//! Animation data types

use glam::Mat4;

use super::{AnimationHeader, FormatError};

/// Type tag written as the first byte of every animation file
pub const ANIMATION_TAG: u8 = b'A';

/// Byte terminating each bone name
pub const NAME_DELIMITER: u8 = b'#';

/// Maximum number of bone tracks (255 is reserved as invalid)
pub const MAX_BONES: usize = 254;

/// Size of one encoded matrix (16 × f32)
pub const MATRIX_SIZE: usize = 64;

/// One bone's sampled matrices, one per frame
#[derive(Debug, Clone, PartialEq)]
pub struct BoneTrack {
    pub name: String,
    /// Parent-relative transform per frame (model space for root bones)
    pub matrices: Vec<Mat4>,
}

impl BoneTrack {
    /// Encoded size of this track in bytes
    pub fn encoded_size(&self) -> usize {
        self.name.len() + 1 + self.matrices.len() * MATRIX_SIZE
    }
}

/// A sampled animation: every track holds exactly `frame_count` matrices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationClip {
    pub frame_count: usize,
    pub tracks: Vec<BoneTrack>,
}

impl AnimationClip {
    pub fn new(frame_count: usize, tracks: Vec<BoneTrack>) -> Self {
        Self {
            frame_count,
            tracks,
        }
    }

    pub fn bone_count(&self) -> usize {
        self.tracks.len()
    }

    /// Build the file header, checking that counts fit their fixed-width fields
    pub fn header(&self) -> Result<AnimationHeader, FormatError> {
        let bone_count =
            u8::try_from(self.tracks.len()).map_err(|_| FormatError::FieldOverflow {
                field: "bone_count",
                value: self.tracks.len() as u64,
                max: u8::MAX as u64,
            })?;
        if bone_count as usize > MAX_BONES {
            return Err(FormatError::ReservedBoneCount);
        }

        let frame_count =
            u32::try_from(self.frame_count).map_err(|_| FormatError::FieldOverflow {
                field: "frame_count",
                value: self.frame_count as u64,
                max: u32::MAX as u64,
            })?;

        Ok(AnimationHeader::new(bone_count, frame_count))
    }

    /// Total encoded file size in bytes
    pub fn encoded_size(&self) -> usize {
        AnimationHeader::SIZE
            + self
                .tracks
                .iter()
                .map(BoneTrack::encoded_size)
                .sum::<usize>()
    }

    /// Find a track by bone name
    pub fn track(&self, name: &str) -> Option<&BoneTrack> {
        self.tracks.iter().find(|t| t.name == name)
    }
}
