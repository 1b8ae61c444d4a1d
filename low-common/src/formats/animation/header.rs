//! Animation header structure and operations

use super::{ANIMATION_TAG, MATRIX_SIZE, MAX_BONES};

/// Animation file header (6 bytes)
///
/// Note: Not packed - we use explicit byte serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct AnimationHeader {
    /// File type tag (b'A')
    pub tag: u8,
    /// Number of bone tracks (max 254)
    pub bone_count: u8,
    /// Frames per bone track
    pub frame_count: u32,
}

impl AnimationHeader {
    pub const SIZE: usize = 6;

    pub fn new(bone_count: u8, frame_count: u32) -> Self {
        Self {
            tag: ANIMATION_TAG,
            bone_count,
            frame_count,
        }
    }

    /// Write header to bytes
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0] = self.tag;
        bytes[1] = self.bone_count;
        bytes[2..6].copy_from_slice(&self.frame_count.to_be_bytes());
        bytes
    }

    /// Read header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Some(Self {
            tag: bytes[0],
            bone_count: bytes[1],
            frame_count: u32::from_be_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]),
        })
    }

    /// Validate header
    pub fn validate(&self) -> bool {
        self.tag == ANIMATION_TAG && (self.bone_count as usize) <= MAX_BONES
    }

    /// Size of one bone track whose name is `name_len` bytes long
    pub fn track_size(&self, name_len: usize) -> usize {
        name_len + 1 + self.frame_count as usize * MATRIX_SIZE
    }

    /// Total file size given the summed length of all bone names
    pub fn file_size(&self, total_name_len: usize) -> usize {
        Self::SIZE
            + total_name_len
            + self.bone_count as usize * (1 + self.frame_count as usize * MATRIX_SIZE)
    }
}
