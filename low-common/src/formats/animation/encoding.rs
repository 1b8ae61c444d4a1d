//! Encoding and decoding functions for animation data

use std::io::Write;

use glam::Mat4;

use super::types::{AnimationClip, BoneTrack, ANIMATION_TAG, MATRIX_SIZE, NAME_DELIMITER};
use super::{AnimationHeader, FormatError};

// ============================================================================
// Matrices
// ============================================================================

/// Encode a matrix as 16 big-endian f32 values in column-major order
///
/// With `M[row][col]` the byte order is
/// `M[0][0], M[1][0], M[2][0], M[3][0], M[0][1], ...`
pub fn encode_matrix(m: &Mat4) -> [u8; MATRIX_SIZE] {
    let mut bytes = [0u8; MATRIX_SIZE];
    for (chunk, value) in bytes.chunks_exact_mut(4).zip(m.to_cols_array()) {
        chunk.copy_from_slice(&value.to_be_bytes());
    }
    bytes
}

/// Decode 64 bytes written by [`encode_matrix`]
pub fn decode_matrix(bytes: &[u8; MATRIX_SIZE]) -> Mat4 {
    let mut cols = [0.0f32; 16];
    for (value, chunk) in cols.iter_mut().zip(bytes.chunks_exact(4)) {
        *value = f32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    Mat4::from_cols_array(&cols)
}

// ============================================================================
// Bone names
// ============================================================================

/// Check that a bone name can be stored as delimiter-terminated ASCII
pub fn validate_bone_name(name: &str) -> Result<(), FormatError> {
    if !name.is_ascii() {
        return Err(FormatError::InvalidBoneName {
            name: name.to_string(),
            reason: "bone names must be ASCII",
        });
    }
    if name.as_bytes().contains(&NAME_DELIMITER) {
        return Err(FormatError::InvalidBoneName {
            name: name.to_string(),
            reason: "bone names must not contain '#'",
        });
    }
    Ok(())
}

// ============================================================================
// Writer
// ============================================================================

/// Write a complete animation file
///
/// The clip is fully validated before the first byte is written, so a
/// rejected clip never leaves a partial header in `w`.
pub fn write_animation<W: Write>(w: &mut W, clip: &AnimationClip) -> Result<(), FormatError> {
    let header = clip.header()?;

    for track in &clip.tracks {
        validate_bone_name(&track.name)?;
        if track.matrices.len() != clip.frame_count {
            return Err(FormatError::TrackLength {
                bone: track.name.clone(),
                expected: clip.frame_count,
                actual: track.matrices.len(),
            });
        }
    }

    w.write_all(&header.to_bytes())?;

    for track in &clip.tracks {
        w.write_all(track.name.as_bytes())?;
        w.write_all(&[NAME_DELIMITER])?;
        for matrix in &track.matrices {
            w.write_all(&encode_matrix(matrix))?;
        }
    }

    Ok(())
}

// ============================================================================
// Reader
// ============================================================================

/// Bounds-checked big-endian cursor over an animation file
struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], FormatError> {
        if self.remaining() < len {
            return Err(FormatError::UnexpectedEof {
                offset: self.offset,
                needed: len - self.remaining(),
            });
        }
        let slice = &self.bytes[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn read_name(&mut self) -> Result<String, FormatError> {
        let start = self.offset;
        let len = self.bytes[start..]
            .iter()
            .position(|&b| b == NAME_DELIMITER)
            .ok_or(FormatError::MissingDelimiter { offset: start })?;
        let raw = self.take(len)?;
        self.offset += 1;

        if !raw.is_ascii() {
            return Err(FormatError::InvalidBoneName {
                name: String::from_utf8_lossy(raw).into_owned(),
                reason: "bone names must be ASCII",
            });
        }
        Ok(raw.iter().map(|&b| b as char).collect())
    }

    fn read_matrix(&mut self) -> Result<Mat4, FormatError> {
        let raw = self.take(MATRIX_SIZE)?;
        let mut bytes = [0u8; MATRIX_SIZE];
        bytes.copy_from_slice(raw);
        Ok(decode_matrix(&bytes))
    }
}

/// Decode a complete animation file
pub fn read_animation(bytes: &[u8]) -> Result<AnimationClip, FormatError> {
    let mut reader = ByteReader::new(bytes);
    let header_bytes = reader.take(AnimationHeader::SIZE)?;
    let header = AnimationHeader::from_bytes(header_bytes).ok_or(FormatError::UnexpectedEof {
        offset: 0,
        needed: AnimationHeader::SIZE,
    })?;

    if !header.validate() {
        return Err(if header.tag != ANIMATION_TAG {
            FormatError::InvalidTag(header.tag)
        } else {
            FormatError::ReservedBoneCount
        });
    }

    let frame_count = header.frame_count as usize;
    let mut tracks = Vec::with_capacity(header.bone_count as usize);

    for _ in 0..header.bone_count {
        let name = reader.read_name()?;
        // Cap the reservation so a corrupt frame count cannot force a huge allocation
        let capacity = frame_count.min(reader.remaining() / MATRIX_SIZE);
        let mut track = BoneTrack {
            name,
            matrices: Vec::with_capacity(capacity),
        };
        for _ in 0..frame_count {
            track.matrices.push(reader.read_matrix()?);
        }
        tracks.push(track);
    }

    if reader.remaining() > 0 {
        return Err(FormatError::TrailingBytes(reader.remaining()));
    }

    Ok(AnimationClip::new(frame_count, tracks))
}
