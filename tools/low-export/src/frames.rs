//! Frame range resolution
//!
//! The sampled domain starts at frame 0 and ends at the largest keyframe
//! boundary of any action. Actions are merged by taking the maximum, never by
//! concatenating their lengths.

use low_common::FormatError;

use crate::error::ExportError;
use crate::scene::Action;

/// Absorbs float error from converting key times to frames (e.g. 59.99997)
const FRAME_EPSILON: f32 = 1e-3;

/// Largest keyframe boundary across all actions, truncated to a whole frame
pub fn resolve_frame_count(actions: &[Action]) -> Result<u32, ExportError> {
    if actions.is_empty() {
        return Err(ExportError::NoActions);
    }

    let last = actions
        .iter()
        .flat_map(|a| [a.start, a.end])
        .filter(|f| f.is_finite())
        .fold(0.0f32, f32::max);

    // Float-to-int casts saturate, so huge boundaries clamp to u32::MAX
    Ok((last + FRAME_EPSILON) as u32)
}

/// Whether the last resolved frame is sampled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FrameBoundary {
    /// Frames `0..last` (the final boundary frame is not sampled)
    #[default]
    Exclusive,
    /// Frames `0..=last`
    Inclusive,
}

/// The frames the sampler visits, in increasing order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDomain {
    count: u32,
}

impl FrameDomain {
    pub fn new(last_frame: u32, boundary: FrameBoundary) -> Result<Self, ExportError> {
        let count = match boundary {
            FrameBoundary::Exclusive => last_frame,
            FrameBoundary::Inclusive => {
                last_frame
                    .checked_add(1)
                    .ok_or(FormatError::FieldOverflow {
                        field: "frame_count",
                        value: last_frame as u64 + 1,
                        max: u32::MAX as u64,
                    })?
            }
        };
        Ok(Self { count })
    }

    /// Number of sampled frames
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn frames(&self) -> impl Iterator<Item = u32> {
        0..self.count
    }
}
