//! Transform sampling
//!
//! Converts per-frame model-space poses into parent-relative matrices:
//!
//! ```text
//! local = world                               (no parent)
//! local = safe_inverse(parent_world) * world  (otherwise)
//! ```

use glam::Mat4;
use low_common::{AnimationClip, BoneTrack, MATRIX_SIZE};

use crate::error::ExportError;
use crate::frames::FrameDomain;
use crate::scene::{Bone, SceneAdapter};

/// Determinant magnitude below which a matrix is treated as singular
const SINGULAR_EPSILON: f32 = 1e-12;

/// Largest matrix payload sampled into memory for one clip (4 GiB)
pub const MAX_CLIP_BYTES: u64 = 1 << 32;

/// Inverse of `m`, or identity when `m` is singular or not finite
pub fn safe_inverse(m: &Mat4) -> Mat4 {
    let det = m.determinant();
    if !det.is_finite() || det.abs() <= SINGULAR_EPSILON {
        return Mat4::IDENTITY;
    }
    let inverse = m.inverse();
    if inverse.is_finite() {
        inverse
    } else {
        Mat4::IDENTITY
    }
}

/// `world` expressed in the space of `parent_world`
pub fn parent_relative(parent_world: &Mat4, world: &Mat4) -> Mat4 {
    safe_inverse(parent_world) * *world
}

/// Allocate one empty track per bone with room for `frame_count` matrices
///
/// Fails with `ClipTooLarge` past [`MAX_CLIP_BYTES`] or when the allocator
/// refuses the reservation.
fn reserve_tracks(bones: &[&Bone], frame_count: usize) -> Result<Vec<BoneTrack>, ExportError> {
    let too_large = || ExportError::ClipTooLarge {
        bones: bones.len(),
        frames: frame_count,
    };

    let bytes = (bones.len() as u64)
        .saturating_mul(frame_count as u64)
        .saturating_mul(MATRIX_SIZE as u64);
    if bytes > MAX_CLIP_BYTES {
        return Err(too_large());
    }

    bones
        .iter()
        .map(|bone| {
            let mut matrices = Vec::new();
            matrices
                .try_reserve_exact(frame_count)
                .map_err(|_| too_large())?;
            Ok(BoneTrack {
                name: bone.name.clone(),
                matrices,
            })
        })
        .collect()
}

/// Sample every bone at every frame of `domain`
///
/// Frames are visited in increasing order; the pose for each frame is
/// evaluated once and shared by all bones.
pub fn sample_tracks<S: SceneAdapter + ?Sized>(
    scene: &S,
    bones: &[&Bone],
    domain: FrameDomain,
) -> Result<AnimationClip, ExportError> {
    let frame_count = domain.count() as usize;
    let mut tracks = reserve_tracks(bones, frame_count)?;

    // Nothing to pose
    if tracks.is_empty() {
        return Ok(AnimationClip::new(frame_count, tracks));
    }

    for frame in domain.frames() {
        let pose = scene.evaluate_pose(frame);
        for (track, bone) in tracks.iter_mut().zip(bones) {
            let world = pose.world(bone.id);
            let local = match bone.parent {
                Some(parent) => parent_relative(&pose.world(parent), &world),
                None => world,
            };
            track.matrices.push(local);
        }
    }

    Ok(AnimationClip::new(frame_count, tracks))
}
