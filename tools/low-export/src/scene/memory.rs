//! In-memory scene for programmatic use

use glam::Mat4;

use super::{Action, Armature, BoneId, Pose, SceneAdapter};

/// Scene built directly from matrices instead of an imported asset.
///
/// Each bone holds one model-space matrix per frame. Frames past the end of a
/// bone's track repeat its last matrix; bones without a track stay at identity.
#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    armature: Option<Armature>,
    actions: Vec<Action>,
    tracks: Vec<Vec<Mat4>>,
}

impl MemoryScene {
    pub fn new(armature: Armature) -> Self {
        let tracks = vec![Vec::new(); armature.len()];
        Self {
            armature: Some(armature),
            actions: Vec::new(),
            tracks,
        }
    }

    /// A scene without an armature
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_action(mut self, name: impl Into<String>, start: f32, end: f32) -> Self {
        self.actions.push(Action::new(name, start, end));
        self
    }

    /// Replace a bone's per-frame model-space matrices
    pub fn with_track(mut self, bone: BoneId, matrices: Vec<Mat4>) -> Self {
        self.set_track(bone, matrices);
        self
    }

    pub fn set_track(&mut self, bone: BoneId, matrices: Vec<Mat4>) {
        if bone.0 >= self.tracks.len() {
            self.tracks.resize(bone.0 + 1, Vec::new());
        }
        self.tracks[bone.0] = matrices;
    }
}

impl SceneAdapter for MemoryScene {
    fn armature(&self) -> Option<&Armature> {
        self.armature.as_ref()
    }

    fn actions(&self) -> &[Action] {
        &self.actions
    }

    fn evaluate_pose(&self, frame: u32) -> Pose {
        let bone_count = self.armature.as_ref().map_or(0, Armature::len);
        let matrices = (0..bone_count)
            .map(|i| {
                self.tracks
                    .get(i)
                    .and_then(|track| {
                        let last = track.len().checked_sub(1)?;
                        track.get((frame as usize).min(last)).copied()
                    })
                    .unwrap_or(Mat4::IDENTITY)
            })
            .collect();
        Pose::new(matrices)
    }
}
