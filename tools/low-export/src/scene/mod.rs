//! Scene adapters: the armature, actions and per-frame poses the compiler consumes
//!
//! The compiler never holds a "current frame". Poses are requested for an
//! explicit frame through [`SceneAdapter::evaluate_pose`], so adapters are
//! read-only for the whole export.

mod channels;
pub mod gltf;
mod memory;

pub use self::gltf::{GltfScene, GltfSceneOptions, DEFAULT_FRAME_RATE};
pub use memory::MemoryScene;

use glam::Mat4;
use hashbrown::HashSet;

use crate::error::ExportError;

/// Position of a bone in its armature's native order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoneId(pub usize);

/// A bone: name, optional parent, and its slot in pose evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    pub id: BoneId,
    pub name: String,
    pub parent: Option<BoneId>,
}

/// Rooted tree of uniquely named bones
#[derive(Debug, Clone)]
pub struct Armature {
    name: String,
    bones: Vec<Bone>,
}

impl Armature {
    /// Build an armature from `(name, parent index)` pairs in native order.
    ///
    /// Rejects out-of-range or self parents, parent cycles and duplicate names.
    pub fn new<I, S>(name: impl Into<String>, bones: I) -> Result<Self, ExportError>
    where
        I: IntoIterator<Item = (S, Option<usize>)>,
        S: Into<String>,
    {
        let bones: Vec<Bone> = bones
            .into_iter()
            .enumerate()
            .map(|(i, (bone_name, parent))| Bone {
                id: BoneId(i),
                name: bone_name.into(),
                parent: parent.map(BoneId),
            })
            .collect();

        validate_bones(&bones)?;

        Ok(Self {
            name: name.into(),
            bones,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bones in native order
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn bone(&self, id: BoneId) -> Option<&Bone> {
        self.bones.get(id.0)
    }
}

/// Check parent links and name uniqueness
fn validate_bones(bones: &[Bone]) -> Result<(), ExportError> {
    let mut names = HashSet::with_capacity(bones.len());
    for bone in bones {
        if !names.insert(bone.name.as_str()) {
            return Err(ExportError::InvalidArmature(format!(
                "duplicate bone name '{}'",
                bone.name
            )));
        }
        if let Some(parent) = bone.parent {
            if parent.0 >= bones.len() {
                return Err(ExportError::InvalidArmature(format!(
                    "bone '{}' has parent index {} but the armature has {} bones",
                    bone.name,
                    parent.0,
                    bones.len()
                )));
            }
            if parent == bone.id {
                return Err(ExportError::InvalidArmature(format!(
                    "bone '{}' is its own parent",
                    bone.name
                )));
            }
        }
    }

    // Any chain longer than the bone count must revisit a bone
    for bone in bones {
        let mut current = bone.parent;
        let mut steps = 0;
        while let Some(parent) = current {
            steps += 1;
            if steps > bones.len() {
                return Err(ExportError::InvalidArmature(format!(
                    "parent cycle through bone '{}'",
                    bone.name
                )));
            }
            current = bones[parent.0].parent;
        }
    }

    Ok(())
}

/// A named set of keyframes spanning `[start, end]` (in frames)
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub name: String,
    pub start: f32,
    pub end: f32,
}

impl Action {
    pub fn new(name: impl Into<String>, start: f32, end: f32) -> Self {
        Self {
            name: name.into(),
            start,
            end,
        }
    }
}

/// Model-space matrices of every bone at one frame, indexed by [`BoneId`]
#[derive(Debug, Clone, Default)]
pub struct Pose {
    matrices: Vec<Mat4>,
}

impl Pose {
    pub fn new(matrices: Vec<Mat4>) -> Self {
        Self { matrices }
    }

    /// Model-space matrix of `bone` (identity for bones the adapter did not pose)
    pub fn world(&self, bone: BoneId) -> Mat4 {
        self.matrices.get(bone.0).copied().unwrap_or(Mat4::IDENTITY)
    }
}

/// Source of armature, actions and poses for one asset
pub trait SceneAdapter {
    /// The scene's armature, if it has one
    fn armature(&self) -> Option<&Armature>;

    /// All actions attached to the scene
    fn actions(&self) -> &[Action];

    /// Evaluate every bone's model-space matrix at `frame`
    fn evaluate_pose(&self, frame: u32) -> Pose;
}
