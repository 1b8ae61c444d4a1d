//! low-export library
//!
//! Compiles skeletal animation from glTF assets into `.low` keyframe tracks.
//! The pipeline stages are usable on their own, with any [`SceneAdapter`].

pub mod animation;
pub mod batch;
pub mod config;
pub mod error;
pub mod frames;
pub mod sampler;
pub mod scene;
pub mod skeleton;

// Re-export the file format from low-common
pub use low_common::{read_animation, write_animation, AnimationClip, BoneTrack, FormatError};

pub use animation::{
    compile_animation, convert_gltf_animation, convert_gltf_animation_to_memory, export_animation,
    export_animation_to_memory, ConvertedAnimation, ExportOptions, ExportSummary,
};
pub use batch::{compile_batch, discover_assets, BatchReport, FailurePolicy};
pub use config::ExportConfig;
pub use error::ExportError;
pub use frames::{resolve_frame_count, FrameBoundary, FrameDomain};
pub use scene::{Action, Armature, Bone, BoneId, GltfScene, GltfSceneOptions, MemoryScene, Pose, SceneAdapter};
pub use skeleton::enumerate_bones;
