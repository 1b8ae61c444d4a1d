//! Animation compiler (glTF -> .low)
//!
//! Runs the export pipeline for one asset:
//! bone enumeration -> frame range -> transform sampling -> encoding.

use anyhow::{Context, Result};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use low_common::{write_animation, AnimationClip};
use tempfile::NamedTempFile;

use crate::error::ExportError;
use crate::frames::{resolve_frame_count, FrameBoundary, FrameDomain};
use crate::sampler::sample_tracks;
use crate::scene::{GltfScene, GltfSceneOptions, SceneAdapter};
use crate::skeleton::enumerate_bones;

/// Options for compiling one glTF asset
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub scene: GltfSceneOptions,
    pub boundary: FrameBoundary,
}

/// What an export produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub bone_count: usize,
    pub frame_count: usize,
    /// Encoded file size in bytes
    pub bytes: usize,
}

impl ExportSummary {
    fn of(clip: &AnimationClip) -> Self {
        Self {
            bone_count: clip.bone_count(),
            frame_count: clip.frame_count,
            bytes: clip.encoded_size(),
        }
    }
}

/// Result of in-memory animation conversion
#[derive(Debug, Clone)]
pub struct ConvertedAnimation {
    pub summary: ExportSummary,
    /// Complete encoded file, header included
    pub data: Vec<u8>,
}

/// Sample a scene into an animation clip
pub fn compile_animation<S: SceneAdapter + ?Sized>(
    scene: &S,
    boundary: FrameBoundary,
) -> Result<AnimationClip, ExportError> {
    let armature = scene.armature().ok_or(ExportError::MissingArmature)?;
    let bones = enumerate_bones(armature)?;
    let last_frame = resolve_frame_count(scene.actions())?;
    let domain = FrameDomain::new(last_frame, boundary)?;

    tracing::debug!(
        "Sampling '{}': {} bones, last frame {}, {} frames",
        armature.name(),
        bones.len(),
        last_frame,
        domain.count()
    );

    sample_tracks(scene, &bones, domain)
}

/// Compile a scene and encode it into memory
pub fn export_animation_to_memory<S: SceneAdapter + ?Sized>(
    scene: &S,
    boundary: FrameBoundary,
) -> Result<ConvertedAnimation, ExportError> {
    let clip = compile_animation(scene, boundary)?;
    let mut data = Vec::new();
    data.try_reserve_exact(clip.encoded_size())
        .map_err(|_| ExportError::ClipTooLarge {
            bones: clip.bone_count(),
            frames: clip.frame_count,
        })?;
    write_animation(&mut data, &clip)?;
    Ok(ConvertedAnimation {
        summary: ExportSummary::of(&clip),
        data,
    })
}

/// Compile a scene and write it to `output`
///
/// The file is written to a temporary sibling and moved into place only once
/// fully written; on any error `output` is left untouched.
pub fn export_animation<S: SceneAdapter + ?Sized>(
    scene: &S,
    output: &Path,
    boundary: FrameBoundary,
) -> Result<ExportSummary, ExportError> {
    let clip = compile_animation(scene, boundary)?;
    write_clip_atomic(&clip, output)?;
    Ok(ExportSummary::of(&clip))
}

fn write_clip_atomic(clip: &AnimationClip, output: &Path) -> Result<(), ExportError> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    // Dropping the temp file on an error path deletes it
    let mut file = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(file.as_file_mut());
        write_animation(&mut writer, clip)?;
        writer.flush()?;
    }
    file.persist(output).map_err(|e| e.error)?;
    Ok(())
}

/// Convert a glTF animation to an in-memory .low file
pub fn convert_gltf_animation_to_memory(
    input: &Path,
    options: &ExportOptions,
) -> Result<ConvertedAnimation, ExportError> {
    let scene = GltfScene::load(input, &options.scene)?;
    export_animation_to_memory(&scene, options.boundary)
}

/// Convert a glTF animation to a .low file
pub fn convert_gltf_animation(
    input: &Path,
    output: &Path,
    options: &ExportOptions,
) -> Result<ExportSummary, ExportError> {
    let scene = GltfScene::load(input, &options.scene)?;
    let summary = export_animation(&scene, output, options.boundary)?;

    tracing::info!(
        "Exported animation {:?}: {} bones, {} frames at {} fps ({} bytes)",
        input,
        summary.bone_count,
        summary.frame_count,
        scene.frame_rate(),
        summary.bytes
    );

    Ok(summary)
}

/// List skins, bones and actions in a glTF file
pub fn list_scene(input: &Path, options: &GltfSceneOptions) -> Result<()> {
    let (document, buffers, _images) =
        gltf::import(input).with_context(|| format!("Failed to load glTF: {:?}", input))?;

    let skins: Vec<_> = document.skins().collect();
    if skins.is_empty() {
        tracing::info!("No skins found in {:?}", input);
    } else {
        tracing::info!("Skins in {:?}:", input);
        for (i, skin) in skins.iter().enumerate() {
            tracing::info!(
                "  [{}] '{}': {} joints",
                i,
                skin.name().unwrap_or("unnamed"),
                skin.joints().count()
            );
        }
    }

    let scene = GltfScene::from_document(&document, &buffers, options)?;

    if let Some(armature) = scene.armature() {
        tracing::info!("Bones in '{}':", armature.name());
        for bone in armature.bones() {
            match bone.parent.and_then(|p| armature.bone(p)) {
                Some(parent) => tracing::info!("  [{}] '{}' (parent '{}')", bone.id.0, bone.name, parent.name),
                None => tracing::info!("  [{}] '{}'", bone.id.0, bone.name),
            }
        }
    }

    if scene.actions().is_empty() {
        tracing::info!("No actions found in {:?}", input);
        return Ok(());
    }

    tracing::info!("Actions at {} fps:", scene.frame_rate());
    for (i, action) in scene.actions().iter().enumerate() {
        tracing::info!(
            "  [{}] '{}': frames {:.2} - {:.2}",
            i,
            action.name,
            action.start,
            action.end
        );
    }
    let last_frame = resolve_frame_count(scene.actions())?;
    tracing::info!("Resolved last frame: {}", last_frame);

    Ok(())
}
