//! Programmatic GLB generation for integration tests.
//!
//! Generates bone chains: bone 0 is the root and every further bone is a
//! child of the previous one, one segment up along +Y. Each animation is keyed
//! on every frame of its range. Translating animations move the root along +X
//! by one unit per frame; rotating ones turn the root and the first child
//! about +Z.

// Each test binary uses a different subset
#![allow(dead_code)]

mod glb_assembly;

use serde_json::{json, Value};

/// Sample rate the key times are authored at
pub const FRAME_RATE: f32 = 30.0;
/// Rest offset of each child bone from its parent
pub const SEGMENT_HEIGHT: f32 = 1.0;

/// What an animation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Root translation, LINEAR
    Translate,
    /// Root and child rotation, LINEAR
    Rotate,
    /// Root and child rotation, CUBICSPLINE with zero tangents
    RotateCubic,
}

/// One glTF animation keyed from `first_frame` to `last_frame` inclusive
#[derive(Debug, Clone)]
pub struct AnimationSpec {
    pub name: String,
    pub first_frame: u32,
    pub last_frame: u32,
    pub motion: Motion,
}

impl AnimationSpec {
    pub fn new(name: &str, first_frame: u32, last_frame: u32) -> Self {
        Self {
            name: name.to_string(),
            first_frame,
            last_frame,
            motion: Motion::Translate,
        }
    }

    pub fn rotating(name: &str, first_frame: u32, last_frame: u32, motion: Motion) -> Self {
        Self {
            motion,
            ..Self::new(name, first_frame, last_frame)
        }
    }
}

/// Names `bone_000`, `bone_001`, ...
pub fn numbered_bones(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("bone_{:03}", i)).collect()
}

/// Skinned bone chain with the given animations
pub fn chain_glb<S: AsRef<str>>(bone_names: &[S], animations: &[AnimationSpec]) -> Vec<u8> {
    generate(bone_names, true, animations)
}

/// Animated node hierarchy without a skin
pub fn unskinned_glb(animations: &[AnimationSpec]) -> Vec<u8> {
    generate(&["prop"], false, animations)
}

/// Root world translation at `frame`
pub fn root_translation(frame: u32) -> [f32; 3] {
    [frame as f32, 0.0, 0.0]
}

/// Root rotation about +Z at `frame`, in radians
pub fn root_angle(frame: u32) -> f32 {
    frame as f32 * 0.1
}

/// First child's local rotation about +Z at `frame`, in radians
pub fn child_angle(frame: u32) -> f32 {
    frame as f32 * -0.25
}

fn z_rotation(angle: f32) -> [f32; 4] {
    let half = angle * 0.5;
    [0.0, 0.0, half.sin(), half.cos()]
}

fn generate<S: AsRef<str>>(bone_names: &[S], skinned: bool, animations: &[AnimationSpec]) -> Vec<u8> {
    let count = bone_names.len();

    let nodes: Vec<Value> = bone_names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let offset = if i == 0 { 0.0 } else { SEGMENT_HEIGHT };
            let mut node = json!({
                "name": name.as_ref(),
                "translation": [0.0, offset, 0.0],
            });
            if i + 1 < count {
                node["children"] = json!([i + 1]);
            }
            node
        })
        .collect();

    let mut packer = Packer::default();
    let mut gltf_animations = Vec::new();

    for animation in animations {
        let frames: Vec<u32> = (animation.first_frame..=animation.last_frame).collect();
        let times: Vec<f32> = frames.iter().map(|&f| f as f32 / FRAME_RATE).collect();
        let input = packer.push(
            &times,
            "SCALAR",
            Some((
                animation.first_frame as f32 / FRAME_RATE,
                animation.last_frame as f32 / FRAME_RATE,
            )),
        );

        let mut samplers = Vec::new();
        let mut channels = Vec::new();
        match animation.motion {
            Motion::Translate => {
                let values: Vec<f32> = frames.iter().flat_map(|&f| root_translation(f)).collect();
                let output = packer.push(&values, "VEC3", None);
                samplers.push(json!({ "input": input, "output": output, "interpolation": "LINEAR" }));
                channels.push(json!({ "sampler": 0, "target": { "node": 0, "path": "translation" } }));
            }
            Motion::Rotate | Motion::RotateCubic => {
                let cubic = animation.motion == Motion::RotateCubic;
                let angles: [fn(u32) -> f32; 2] = [root_angle, child_angle];
                for (node, angle) in angles.iter().enumerate().take(count) {
                    let values: Vec<f32> = frames
                        .iter()
                        .flat_map(|&f| {
                            let key = z_rotation(angle(f));
                            if cubic {
                                // [in_tangent, value, out_tangent]
                                [[0.0; 4], key, [0.0; 4]].concat()
                            } else {
                                key.to_vec()
                            }
                        })
                        .collect();
                    let output = packer.push(&values, "VEC4", None);
                    let interpolation = if cubic { "CUBICSPLINE" } else { "LINEAR" };
                    samplers.push(json!({ "input": input, "output": output, "interpolation": interpolation }));
                    channels.push(json!({
                        "sampler": samplers.len() - 1,
                        "target": { "node": node, "path": "rotation" },
                    }));
                }
            }
        }

        gltf_animations.push(json!({
            "name": animation.name,
            "samplers": samplers,
            "channels": channels,
        }));
    }

    let mut root = json!({
        "asset": { "version": "2.0", "generator": "low-export tests" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": nodes,
    });
    if skinned {
        root["skins"] = json!([{
            "name": "Armature",
            "joints": (0..count).collect::<Vec<_>>(),
            "skeleton": 0,
        }]);
    }
    if !packer.accessors.is_empty() {
        root["bufferViews"] = Value::Array(packer.views);
        root["accessors"] = Value::Array(packer.accessors);
        root["animations"] = Value::Array(gltf_animations);
    }

    glb_assembly::assemble_glb(&root, &packer.buffer)
}

/// Byte offset of the BIN chunk payload in a GLB built by this module
pub fn bin_chunk_offset(glb: &[u8]) -> usize {
    let json_chunk_length = u32::from_le_bytes(glb[12..16].try_into().unwrap()) as usize;
    12 + 8 + json_chunk_length + 8
}

/// Binary buffer with its views and accessors
#[derive(Default)]
struct Packer {
    buffer: Vec<u8>,
    views: Vec<Value>,
    accessors: Vec<Value>,
}

impl Packer {
    /// Append float data to the buffer and describe it with a view and accessor
    fn push(&mut self, data: &[f32], kind: &str, bounds: Option<(f32, f32)>) -> usize {
        let components = match kind {
            "VEC4" => 4,
            "VEC3" => 3,
            _ => 1,
        };

        let offset = self.buffer.len();
        for value in data {
            self.buffer.extend_from_slice(&value.to_le_bytes());
        }

        self.views.push(json!({
            "buffer": 0,
            "byteOffset": offset,
            "byteLength": data.len() * 4,
        }));

        let mut accessor = json!({
            "bufferView": self.views.len() - 1,
            "componentType": 5126,
            "count": data.len() / components,
            "type": kind,
        });
        if let Some((min, max)) = bounds {
            accessor["min"] = json!([min]);
            accessor["max"] = json!([max]);
        }
        self.accessors.push(accessor);
        self.accessors.len() - 1
    }
}
