//! glTF scene adapter
//!
//! A skin is the armature and its joints are the bones, in the skin's joint
//! order. Every glTF animation is an action; the active one (first, or chosen
//! by name) drives the pose. Joints without a channel keep their rest TRS.

use std::path::Path;

use gltf::animation::util::ReadOutputs;
use glam::{Mat4, Quat, Vec3};
use hashbrown::HashMap;

use super::channels::{Keyframes, Interpolation};
use super::{Action, Armature, Pose, SceneAdapter};
use crate::error::ExportError;

/// Default sample rate for animations (frames per second)
pub const DEFAULT_FRAME_RATE: f32 = 30.0;

/// Selection and sampling options for a glTF scene
#[derive(Debug, Clone)]
pub struct GltfSceneOptions {
    /// Frames per second used to convert key times to frames
    pub frame_rate: f32,
    /// Skin to use as the armature (first skin if None)
    pub skin_name: Option<String>,
    /// Animation that drives the pose (first animation if None)
    pub action_name: Option<String>,
}

impl Default for GltfSceneOptions {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            skin_name: None,
            action_name: None,
        }
    }
}

/// Node TRS
#[derive(Debug, Clone, Copy)]
struct NodeTransform {
    translation: Vec3,
    rotation: Quat,
    scale: Vec3,
}

impl NodeTransform {
    fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

#[derive(Debug, Clone)]
enum ChannelKeys {
    Translation(Keyframes<Vec3>),
    Rotation(Keyframes<Quat>),
    Scale(Keyframes<Vec3>),
}

/// One animated property of one node
#[derive(Debug, Clone)]
struct NodeChannel {
    node: usize,
    keys: ChannelKeys,
}

impl NodeChannel {
    fn apply(&self, time: f32, transform: &mut NodeTransform) {
        match &self.keys {
            ChannelKeys::Translation(keys) => transform.translation = keys.sample(time),
            ChannelKeys::Rotation(keys) => transform.rotation = keys.sample(time),
            ChannelKeys::Scale(keys) => transform.scale = keys.sample(time),
        }
    }
}

/// Scene imported from a glTF/GLB file
#[derive(Debug, Clone)]
pub struct GltfScene {
    armature: Option<Armature>,
    actions: Vec<Action>,
    frame_rate: f32,
    /// Rest TRS per node
    rest: Vec<NodeTransform>,
    parents: Vec<Option<usize>>,
    /// Node indices, parents before children
    order: Vec<usize>,
    /// Parent of the skin's skeleton root; model space starts below it
    space_root: Option<usize>,
    /// Node index per bone
    joints: Vec<usize>,
    /// Channels of the active action
    channels: Vec<NodeChannel>,
}

impl GltfScene {
    /// Import a glTF/GLB file
    pub fn load(path: &Path, options: &GltfSceneOptions) -> Result<Self, ExportError> {
        let (document, buffers, _images) =
            gltf::import(path).map_err(|source| ExportError::Import {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_document(&document, &buffers, options)
    }

    /// Build a scene from an already imported document
    pub fn from_document(
        document: &gltf::Document,
        buffers: &[gltf::buffer::Data],
        options: &GltfSceneOptions,
    ) -> Result<Self, ExportError> {
        if !(options.frame_rate.is_finite() && options.frame_rate > 0.0) {
            return Err(ExportError::InvalidFrameRate(options.frame_rate));
        }

        let node_count = document.nodes().count();
        let mut parents = vec![None; node_count];
        let mut children = vec![Vec::new(); node_count];
        let mut rest = Vec::with_capacity(node_count);
        for node in document.nodes() {
            for child in node.children() {
                parents[child.index()] = Some(node.index());
                children[node.index()].push(child.index());
            }
            let (t, r, s) = node.transform().decomposed();
            rest.push(NodeTransform {
                translation: Vec3::from(t),
                rotation: Quat::from_array(r),
                scale: Vec3::from(s),
            });
        }
        let order = topological_order(&parents, &children);

        // Armature
        let skin = match options.skin_name.as_deref() {
            Some(name) => document.skins().find(|s| s.name() == Some(name)),
            None => {
                let skin_count = document.skins().count();
                if skin_count > 1 {
                    tracing::warn!("{} skins found, using the first one", skin_count);
                }
                document.skins().next()
            }
        };

        let (armature, joints, space_root) = match skin {
            Some(skin) => {
                let joints: Vec<usize> = skin.joints().map(|j| j.index()).collect();
                let joint_map: HashMap<usize, usize> =
                    joints.iter().enumerate().map(|(i, &node)| (node, i)).collect();

                let bones = skin.joints().map(|joint| {
                    let name = joint
                        .name()
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("joint_{}", joint.index()));
                    (name, parent_joint(joint.index(), &parents, &joint_map))
                });
                let armature = Armature::new(skin.name().unwrap_or("armature"), bones)?;
                let space_root = skin.skeleton().and_then(|root| parents[root.index()]);
                (Some(armature), joints, space_root)
            }
            None => (None, Vec::new(), None),
        };

        // Actions
        let mut actions = Vec::new();
        let mut active = None;
        for (i, animation) in document.animations().enumerate() {
            let name = animation
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("animation_{}", i));
            let channels = read_channels(&animation, buffers);

            let (start, end) = channels
                .iter()
                .map(|c| match &c.keys {
                    ChannelKeys::Translation(k) | ChannelKeys::Scale(k) => k.time_range(),
                    ChannelKeys::Rotation(k) => k.time_range(),
                })
                .reduce(|(s0, e0), (s1, e1)| (s0.min(s1), e0.max(e1)))
                .unwrap_or((0.0, 0.0));

            let is_active = match options.action_name.as_deref() {
                Some(wanted) => wanted == name,
                None => i == 0,
            };
            if is_active && active.is_none() {
                active = Some(channels);
            }

            actions.push(Action::new(
                name,
                start * options.frame_rate,
                end * options.frame_rate,
            ));
        }

        if let (Some(wanted), None) = (options.action_name.as_deref(), active.as_ref()) {
            return Err(ExportError::ActionNotFound {
                name: wanted.to_string(),
                available: actions.iter().map(|a| a.name.clone()).collect(),
            });
        }

        Ok(Self {
            armature,
            actions,
            frame_rate: options.frame_rate,
            rest,
            parents,
            order,
            space_root,
            joints,
            channels: active.unwrap_or_default(),
        })
    }

    pub fn frame_rate(&self) -> f32 {
        self.frame_rate
    }
}

impl SceneAdapter for GltfScene {
    fn armature(&self) -> Option<&Armature> {
        self.armature.as_ref()
    }

    fn actions(&self) -> &[Action] {
        &self.actions
    }

    fn evaluate_pose(&self, frame: u32) -> Pose {
        let time = frame as f32 / self.frame_rate;

        let mut locals = self.rest.clone();
        for channel in &self.channels {
            if let Some(transform) = locals.get_mut(channel.node) {
                channel.apply(time, transform);
            }
        }

        let mut world = vec![Mat4::IDENTITY; locals.len()];
        for &node in &self.order {
            let local = locals[node].matrix();
            world[node] = match self.parents[node] {
                Some(parent) if Some(parent) != self.space_root => world[parent] * local,
                _ => local,
            };
        }

        Pose::new(self.joints.iter().map(|&node| world[node]).collect())
    }
}

/// Nearest ancestor of `node` that is a joint of the skin
fn parent_joint(
    node: usize,
    parents: &[Option<usize>],
    joint_map: &HashMap<usize, usize>,
) -> Option<usize> {
    let mut current = parents[node];
    let mut steps = 0;
    while let Some(ancestor) = current {
        if let Some(&bone) = joint_map.get(&ancestor) {
            return Some(bone);
        }
        steps += 1;
        if steps > parents.len() {
            break;
        }
        current = parents[ancestor];
    }
    None
}

/// Depth-first order from the roots; nodes caught in a cycle are left out
fn topological_order(parents: &[Option<usize>], children: &[Vec<usize>]) -> Vec<usize> {
    let mut order = Vec::with_capacity(parents.len());
    let mut visited = vec![false; parents.len()];
    let mut stack: Vec<usize> = (0..parents.len())
        .filter(|&i| parents[i].is_none())
        .rev()
        .collect();

    while let Some(node) = stack.pop() {
        if visited[node] {
            continue;
        }
        visited[node] = true;
        order.push(node);
        stack.extend(children[node].iter().rev());
    }
    order
}

/// Read the TRS channels of an animation, skipping malformed ones
fn read_channels(
    animation: &gltf::Animation,
    buffers: &[gltf::buffer::Data],
) -> Vec<NodeChannel> {
    let mut channels = Vec::new();

    for channel in animation.channels() {
        let node = channel.target().node().index();
        let interpolation = Interpolation::from(channel.sampler().interpolation());
        let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(|data| &data[..]));

        let Some(times) = reader.read_inputs().map(|i| i.collect::<Vec<f32>>()) else {
            tracing::warn!("Channel on node {} has no keyframe times, skipping", node);
            continue;
        };

        let keys = match reader.read_outputs() {
            Some(ReadOutputs::Translations(values)) => {
                Keyframes::new(times, values.map(Vec3::from).collect(), interpolation)
                    .map(ChannelKeys::Translation)
            }
            Some(ReadOutputs::Rotations(values)) => Keyframes::new(
                times,
                values.into_f32().map(Quat::from_array).collect(),
                interpolation,
            )
            .map(ChannelKeys::Rotation),
            Some(ReadOutputs::Scales(values)) => {
                Keyframes::new(times, values.map(Vec3::from).collect(), interpolation)
                    .map(ChannelKeys::Scale)
            }
            // Morph target weights do not affect bones
            Some(ReadOutputs::MorphTargetWeights(_)) => continue,
            None => None,
        };

        match keys {
            Some(keys) => channels.push(NodeChannel { node, keys }),
            None => tracing::warn!(
                "Channel on node {} has malformed keyframe data, skipping",
                node
            ),
        }
    }

    channels
}
