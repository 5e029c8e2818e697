use glam::Mat4;
use log::trace;

use crate::MAX_BONES;
use crate::scene::node::SkeletonNode;

/// Per-frame bone matrices, indexed by bone index.
///
/// One buffer is owned by the frame loop and overwritten in place every
/// frame. Data flow: evaluator writes here -> rendering layer uploads
/// [`as_bytes`](Self::as_bytes) as the bone matrix uniform array.
#[derive(Debug, Clone)]
pub struct BonePose {
    matrices: Vec<Mat4>,
}

impl BonePose {
    /// Creates a pose of `bone_count` identity matrices (capped at [`MAX_BONES`]).
    #[must_use]
    pub fn new(bone_count: usize) -> Self {
        Self {
            matrices: vec![Mat4::IDENTITY; bone_count.min(MAX_BONES)],
        }
    }

    #[inline]
    #[must_use]
    pub fn matrices(&self) -> &[Mat4] {
        &self.matrices
    }

    #[inline]
    pub fn matrices_mut(&mut self) -> &mut [Mat4] {
        &mut self.matrices
    }

    #[inline]
    #[must_use]
    pub fn get(&self, bone_index: usize) -> Option<&Mat4> {
        self.matrices.get(bone_index)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    /// Column-major `f32` bytes, laid out as `mat4x4<f32>[len]`.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.matrices)
    }

    /// Puts every matrix back to identity.
    pub fn reset(&mut self) {
        self.matrices.fill(Mat4::IDENTITY);
    }
}

/// Animated local transform of `node` at `anim_time`.
///
/// Translation then rotation; channels the node lacks contribute identity.
/// Scale keys are stored on the node but not composed.
#[must_use]
pub fn local_transform(node: &SkeletonNode, anim_time: f32) -> Mat4 {
    let translation = node
        .tracks
        .position
        .as_ref()
        .map_or(Mat4::IDENTITY, |track| Mat4::from_translation(track.sample(anim_time)));

    let rotation = node
        .tracks
        .rotation
        .as_ref()
        .map_or(Mat4::IDENTITY, |track| Mat4::from_quat(track.sample(anim_time)));

    translation * rotation
}

/// Walks the skeleton below `node`, writing one matrix per bone into `out`.
///
/// For every node `world = parent * local`; a bone-carrying node stores
/// `world * offsets[bone]`. Children receive `world` as their parent. Time
/// is used as given; wrapping is the caller's job.
pub fn evaluate(
    node: &SkeletonNode,
    anim_time: f32,
    parent: Mat4,
    offsets: &[Mat4],
    out: &mut [Mat4],
) {
    let world = parent * local_transform(node, anim_time);

    if let Some(bone) = node.bone_index {
        match (offsets.get(bone), out.get_mut(bone)) {
            (Some(offset), Some(slot)) => *slot = world * *offset,
            _ => trace!("Bone {bone} of node '{}' has no output slot", node.name),
        }
    }

    for child in &node.children {
        evaluate(child, anim_time, world, offsets, out);
    }
}
