//! Skeleton Module
//!
//! The pruned bone hierarchy and everything that operates on it:
//! - [`BoneTable`]: bone names, offset matrices and dense indices
//! - [`SkeletonNode`]: owned joint tree carrying keyframe tracks
//! - [`import_skeleton`] / [`find_node`] / [`attach_channels`]: tree construction
//! - [`evaluate`] / [`BonePose`]: per-frame hierarchical pose evaluation

pub mod bones;
pub mod node;
pub mod pose;
pub mod skeleton;

pub use bones::{BoneInsert, BoneTable};
pub use node::SkeletonNode;
pub use pose::{BonePose, evaluate, local_transform};
pub use skeleton::{attach_channels, find_node, find_node_mut, import_skeleton};
