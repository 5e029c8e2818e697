//! Skeleton Import
//!
//! Builds the pruned [`SkeletonNode`] tree from the scene hierarchy and
//! attaches the imported clip's keyframe tracks to it.
//!
//! # Pruning
//!
//! A scene node is kept when its name matches a bone of the [`BoneTable`] or
//! when at least one of its descendants is kept. Everything else (cameras,
//! lights, static props, empty helpers) is discarded together with its
//! subtree, so the evaluator only walks nodes that can influence a bone.

use log::{debug, info, warn};

use crate::animation::NodeTracks;
use crate::assets::{RawChannel, RawNode};
use crate::errors::{Result, TendonError};
use crate::scene::bones::BoneTable;
use crate::scene::node::SkeletonNode;
use crate::settings::ChannelPolicy;

/// Builds the skeleton tree below `raw_root`.
///
/// Returns `None` when no node of the scene carries a bone; animation is then
/// a no-op for the model. Otherwise the returned root is always the scene
/// root, even if it carries no bone itself.
#[must_use]
pub fn import_skeleton(raw_root: &RawNode, bones: &BoneTable) -> Option<SkeletonNode> {
    let mut claimed = vec![false; bones.len()];
    let root = import_node(raw_root, bones, &mut claimed);

    match &root {
        Some(root) => info!(
            "Skeleton imported: {} of {} scene nodes kept, {} bones",
            root.node_count(),
            raw_root.node_count(),
            root.bone_count()
        ),
        None => info!("No skeleton found inside the scene"),
    }

    root
}

fn import_node(raw: &RawNode, bones: &BoneTable, claimed: &mut [bool]) -> Option<SkeletonNode> {
    let bone_index = match bones.index_of(&raw.name) {
        Some(index) if claimed[index] => {
            warn!(
                "Bone '{}' is matched by more than one scene node, keeping the first",
                raw.name
            );
            None
        }
        Some(index) => {
            debug!("Node '{}' uses bone {index}", raw.name);
            claimed[index] = true;
            Some(index)
        }
        None => None,
    };

    let mut children = Vec::with_capacity(raw.children.len());
    for raw_child in &raw.children {
        match import_node(raw_child, bones, claimed) {
            Some(child) => children.push(child),
            None => debug!("Discarding node '{}': no bone in subtree", raw_child.name),
        }
    }

    if bone_index.is_none() && children.is_empty() {
        return None;
    }

    Some(SkeletonNode {
        name: raw.name.clone(),
        bone_index,
        children,
        tracks: NodeTracks::default(),
    })
}

/// Depth-first, pre-order search for the node named exactly `name`.
#[must_use]
pub fn find_node<'a>(node: &'a SkeletonNode, name: &str) -> Option<&'a SkeletonNode> {
    if node.name == name {
        return Some(node);
    }
    node.children.iter().find_map(|child| find_node(child, name))
}

/// Mutable variant of [`find_node`].
pub fn find_node_mut<'a>(node: &'a mut SkeletonNode, name: &str) -> Option<&'a mut SkeletonNode> {
    if node.name == name {
        return Some(node);
    }
    node.children
        .iter_mut()
        .find_map(|child| find_node_mut(child, name))
}

/// Attaches each channel's tracks to the node it names.
///
/// Channels without keys are ignored. Channels whose node is not part of the
/// skeleton are handled per `policy`; with [`ChannelPolicy::Skip`] their node
/// names are returned.
pub fn attach_channels(
    mut root: Option<&mut SkeletonNode>,
    channels: &[RawChannel],
    policy: ChannelPolicy,
) -> Result<Vec<String>> {
    let mut unmatched = Vec::new();

    for channel in channels {
        let tracks = NodeTracks::from_raw(channel)?;
        if tracks.is_empty() {
            debug!("Channel for '{}' has no keys", channel.node_name);
            continue;
        }

        let target = root
            .as_deref_mut()
            .and_then(|root| find_node_mut(root, &channel.node_name));

        match target {
            Some(node) => {
                if !node.tracks.is_empty() {
                    warn!(
                        "Node '{}' is animated by more than one channel, keeping the last",
                        channel.node_name
                    );
                }
                node.tracks = tracks;
            }
            None => match policy {
                ChannelPolicy::Error => {
                    return Err(TendonError::UnmatchedChannel {
                        node: channel.node_name.clone(),
                    });
                }
                ChannelPolicy::Skip => {
                    warn!(
                        "Skipping animation channel for '{}': node is not part of the skeleton",
                        channel.node_name
                    );
                    unmatched.push(channel.node_name.clone());
                }
            },
        }
    }

    Ok(unmatched)
}
