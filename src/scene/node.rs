use crate::animation::NodeTracks;

/// A joint of the pruned skeleton hierarchy.
///
/// # Ownership
///
/// Children are owned directly and kept in scene order. Dropping the root
/// releases the whole tree together with every keyframe track.
///
/// # Invariant
///
/// A node survives import only when it carries a bone or has a descendant
/// that does, so every leaf of the tree carries a bone.
#[derive(Debug, Clone)]
pub struct SkeletonNode {
    pub(crate) name: String,
    pub(crate) bone_index: Option<usize>,
    pub(crate) children: Vec<SkeletonNode>,
    /// Keyframe tracks of the imported clip, if it animates this node.
    pub tracks: NodeTracks,
}

impl SkeletonNode {
    #[must_use]
    pub fn new(name: impl Into<String>, bone_index: Option<usize>) -> Self {
        Self {
            name: name.into(),
            bone_index,
            children: Vec::new(),
            tracks: NodeTracks::default(),
        }
    }

    /// Node name, identical to the scene node it was imported from.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index into the model's bone table, `None` for pass-through nodes.
    #[inline]
    #[must_use]
    pub fn bone_index(&self) -> Option<usize> {
        self.bone_index
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[SkeletonNode] {
        &self.children
    }

    pub fn push_child(&mut self, child: SkeletonNode) {
        self.children.push(child);
    }

    #[must_use]
    pub fn with_child(mut self, child: SkeletonNode) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn with_tracks(mut self, tracks: NodeTracks) -> Self {
        self.tracks = tracks;
        self
    }

    /// Number of nodes in this subtree, including `self`.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SkeletonNode::node_count).sum::<usize>()
    }

    /// Number of bone-carrying nodes in this subtree.
    #[must_use]
    pub fn bone_count(&self) -> usize {
        usize::from(self.bone_index.is_some())
            + self.children.iter().map(SkeletonNode::bone_count).sum::<usize>()
    }

    /// Depth-first search by exact name, see [`find_node`](super::find_node).
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&SkeletonNode> {
        super::find_node(self, name)
    }

    /// Visits every node in pre-order.
    pub fn visit(&self, f: &mut impl FnMut(&SkeletonNode)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }
}
