//! Scene Snapshot
//!
//! The read-only data an external scene importer hands to the core: node
//! hierarchy, meshes with per-bone vertex weights, materials and animation
//! channels. The core never parses a file format itself; it consumes a
//! [`RawScene`] produced by a [`SceneSource`].

use std::path::PathBuf;

use glam::{Mat4, Quat, Vec2, Vec3};
use smallvec::SmallVec;

use crate::errors::Result;

/// One node of the imported scene graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawNode {
    pub name: String,
    pub children: Vec<RawNode>,
}

impl RawNode {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_children(name: impl Into<String>, children: Vec<RawNode>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    /// Number of nodes in this subtree, including `self`.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(RawNode::node_count).sum::<usize>()
    }
}

/// Influence of a bone on one vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexWeight {
    pub vertex: u32,
    pub weight: f32,
}

/// A bone as listed by one mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBone {
    pub name: String,
    /// Mesh space to bone space at the rest pose.
    pub offset: Mat4,
    pub weights: Vec<VertexWeight>,
}

/// A face as an index list; triangles are the common case.
pub type RawFace = SmallVec<[u32; 4]>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMesh {
    pub name: String,
    pub positions: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    pub tex_coords: Option<Vec<Vec2>>,
    pub faces: Vec<RawFace>,
    pub bones: Vec<RawBone>,
    pub material_index: usize,
}

/// Where a texture's encoded bytes live.
#[derive(Debug, Clone, PartialEq)]
pub enum TextureSource {
    /// A file path, relative to the scene's base directory when not absolute.
    File(PathBuf),
    /// Encoded image bytes embedded in the scene.
    Memory { label: String, bytes: Vec<u8> },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMaterial {
    pub name: String,
    pub diffuse: Option<TextureSource>,
}

/// Keys of one animated node, in clip ticks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawChannel {
    pub node_name: String,
    pub position_keys: Vec<(f32, Vec3)>,
    pub rotation_keys: Vec<(f32, Quat)>,
    pub scale_keys: Vec<(f32, Vec3)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawAnimation {
    pub name: String,
    /// Length in ticks.
    pub duration: f32,
    /// Zero when the source format does not say.
    pub ticks_per_second: f32,
    pub channels: Vec<RawChannel>,
}

/// Everything the importer produced for one scene file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawScene {
    pub root: RawNode,
    pub meshes: Vec<RawMesh>,
    pub materials: Vec<RawMaterial>,
    pub animations: Vec<RawAnimation>,
    /// Set by importers that could not read the whole file.
    pub incomplete: bool,
    /// Directory relative texture paths are resolved against.
    pub base_dir: Option<PathBuf>,
}

/// Produces a scene snapshot for [`Model::create`](crate::Model::create).
pub trait SceneSource {
    fn load_scene(&mut self) -> Result<RawScene>;
}

impl SceneSource for RawScene {
    fn load_scene(&mut self) -> Result<RawScene> {
        Ok(self.clone())
    }
}
