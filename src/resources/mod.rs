//! CPU-side mesh resources
//!
//! Data produced once at import time and handed to a render backend:
//! - [`MeshData`]: interleaved skinned vertices plus a flat index list
//! - [`SkinnedVertex`] / [`VertexLayout`]: the vertex format and its attribute locations

pub mod mesh;

pub use mesh::{
    ATTR_JOINTS, ATTR_NORMAL, ATTR_POSITION, ATTR_UV, ATTR_WEIGHTS, AttributeFormat, MeshData,
    SkinnedVertex, SkinningReport, VertexAttribute, VertexLayout,
};
