//! Rendering seam
//!
//! - [`RenderBackend`]: upload and release of mesh and texture resources
//! - [`HeadlessBackend`]: in-memory implementation for tools and tests

pub mod backend;

pub use backend::{
    HeadlessBackend, MeshHandle, MeshRecord, RenderBackend, TextureHandle, TextureRecord,
};
