//! Render Backend Seam
//!
//! The model never talks to a graphics API directly. Mesh and texture data
//! are handed to a [`RenderBackend`], which returns opaque handles that the
//! model keeps until [`Model::destroy`](crate::Model::destroy).
//!
//! [`HeadlessBackend`] keeps uploads in memory and is used by tools and tests.

use log::{debug, trace};
use slotmap::{SlotMap, new_key_type};

use crate::assets::texture::{DecodedImage, PixelFormat};
use crate::errors::{Result, TendonError};
use crate::resources::MeshData;

new_key_type! {
    /// GPU-side vertex/index buffer pair of one mesh.
    pub struct MeshHandle;
    /// GPU-side texture of one material.
    pub struct TextureHandle;
}

/// Destination for the GPU resources of a model.
pub trait RenderBackend {
    fn upload_mesh(&mut self, mesh: &MeshData) -> Result<MeshHandle>;

    fn upload_texture(&mut self, image: &DecodedImage) -> Result<TextureHandle>;

    /// Releasing an unknown or already released handle is a no-op.
    fn release_mesh(&mut self, handle: MeshHandle);

    fn release_texture(&mut self, handle: TextureHandle);
}

/// What a headless backend remembers about an uploaded mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshRecord {
    pub vertex_count: usize,
    pub index_count: u32,
    pub vertex_bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureRecord {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}

/// In-memory backend without a GPU.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    meshes: SlotMap<MeshHandle, MeshRecord>,
    textures: SlotMap<TextureHandle, TextureRecord>,
    mesh_capacity: Option<usize>,
}

impl HeadlessBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that refuses mesh uploads once `capacity` meshes are live.
    #[must_use]
    pub fn with_mesh_capacity(capacity: usize) -> Self {
        Self {
            mesh_capacity: Some(capacity),
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn live_meshes(&self) -> usize {
        self.meshes.len()
    }

    #[inline]
    #[must_use]
    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    #[must_use]
    pub fn mesh(&self, handle: MeshHandle) -> Option<&MeshRecord> {
        self.meshes.get(handle)
    }

    #[must_use]
    pub fn texture(&self, handle: TextureHandle) -> Option<&TextureRecord> {
        self.textures.get(handle)
    }
}

impl RenderBackend for HeadlessBackend {
    fn upload_mesh(&mut self, mesh: &MeshData) -> Result<MeshHandle> {
        if let Some(capacity) = self.mesh_capacity.filter(|&c| self.meshes.len() >= c) {
            return Err(TendonError::Backend(format!(
                "mesh capacity of {capacity} reached while uploading '{}'",
                mesh.name
            )));
        }

        let handle = self.meshes.insert(MeshRecord {
            vertex_count: mesh.vertices.len(),
            index_count: mesh.index_count(),
            vertex_bytes: mesh.vertex_bytes().len(),
        });
        debug!(
            "Uploaded mesh '{}': {} vertices, {} indices",
            mesh.name,
            mesh.vertices.len(),
            mesh.indices.len()
        );
        Ok(handle)
    }

    fn upload_texture(&mut self, image: &DecodedImage) -> Result<TextureHandle> {
        let expected = image.width as usize * image.height as usize * image.format.channels();
        if image.pixels.len() != expected {
            return Err(TendonError::Backend(format!(
                "texture data is {} bytes, expected {expected}",
                image.pixels.len()
            )));
        }

        Ok(self.textures.insert(TextureRecord {
            width: image.width,
            height: image.height,
            format: image.format,
        }))
    }

    fn release_mesh(&mut self, handle: MeshHandle) {
        if self.meshes.remove(handle).is_none() {
            trace!("Mesh handle {handle:?} was not live");
        }
    }

    fn release_texture(&mut self, handle: TextureHandle) {
        if self.textures.remove(handle).is_none() {
            trace!("Texture handle {handle:?} was not live");
        }
    }
}
