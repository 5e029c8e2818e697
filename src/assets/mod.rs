//! Scene import front end
//!
//! - [`source`]: the [`RawScene`] snapshot and the [`SceneSource`] trait
//! - [`loaders`]: file format adapters producing snapshots
//! - [`texture`]: diffuse texture decoding

pub mod loaders;
pub mod source;
pub mod texture;

#[cfg(feature = "gltf")]
pub use loaders::GltfSource;
pub use source::{
    RawAnimation, RawBone, RawChannel, RawFace, RawMaterial, RawMesh, RawNode, RawScene,
    SceneSource, TextureSource, VertexWeight,
};
pub use texture::{DecodedImage, PixelFormat};
