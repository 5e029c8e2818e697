#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Skeletal animation core for a minimal real-time 3D framework.
//!
//! A [`Model`] is built once from a [`RawScene`](assets::RawScene) snapshot:
//! the bone table is collected from the meshes, the scene hierarchy is pruned
//! down to the nodes that matter for skinning, and the first animation clip is
//! attached to that tree as keyframe tracks. Every frame the caller advances an
//! [`AnimationPlayer`] and asks the model for a [`BonePose`], a flat array of
//! bone matrices ready to be uploaded as shader uniforms.
//!
//! ```rust,ignore
//! use tendon::{AnimationPlayer, BonePose, FrameTimer, HeadlessBackend, ImportSettings, Model};
//!
//! let mut backend = HeadlessBackend::new();
//! let mut source = tendon::assets::GltfSource::new("character.gltf");
//! let model = Model::create(&mut source, &mut backend, &ImportSettings::default())?;
//!
//! let mut player = AnimationPlayer::new();
//! let mut pose = BonePose::new(model.bone_count());
//! let mut timer = FrameTimer::new();
//! loop {
//!     let dt = timer.tick();
//!     if let Some(clip) = model.clip() {
//!         player.advance(dt, clip);
//!     }
//!     model.animate(&player, &mut pose);
//!     // upload pose.as_bytes() ...
//! }
//! ```

pub mod animation;
pub mod assets;
pub mod errors;
pub mod model;
pub mod renderer;
pub mod resources;
pub mod scene;
pub mod settings;
pub mod utils;

/// Upper bound on the number of bones a model can carry (size of the bone matrix uniform array).
pub const MAX_BONES: usize = 100;

/// Number of bone influence slots per vertex.
pub const MAX_BONE_INFLUENCE: usize = 4;

pub use animation::{AnimationClip, AnimationPlayer, KeyframeTrack};
pub use errors::{Result, TendonError};
pub use model::{DrawCommand, ImportReport, Model, ModelMesh};
pub use renderer::{HeadlessBackend, MeshHandle, RenderBackend, TextureHandle};
pub use scene::{BonePose, BoneTable, SkeletonNode};
pub use settings::ImportSettings;
pub use utils::{FlyCamera, FrameTimer};
