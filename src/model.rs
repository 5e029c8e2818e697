//! Model
//!
//! A [`Model`] owns everything imported from one scene: the skinned meshes and
//! their GPU handles, one optional diffuse texture per material, the bone
//! table, the pruned skeleton and the first animation clip.
//!
//! # Lifecycle
//!
//! 1. [`Model::create`] loads a snapshot from a [`SceneSource`], builds vertex
//!    data and uploads it through a [`RenderBackend`]. On failure every
//!    resource already uploaded is released again and no model is returned.
//! 2. Each frame, [`Model::animate`] (or [`Model::evaluate`]) fills a
//!    caller-owned [`BonePose`], and [`Model::draw_commands`] lists what to draw.
//! 3. [`Model::destroy`] hands the GPU resources back to the backend.

use glam::Mat4;
use log::{debug, info, warn};

use crate::animation::{AnimationClip, AnimationPlayer};
use crate::assets::texture;
use crate::assets::{RawAnimation, RawScene, SceneSource};
use crate::errors::{Result, TendonError};
use crate::renderer::{MeshHandle, RenderBackend, TextureHandle};
use crate::resources::MeshData;
use crate::scene::{self, BonePose, BoneTable, SkeletonNode, attach_channels, import_skeleton};
use crate::settings::ImportSettings;

/// Inconsistencies the import tolerated under the active settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Bone names listed again by a later mesh; the first offset was kept.
    pub duplicate_bones: Vec<String>,
    /// Animation channels whose node is not part of the skeleton.
    pub unmatched_channels: Vec<String>,
    /// Bone weights dropped because the vertex had no free influence slot.
    pub dropped_influences: usize,
}

impl ImportReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.duplicate_bones.is_empty()
            && self.unmatched_channels.is_empty()
            && self.dropped_influences == 0
    }
}

/// One imported mesh and the GPU buffers it was uploaded to.
#[derive(Debug)]
pub struct ModelMesh {
    pub data: MeshData,
    pub gpu: MeshHandle,
}

/// What the rendering layer needs to draw one mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCommand {
    pub mesh: MeshHandle,
    pub texture: Option<TextureHandle>,
    pub index_count: u32,
}

#[derive(Debug, Default)]
pub struct Model {
    meshes: Vec<ModelMesh>,
    /// Diffuse texture per material slot.
    textures: Vec<Option<TextureHandle>>,
    bones: BoneTable,
    skeleton: Option<SkeletonNode>,
    clip: Option<AnimationClip>,
    report: ImportReport,
}

impl Model {
    /// Imports the scene produced by `source`.
    pub fn create<S, B>(source: &mut S, backend: &mut B, settings: &ImportSettings) -> Result<Self>
    where
        S: SceneSource + ?Sized,
        B: RenderBackend + ?Sized,
    {
        let scene = source.load_scene()?;
        if scene.incomplete {
            return Err(TendonError::IncompleteScene(
                "the scene importer could not read the whole file".to_string(),
            ));
        }

        let mut model = Self {
            bones: BoneTable::with_limit(settings.effective_max_bones()),
            ..Self::default()
        };

        if let Err(err) = model.import(scene, backend, settings) {
            warn!("Model import failed, releasing uploaded resources: {err}");
            model.release(backend);
            return Err(err);
        }

        info!(
            "Model created: {} meshes, {} bones, {} skeleton nodes, clip {}",
            model.meshes.len(),
            model.bones.len(),
            model.skeleton.as_ref().map_or(0, SkeletonNode::node_count),
            model.clip.as_ref().map_or("<none>", |clip| clip.name.as_str())
        );
        Ok(model)
    }

    fn import<B>(&mut self, scene: RawScene, backend: &mut B, settings: &ImportSettings) -> Result<()>
    where
        B: RenderBackend + ?Sized,
    {
        let material_count = scene.materials.len();

        for raw in &scene.meshes {
            if raw.material_index >= material_count {
                return Err(TendonError::MaterialOutOfRange {
                    mesh: raw.name.clone(),
                    index: raw.material_index,
                    count: material_count,
                });
            }

            let (data, skinning) = MeshData::build(raw, &mut self.bones, settings.influence_overflow)?;
            self.report.duplicate_bones.extend(skinning.duplicate_bones);
            self.report.dropped_influences += skinning.dropped_influences;

            let gpu = backend.upload_mesh(&data)?;
            self.meshes.push(ModelMesh { data, gpu });
        }
        info!(
            "Imported {} meshes referencing {} unique bones",
            self.meshes.len(),
            self.bones.len()
        );

        self.skeleton = import_skeleton(&scene.root, &self.bones);

        if let Some(raw_clip) = scene.animations.first() {
            if scene.animations.len() > 1 {
                info!(
                    "Scene has {} animations, only '{}' is used",
                    scene.animations.len(),
                    raw_clip.name
                );
            }
            self.clip = Some(self.import_clip(raw_clip, settings)?);
        } else {
            debug!("Scene has no animation");
        }

        self.textures = Vec::with_capacity(material_count);
        for material in &scene.materials {
            let handle = match &material.diffuse {
                Some(source) if settings.load_textures => {
                    let image = texture::decode(
                        source,
                        scene.base_dir.as_deref(),
                        settings.flip_textures_vertically,
                    )?;
                    Some(backend.upload_texture(&image)?)
                }
                _ => None,
            };
            self.textures.push(handle);
        }

        Ok(())
    }

    fn import_clip(&mut self, raw: &RawAnimation, settings: &ImportSettings) -> Result<AnimationClip> {
        let ticks_per_second = if raw.ticks_per_second > 0.0 {
            raw.ticks_per_second
        } else {
            debug!(
                "Animation '{}' has no tick rate, using {}",
                raw.name, settings.default_ticks_per_second
            );
            settings.default_ticks_per_second
        };

        match self.skeleton.as_mut() {
            Some(root) => {
                let unmatched = attach_channels(Some(root), &raw.channels, settings.unmatched_channels)?;
                self.report.unmatched_channels = unmatched;
            }
            None => info!(
                "Animation '{}' ignored: the model has no skeleton",
                raw.name
            ),
        }

        let clip = AnimationClip::new(raw.name.clone(), raw.duration, ticks_per_second);
        info!(
            "Animation '{}': {} channels, {} ticks at {} ticks/s",
            clip.name,
            raw.channels.len(),
            clip.duration,
            clip.ticks_per_second
        );
        Ok(clip)
    }

    /// Releases the GPU resources of the model and drops its CPU data.
    pub fn destroy<B: RenderBackend + ?Sized>(mut self, backend: &mut B) {
        self.release(backend);
        debug!("Model destroyed");
    }

    fn release<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        for mesh in self.meshes.drain(..) {
            backend.release_mesh(mesh.gpu);
        }
        for handle in self.textures.drain(..).flatten() {
            backend.release_texture(handle);
        }
    }

    // ------------------------------------------------------------------------
    // Per-frame
    // ------------------------------------------------------------------------

    /// Writes the bone matrices at `anim_time` (in ticks) into `pose`.
    ///
    /// Models without a skeleton leave `pose` untouched.
    pub fn evaluate(&self, anim_time: f32, pose: &mut BonePose) {
        if let Some(root) = &self.skeleton {
            scene::evaluate(
                root,
                anim_time,
                Mat4::IDENTITY,
                self.bones.offsets(),
                pose.matrices_mut(),
            );
        }
    }

    /// Evaluates at the player's current time.
    #[inline]
    pub fn animate(&self, player: &AnimationPlayer, pose: &mut BonePose) {
        self.evaluate(player.time(), pose);
    }

    /// A pose buffer sized for this model.
    #[must_use]
    pub fn new_pose(&self) -> BonePose {
        BonePose::new(self.bones.len())
    }

    pub fn draw_commands(&self) -> impl Iterator<Item = DrawCommand> + '_ {
        self.meshes.iter().map(|mesh| DrawCommand {
            mesh: mesh.gpu,
            texture: self
                .textures
                .get(mesh.data.material_index)
                .copied()
                .flatten(),
            index_count: mesh.data.index_count(),
        })
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &BoneTable {
        &self.bones
    }

    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> Option<&SkeletonNode> {
        self.skeleton.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn clip(&self) -> Option<&AnimationClip> {
        self.clip.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn meshes(&self) -> &[ModelMesh] {
        &self.meshes
    }

    #[inline]
    #[must_use]
    pub fn textures(&self) -> &[Option<TextureHandle>] {
        &self.textures
    }

    #[inline]
    #[must_use]
    pub fn report(&self) -> &ImportReport {
        &self.report
    }
}
