//! glTF 2.0 scene source
//!
//! Reads `.gltf` / `.glb` files into a [`RawScene`]:
//! - buffers from the GLB binary chunk, external files or base64 data URIs
//! - the default scene's node tree below a synthetic `gltf_root` node
//! - triangle primitives as meshes, skin joints as per-mesh bones
//! - base-colour textures as diffuse textures
//! - animation channels grouped per target node, timed in seconds
//!
//! Node rest transforms are not carried over; nodes without animation keys
//! contribute identity to the pose.

use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use gltf::animation::util::ReadOutputs;
use glam::{Mat4, Quat, Vec2, Vec3};
use log::{debug, info, warn};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::assets::source::{
    RawAnimation, RawBone, RawChannel, RawFace, RawMaterial, RawMesh, RawNode, RawScene,
    SceneSource, TextureSource, VertexWeight,
};
use crate::errors::{Result, TendonError};

/// Name of the node synthesised above the scene's root nodes.
pub const GLTF_ROOT_NAME: &str = "gltf_root";

/// glTF keys are timed in seconds, so one tick is one second.
const GLTF_TICKS_PER_SECOND: f32 = 1.0;

/// A [`SceneSource`] reading a glTF file from disk.
#[derive(Debug, Clone)]
pub struct GltfSource {
    path: PathBuf,
}

impl GltfSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SceneSource for GltfSource {
    fn load_scene(&mut self) -> Result<RawScene> {
        let file = fs::File::open(&self.path)?;
        let gltf = gltf::Gltf::from_reader_without_validation(BufReader::new(file))?;

        let base_dir = self
            .path
            .parent()
            .map_or_else(|| PathBuf::from("./"), Path::to_path_buf);
        let buffers = load_buffers(&gltf, &base_dir)?;

        let scene = GltfImporter::new(&gltf, &buffers).import(base_dir)?;
        info!(
            "Loaded glTF {}: {} meshes, {} materials, {} animations",
            self.path.display(),
            scene.meshes.len(),
            scene.materials.len(),
            scene.animations.len()
        );
        Ok(scene)
    }
}

fn load_buffers(gltf: &gltf::Gltf, base_dir: &Path) -> Result<Vec<Vec<u8>>> {
    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        let data = match buffer.source() {
            gltf::buffer::Source::Bin => gltf
                .blob
                .clone()
                .ok_or_else(|| TendonError::Gltf("Missing GLB binary chunk".to_string()))?,
            gltf::buffer::Source::Uri(uri) => match decode_data_uri(uri)? {
                Some(bytes) => bytes,
                None => fs::read(base_dir.join(uri))?,
            },
        };

        if data.len() < buffer.length() {
            return Err(TendonError::Gltf(format!(
                "Buffer {} holds {} bytes, {} declared",
                buffer.index(),
                data.len(),
                buffer.length()
            )));
        }
        buffer_data.push(data);
    }
    Ok(buffer_data)
}

/// Decodes a base64 `data:` URI. Returns `None` for any other URI.
fn decode_data_uri(uri: &str) -> Result<Option<Vec<u8>>> {
    let Some(rest) = uri.strip_prefix("data:") else {
        return Ok(None);
    };
    let Some((header, payload)) = rest.split_once(',') else {
        return Err(TendonError::Gltf("Malformed data URI".to_string()));
    };
    if !header.ends_with(";base64") {
        return Err(TendonError::Gltf(format!(
            "Unsupported data URI encoding: {header}"
        )));
    }

    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map(Some)
        .map_err(|err| TendonError::Gltf(format!("Invalid base64 data URI: {err}")))
}

fn node_name(node: &gltf::Node) -> String {
    node.name()
        .map_or_else(|| format!("Node_{}", node.index()), str::to_string)
}

struct GltfImporter<'a> {
    gltf: &'a gltf::Gltf,
    buffers: &'a [Vec<u8>],
    meshes: Vec<RawMesh>,
    /// Index of the fallback material, once a primitive needed it.
    default_material: Option<usize>,
}

impl<'a> GltfImporter<'a> {
    fn new(gltf: &'a gltf::Gltf, buffers: &'a [Vec<u8>]) -> Self {
        Self {
            gltf,
            buffers,
            meshes: Vec::new(),
            default_material: None,
        }
    }

    fn buffer(&self, buffer: &gltf::Buffer) -> Option<&'a [u8]> {
        self.buffers.get(buffer.index()).map(Vec::as_slice)
    }

    fn import(mut self, base_dir: PathBuf) -> Result<RawScene> {
        let gltf = self.gltf;
        let required: Vec<&str> = gltf.extensions_required().collect();
        if !required.is_empty() {
            warn!("Unsupported required glTF extensions: {required:?}");
        }

        let roots = self.root_nodes();
        let mut children = Vec::with_capacity(roots.len());
        for node in &roots {
            children.push(self.import_node(node)?);
        }

        let mut materials = self.load_materials()?;
        if let Some(index) = self.default_material {
            debug!("Adding default material at slot {index}");
            materials.push(RawMaterial {
                name: "default".to_string(),
                diffuse: None,
            });
        }

        let animations = self.load_animations();

        Ok(RawScene {
            root: RawNode::with_children(GLTF_ROOT_NAME, children),
            meshes: self.meshes,
            materials,
            animations,
            incomplete: !required.is_empty(),
            base_dir: Some(base_dir),
        })
    }

    /// Root nodes of the default scene, or every parentless node when the
    /// file declares no scene.
    fn root_nodes(&self) -> Vec<gltf::Node<'a>> {
        if let Some(scene) = self.gltf.default_scene().or_else(|| self.gltf.scenes().next()) {
            return scene.nodes().collect();
        }

        let children: FxHashSet<usize> = self
            .gltf
            .nodes()
            .flat_map(|node| node.children().map(|child| child.index()))
            .collect();
        self.gltf
            .nodes()
            .filter(|node| !children.contains(&node.index()))
            .collect()
    }

    fn import_node(&mut self, node: &gltf::Node<'a>) -> Result<RawNode> {
        if let Some(mesh) = node.mesh() {
            self.load_mesh(node, &mesh)?;
        }

        let mut children = Vec::new();
        for child in node.children() {
            children.push(self.import_node(&child)?);
        }
        Ok(RawNode::with_children(node_name(node), children))
    }

    // ------------------------------------------------------------------------
    // Meshes & skins
    // ------------------------------------------------------------------------

    fn load_mesh(&mut self, node: &gltf::Node<'a>, mesh: &gltf::Mesh<'a>) -> Result<()> {
        let mesh_name = mesh
            .name()
            .map_or_else(|| format!("Mesh_{}", mesh.index()), str::to_string);
        let primitive_count = mesh.primitives().len();
        let skin_bones = node.skin().map(|skin| self.load_skin(&skin));

        for primitive in mesh.primitives() {
            let name = if primitive_count > 1 {
                format!("{mesh_name}_{}", primitive.index())
            } else {
                mesh_name.clone()
            };

            if primitive.mode() != gltf::mesh::Mode::Triangles {
                warn!("Skipping primitive '{name}': {:?} is not supported", primitive.mode());
                continue;
            }

            let buffers = self.buffers;
            let reader =
                primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
            let Some(positions) = reader.read_positions() else {
                warn!("Skipping primitive '{name}': no POSITION attribute");
                continue;
            };
            let positions: Vec<Vec3> = positions.map(Vec3::from_array).collect();
            let normals = reader
                .read_normals()
                .map(|iter| iter.map(Vec3::from_array).collect());
            let tex_coords = reader
                .read_tex_coords(0)
                .map(|iter| iter.into_f32().map(Vec2::from_array).collect());

            let indices: Vec<u32> = match reader.read_indices() {
                Some(iter) => iter.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };
            if indices.len() % 3 != 0 {
                warn!("Primitive '{name}' has a dangling partial triangle");
            }
            let faces = indices
                .chunks_exact(3)
                .map(RawFace::from_slice)
                .collect();

            let bones = match &skin_bones {
                Some(skin) => {
                    let mut bones: Vec<RawBone> = skin.clone();
                    if let (Some(joints), Some(weights)) = (
                        reader.read_joints(0).map(|iter| iter.into_u16()),
                        reader.read_weights(0).map(|iter| iter.into_f32()),
                    ) {
                        for (vertex, (joint_ids, joint_weights)) in joints.zip(weights).enumerate()
                        {
                            for (&joint, &weight) in joint_ids.iter().zip(joint_weights.iter()) {
                                if weight == 0.0 {
                                    continue;
                                }
                                let bone = bones.get_mut(joint as usize).ok_or_else(|| {
                                    TendonError::Gltf(format!(
                                        "Primitive '{name}' uses joint {joint} but the skin has {} joints",
                                        skin.len()
                                    ))
                                })?;
                                bone.weights.push(VertexWeight {
                                    vertex: vertex as u32,
                                    weight,
                                });
                            }
                        }
                    } else {
                        warn!("Primitive '{name}' is skinned but has no JOINTS_0/WEIGHTS_0");
                    }
                    bones
                }
                None => Vec::new(),
            };

            let material_index = match primitive.material().index() {
                Some(index) => index,
                None => *self
                    .default_material
                    .get_or_insert(self.gltf.materials().len()),
            };

            self.meshes.push(RawMesh {
                name,
                positions,
                normals,
                tex_coords,
                faces,
                bones,
                material_index,
            });
        }
        Ok(())
    }

    /// One weightless bone per joint, offset by its inverse bind matrix.
    fn load_skin(&self, skin: &gltf::Skin<'a>) -> Vec<RawBone> {
        let reader = skin.reader(|buffer| self.buffer(&buffer));
        let mut ibms = reader
            .read_inverse_bind_matrices()
            .map(|iter| iter.map(|m| Mat4::from_cols_array_2d(&m)).collect::<Vec<_>>())
            .unwrap_or_default()
            .into_iter();

        skin.joints()
            .map(|joint| RawBone {
                name: node_name(&joint),
                offset: ibms.next().unwrap_or(Mat4::IDENTITY),
                weights: Vec::new(),
            })
            .collect()
    }

    // ------------------------------------------------------------------------
    // Materials
    // ------------------------------------------------------------------------

    fn load_materials(&self) -> Result<Vec<RawMaterial>> {
        let mut materials = Vec::new();
        for material in self.gltf.materials() {
            let name = material.name().map_or_else(
                || format!("Material_{}", material.index().unwrap_or_default()),
                str::to_string,
            );
            let diffuse = match material.pbr_metallic_roughness().base_color_texture() {
                Some(info) => Some(self.texture_source(&info.texture().source())?),
                None => None,
            };
            materials.push(RawMaterial { name, diffuse });
        }
        Ok(materials)
    }

    fn texture_source(&self, image: &gltf::Image<'a>) -> Result<TextureSource> {
        let label = image
            .name()
            .map_or_else(|| format!("image_{}", image.index()), str::to_string);

        match image.source() {
            gltf::image::Source::Uri { uri, .. } => Ok(match decode_data_uri(uri)? {
                Some(bytes) => TextureSource::Memory { label, bytes },
                None => TextureSource::File(PathBuf::from(uri)),
            }),
            gltf::image::Source::View { view, .. } => {
                let start = view.offset();
                let end = start + view.length();
                let bytes = self
                    .buffer(&view.buffer())
                    .and_then(|buffer| buffer.get(start..end))
                    .ok_or_else(|| {
                        TendonError::Gltf(format!("Image '{label}' lies outside its buffer"))
                    })?;
                Ok(TextureSource::Memory {
                    label,
                    bytes: bytes.to_vec(),
                })
            }
        }
    }

    // ------------------------------------------------------------------------
    // Animations
    // ------------------------------------------------------------------------

    fn load_animations(&self) -> Vec<RawAnimation> {
        let mut animations = Vec::new();

        for anim in self.gltf.animations() {
            let name = anim
                .name()
                .map_or_else(|| format!("Animation_{}", anim.index()), str::to_string);
            let mut channels: Vec<RawChannel> = Vec::new();
            let mut targets: Vec<gltf::Node<'a>> = Vec::new();
            let mut by_node: FxHashMap<String, usize> = FxHashMap::default();
            let mut duration = 0.0f32;

            for channel in anim.channels() {
                let reader = channel.reader(|buffer| self.buffer(&buffer));
                let node = channel.target().node();
                let node_name = node_name(&node);

                let Some(inputs) = reader.read_inputs() else {
                    warn!("Animation '{name}': channel for '{node_name}' has no key times");
                    continue;
                };
                let times: Vec<f32> = inputs.collect();
                duration = times.iter().copied().fold(duration, f32::max);

                let interpolation = channel.sampler().interpolation();
                if interpolation != gltf::animation::Interpolation::Linear {
                    debug!("Animation '{name}': {interpolation:?} keys on '{node_name}' are sampled linearly");
                }
                let cubic = interpolation == gltf::animation::Interpolation::CubicSpline;

                let slot = *by_node.entry(node_name.clone()).or_insert_with(|| {
                    channels.push(RawChannel {
                        node_name: node_name.clone(),
                        ..Default::default()
                    });
                    targets.push(node);
                    channels.len() - 1
                });
                let target = &mut channels[slot];

                match reader.read_outputs() {
                    Some(ReadOutputs::Translations(iter)) => {
                        target.position_keys =
                            zip_keys(&times, key_values(iter.map(Vec3::from_array), cubic));
                    }
                    Some(ReadOutputs::Rotations(iter)) => {
                        target.rotation_keys = zip_keys(
                            &times,
                            key_values(iter.into_f32().map(Quat::from_array), cubic),
                        );
                    }
                    Some(ReadOutputs::Scales(iter)) => {
                        target.scale_keys =
                            zip_keys(&times, key_values(iter.map(Vec3::from_array), cubic));
                    }
                    Some(ReadOutputs::MorphTargetWeights(_)) => {
                        debug!("Animation '{name}': morph target weights on '{node_name}' ignored");
                    }
                    None => warn!("Animation '{name}': channel for '{node_name}' has no values"),
                }
            }

            for (channel, node) in channels.iter_mut().zip(&targets) {
                fill_rest_keys(channel, node);
            }

            debug!(
                "Animation '{name}': {} animated nodes, {duration}s",
                channels.len()
            );
            animations.push(RawAnimation {
                name,
                duration,
                ticks_per_second: GLTF_TICKS_PER_SECOND,
                channels,
            });
        }

        animations
    }
}

/// Gives every unanimated component of `channel` a single key holding the
/// node's rest value, so animating one component keeps the other two.
fn fill_rest_keys(channel: &mut RawChannel, node: &gltf::Node<'_>) {
    let (translation, rotation, scale) = node.transform().decomposed();
    if channel.position_keys.is_empty() {
        channel.position_keys = vec![(0.0, Vec3::from_array(translation))];
    }
    if channel.rotation_keys.is_empty() {
        channel.rotation_keys = vec![(0.0, Quat::from_array(rotation))];
    }
    if channel.scale_keys.is_empty() {
        channel.scale_keys = vec![(0.0, Vec3::from_array(scale))];
    }
}

/// Cubic spline samplers store `(in tangent, value, out tangent)` per key.
fn key_values<T>(values: impl Iterator<Item = T>, cubic: bool) -> Vec<T> {
    if cubic {
        values.skip(1).step_by(3).collect()
    } else {
        values.collect()
    }
}

fn zip_keys<T>(times: &[f32], values: Vec<T>) -> Vec<(f32, T)> {
    if times.len() != values.len() {
        warn!(
            "Key count mismatch: {} times, {} values",
            times.len(),
            values.len()
        );
    }
    times.iter().copied().zip(values).collect()
}
