//! Skinned Mesh Data
//!
//! Converts importer meshes into GPU-ready interleaved vertex and index data.
//!
//! # Vertex Layout
//!
//! | Location | Attribute | Format      | Offset |
//! |----------|-----------|-------------|--------|
//! | 0        | position  | `Float32x3` | 0      |
//! | 1        | normal    | `Float32x3` | 12     |
//! | 2        | uv        | `Float32x2` | 24     |
//! | 3        | joints    | `Uint32x4`  | 32     |
//! | 4        | weights   | `Float32x4` | 48     |
//!
//! Joint ids are indices into the model's [`BoneTable`], so every mesh of a
//! model shares one bone matrix array.

use std::mem::{offset_of, size_of};

use bytemuck::{Pod, Zeroable};
use log::{debug, warn};

use crate::MAX_BONE_INFLUENCE;
use crate::assets::RawMesh;
use crate::errors::{Result, TendonError};
use crate::scene::{BoneInsert, BoneTable};
use crate::settings::InfluencePolicy;

pub const ATTR_POSITION: u32 = 0;
pub const ATTR_NORMAL: u32 = 1;
pub const ATTR_UV: u32 = 2;
pub const ATTR_JOINTS: u32 = 3;
pub const ATTR_WEIGHTS: u32 = 4;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SkinnedVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub joints: [u32; MAX_BONE_INFLUENCE],
    /// A zero weight marks a free slot.
    pub weights: [f32; MAX_BONE_INFLUENCE],
}

impl SkinnedVertex {
    pub const LAYOUT: VertexLayout = VertexLayout {
        stride: size_of::<SkinnedVertex>() as u64,
        attributes: &[
            VertexAttribute {
                location: ATTR_POSITION,
                name: "position",
                format: AttributeFormat::Float32x3,
                offset: offset_of!(SkinnedVertex, position) as u64,
            },
            VertexAttribute {
                location: ATTR_NORMAL,
                name: "normal",
                format: AttributeFormat::Float32x3,
                offset: offset_of!(SkinnedVertex, normal) as u64,
            },
            VertexAttribute {
                location: ATTR_UV,
                name: "uv",
                format: AttributeFormat::Float32x2,
                offset: offset_of!(SkinnedVertex, uv) as u64,
            },
            VertexAttribute {
                location: ATTR_JOINTS,
                name: "joints",
                format: AttributeFormat::Uint32x4,
                offset: offset_of!(SkinnedVertex, joints) as u64,
            },
            VertexAttribute {
                location: ATTR_WEIGHTS,
                name: "weights",
                format: AttributeFormat::Float32x4,
                offset: offset_of!(SkinnedVertex, weights) as u64,
            },
        ],
    };

    /// Stores `weight` for `joint` in the first free slot.
    ///
    /// Returns `false` when all slots are taken.
    pub fn add_influence(&mut self, joint: u32, weight: f32) -> bool {
        match self.weights.iter().position(|&w| w == 0.0) {
            Some(slot) => {
                self.joints[slot] = joint;
                self.weights[slot] = weight;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn influence_count(&self) -> usize {
        self.weights.iter().filter(|&&w| w != 0.0).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeFormat {
    Float32x2,
    Float32x3,
    Float32x4,
    Uint32x4,
}

impl AttributeFormat {
    #[must_use]
    pub const fn size(self) -> u64 {
        match self {
            AttributeFormat::Float32x2 => 8,
            AttributeFormat::Float32x3 => 12,
            AttributeFormat::Float32x4 | AttributeFormat::Uint32x4 => 16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub name: &'static str,
    pub format: AttributeFormat,
    pub offset: u64,
}

/// Interleaved layout of one vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    pub stride: u64,
    pub attributes: &'static [VertexAttribute],
}

/// Skinning inconsistencies met while building one mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkinningReport {
    /// Weights that did not fit into a vertex's influence slots.
    pub dropped_influences: usize,
    /// Bones this mesh lists that an earlier mesh registered first.
    pub duplicate_bones: Vec<String>,
}

/// CPU side of one mesh, immutable after import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<SkinnedVertex>,
    pub indices: Vec<u32>,
    pub material_index: usize,
}

impl MeshData {
    /// Builds vertex and index data for `raw`, registering its bones in `bones`.
    pub fn build(
        raw: &RawMesh,
        bones: &mut BoneTable,
        influence_policy: InfluencePolicy,
    ) -> Result<(Self, SkinningReport)> {
        let vertex_count = raw.positions.len();
        let mut report = SkinningReport::default();

        let mut vertices: Vec<SkinnedVertex> = raw
            .positions
            .iter()
            .enumerate()
            .map(|(i, position)| SkinnedVertex {
                position: position.to_array(),
                normal: raw
                    .normals
                    .as_ref()
                    .and_then(|normals| normals.get(i))
                    .map_or([0.0; 3], |n| n.to_array()),
                uv: raw
                    .tex_coords
                    .as_ref()
                    .and_then(|uvs| uvs.get(i))
                    .map_or([0.0; 2], |uv| uv.to_array()),
                ..Default::default()
            })
            .collect();

        let mut non_triangles = 0usize;
        let mut indices = Vec::with_capacity(raw.faces.len() * 3);
        for face in &raw.faces {
            if face.len() != 3 {
                non_triangles += 1;
            }
            for &index in face {
                if index as usize >= vertex_count {
                    return Err(TendonError::VertexOutOfRange {
                        mesh: raw.name.clone(),
                        vertex: index,
                        count: vertex_count,
                    });
                }
                indices.push(index);
            }
        }
        if non_triangles > 0 {
            warn!("Mesh '{}' has {non_triangles} non-triangle faces", raw.name);
        }

        if raw.bones.is_empty() {
            debug!("Mesh '{}' has no bones", raw.name);
        }

        for bone in &raw.bones {
            let joint = match bones.insert(&bone.name, bone.offset)? {
                BoneInsert::Added(index) => index,
                BoneInsert::Existing(index) => {
                    if bones.offset(index) != Some(&bone.offset) {
                        warn!(
                            "Bone '{}' in mesh '{}' disagrees with the offset registered first, keeping the first",
                            bone.name, raw.name
                        );
                    }
                    report.duplicate_bones.push(bone.name.clone());
                    index
                }
            };

            for weight in &bone.weights {
                let Some(vertex) = vertices.get_mut(weight.vertex as usize) else {
                    return Err(TendonError::VertexOutOfRange {
                        mesh: raw.name.clone(),
                        vertex: weight.vertex,
                        count: vertex_count,
                    });
                };
                if weight.weight == 0.0 {
                    continue;
                }
                if !vertex.add_influence(joint as u32, weight.weight) {
                    match influence_policy {
                        InfluencePolicy::Error => {
                            return Err(TendonError::InfluenceOverflow {
                                mesh: raw.name.clone(),
                                vertex: weight.vertex,
                                max: MAX_BONE_INFLUENCE,
                            });
                        }
                        InfluencePolicy::Drop => report.dropped_influences += 1,
                    }
                }
            }
        }

        if report.dropped_influences > 0 {
            warn!(
                "Mesh '{}': dropped {} bone weights beyond {MAX_BONE_INFLUENCE} per vertex",
                raw.name, report.dropped_influences
            );
        }

        let mesh = Self {
            name: raw.name.clone(),
            vertices,
            indices,
            material_index: raw.material_index,
        };
        Ok((mesh, report))
    }

    #[inline]
    #[must_use]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_struct() {
        let layout = SkinnedVertex::LAYOUT;
        assert_eq!(layout.stride, 64);
        for pair in layout.attributes.windows(2) {
            assert_eq!(pair[0].offset + pair[0].format.size(), pair[1].offset);
        }
    }

    #[test]
    fn influences_fill_free_slots_in_order() {
        let mut vertex = SkinnedVertex::default();
        for joint in 0..4 {
            assert!(vertex.add_influence(joint, 0.25));
        }
        assert!(!vertex.add_influence(9, 0.1));
        assert_eq!(vertex.joints, [0, 1, 2, 3]);
        assert_eq!(vertex.influence_count(), 4);
    }
}
