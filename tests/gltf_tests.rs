//! glTF Source Tests
//!
//! Builds a small skinned, animated glTF file with an embedded base64 buffer
//! and imports it end to end.

#![cfg(feature = "gltf")]

use std::f32::consts::FRAC_PI_2;
use std::path::PathBuf;

use base64::Engine as _;
use glam::{Mat4, Quat, Vec3};
use serde_json::json;

use tendon::assets::{GltfSource, SceneSource};
use tendon::{AnimationPlayer, HeadlessBackend, ImportSettings, Model};

const EPSILON: f32 = 1e-5;

struct TempFile(PathBuf);

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

fn push_f32s(buffer: &mut Vec<u8>, values: &[f32]) -> (usize, usize) {
    let offset = buffer.len();
    buffer.extend_from_slice(bytemuck::cast_slice(values));
    (offset, buffer.len() - offset)
}

fn pad4(buffer: &mut Vec<u8>) {
    while buffer.len() % 4 != 0 {
        buffer.push(0);
    }
}

/// Armature
/// ├── Hip   (joint 0, animated)
/// │   └── Knee (joint 1)
/// └── Body  (skinned triangle)
/// Lamp
fn write_rig(name: &str, hip_translation: [f32; 3]) -> anyhow::Result<TempFile> {
    let mut buffer = Vec::new();

    let positions = push_f32s(&mut buffer, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);

    let joints_offset = buffer.len();
    buffer.extend_from_slice(&[0, 0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0]);
    let joints = (joints_offset, 12);

    let weights = push_f32s(
        &mut buffer,
        &[1.0, 0.0, 0.0, 0.0, 0.5, 0.5, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0],
    );

    let indices_offset = buffer.len();
    buffer.extend_from_slice(bytemuck::cast_slice(&[0u16, 1, 2]));
    let indices = (indices_offset, 6);
    pad4(&mut buffer);

    let knee_ibm = Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0));
    let mut ibms = Vec::new();
    ibms.extend_from_slice(&Mat4::IDENTITY.to_cols_array());
    ibms.extend_from_slice(&knee_ibm.to_cols_array());
    let ibms = push_f32s(&mut buffer, &ibms);

    let times = push_f32s(&mut buffer, &[0.0, 2.0]);
    let quarter = Quat::from_rotation_y(FRAC_PI_2);
    let rotations = push_f32s(
        &mut buffer,
        &[0.0, 0.0, 0.0, 1.0, quarter.x, quarter.y, quarter.z, quarter.w],
    );

    let views: Vec<_> = [positions, joints, weights, indices, ibms, times, rotations]
        .iter()
        .map(|&(offset, length)| json!({ "buffer": 0, "byteOffset": offset, "byteLength": length }))
        .collect();

    let document = json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0, 4] }],
        "nodes": [
            { "name": "Armature", "children": [1, 3] },
            { "name": "Hip", "children": [2], "translation": hip_translation },
            { "name": "Knee" },
            { "name": "Body", "mesh": 0, "skin": 0 },
            { "name": "Lamp" }
        ],
        "meshes": [{
            "name": "Body",
            "primitives": [{
                "attributes": { "POSITION": 0, "JOINTS_0": 1, "WEIGHTS_0": 2 },
                "indices": 3
            }]
        }],
        "skins": [{ "joints": [1, 2], "inverseBindMatrices": 4 }],
        "animations": [{
            "name": "turn",
            "samplers": [{ "input": 5, "output": 6, "interpolation": "LINEAR" }],
            "channels": [{ "sampler": 0, "target": { "node": 1, "path": "rotation" } }]
        }],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 1, "componentType": 5121, "count": 3, "type": "VEC4" },
            { "bufferView": 2, "componentType": 5126, "count": 3, "type": "VEC4" },
            { "bufferView": 3, "componentType": 5123, "count": 3, "type": "SCALAR" },
            { "bufferView": 4, "componentType": 5126, "count": 2, "type": "MAT4" },
            { "bufferView": 5, "componentType": 5126, "count": 2, "type": "SCALAR",
              "min": [0.0], "max": [2.0] },
            { "bufferView": 6, "componentType": 5126, "count": 2, "type": "VEC4" }
        ],
        "bufferViews": views,
        "buffers": [{
            "byteLength": buffer.len(),
            "uri": format!(
                "data:application/octet-stream;base64,{}",
                base64::engine::general_purpose::STANDARD.encode(&buffer)
            )
        }]
    });

    let path = std::env::temp_dir().join(format!("tendon_{name}_{}.gltf", std::process::id()));
    std::fs::write(&path, serde_json::to_vec_pretty(&document)?)?;
    Ok(TempFile(path))
}

#[test]
fn snapshot_has_synthetic_root_and_named_nodes() -> anyhow::Result<()> {
    let file = write_rig("snapshot", [0.0; 3])?;
    let scene = GltfSource::new(&file.0).load_scene()?;

    assert_eq!(scene.root.name, "gltf_root");
    let roots: Vec<_> = scene.root.children.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(roots, vec!["Armature", "Lamp"]);

    assert_eq!(scene.meshes.len(), 1);
    let mesh = &scene.meshes[0];
    assert_eq!(mesh.positions.len(), 3);
    assert_eq!(mesh.faces.len(), 1);
    assert_eq!(mesh.bones.len(), 2);
    assert_eq!(mesh.bones[0].name, "Hip");
    assert_eq!(mesh.bones[0].weights.len(), 2);
    assert_eq!(mesh.bones[1].weights.len(), 2);

    // The primitive has no material, so a default one is appended
    assert_eq!(scene.materials.len(), 1);
    assert_eq!(mesh.material_index, 0);

    let anim = &scene.animations[0];
    assert_eq!(anim.name, "turn");
    assert!((anim.duration - 2.0).abs() < EPSILON);
    assert!((anim.ticks_per_second - 1.0).abs() < EPSILON);
    assert_eq!(anim.channels.len(), 1);
    assert_eq!(anim.channels[0].node_name, "Hip");
    assert_eq!(anim.channels[0].rotation_keys.len(), 2);
    // Unanimated components hold the rest value
    assert_eq!(anim.channels[0].position_keys, vec![(0.0, Vec3::ZERO)]);
    assert_eq!(anim.channels[0].scale_keys, vec![(0.0, Vec3::ONE)]);
    Ok(())
}

#[test]
fn model_from_gltf_animates() -> anyhow::Result<()> {
    let file = write_rig("model", [0.0; 3])?;
    let mut backend = HeadlessBackend::new();
    let model = Model::create(
        &mut GltfSource::new(&file.0),
        &mut backend,
        &ImportSettings::default(),
    )?;

    assert_eq!(model.bone_count(), 2);
    let skeleton = model.skeleton().unwrap();
    assert_eq!(skeleton.name(), "gltf_root");
    assert_eq!(skeleton.node_count(), 4);
    assert!(skeleton.find("Body").is_none());
    assert!(skeleton.find("Lamp").is_none());

    let knee_ibm = Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0));
    assert!(model.bones().offset(1).unwrap().abs_diff_eq(knee_ibm, EPSILON));

    let vertex = model.meshes()[0].data.vertices[1];
    assert_eq!(vertex.joints[..2], [0, 1]);
    assert_eq!(vertex.weights[..2], [0.5, 0.5]);

    let mut player = AnimationPlayer::new();
    player.advance(1.0, model.clip().unwrap());
    let mut pose = model.new_pose();
    model.animate(&player, &mut pose);

    let hip = Mat4::from_quat(Quat::from_rotation_y(FRAC_PI_2 / 2.0));
    assert!(pose.matrices()[0].abs_diff_eq(hip, EPSILON));
    assert!(pose.matrices()[1].abs_diff_eq(hip * knee_ibm, EPSILON));

    model.destroy(&mut backend);
    assert_eq!(backend.live_meshes(), 0);
    Ok(())
}

#[test]
fn rotation_only_channel_keeps_rest_translation() -> anyhow::Result<()> {
    let file = write_rig("rest", [0.0, 2.0, 0.0])?;
    let mut backend = HeadlessBackend::new();
    let model = Model::create(
        &mut GltfSource::new(&file.0),
        &mut backend,
        &ImportSettings::default(),
    )?;

    let mut player = AnimationPlayer::new();
    player.advance(1.0, model.clip().unwrap());
    let mut pose = model.new_pose();
    model.animate(&player, &mut pose);

    let hip = Mat4::from_rotation_translation(
        Quat::from_rotation_y(FRAC_PI_2 / 2.0),
        Vec3::new(0.0, 2.0, 0.0),
    );
    assert!(pose.matrices()[0].abs_diff_eq(hip, EPSILON));
    assert!(
        pose.matrices()[0]
            .w_axis
            .truncate()
            .abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), EPSILON)
    );

    // Knee sits one unit above the hip in the rest pose
    let knee_ibm = Mat4::from_translation(Vec3::new(0.0, -1.0, 0.0));
    let knee = pose.matrices()[1];
    assert!(knee.abs_diff_eq(hip * knee_ibm, EPSILON));
    assert!(knee.w_axis.truncate().abs_diff_eq(Vec3::new(0.0, 1.0, 0.0), EPSILON));

    model.destroy(&mut backend);
    Ok(())
}

#[test]
fn missing_file_is_an_io_error() {
    let mut source = GltfSource::new("/nonexistent/rig.gltf");
    assert!(matches!(
        source.load_scene(),
        Err(tendon::TendonError::Io(_))
    ));
}
